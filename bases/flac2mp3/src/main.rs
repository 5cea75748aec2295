// bases/flac2mp3/src/main.rs
mod app;
mod args;
mod config;
mod output;
mod plan;

use app::App;
use args::Args;
use clap::Parser;
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let default_filter = if args.verbose {
        "flac2mp3=debug,dependency_fetch=debug"
    } else {
        "flac2mp3=info,dependency_fetch=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let app = App::new(args);

    let outcome = app.run().await;
    if let Err(error) = &outcome {
        app.print_error(error);
    }
    match app::exit_code(&outcome) {
        0 => Ok(()),
        code => std::process::exit(code),
    }
}
