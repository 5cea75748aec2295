// bases/flac2mp3/src/app.rs
use crate::args::Args;
use crate::config::Config;
use crate::output::OutputHandler;
use crate::plan::ConversionPlan;
use color_eyre::Result;
use dependency_fetch::fetch_dependencies;

/// Process exit status for the outcome of [`App::run`]
pub fn exit_code(outcome: &Result<bool>) -> i32 {
    match outcome {
        Ok(true) => 0,
        Ok(false) | Err(_) => 1,
    }
}

pub struct App {
    config: Config,
    output: OutputHandler,
}

impl App {
    pub fn new(args: Args) -> Self {
        let config = Config::from_args(args);
        let output = OutputHandler::new(config.verbose);
        Self { config, output }
    }

    /// Returns whether every dependency was fetched
    pub async fn run(&self) -> Result<bool> {
        self.output.print_fetch_start(&self.config.fetch);

        let report = fetch_dependencies(&self.config.fetch).await?;
        self.output.print_report(&report);

        if let Some(settings) = &self.config.conversion {
            let plan = ConversionPlan::scan(settings)?;
            tracing::info!(files = plan.jobs.len(), bitrate = plan.bitrate, "conversion planned");
            self.output.print_plan(&plan);
        }

        Ok(report.is_success())
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        self.output.print_error(error);
    }
}
