// bases/flac2mp3/src/args.rs
use clap::{Parser, ValueEnum};
use dependency_fetch::{DEFAULT_DEPS_DIR, DEFAULT_SOURCES_DIR};
use std::path::PathBuf;

/// Convert FLAC files to MP3, fetching the encoder it relies on first
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing the FLAC files to convert
    #[arg(long = "src")]
    pub source_dir: Option<PathBuf>,

    /// Directory for converted files [default: current directory]
    #[arg(long = "out")]
    pub output_dir: Option<PathBuf>,

    /// Target MP3 bitrate in kbps
    #[arg(long = "br", default_value_t = 320, value_parser = clap::value_parser!(u32).range(8..=320))]
    pub bitrate: u32,

    /// Directory holding sources.json
    #[arg(long, default_value = DEFAULT_SOURCES_DIR)]
    pub sources_dir: PathBuf,

    /// Directory fetched dependencies are written to
    #[arg(long, default_value = DEFAULT_DEPS_DIR)]
    pub deps_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Stop at the first dependency that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// How fetched files are named
    #[arg(long, value_enum, default_value_t = Naming::Configured)]
    pub naming: Naming,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    /// Use the entry's "name", else derive it from the URL
    Configured,
    /// Always derive the name from a hash of the URL
    UrlHash,
}
