// bases/flac2mp3/src/output.rs
use crate::plan::ConversionPlan;
use dependency_fetch::{FetchConfig, FetchReport};
use std::error::Error;

pub struct OutputHandler {
    verbose: bool,
}

impl OutputHandler {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn print_fetch_start(&self, config: &FetchConfig) {
        println!(
            "Fetching dependencies listed in {} into {}",
            config.sources_dir.display(),
            config.deps_dir.display()
        );
    }

    pub fn print_report(&self, report: &FetchReport) {
        for done in report.succeeded() {
            println!("Fetched: {} -> {}", done.url, done.path.display());
            if let Some(dir) = &done.unpacked {
                println!("  unpacked into {}", dir.display());
            }
            if self.verbose {
                println!("  {} bytes", done.bytes);
            }
        }

        let failures: Vec<_> = report.failures().collect();
        for failure in &failures {
            eprintln!("Failed: {}", failure);
            if self.verbose {
                let mut cause = failure.error.source();
                while let Some(err) = cause {
                    eprintln!("  caused by: {}", err);
                    cause = err.source();
                }
            }
        }
        if report.skipped() > 0 {
            eprintln!("Skipped {} remaining dependencies", report.skipped());
        }

        println!(
            "{} fetched, {} failed, {} skipped",
            report.succeeded().count(),
            failures.len(),
            report.skipped()
        );
    }

    pub fn print_plan(&self, plan: &ConversionPlan) {
        println!(
            "{} FLAC files would be converted at {} kbps",
            plan.jobs.len(),
            plan.bitrate
        );
        if self.verbose {
            for job in &plan.jobs {
                println!("  {} -> {}", job.source.display(), job.target.display());
            }
        }
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        eprintln!("Error: {}", error);

        if self.verbose {
            eprintln!("\nError details:");
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
    }
}
