// bases/flac2mp3/src/plan.rs
use crate::config::ConversionSettings;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One FLAC file and the MP3 it would become
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Files that would be converted; nothing is encoded yet
#[derive(Debug, Clone)]
pub struct ConversionPlan {
    pub bitrate: u32,
    pub jobs: Vec<ConversionJob>,
}

impl ConversionPlan {
    /// Walk `source_dir` for FLAC files, mirroring their layout under `output_dir`
    pub fn scan(settings: &ConversionSettings) -> Result<Self> {
        let source_dir = &settings.source_dir;
        if !source_dir.is_dir() {
            return Err(eyre!(
                "source directory {} does not exist",
                source_dir.display()
            ));
        }

        let mut jobs = Vec::new();
        for entry in WalkDir::new(source_dir).sort_by_file_name() {
            let entry = entry.wrap_err_with(|| format!("scanning {}", source_dir.display()))?;
            if !entry.file_type().is_file() || !is_flac(entry.path()) {
                continue;
            }

            let relative = entry.path().strip_prefix(source_dir)?;
            jobs.push(ConversionJob {
                source: entry.path().to_path_buf(),
                target: settings.output_dir.join(relative).with_extension("mp3"),
            });
        }

        Ok(Self {
            bitrate: settings.bitrate,
            jobs,
        })
    }
}

fn is_flac(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("flac"))
}
