// components/dependency_fetch/src/report.rs
use crate::error::EntryFailure;
use std::path::PathBuf;

/// A successfully materialized entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub url: String,
    pub path: PathBuf,
    pub bytes: u64,
    /// Set when the entry asked to be unpacked
    pub unpacked: Option<PathBuf>,
}

#[derive(Debug)]
pub enum EntryOutcome {
    Done(Materialized),
    Failed(EntryFailure),
}

/// Per-entry results of one run, in processing order
#[derive(Debug, Default)]
pub struct FetchReport {
    outcomes: Vec<EntryOutcome>,
    skipped: usize,
}

impl FetchReport {
    pub fn push(&mut self, outcome: EntryOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn skip(&mut self, count: usize) {
        self.skipped += count;
    }

    pub fn outcomes(&self) -> &[EntryOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &Materialized> {
        self.outcomes.iter().filter_map(|o| match o {
            EntryOutcome::Done(m) => Some(m),
            EntryOutcome::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryFailure> {
        self.outcomes.iter().filter_map(|o| match o {
            EntryOutcome::Failed(f) => Some(f),
            EntryOutcome::Done(_) => None,
        })
    }

    /// Entries never attempted because an earlier one failed under fail-fast
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none() && self.skipped == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EntryStage, FetchError};

    fn done(url: &str) -> EntryOutcome {
        EntryOutcome::Done(Materialized {
            url: url.to_string(),
            path: PathBuf::from("deps/a.tar"),
            bytes: 5,
            unpacked: None,
        })
    }

    #[test]
    fn empty_report_is_success() {
        assert!(FetchReport::default().is_success());
    }

    #[test]
    fn any_failure_fails_the_run() {
        let mut report = FetchReport::default();
        report.push(done("https://example.test/a.gz"));
        report.push(EntryOutcome::Failed(EntryFailure::new(
            "https://example.test/b.gz",
            EntryStage::Fetching,
            FetchError::UnsupportedEncoding { found: None },
        )));

        assert!(!report.is_success());
        assert_eq!(report.succeeded().count(), 1);
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.outcomes().len(), 2);
    }

    #[test]
    fn skipped_entries_fail_the_run() {
        let mut report = FetchReport::default();
        report.push(done("https://example.test/a.gz"));
        report.skip(2);
        assert!(!report.is_success());
        assert_eq!(report.skipped(), 2);
    }
}
