// components/dependency_fetch/src/session.rs
use crate::error::{EntryFailure, EntryStage, FetchError};
use crate::fetcher::FetchClient;
use crate::materializer::materialize;
use crate::naming::{ConfiguredNaming, TargetNaming};
use crate::report::{EntryOutcome, FetchReport, Materialized};
use crate::sources::{DependencySet, SourceEntry};
use crate::unpack::{unpack_dir_for, unpack_tar};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What to do with the remaining entries once one has failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and keep going
    #[default]
    ContinueOnError,
    /// Stop at the first failure, counting the rest as skipped
    FailFast,
}

/// Everything one run needs, owned by the caller and passed by reference
pub struct FetchSession {
    client: FetchClient,
    deps_dir: PathBuf,
    naming: Box<dyn TargetNaming>,
    policy: FailurePolicy,
}

impl FetchSession {
    pub fn new(client: FetchClient, deps_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            deps_dir: deps_dir.into(),
            naming: Box::new(ConfiguredNaming),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_naming(mut self, naming: impl TargetNaming + 'static) -> Self {
        self.naming = Box::new(naming);
        self
    }

    pub fn with_boxed_naming(mut self, naming: Box<dyn TargetNaming>) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn deps_dir(&self) -> &Path {
        &self.deps_dir
    }

    /// Fetch every entry in order, one at a time
    pub async fn run(&self, set: &DependencySet) -> FetchReport {
        let mut report = FetchReport::default();

        for (i, entry) in set.iter().enumerate() {
            match self.fetch_entry(entry).await {
                Ok(done) => {
                    info!(
                        url = %done.url,
                        path = %done.path.display(),
                        bytes = done.bytes,
                        "dependency ready"
                    );
                    report.push(EntryOutcome::Done(done));
                }
                Err(failure) => {
                    warn!(
                        url = %failure.url,
                        stage = %failure.stage,
                        error = %failure.error,
                        "dependency failed"
                    );
                    report.push(EntryOutcome::Failed(failure));

                    if self.policy == FailurePolicy::FailFast {
                        let remaining = set.len() - i - 1;
                        if remaining > 0 {
                            warn!(remaining, "fail-fast: skipping remaining dependencies");
                        }
                        report.skip(remaining);
                        break;
                    }
                }
            }
        }

        report
    }

    /// Take one entry from `Pending` to `Done` or `Failed`
    ///
    /// The response moves into the blocking write task, where its decoder is
    /// built and read; both are dropped there on every path, before this returns.
    pub async fn fetch_entry(&self, entry: &SourceEntry) -> Result<Materialized, EntryFailure> {
        let url = entry.url.as_str();
        let fail = |stage: EntryStage| move |error: FetchError| EntryFailure::new(url, stage, error);

        debug!(%url, stage = %EntryStage::Fetching, "entry stage");
        let archive = self
            .client
            .fetch(&entry.url)
            .await
            .map_err(fail(EntryStage::Fetching))?;

        let file_name = self.naming.file_name(entry);
        let dest = self.deps_dir.clone();

        debug!(%url, stage = %EntryStage::Decompressing, %file_name, "entry stage");
        let (path, bytes) = tokio::task::spawn_blocking(move || {
            materialize(archive.into_stream(), &dest, &file_name)
        })
        .await
        .map_err(|e| fail(EntryStage::Writing)(e.into()))?
        .map_err(|e| {
            let stage = match e {
                FetchError::Decompression(_) | FetchError::Network(_) => EntryStage::Decompressing,
                _ => EntryStage::Writing,
            };
            fail(stage)(e)
        })?;

        let unpacked = if entry.unpack {
            debug!(%url, stage = %EntryStage::Unpacking, archive = %path.display(), "entry stage");
            let archive_path = path.clone();
            let dir = tokio::task::spawn_blocking(move || {
                unpack_tar(&archive_path, &unpack_dir_for(&archive_path))
            })
            .await
            .map_err(|e| fail(EntryStage::Unpacking)(e.into()))?
            .map_err(fail(EntryStage::Unpacking))?;
            Some(dir)
        } else {
            None
        };

        Ok(Materialized {
            url: url.to_string(),
            path,
            bytes,
            unpacked,
        })
    }
}
