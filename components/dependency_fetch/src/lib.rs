// components/dependency_fetch/src/lib.rs
//! Fetches third-party archives (such as the MP3 encoder bundle) listed in a
//! `sources.json` file and materializes their decompressed contents under a
//! local dependency directory.
//!
//! A run goes Loader → Fetcher → Materializer for each entry, strictly in
//! file order:
//!
//! - [`DependencySet::load_from_dir`] reads the source list
//! - [`FetchClient::fetch`] requests the archive and insists on gzip encoding
//! - [`materialize`] writes the decompressed stream via a staging file
//! - [`unpack_tar`] optionally extracts the resulting tarball
//!
//! [`FetchSession`] ties these together and produces a [`FetchReport`].

mod error;
mod fetcher;
mod materializer;
mod naming;
mod report;
mod session;
mod sources;
mod unpack;

use std::path::PathBuf;
use tracing::info;

pub use error::{EntryFailure, EntryStage, FetchError, Result};
pub use fetcher::{check_content_encoding, ClientConfig, FetchClient, FetchedArchive, DEFAULT_TIMEOUT};
pub use materializer::{ensure_dir, materialize};
pub use naming::{ConfiguredNaming, TargetNaming, UrlHashNaming};
pub use report::{EntryOutcome, FetchReport, Materialized};
pub use session::{FailurePolicy, FetchSession};
pub use sources::{DependencySet, SourceEntry, SOURCES_FILE_NAME};
pub use unpack::{unpack_dir_for, unpack_tar};

/// Directory holding `sources.json` unless configured otherwise
pub const DEFAULT_SOURCES_DIR: &str = "./thirdpartysw";

/// Directory dependencies are materialized into unless configured otherwise
pub const DEFAULT_DEPS_DIR: &str = "./deps";

/// How target file names are chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingScheme {
    /// Configured `name`, else URL-derived
    #[default]
    Configured,
    UrlHash,
}

impl NamingScheme {
    pub fn policy(self) -> Box<dyn TargetNaming> {
        match self {
            NamingScheme::Configured => Box::new(ConfiguredNaming),
            NamingScheme::UrlHash => Box::new(UrlHashNaming),
        }
    }
}

/// Settings for one fetch run
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub sources_dir: PathBuf,
    pub deps_dir: PathBuf,
    pub client: ClientConfig,
    pub policy: FailurePolicy,
    pub naming: NamingScheme,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            sources_dir: PathBuf::from(DEFAULT_SOURCES_DIR),
            deps_dir: PathBuf::from(DEFAULT_DEPS_DIR),
            client: ClientConfig::default(),
            policy: FailurePolicy::default(),
            naming: NamingScheme::default(),
        }
    }
}

impl FetchConfig {
    pub fn session(&self) -> Result<FetchSession> {
        let client = FetchClient::new(&self.client)?;
        Ok(FetchSession::new(client, &self.deps_dir)
            .with_boxed_naming(self.naming.policy())
            .with_policy(self.policy))
    }
}

/// Load the source list and fetch everything in it
///
/// Only a broken source list or client setup is returned as `Err`; these
/// abort before any request is made. Per-entry failures end up in the report.
pub async fn fetch_dependencies(config: &FetchConfig) -> Result<FetchReport> {
    let set = DependencySet::load_from_dir(&config.sources_dir)?;
    info!(
        count = set.len(),
        sources = %config.sources_dir.display(),
        "loaded dependency list"
    );

    let session = config.session()?;
    Ok(session.run(&set).await)
}
