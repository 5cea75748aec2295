// components/dependency_fetch/src/sources.rs
use crate::error::{FetchError, Result};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;
use url::Url;

/// File name of the source list inside the sources directory
pub const SOURCES_FILE_NAME: &str = "sources.json";

/// One remote archive to fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub url: Url,

    /// Target file name to use instead of one derived from the URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Extract the decompressed tarball after writing it
    #[serde(default)]
    pub unpack: bool,
}

impl SourceEntry {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            name: None,
            unpack: false,
        }
    }
}

/// Ordered list of entries for one run, in source file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    entries: Vec<SourceEntry>,
}

impl DependencySet {
    pub fn new(entries: Vec<SourceEntry>) -> Self {
        Self { entries }
    }

    /// Load `sources.json` from the given directory
    pub fn load_from_dir(base_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load(base_dir.as_ref().join(SOURCES_FILE_NAME))
    }

    /// Load a source list from a JSON file
    ///
    /// The whole list is rejected if any entry is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => FetchError::ConfigNotFound {
                path: path.to_path_buf(),
                source,
            },
            _ => FetchError::io(format!("reading {}", path.display()), source),
        })?;

        let entries: Vec<SourceEntry> =
            serde_json::from_str(&content).map_err(|source| FetchError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        for entry in &entries {
            if !matches!(entry.url.scheme(), "http" | "https") {
                return Err(FetchError::ConfigInvalid {
                    path: path.to_path_buf(),
                    reason: format!("unsupported scheme in {}", entry.url),
                });
            }
        }

        for (i, entry) in entries.iter().enumerate() {
            debug!("{}: {}", i, entry.url);
        }

        Ok(Self { entries })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a SourceEntry;
    type IntoIter = std::slice::Iter<'a, SourceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
