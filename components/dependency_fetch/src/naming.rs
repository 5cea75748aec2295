// components/dependency_fetch/src/naming.rs
use crate::sources::SourceEntry;
use sha2::{Digest, Sha256};

/// Decides the file name a fetched entry is written under
///
/// Names never come from the archive itself. Implementations must be
/// deterministic so that re-running a source list overwrites the same files.
pub trait TargetNaming: Send + Sync {
    fn file_name(&self, entry: &SourceEntry) -> String;
}

/// `<url hash>-<last path segment>` with the gzip suffix dropped
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlHashNaming;

impl TargetNaming for UrlHashNaming {
    fn file_name(&self, entry: &SourceEntry) -> String {
        let mut hasher = Sha256::new();
        hasher.update(entry.url.as_str().as_bytes());
        let hash = hex::encode(&hasher.finalize()[..8]);

        format!("{}-{}", hash, url_base_name(&entry.url))
    }
}

/// Uses the entry's configured `name`, else falls back to [`UrlHashNaming`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredNaming;

impl TargetNaming for ConfiguredNaming {
    fn file_name(&self, entry: &SourceEntry) -> String {
        let configured = entry
            .name
            .as_deref()
            .map(sanitize_filename::sanitize)
            .filter(|name| !name.is_empty() && name != "." && name != "..");

        match configured {
            Some(name) => name,
            None => UrlHashNaming.file_name(entry),
        }
    }
}

fn url_base_name(url: &url::Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or_default();

    let base = if let Some(stem) = segment.strip_suffix(".tgz") {
        format!("{}.tar", stem)
    } else {
        segment.strip_suffix(".gz").unwrap_or(segment).to_string()
    };

    let base = sanitize_filename::sanitize(base);
    if base.is_empty() || base.chars().all(|c| c == '.') {
        "archive".to_string()
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(url: &str) -> SourceEntry {
        SourceEntry::new(url.parse().unwrap())
    }

    #[rstest]
    #[case("https://example.test/a.tar.gz", "a.tar")]
    #[case("https://example.test/dl/lame-3.100.tgz", "lame-3.100.tar")]
    #[case("https://example.test/dl/readme.txt", "readme.txt")]
    #[case("https://example.test/dl/lame.tar.gz/", "lame.tar")]
    #[case("https://example.test/", "archive")]
    #[case("https://example.test/..", "archive")]
    fn url_hash_names_from_last_segment(#[case] url: &str, #[case] base: &str) {
        let name = UrlHashNaming.file_name(&entry(url));
        let (hash, rest) = name.split_once('-').unwrap();
        assert_eq!(hash.len(), 16);
        assert_eq!(rest, base);
    }

    #[test]
    fn url_hash_naming_is_deterministic() {
        let a = entry("https://example.test/a.tar.gz");
        assert_eq!(UrlHashNaming.file_name(&a), UrlHashNaming.file_name(&a));
    }

    #[test]
    fn same_base_different_urls_do_not_collide() {
        let a = UrlHashNaming.file_name(&entry("https://one.test/lame.tar.gz"));
        let b = UrlHashNaming.file_name(&entry("https://two.test/lame.tar.gz"));
        assert_ne!(a, b);
    }

    #[test]
    fn configured_name_wins() {
        let mut lame = entry("https://example.test/lame-3.100.tar.gz");
        lame.name = Some("lame.tar".to_string());
        assert_eq!(ConfiguredNaming.file_name(&lame), "lame.tar");
    }

    #[test]
    fn configured_name_cannot_traverse() {
        let mut sneaky = entry("https://example.test/a.tar.gz");
        sneaky.name = Some("../../etc/passwd".to_string());
        let name = ConfiguredNaming.file_name(&sneaky);
        assert!(!name.contains('/'));
        assert_ne!(name, "..");
    }

    #[test]
    fn blank_configured_name_falls_back_to_url() {
        let mut blank = entry("https://example.test/a.tar.gz");
        blank.name = Some(String::new());
        assert!(ConfiguredNaming.file_name(&blank).ends_with("-a.tar"));
    }
}
