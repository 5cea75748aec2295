// bases/flac2mp3/src/config.rs
use crate::args::{Args, Naming};
use dependency_fetch::{ClientConfig, FailurePolicy, FetchConfig, NamingScheme};
use std::path::PathBuf;
use std::time::Duration;

/// Conversion front-end settings, present only when `--src` was given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSettings {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub bitrate: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub fetch: FetchConfig,
    pub conversion: Option<ConversionSettings>,
    pub verbose: bool,
}

impl Config {
    /// Create configuration from CLI arguments
    pub fn from_args(args: Args) -> Self {
        let policy = if args.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::ContinueOnError
        };

        let naming = match args.naming {
            Naming::Configured => NamingScheme::Configured,
            Naming::UrlHash => NamingScheme::UrlHash,
        };

        let fetch = FetchConfig {
            sources_dir: args.sources_dir,
            deps_dir: args.deps_dir,
            client: ClientConfig {
                timeout: Some(Duration::from_secs(args.timeout)),
                ..ClientConfig::default()
            },
            policy,
            naming,
        };

        let output_dir = args.output_dir.unwrap_or_else(|| PathBuf::from("."));
        let conversion = args.source_dir.map(|source_dir| ConversionSettings {
            source_dir,
            output_dir,
            bitrate: args.bitrate,
        });

        Self {
            fetch,
            conversion,
            verbose: args.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> Config {
        let args = Args::try_parse_from(std::iter::once("flac2mp3").chain(argv.iter().copied()))
            .unwrap();
        Config::from_args(args)
    }

    #[test]
    fn defaults() {
        let config = parse(&[]);
        assert_eq!(config.fetch.sources_dir, PathBuf::from("./thirdpartysw"));
        assert_eq!(config.fetch.deps_dir, PathBuf::from("./deps"));
        assert_eq!(config.fetch.client.timeout, Some(Duration::from_secs(300)));
        assert_eq!(config.fetch.policy, FailurePolicy::ContinueOnError);
        assert_eq!(config.fetch.naming, NamingScheme::Configured);
        assert!(config.conversion.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn conversion_settings_follow_src() {
        let config = parse(&["--src", "music/flac", "--out", "music/mp3", "--br", "192"]);
        assert_eq!(
            config.conversion,
            Some(ConversionSettings {
                source_dir: PathBuf::from("music/flac"),
                output_dir: PathBuf::from("music/mp3"),
                bitrate: 192,
            })
        );
    }

    #[test]
    fn output_defaults_to_current_dir() {
        let config = parse(&["--src", "music"]);
        assert_eq!(config.conversion.unwrap().output_dir, PathBuf::from("."));
    }

    #[test]
    fn fetch_flags() {
        let config = parse(&[
            "--sources-dir",
            "conf",
            "--deps-dir",
            "vendor",
            "--timeout",
            "30",
            "--fail-fast",
            "--naming",
            "url-hash",
        ]);
        assert_eq!(config.fetch.sources_dir, PathBuf::from("conf"));
        assert_eq!(config.fetch.deps_dir, PathBuf::from("vendor"));
        assert_eq!(config.fetch.client.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.fetch.policy, FailurePolicy::FailFast);
        assert_eq!(config.fetch.naming, NamingScheme::UrlHash);
    }

    #[test]
    fn rejects_out_of_range_values() {
        for argv in [
            &["flac2mp3", "--br", "0"][..],
            &["flac2mp3", "--br", "512"][..],
            &["flac2mp3", "--timeout", "0"][..],
        ] {
            assert!(Args::try_parse_from(argv).is_err(), "{:?} should be rejected", argv);
        }
    }
}
