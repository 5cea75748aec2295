// components/dependency_fetch/src/fetcher.rs
use crate::error::{FetchError, Result};
use flate2::read::GzDecoder;
use futures::TryStreamExt;
use reqwest::header::{HeaderMap, ACCEPT_ENCODING, CONTENT_ENCODING};
use std::io::Read;
use std::time::Duration;
use tokio_util::io::{StreamReader, SyncIoBridge};
use tracing::debug;
use url::Url;

/// Request timeout used unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout, `None` disables it
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: concat!("flac2mp3/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP client shared by every entry of a run
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
}

impl FetchClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(FetchError::Client)?;
        Ok(Self { http })
    }

    /// Request one archive and check that it comes gzip-encoded
    ///
    /// Nothing of the body is read here; the returned archive owns the
    /// open response until its stream is dropped.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedArchive> {
        debug!(%url, "requesting archive");
        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT_ENCODING, "gzip")
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status));
        }

        check_content_encoding(response.headers())?;
        debug!(%url, length = ?response.content_length(), "archive response accepted");

        Ok(FetchedArchive { response })
    }
}

/// Fail unless the response declares gzip as its only content coding
pub fn check_content_encoding(headers: &HeaderMap) -> Result<()> {
    let values: Vec<String> = headers
        .get_all(CONTENT_ENCODING)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();
    if values.is_empty() {
        return Err(FetchError::UnsupportedEncoding { found: None });
    }
    // repeated header lines form one comma-separated list
    let raw = values.join(", ");

    let codings: Vec<String> = raw
        .split(',')
        .map(|c| c.trim().to_ascii_lowercase())
        .filter(|c| !c.is_empty() && c != "identity")
        .collect();

    match codings.as_slice() {
        [only] if only == "gzip" || only == "x-gzip" => Ok(()),
        _ => Err(FetchError::UnsupportedEncoding { found: Some(raw) }),
    }
}

/// A validated gzip response whose body has not been read yet
#[derive(Debug)]
pub struct FetchedArchive {
    response: reqwest::Response,
}

impl FetchedArchive {
    /// Blocking reader yielding the decompressed body
    ///
    /// Building the reader already blocks, since the gzip header is read
    /// up front. Call this from a blocking context inside a tokio runtime,
    /// e.g. within `spawn_blocking`, never on an async worker thread.
    pub fn into_stream(self) -> impl Read + Send + 'static {
        let body = self
            .response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let reader = StreamReader::new(Box::pin(body));
        GzDecoder::new(SyncIoBridge::new(reader))
    }
}
