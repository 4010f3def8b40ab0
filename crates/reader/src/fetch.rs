use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use thiserror::Error;

use holdfast_blob::ByteStream;

/// Errors from fetching an externally hosted blob.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Transport(String),

    /// The origin answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),
}

/// Capability to fetch blob bytes from an external origin.
///
/// Kept behind a trait so the transport can be swapped out (and mocked in
/// tests) without touching the resolution logic.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// GET `url`, returning the response body as a stream.
    async fn fetch(&self, url: &str) -> Result<ByteStream, FetchError>;
}

/// reqwest-backed [`RemoteFetcher`].
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with a default HTTP client.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    /// Create a fetcher with a custom HTTP client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<ByteStream, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response
            .bytes_stream()
            .map_err(std::io::Error::other)
            .boxed())
    }
}
