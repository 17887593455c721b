//! HTTP retrieval of snapshot locators.

use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Source of snapshot bytes.
pub trait Fetcher: Send + Sync {
    /// Retrieve the resource at `locator` as opaque bytes.
    fn fetch(&self, locator: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// HTTP fetcher configuration.
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("eufy-bridge/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Fetcher issuing plain HTTP GET requests.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &HttpFetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .use_rustls_tls()
            .build()
            .map_err(|e| FetchError::Init(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        let url = Url::parse(locator)
            .map_err(|e| FetchError::InvalidLocator(format!("{locator}: {e}")))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(FetchError::InvalidLocator(format!(
                    "{locator}: unsupported scheme '{scheme}'"
                )));
            }
        }

        tracing::debug!(host = url.host_str().unwrap_or_default(), "GET snapshot");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(body.to_vec())
    }
}

/// Errors that can occur while fetching a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Client initialization failed
    #[error("client init error: {0}")]
    Init(String),
    /// Locator is not a fetchable URL
    #[error("invalid locator: {0}")]
    InvalidLocator(String),
    /// HTTP request failed
    #[error("request error: {0}")]
    Request(String),
    /// Server answered with a non-success status
    #[error("unexpected status {0}")]
    Status(u16),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a loopback port.
    async fn serve_once(response: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket.write_all(response).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}/snapshot.jpg?sig=abc")
    }

    #[test]
    fn config_default() {
        let config = HttpFetcherConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("eufy-bridge/"));
    }

    #[test]
    fn fetcher_creation() {
        assert!(HttpFetcher::new(&HttpFetcherConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn fetches_body_bytes() {
        let locator = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: 4\r\nConnection: close\r\n\r\n\xff\xd8\xff\xd9",
        )
        .await;

        let fetcher = HttpFetcher::new(&HttpFetcherConfig::default()).unwrap();
        let bytes = fetcher.fetch(&locator).await.unwrap();

        assert_eq!(bytes, vec![0xff, 0xd8, 0xff, 0xd9]);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let locator = serve_once(
            b"HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let fetcher = HttpFetcher::new(&HttpFetcherConfig::default()).unwrap();
        assert_eq!(fetcher.fetch(&locator).await, Err(FetchError::Status(403)));
    }

    #[test]
    fn rejects_non_http_locators() {
        let fetcher = HttpFetcher::new(&HttpFetcherConfig::default()).unwrap();

        let result = tokio_test::block_on(fetcher.fetch("ftp://example.com/a.jpg"));
        assert!(matches!(result, Err(FetchError::InvalidLocator(_))));

        let result = tokio_test::block_on(fetcher.fetch("not a url"));
        assert!(matches!(result, Err(FetchError::InvalidLocator(_))));
    }
}
