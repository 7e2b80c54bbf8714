use crate::config::ScraperConfig;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Request error for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Single-attempt GET client. Identity header and timeout are fixed at construction.
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            // Cookies live only as long as this client
            .cookie_store(true)
            .build()
            .map_err(FetchError::Build)?;

        Ok(Self { inner })
    }

    /// Fetch a URL as text. Any transport error or non-2xx status is an error; no retries.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);

        let resp = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request { url: url.to_string(), source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status });
        }

        resp.text()
            .await
            .map_err(|source| FetchError::Request { url: url.to_string(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned response and hand back the raw request that was received.
    async fn serve_once(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    fn config() -> ScraperConfig {
        ScraperConfig {
            timeout_secs: 5,
            ..ScraperConfig::default()
        }
    }

    #[tokio::test]
    async fn test_success_returns_body_and_sends_identity() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: 17\r\nConnection: close\r\n\r\n<p>variación</p>",
        )
        .await;

        let client = HttpClient::new(&config()).unwrap();
        let body = client.get_text(&format!("{}/enero-2025", base)).await.unwrap();
        assert_eq!(body, "<p>variación</p>");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /enero-2025 "));
        assert!(request.to_lowercase().contains("user-agent: mozilla/5.0"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let (base, server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let client = HttpClient::new(&config()).unwrap();
        let err = client.get_text(&format!("{}/enero-2030", base)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status, .. } if status.as_u16() == 404));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClient::new(&config()).unwrap();
        let err = client.get_text(&format!("http://{}/x", addr)).await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }
}
