//! Fetches the library component's manifest over HTTP

use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::remote::manifest::parse_library_module;
use crate::remote::{LibraryModule, ProvidedView, RemoteLoadError, ViewProvider};

pub struct HttpViewProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpViewProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        HttpViewProvider {
            client: create_client(timeout),
            url: url.into(),
        }
    }

    async fn fetch(&self) -> Result<LibraryModule, RemoteLoadError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteLoadError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        parse_library_module(&body)
    }

    fn classify(&self, e: reqwest::Error) -> RemoteLoadError {
        if e.is_timeout() {
            RemoteLoadError::Timeout {
                url: self.url.clone(),
            }
        } else if e.is_connect() {
            RemoteLoadError::Network {
                url: self.url.clone(),
                detail: format!("Connection failed: {}", e),
            }
        } else {
            RemoteLoadError::Network {
                url: self.url.clone(),
                detail: format!("Request failed: {}", e),
            }
        }
    }
}

#[async_trait]
impl ViewProvider for HttpViewProvider {
    fn location(&self) -> &str {
        &self.url
    }

    async fn resolve(&self) -> ProvidedView {
        let start = Instant::now();
        tracing::info!(url = %self.url, "Fetching remote library module");

        let result = self.fetch().await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(module) => tracing::info!(
                remote = %module.remote,
                version = %module.version,
                songs = module.seed.len(),
                elapsed_ms,
                "Remote library module loaded"
            ),
            Err(e) => tracing::error!(error = %e, elapsed_ms, "Failed to load remote library module"),
        }

        result.into()
    }
}

/// Create an HTTP client with the given request timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_remote_fails_without_retry() {
        // Nothing listens on the discard port locally
        let provider = HttpViewProvider::new("http://127.0.0.1:9/assets/remoteEntry.json", Duration::from_secs(5));
        assert_eq!(provider.location(), "http://127.0.0.1:9/assets/remoteEntry.json");

        match provider.resolve().await {
            ProvidedView::Failed(RemoteLoadError::Network { url, .. })
            | ProvidedView::Failed(RemoteLoadError::Timeout { url }) => {
                assert_eq!(url, provider.location());
            }
            other => panic!("expected a network failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_failure_not_a_panic() {
        let provider = HttpViewProvider::new("not a url", Duration::from_secs(1));
        assert!(!provider.resolve().await.is_loaded());
    }
}
