use crate::error::FeedError;
use crate::feed::{LaunchFeed, LAUNCHES, LAUNCHPADS, PAYLOADS, ROCKETS};
use log::{info, warn};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Public launch-provider REST API, version 4.
pub const DEFAULT_BASE_URL: &str = "https://api.spacexdata.com/v4";

/// Per-request timeout used when none is given.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// HTTP client for the launch API. One bounded GET per collection, never
/// retried: a failed fetch is reported as [`FeedError::Unavailable`] and the
/// caller decides whether to fall back to sample data.
pub struct LaunchApiClient {
    client: Client,
    base_url: String,
}

impl LaunchApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FeedError::unavailable("client", e))?;
        Ok(LaunchApiClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    async fn get_collection(&self, collection: &str) -> Result<Value, FeedError> {
        let url = self.collection_url(collection);
        info!("Fetching {} from {}", collection, url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request failed for {}: {}", collection, e);
                return Err(FeedError::unavailable(collection, e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Bad response status for {}: {}", collection, status);
            return Err(FeedError::unavailable(
                collection,
                format!("HTTP status {}", status),
            ));
        }

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read response body for {}: {}", collection, e);
            FeedError::unavailable(collection, e)
        })?;

        serde_json::from_str(&body).map_err(|e| FeedError::malformed(collection, e))
    }
}

impl LaunchFeed for LaunchApiClient {
    async fn launches(&self) -> Result<Value, FeedError> {
        self.get_collection(LAUNCHES).await
    }

    async fn rockets(&self) -> Result<Value, FeedError> {
        self.get_collection(ROCKETS).await
    }

    async fn payloads(&self) -> Result<Value, FeedError> {
        self.get_collection(PAYLOADS).await
    }

    async fn launchpads(&self) -> Result<Value, FeedError> {
        self.get_collection(LAUNCHPADS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url_trims_trailing_slash() {
        let client = LaunchApiClient::new(&ClientConfig {
            base_url: "http://localhost:8080/v4/".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(client.collection_url(LAUNCHES), "http://localhost:8080/v4/launches");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_unavailable() {
        // Port 9 on localhost is the discard service; nothing listens there.
        let client = LaunchApiClient::new(&ClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        let err = client.launches().await.unwrap_err();
        assert!(err.is_unavailable(), "unexpected error {:?}", err);
    }
}
