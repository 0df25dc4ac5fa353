//! Registry Sources
//!
//! A [`RegistrySource`] produces the raw component entries. The HTTP
//! implementation talks to the public index; tests plug in their own.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::RawComponent;

/// Something that can produce the raw component index
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Location reported in errors and logs
    fn location(&self) -> &str;

    /// Fetch and parse the full component index, in payload order
    async fn fetch(&self) -> Result<Vec<RawComponent>>;
}

/// Fetches the index with a single HTTP GET
#[derive(Debug, Clone)]
pub struct HttpRegistrySource {
    client: reqwest::Client,
    url: String,
}

impl HttpRegistrySource {
    /// Create a source for `url` with the given request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::FetchFailed {
                url: url.clone(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, url })
    }

    fn fetch_error(&self, reason: impl Into<String>) -> Error {
        Error::FetchFailed {
            url: self.url.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl RegistrySource for HttpRegistrySource {
    fn location(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<RawComponent>> {
        debug!("GET {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.fetch_error(format!("HTTP {}", status)));
        }

        let body = response.bytes().await?;

        parse_index(&body).map_err(|e| self.fetch_error(format!("invalid registry JSON: {}", e)))
    }
}

/// Parse a registry payload: a JSON array of component entries
pub fn parse_index(body: &[u8]) -> std::result::Result<Vec<RawComponent>, serde_json::Error> {
    serde_json::from_slice(body)
}
