//! reqwest-backed transport for the Mailjet API.

use super::{RawResponse, Transport, TransportError};
use crate::config::MailjetConfig;
use crate::error::{MailjetError, MailjetResult};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("mailjet-rs/", env!("CARGO_PKG_VERSION"));

/// Sends requests to Mailjet over HTTPS with basic auth (`public_key:private_key`).
pub struct HttpTransport {
    client: Client,
    base_url: String,
    public_key: String,
    private_key: String,
}

impl HttpTransport {
    pub fn new(config: &MailjetConfig) -> MailjetResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| MailjetError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            public_key: config.public_key.clone(),
            private_key: config.private_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        payload: Option<Value>,
    ) -> Result<RawResponse, TransportError> {
        let mut request = self
            .client
            .request(method.clone(), self.url(path))
            .basic_auth(&self.public_key, Some(&self.private_key));

        if let Some(payload) = &payload {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, path, error = %e, "Mailjet request failed");
            TransportError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(%method, path, status, bytes = body.len(), "Mailjet round-trip complete");

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let config = MailjetConfig::new("pub", "priv").with_base_url("https://api.example.test/");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(
            transport.url("/v3/send"),
            "https://api.example.test/v3/send"
        );
        assert_eq!(
            transport.url("v3/REST/campaign?CustomCampaign=x"),
            "https://api.example.test/v3/REST/campaign?CustomCampaign=x"
        );
    }
}
