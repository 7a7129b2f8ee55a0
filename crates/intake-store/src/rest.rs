use std::time::Duration;

use async_trait::async_trait;
use intake_spec::{FlatRecord, GatewayError, PersistenceGateway};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::ConfigError;

/// Inserts records through a PostgREST-style `POST /rest/v1/<table>` endpoint.
#[derive(Debug, Clone)]
pub struct RestGateway {
    client: Client,
    endpoint: Url,
    api_key: String,
}

/// Joins `base` with `rest/v1/<table>`, keeping any path prefix on the base.
pub fn insert_endpoint(base: &str, table: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: base.to_string(),
        reason,
    };
    let mut url = Url::parse(base).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    url.path_segments_mut()
        .map_err(|_| invalid("url cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(["rest", "v1", table]);
    url.set_query(None);
    Ok(url)
}

impl RestGateway {
    pub fn new(
        base_url: &str,
        table: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let endpoint = insert_endpoint(base_url, table)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ConfigError::Client(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PersistenceGateway for RestGateway {
    async fn insert(&self, record: &FlatRecord) -> Result<(), GatewayError> {
        debug!(endpoint = %self.endpoint, "inserting questionnaire response");
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await
            .map_err(|err| {
                warn!(endpoint = %self.endpoint, error = %err, "gateway unreachable");
                GatewayError::Unavailable(err.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(%status, "questionnaire response accepted");
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        warn!(%status, "questionnaire response rejected");
        Err(GatewayError::Rejected(if body.trim().is_empty() {
            status.to_string()
        } else {
            format!("{status}: {}", body.trim())
        }))
    }
}
