/// External company directory client (cebelca.biz)
///
/// Read-only search passthrough. Responses are forwarded verbatim; the
/// upstream's JSON shape is not our contract to re-model.
use std::time::Duration;

use serde_json::Value;

use crate::config::DirectoryConfig;
use crate::error::{AppError, Result};

pub struct DirectoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(config: &DirectoryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| AppError::Internal(format!("directory client init: {}", err)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Search the public directory by company name.
    ///
    /// Fails closed: an unreachable or non-2xx upstream is surfaced as an
    /// error, never as an empty result set.
    pub async fn search(&self, query: &str) -> Result<Value> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|err| {
                tracing::warn!("directory request failed: {}", err);
                AppError::Upstream {
                    status: 502,
                    message: "Error fetching companies from external API".to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "directory returned an error status");
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: "Error fetching companies from external API".to_string(),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}
