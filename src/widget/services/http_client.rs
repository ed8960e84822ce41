//! HTTP adapter for the suggestion and valuation services.
//!
//! Both services sit behind the same backend; the base URL and paths come from
//! [`ServiceConfig`]. Timeouts are enforced by the transport and surface as
//! ordinary errors.

use std::time::Duration;

use anyhow::Result;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ServiceConfig;
use crate::widget::domain::ValuationRecord;
use crate::widget::services::api::{AutocompleteResponse, SuggestionService, ValuationService};
use crate::widget::services::error::ServiceError;

#[derive(Clone)]
pub struct HttpServiceClient {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpServiceClient {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Uses a caller-built `reqwest::Client` (proxy, TLS or pool settings).
    pub fn with_client(client: reqwest::Client, config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

impl SuggestionService for HttpServiceClient {
    fn autocomplete(&self, query: String) -> BoxFuture<'static, Result<AutocompleteResponse, ServiceError>> {
        let client = self.client.clone();
        let url = self.config.autocomplete_url();
        let timeout = self.config.timeout;

        async move { get_json(&client, &url, &[("input", query.as_str())], timeout).await }.boxed()
    }
}

impl ValuationService for HttpServiceClient {
    fn estimate(&self, address: String) -> BoxFuture<'static, Result<ValuationRecord, ServiceError>> {
        let client = self.client.clone();
        let url = self.config.estimate_url();
        let timeout = self.config.timeout;

        async move { get_json(&client, &url, &[("address", address.as_str())], timeout).await }.boxed()
    }
}

async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    params: &[(&str, &str)],
    timeout: Duration,
) -> Result<T, ServiceError> {
    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    log::trace!("[HTTP] GET {} {:?}", url, params);

    let response = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout(timeout_ms)
            } else {
                ServiceError::Transport(e.to_string())
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        log::debug!("[HTTP] {} returned {}: {}", url, status, text);
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body: serde_json::from_str::<Value>(&text).ok(),
        });
    }

    response.json::<T>().await.map_err(|e| {
        if e.is_timeout() {
            ServiceError::Timeout(timeout_ms)
        } else {
            ServiceError::Decode(e.to_string())
        }
    })
}
