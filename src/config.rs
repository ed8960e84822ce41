use std::time::Duration;

use anyhow::{bail, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_AUTOCOMPLETE_PATH: &str = "/google-autocomplete";
pub const DEFAULT_ESTIMATE_PATH: &str = "/estimate";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Quiet period before a suggestion fetch is dispatched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Where the suggestion and valuation services live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub autocomplete_path: String,
    pub estimate_path: String,
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            autocomplete_path: DEFAULT_AUTOCOMPLETE_PATH.to_string(),
            estimate_path: DEFAULT_ESTIMATE_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            bail!("service base URL is empty");
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            bail!("service base URL must be http(s): {}", base);
        }
        if self.timeout.is_zero() {
            bail!("request timeout must be non-zero");
        }
        Ok(())
    }

    pub fn autocomplete_url(&self) -> String {
        join_url(&self.base_url, &self.autocomplete_path)
    }

    pub fn estimate_url(&self) -> String {
        join_url(&self.base_url, &self.estimate_path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetConfig {
    pub debounce: Duration,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim().trim_end_matches('/'),
        path.trim().trim_start_matches('/')
    )
}
