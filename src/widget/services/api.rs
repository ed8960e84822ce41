use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::widget::domain::ValuationRecord;
use crate::widget::services::error::ServiceError;

pub const STATUS_OK: &str = "OK";
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Wire shape of an address-completion response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    pub status: String,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub description: String,
}

impl AutocompleteResponse {
    pub fn ok<I, S>(descriptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            status: STATUS_OK.to_string(),
            predictions: descriptions
                .into_iter()
                .map(|d| Prediction { description: d.into() })
                .collect(),
            error_message: None,
        }
    }

    pub fn zero_results() -> Self {
        Self {
            status: STATUS_ZERO_RESULTS.to_string(),
            ..Self::default()
        }
    }
}

/// Remote service returning ranked address completions.
///
/// Futures are `'static` so the runtime can spawn them.
pub trait SuggestionService: Send + Sync {
    fn autocomplete(&self, query: String) -> BoxFuture<'static, Result<AutocompleteResponse, ServiceError>>;
}

/// Remote service producing a valuation for a confirmed address.
pub trait ValuationService: Send + Sync {
    fn estimate(&self, address: String) -> BoxFuture<'static, Result<ValuationRecord, ServiceError>>;
}
