//! Translation layer between the raw services and the state machines.
//!
//! Fetchers never fail: every outcome, including transport errors, comes back
//! as a structured value. Nothing is cached.

use std::sync::Arc;

use crate::widget::domain::ValuationRecord;
use crate::widget::services::api::{
    AutocompleteResponse, SuggestionService, ValuationService, STATUS_OK, STATUS_ZERO_RESULTS,
};
use crate::widget::services::error::ValuationError;
use crate::widget::types::SuggestionResult;

#[derive(Clone)]
pub struct SuggestionFetcher {
    service: Arc<dyn SuggestionService>,
}

impl SuggestionFetcher {
    pub fn new(service: Arc<dyn SuggestionService>) -> Self {
        Self { service }
    }

    /// Blank queries short-circuit to `Empty` without contacting the service.
    pub async fn fetch(&self, query: &str) -> SuggestionResult {
        let query = query.trim();
        if query.is_empty() {
            return SuggestionResult::Empty;
        }

        match self.service.autocomplete(query.to_string()).await {
            Ok(response) => interpret(response),
            Err(e) => SuggestionResult::Error(e.to_string()),
        }
    }
}

/// Maps a wire response onto a [`SuggestionResult`], keeping service order.
pub fn interpret(response: AutocompleteResponse) -> SuggestionResult {
    match response.status.as_str() {
        STATUS_OK => {
            let list: Vec<String> = response
                .predictions
                .into_iter()
                .map(|p| p.description)
                .collect();
            if list.is_empty() {
                SuggestionResult::Empty
            } else {
                SuggestionResult::Ok(list)
            }
        }
        STATUS_ZERO_RESULTS => SuggestionResult::Empty,
        other => SuggestionResult::Error(match response.error_message {
            Some(msg) => format!("{}: {}", other, msg),
            None => other.to_string(),
        }),
    }
}

#[derive(Clone)]
pub struct ValuationFetcher {
    service: Arc<dyn ValuationService>,
}

impl ValuationFetcher {
    pub fn new(service: Arc<dyn ValuationService>) -> Self {
        Self { service }
    }

    pub async fn fetch(&self, address: &str) -> Result<ValuationRecord, ValuationError> {
        self.service
            .estimate(address.to_string())
            .await
            .map_err(|e| {
                log::debug!("[FETCHER] valuation for {:?} failed: {}", address, e);
                ValuationError::from_service(&e)
            })
    }
}
