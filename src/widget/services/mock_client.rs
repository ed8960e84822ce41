use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::json;

use crate::widget::domain::ValuationRecord;
use crate::widget::services::api::{AutocompleteResponse, SuggestionService, ValuationService};
use crate::widget::services::error::ServiceError;

#[derive(Clone)]
struct Scripted<T> {
    delay: Duration,
    result: Result<T, ServiceError>,
}

/// Pure in-memory suggestion service.
///
/// Unknown queries answer `ZERO_RESULTS`. Every call is recorded.
#[derive(Clone, Default)]
pub struct MockSuggestionService {
    scripts: Arc<Mutex<HashMap<String, Scripted<AutocompleteResponse>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockSuggestionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, query: &str, descriptions: &[&str]) -> &Self {
        self.respond_after(query, Duration::ZERO, Ok(AutocompleteResponse::ok(descriptions.iter().copied())))
    }

    pub fn respond_after(
        &self,
        query: &str,
        delay: Duration,
        result: Result<AutocompleteResponse, ServiceError>,
    ) -> &Self {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(query.to_string(), Scripted { delay, result });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl SuggestionService for MockSuggestionService {
    fn autocomplete(&self, query: String) -> BoxFuture<'static, Result<AutocompleteResponse, ServiceError>> {
        log::trace!("[MOCK] autocomplete({:?})", query);
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());

        let scripted = self
            .scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&query)
            .cloned()
            .unwrap_or(Scripted {
                delay: Duration::ZERO,
                result: Ok(AutocompleteResponse::zero_results()),
            });

        async move {
            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            }
            scripted.result
        }
        .boxed()
    }
}

/// Pure in-memory valuation service.
///
/// Unknown addresses answer HTTP 404 with a `detail` payload.
#[derive(Clone, Default)]
pub struct MockValuationService {
    scripts: Arc<Mutex<HashMap<String, Scripted<ValuationRecord>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockValuationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, address: &str, record: ValuationRecord) -> &Self {
        self.respond_after(address, Duration::ZERO, Ok(record))
    }

    pub fn respond_after(
        &self,
        address: &str,
        delay: Duration,
        result: Result<ValuationRecord, ServiceError>,
    ) -> &Self {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address.to_string(), Scripted { delay, result });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ValuationService for MockValuationService {
    fn estimate(&self, address: String) -> BoxFuture<'static, Result<ValuationRecord, ServiceError>> {
        log::trace!("[MOCK] estimate({:?})", address);
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(address.clone());

        let scripted = self
            .scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&address)
            .cloned()
            .unwrap_or_else(|| Scripted {
                delay: Duration::ZERO,
                result: Err(ServiceError::Status {
                    status: 404,
                    body: Some(json!({ "detail": "Address not found" })),
                }),
            });

        async move {
            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            }
            scripted.result
        }
        .boxed()
    }
}
