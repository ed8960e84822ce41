use serde_json::Value;
use thiserror::Error;

pub const ADDRESS_REQUIRED: &str = "address required";
pub const GENERIC_VALUATION_FAILURE: &str = "Failed to fetch estimate";

/// Failure talking to one of the remote services.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Connection could not be established or was dropped.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// Non-success HTTP status, with the JSON error payload when there was one.
    #[error("HTTP {status}")]
    Status { status: u16, body: Option<Value> },

    /// The response did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Why a valuation could not be shown. The display string is user facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// Rejected locally, the service was never contacted.
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Service { message: String },
}

impl ValuationError {
    pub fn address_required() -> Self {
        ValuationError::Validation(ADDRESS_REQUIRED.to_string())
    }

    /// Builds the user-facing message for a failed service call.
    ///
    /// The service's `detail` payload is used verbatim when present.
    pub fn from_service(err: &ServiceError) -> Self {
        let message = match err {
            ServiceError::Status { body: Some(body), .. } => detail_message(body),
            _ => None,
        };

        ValuationError::Service {
            message: message.unwrap_or_else(|| GENERIC_VALUATION_FAILURE.to_string()),
        }
    }
}

/// Extracts `detail` from an error payload.
///
/// A string is returned as is; a list of validation items is joined by their
/// `msg` fields.
pub fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}
