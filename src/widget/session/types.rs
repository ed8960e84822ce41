use crate::widget::domain::ValuationRecord;
use crate::widget::services::ValuationError;
use crate::widget::types::RequestToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Loading,
    Success,
    Failed,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Submit(String),
    Completed {
        token: RequestToken,
        outcome: Result<ValuationRecord, ValuationError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Submission always closes the autocomplete list.
    CloseSuggestions,
    FetchValuation { token: RequestToken, address: String },
}
