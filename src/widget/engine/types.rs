use crate::widget::types::{RequestToken, SuggestionOutcome, SuggestionResult};

/// Where the autocomplete currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    /// No query.
    Empty,
    /// Query present, waiting for the debounce to elapse.
    Typing,
    /// Suggestion request in flight.
    Fetching,
    /// Non-empty suggestion list visible.
    Open,
    /// List hidden, query retained.
    Closed,
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    Input(String),
    DebounceElapsed(RequestToken),
    SuggestionsLoaded {
        token: RequestToken,
        result: SuggestionResult,
    },
    Focus,
    ArrowDown,
    ArrowUp,
    Enter,
    /// Pointer entered the row at this position.
    Hover(usize),
    HoverLeave,
    /// Commit this text (row click/tap or programmatic).
    Select(String),
    OutsideInteraction,
    /// A valuation was submitted; drop the list and anything pending.
    Dismiss,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerCommand {
    /// Arrange for `DebounceElapsed(ticket)` once input has been quiet.
    ScheduleDebounce { ticket: RequestToken },
    CancelDebounce,
    FetchSuggestions { token: RequestToken, query: String },
    /// Observability only, never shown to the user.
    Report(SuggestionOutcome),
    /// The user picked a suggestion.
    Committed(String),
}
