use std::fmt;

/// Identity of one logical request (suggestion fetch, debounce firing,
/// valuation call).
///
/// Tokens are minted from a monotonic counter. A completion is applied only
/// when it carries the latest token issued for its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic token source; never hands out the same token twice.
#[derive(Debug, Default, Clone)]
pub struct TokenMint {
    last: u64,
}

impl TokenMint {
    pub fn mint(&mut self) -> RequestToken {
        self.last += 1;
        RequestToken(self.last)
    }
}

/// Outcome of a suggestion fetch, as seen by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionResult {
    /// Non-empty ranked list, in service order.
    Ok(Vec<String>),
    /// The service had nothing to suggest.
    Empty,
    /// Transport failure or unexpected response shape.
    Error(String),
}

/// Telemetry record emitted for every completed suggestion fetch.
///
/// Lets observers tell a zero-match answer apart from a failure even though
/// both simply hide the list.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome {
    Ok { token: RequestToken, count: usize },
    Empty { token: RequestToken },
    Error { token: RequestToken, detail: String },
    Stale { token: RequestToken },
}
