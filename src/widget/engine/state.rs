use crate::widget::engine::types::ControllerPhase;
use crate::widget::types::{RequestToken, TokenMint};

#[derive(Debug, Clone)]
pub struct ControllerState {
    pub query: String,

    /// Ranked suggestions, service order.
    pub suggestions: Vec<String>,

    /// `None` means nothing highlighted.
    pub highlight: Option<usize>,

    pub phase: ControllerPhase,

    /// Shared by suggestion requests and debounce tickets.
    pub tokens: TokenMint,

    /// Latest issued suggestion request; `None` once abandoned.
    pub current_request: Option<RequestToken>,

    /// Debounce ticket that is still allowed to fire.
    pub pending_debounce: Option<RequestToken>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            highlight: None,
            phase: ControllerPhase::Empty,
            tokens: TokenMint::default(),
            current_request: None,
            pending_debounce: None,
        }
    }
}

impl ControllerState {
    pub fn is_visible(&self) -> bool {
        self.phase == ControllerPhase::Open
    }

    pub fn query_is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Hides the list and forgets the suggestions.
    pub fn close_list(&mut self) {
        self.suggestions.clear();
        self.highlight = None;
        self.phase = if self.query_is_blank() {
            ControllerPhase::Empty
        } else {
            ControllerPhase::Closed
        };
    }
}
