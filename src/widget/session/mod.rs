//! Valuation request lifecycle.
//!
//! Like the autocomplete engine this is a pure state machine: it consumes
//! [`SessionEvent`]s and emits [`SessionCommand`]s for the runtime. Only the
//! most recent submission is current; completions of superseded requests are
//! dropped on arrival.

pub mod types;


pub use types::{RequestPhase, SessionCommand, SessionEvent};

use crate::widget::domain::{SaleHistory, ValuationRecord};
use crate::widget::services::ValuationError;
use crate::widget::types::{RequestToken, TokenMint};

#[derive(Debug)]
pub struct ValuationSession {
    phase: RequestPhase,
    record: Option<ValuationRecord>,
    history: SaleHistory,
    error: Option<String>,
    tokens: TokenMint,
    current: Option<RequestToken>,
}

impl Default for ValuationSession {
    fn default() -> Self {
        Self {
            phase: RequestPhase::Idle,
            record: None,
            history: SaleHistory::new(),
            error: None,
            tokens: TokenMint::default(),
            current: None,
        }
    }
}

impl ValuationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> Vec<SessionCommand> {
        match event {
            SessionEvent::Submit(address) => self.on_submit(address),
            SessionEvent::Completed { token, outcome } => self.on_completed(token, outcome),
        }
    }

    fn on_submit(&mut self, address: String) -> Vec<SessionCommand> {
        let mut cmds = vec![SessionCommand::CloseSuggestions];

        self.record = None;
        self.history = SaleHistory::new();
        self.error = None;

        let address = address.trim();
        if address.is_empty() {
            // Supersedes anything still pending as well.
            self.current = None;
            self.phase = RequestPhase::Failed;
            self.error = Some(ValuationError::address_required().to_string());
            log::debug!("[SESSION] rejected blank address");
            return cmds;
        }

        let token = self.tokens.mint();
        if let Some(previous) = self.current.replace(token) {
            log::debug!("[SESSION] request {} superseded by {}", previous, token);
        }
        self.phase = RequestPhase::Loading;
        log::info!("[SESSION] requesting valuation {} for {:?}", token, address);

        cmds.push(SessionCommand::FetchValuation {
            token,
            address: address.to_string(),
        });
        cmds
    }

    fn on_completed(
        &mut self,
        token: RequestToken,
        outcome: Result<ValuationRecord, ValuationError>,
    ) -> Vec<SessionCommand> {
        if self.current != Some(token) {
            log::debug!("[SESSION] dropping stale valuation {}", token);
            return vec![];
        }
        self.current = None;

        match outcome {
            Ok(record) => {
                self.history = record.sale_history();
                log::info!(
                    "[SESSION] valuation {} ok: {} {} ({} sale events)",
                    token,
                    record.estimated_value,
                    record.currency,
                    self.history.len()
                );
                self.record = Some(record);
                self.phase = RequestPhase::Success;
            }
            Err(e) => {
                log::warn!("[SESSION] valuation {} failed: {}", token, e);
                self.error = Some(e.to_string());
                self.phase = RequestPhase::Failed;
            }
        }

        vec![]
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == RequestPhase::Loading
    }

    pub fn record(&self) -> Option<&ValuationRecord> {
        self.record.as_ref()
    }

    pub fn sale_history(&self) -> &SaleHistory {
        &self.history
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last sale date from the record, falling back to the sale history.
    pub fn last_sale_date(&self) -> Option<&str> {
        self.record
            .as_ref()
            .and_then(|r| r.last_sale_date.as_deref())
            .or_else(|| self.history.latest_sale_date())
    }
}
