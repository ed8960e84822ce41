//! Address autocomplete decision engine.
//!
//! This module is the **Functional Core** of the address input:
//! - **Input**: `ControllerEvent` (keystrokes, pointer activity, timer firings, fetch completions).
//! - **Output**: `Vec<ControllerCommand>` (side effects the runtime must execute).
//!
//! # Architecture guarantees
//! * **No Network**: fetches are requested through commands, never performed here.
//! * **No Async**: every handler is a plain synchronous function.
//! * **Deterministic**: the same event sequence always yields the same state and commands.
//!
//! Stale completions are rejected by comparing their token with the latest one
//! issued, so responses take effect in issue order regardless of arrival order.

pub mod state;
mod logic;
pub mod types;

#[cfg(test)]
mod tests;

pub use crate::widget::engine::types::{ControllerCommand, ControllerEvent, ControllerPhase};

use state::ControllerState;

/// State machine behind the address input.
///
/// All fields live in one [`ControllerState`] and change only through
/// [`AutocompleteController::handle_event`].
#[derive(Debug, Default)]
pub struct AutocompleteController {
    state: ControllerState,
}

impl AutocompleteController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes an event and returns the commands the runtime must execute.
    pub fn handle_event(&mut self, event: ControllerEvent) -> Vec<ControllerCommand> {
        let s = &mut self.state;
        let cmds = match event {
            ControllerEvent::Input(text) => logic::on_input(s, text),
            ControllerEvent::DebounceElapsed(ticket) => logic::on_debounce_elapsed(s, ticket),
            ControllerEvent::SuggestionsLoaded { token, result } => {
                logic::on_suggestions_loaded(s, token, result)
            }
            ControllerEvent::Focus => logic::on_focus(s),
            ControllerEvent::ArrowDown => logic::on_arrow_down(s),
            ControllerEvent::ArrowUp => logic::on_arrow_up(s),
            ControllerEvent::Enter => logic::on_enter(s),
            ControllerEvent::Hover(index) => logic::on_hover(s, index),
            ControllerEvent::HoverLeave => logic::on_hover_leave(s),
            ControllerEvent::Select(text) => logic::on_select(s, text),
            ControllerEvent::OutsideInteraction => logic::on_outside_interaction(s),
            ControllerEvent::Dismiss => logic::on_dismiss(s),
        };

        debug_assert_eq!(self.state.is_visible(), !self.state.suggestions.is_empty());
        debug_assert!(self
            .state
            .highlight
            .map_or(true, |i| i < self.state.suggestions.len()));

        cmds
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    pub fn suggestions(&self) -> &[String] {
        &self.state.suggestions
    }

    pub fn highlight(&self) -> Option<usize> {
        self.state.highlight
    }

    /// Highlight as a signed index, `-1` meaning nothing highlighted.
    pub fn highlight_index(&self) -> isize {
        self.state.highlight.map_or(-1, |i| i as isize)
    }

    pub fn phase(&self) -> ControllerPhase {
        self.state.phase
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    pub fn is_fetching(&self) -> bool {
        self.state.phase == ControllerPhase::Fetching
    }
}
