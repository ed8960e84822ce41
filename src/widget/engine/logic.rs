use crate::widget::engine::state::ControllerState;
use crate::widget::engine::types::{ControllerCommand, ControllerPhase};
use crate::widget::types::{RequestToken, SuggestionOutcome, SuggestionResult};

pub fn on_input(state: &mut ControllerState, text: String) -> Vec<ControllerCommand> {
    let mut cmds = Vec::new();

    state.query = text;
    state.highlight = None;
    state.suggestions.clear();

    // Whatever is in flight belongs to an older query now.
    if let Some(abandoned) = state.current_request.take() {
        log::debug!("[CONTROLLER] abandoning in-flight request {}", abandoned);
    }

    if state.query_is_blank() {
        state.phase = ControllerPhase::Empty;
        if state.pending_debounce.take().is_some() {
            cmds.push(ControllerCommand::CancelDebounce);
        }
        return cmds;
    }

    let ticket = state.tokens.mint();
    state.pending_debounce = Some(ticket);
    state.phase = ControllerPhase::Typing;
    log::trace!("[CONTROLLER] input {:?}, debounce ticket {}", state.query, ticket);

    cmds.push(ControllerCommand::ScheduleDebounce { ticket });
    cmds
}

pub fn on_debounce_elapsed(state: &mut ControllerState, ticket: RequestToken) -> Vec<ControllerCommand> {
    if state.pending_debounce != Some(ticket) {
        log::debug!("[CONTROLLER] ignoring superseded debounce ticket {}", ticket);
        return vec![];
    }
    state.pending_debounce = None;

    if state.query_is_blank() {
        return vec![];
    }

    vec![dispatch_fetch(state)]
}

pub fn on_suggestions_loaded(
    state: &mut ControllerState,
    token: RequestToken,
    result: SuggestionResult,
) -> Vec<ControllerCommand> {
    if state.current_request != Some(token) {
        log::debug!("[CONTROLLER] discarding stale response {}", token);
        return vec![ControllerCommand::Report(SuggestionOutcome::Stale { token })];
    }
    state.current_request = None;
    state.highlight = None;

    let outcome = match result {
        SuggestionResult::Ok(list) if !list.is_empty() => {
            let count = list.len();
            state.suggestions = list;
            state.phase = ControllerPhase::Open;
            SuggestionOutcome::Ok { token, count }
        }
        SuggestionResult::Ok(_) | SuggestionResult::Empty => {
            state.close_list();
            SuggestionOutcome::Empty { token }
        }
        SuggestionResult::Error(detail) => {
            state.close_list();
            SuggestionOutcome::Error { token, detail }
        }
    };

    vec![ControllerCommand::Report(outcome)]
}

pub fn on_focus(state: &mut ControllerState) -> Vec<ControllerCommand> {
    // Re-fetch only when nothing is shown and no work is underway.
    if state.query_is_blank()
        || state.is_visible()
        || state.pending_debounce.is_some()
        || state.current_request.is_some()
    {
        return vec![];
    }

    log::debug!("[CONTROLLER] focus regained, re-fetching {:?}", state.query);
    vec![dispatch_fetch(state)]
}

pub fn on_arrow_down(state: &mut ControllerState) -> Vec<ControllerCommand> {
    if state.phase != ControllerPhase::Open || state.suggestions.is_empty() {
        return vec![];
    }

    let last = state.suggestions.len() - 1;
    state.highlight = Some(match state.highlight {
        None => 0,
        Some(i) => (i + 1).min(last),
    });
    vec![]
}

pub fn on_arrow_up(state: &mut ControllerState) -> Vec<ControllerCommand> {
    if state.phase != ControllerPhase::Open || state.suggestions.is_empty() {
        return vec![];
    }

    state.highlight = Some(match state.highlight {
        None => 0,
        Some(i) => i.saturating_sub(1),
    });
    vec![]
}

pub fn on_enter(state: &mut ControllerState) -> Vec<ControllerCommand> {
    if state.phase != ControllerPhase::Open {
        return vec![];
    }

    match state.highlight.and_then(|i| state.suggestions.get(i)).cloned() {
        Some(text) => on_select(state, text),
        None => vec![],
    }
}

pub fn on_hover(state: &mut ControllerState, index: usize) -> Vec<ControllerCommand> {
    if state.phase == ControllerPhase::Open && index < state.suggestions.len() {
        state.highlight = Some(index);
    }
    vec![]
}

pub fn on_hover_leave(state: &mut ControllerState) -> Vec<ControllerCommand> {
    if state.phase == ControllerPhase::Open {
        state.highlight = None;
    }
    vec![]
}

pub fn on_select(state: &mut ControllerState, text: String) -> Vec<ControllerCommand> {
    let mut cmds = abandon_pending(state);

    state.query = text.clone();
    state.close_list();
    log::info!("[CONTROLLER] selected {:?}", text);

    cmds.push(ControllerCommand::Committed(text));
    cmds
}

pub fn on_outside_interaction(state: &mut ControllerState) -> Vec<ControllerCommand> {
    if state.phase == ControllerPhase::Open {
        log::debug!("[CONTROLLER] outside interaction, closing list");
        state.close_list();
    }
    vec![]
}

pub fn on_dismiss(state: &mut ControllerState) -> Vec<ControllerCommand> {
    let cmds = abandon_pending(state);
    state.close_list();
    cmds
}

fn dispatch_fetch(state: &mut ControllerState) -> ControllerCommand {
    let token = state.tokens.mint();
    state.current_request = Some(token);
    state.phase = ControllerPhase::Fetching;
    log::debug!("[CONTROLLER] fetch {} for {:?}", token, state.query);

    ControllerCommand::FetchSuggestions {
        token,
        query: state.query.trim().to_string(),
    }
}

fn abandon_pending(state: &mut ControllerState) -> Vec<ControllerCommand> {
    state.current_request = None;
    if state.pending_debounce.take().is_some() {
        vec![ControllerCommand::CancelDebounce]
    } else {
        vec![]
    }
}
