#![cfg(test)]
use crate::widget::engine::{AutocompleteController, ControllerCommand, ControllerEvent, ControllerPhase};
use crate::widget::types::{RequestToken, SuggestionOutcome, SuggestionResult};

use proptest::prelude::*;

// =========================================================================
// Helpers
// =========================================================================

fn ticket_of(cmds: &[ControllerCommand]) -> RequestToken {
    cmds.iter()
        .find_map(|c| match c {
            ControllerCommand::ScheduleDebounce { ticket } => Some(*ticket),
            _ => None,
        })
        .expect("expected a ScheduleDebounce command")
}

fn fetch_of(cmds: &[ControllerCommand]) -> (RequestToken, String) {
    cmds.iter()
        .find_map(|c| match c {
            ControllerCommand::FetchSuggestions { token, query } => Some((*token, query.clone())),
            _ => None,
        })
        .expect("expected a FetchSuggestions command")
}

/// Types `text` and lets the debounce elapse; returns the dispatched fetch.
fn type_and_settle(ctl: &mut AutocompleteController, text: &str) -> (RequestToken, String) {
    let cmds = ctl.handle_event(ControllerEvent::Input(text.to_string()));
    let ticket = ticket_of(&cmds);
    let cmds = ctl.handle_event(ControllerEvent::DebounceElapsed(ticket));
    fetch_of(&cmds)
}

fn list(items: &[&str]) -> SuggestionResult {
    SuggestionResult::Ok(items.iter().map(|s| s.to_string()).collect())
}

fn open_with(items: &[&str]) -> AutocompleteController {
    let mut ctl = AutocompleteController::new();
    let (token, _) = type_and_settle(&mut ctl, "main");
    ctl.handle_event(ControllerEvent::SuggestionsLoaded { token, result: list(items) });
    assert_eq!(ctl.phase(), ControllerPhase::Open);
    ctl
}

// =========================================================================
// Typing and debounce
// =========================================================================

#[test]
fn input_schedules_debounce_and_resets_highlight() {
    let mut ctl = AutocompleteController::new();
    let cmds = ctl.handle_event(ControllerEvent::Input("55".into()));

    assert!(matches!(cmds.as_slice(), [ControllerCommand::ScheduleDebounce { .. }]));
    assert_eq!(ctl.phase(), ControllerPhase::Typing);
    assert_eq!(ctl.highlight_index(), -1);
    assert!(!ctl.is_visible());
}

#[test]
fn blank_input_empties_and_cancels_debounce() {
    let mut ctl = AutocompleteController::new();
    ctl.handle_event(ControllerEvent::Input("55".into()));

    let cmds = ctl.handle_event(ControllerEvent::Input("   ".into()));

    assert_eq!(cmds, vec![ControllerCommand::CancelDebounce]);
    assert_eq!(ctl.phase(), ControllerPhase::Empty);
    assert!(!ctl.is_visible());
}

#[test]
fn only_latest_debounce_ticket_dispatches_a_fetch() {
    let mut ctl = AutocompleteController::new();
    let t1 = ticket_of(&ctl.handle_event(ControllerEvent::Input("5".into())));
    let t2 = ticket_of(&ctl.handle_event(ControllerEvent::Input("55".into())));
    let t3 = ticket_of(&ctl.handle_event(ControllerEvent::Input("550".into())));

    assert!(ctl.handle_event(ControllerEvent::DebounceElapsed(t1)).is_empty());
    assert!(ctl.handle_event(ControllerEvent::DebounceElapsed(t2)).is_empty());

    let (_, query) = fetch_of(&ctl.handle_event(ControllerEvent::DebounceElapsed(t3)));
    assert_eq!(query, "550");
    assert_eq!(ctl.phase(), ControllerPhase::Fetching);

    // A duplicate firing does nothing.
    assert!(ctl.handle_event(ControllerEvent::DebounceElapsed(t3)).is_empty());
}

#[test]
fn fetch_uses_trimmed_query_but_keeps_raw_text() {
    let mut ctl = AutocompleteController::new();
    let (_, query) = type_and_settle(&mut ctl, "  5500 Grand ");
    assert_eq!(query, "5500 Grand");
    assert_eq!(ctl.query(), "  5500 Grand ");
}

// =========================================================================
// Response ordering
// =========================================================================

#[test]
fn last_request_wins_when_responses_arrive_in_order() {
    let mut ctl = AutocompleteController::new();
    let (t1, _) = type_and_settle(&mut ctl, "55");
    let (t2, _) = type_and_settle(&mut ctl, "5500");

    ctl.handle_event(ControllerEvent::SuggestionsLoaded { token: t1, result: list(&["55 A St", "55 B St"]) });
    ctl.handle_event(ControllerEvent::SuggestionsLoaded { token: t2, result: list(&["5500 Grand Lake Dr"]) });

    assert_eq!(ctl.suggestions(), ["5500 Grand Lake Dr"]);
    assert!(ctl.is_visible());
}

#[test]
fn last_request_wins_when_responses_arrive_reversed() {
    let mut ctl = AutocompleteController::new();
    let (t1, _) = type_and_settle(&mut ctl, "55");
    let (t2, _) = type_and_settle(&mut ctl, "5500");

    ctl.handle_event(ControllerEvent::SuggestionsLoaded { token: t2, result: list(&["5500 Grand Lake Dr"]) });
    let cmds = ctl.handle_event(ControllerEvent::SuggestionsLoaded { token: t1, result: list(&["55 A St"]) });

    assert_eq!(cmds, vec![ControllerCommand::Report(SuggestionOutcome::Stale { token: t1 })]);
    assert_eq!(ctl.suggestions(), ["5500 Grand Lake Dr"]);
}

#[test]
fn response_for_abandoned_query_is_ignored() {
    let mut ctl = AutocompleteController::new();
    let (t1, _) = type_and_settle(&mut ctl, "55");

    ctl.handle_event(ControllerEvent::Input(String::new()));
    ctl.handle_event(ControllerEvent::SuggestionsLoaded { token: t1, result: list(&["55 A St"]) });

    assert_eq!(ctl.phase(), ControllerPhase::Empty);
    assert!(ctl.suggestions().is_empty());
}

#[test]
fn empty_and_error_both_close_but_report_differently() {
    let mut ctl = AutocompleteController::new();
    let (t1, _) = type_and_settle(&mut ctl, "zzz");
    let cmds = ctl.handle_event(ControllerEvent::SuggestionsLoaded { token: t1, result: SuggestionResult::Empty });
    assert_eq!(cmds, vec![ControllerCommand::Report(SuggestionOutcome::Empty { token: t1 })]);
    assert_eq!(ctl.phase(), ControllerPhase::Closed);

    let (t2, _) = type_and_settle(&mut ctl, "zzzz");
    let cmds = ctl.handle_event(ControllerEvent::SuggestionsLoaded {
        token: t2,
        result: SuggestionResult::Error("REQUEST_DENIED".into()),
    });
    assert_eq!(
        cmds,
        vec![ControllerCommand::Report(SuggestionOutcome::Error { token: t2, detail: "REQUEST_DENIED".into() })]
    );
    assert_eq!(ctl.phase(), ControllerPhase::Closed);
    assert!(!ctl.is_visible());
    assert_eq!(ctl.query(), "zzzz");
}

#[test]
fn repopulated_list_starts_unhighlighted() {
    let mut ctl = open_with(&["a", "b", "c"]);
    ctl.handle_event(ControllerEvent::ArrowDown);
    ctl.handle_event(ControllerEvent::ArrowDown);
    assert_eq!(ctl.highlight(), Some(1));

    let (token, _) = type_and_settle(&mut ctl, "mai");
    ctl.handle_event(ControllerEvent::SuggestionsLoaded { token, result: list(&["x"]) });
    assert_eq!(ctl.highlight_index(), -1);
}

// =========================================================================
// Navigation and selection
// =========================================================================

#[test]
fn arrows_saturate_at_both_ends() {
    let mut ctl = open_with(&["a", "b", "c"]);

    ctl.handle_event(ControllerEvent::ArrowDown);
    assert_eq!(ctl.highlight_index(), 0);

    for _ in 0..5 {
        ctl.handle_event(ControllerEvent::ArrowDown);
    }
    assert_eq!(ctl.highlight_index(), 2);

    for _ in 0..5 {
        ctl.handle_event(ControllerEvent::ArrowUp);
    }
    assert_eq!(ctl.highlight_index(), 0);
}

#[test]
fn arrow_up_from_nothing_lands_on_first_row() {
    let mut ctl = open_with(&["a", "b"]);
    ctl.handle_event(ControllerEvent::ArrowUp);
    assert_eq!(ctl.highlight_index(), 0);
}

#[test]
fn arrows_do_nothing_unless_open() {
    let mut ctl = AutocompleteController::new();
    ctl.handle_event(ControllerEvent::Input("55".into()));
    ctl.handle_event(ControllerEvent::ArrowDown);
    assert_eq!(ctl.highlight_index(), -1);
}

#[test]
fn enter_without_highlight_is_a_no_op() {
    let mut ctl = open_with(&["a", "b"]);
    let cmds = ctl.handle_event(ControllerEvent::Enter);
    assert!(cmds.is_empty());
    assert!(ctl.is_visible());
    assert_eq!(ctl.query(), "main");
}

#[test]
fn enter_on_highlight_commits_and_closes() {
    let mut ctl = open_with(&["a", "b"]);
    ctl.handle_event(ControllerEvent::ArrowDown);
    ctl.handle_event(ControllerEvent::ArrowDown);

    let cmds = ctl.handle_event(ControllerEvent::Enter);

    assert_eq!(cmds, vec![ControllerCommand::Committed("b".into())]);
    assert_eq!(ctl.query(), "b");
    assert!(!ctl.is_visible());
    assert_eq!(ctl.highlight_index(), -1);
    assert_eq!(ctl.phase(), ControllerPhase::Closed);
    assert!(ctl.suggestions().is_empty());
}

#[test]
fn hover_and_keyboard_share_the_highlight() {
    let mut ctl = open_with(&["a", "b", "c"]);

    ctl.handle_event(ControllerEvent::Hover(1));
    assert_eq!(ctl.highlight(), Some(1));

    ctl.handle_event(ControllerEvent::ArrowDown);
    assert_eq!(ctl.highlight(), Some(2));

    ctl.handle_event(ControllerEvent::HoverLeave);
    assert_eq!(ctl.highlight(), None);

    // Out-of-range hover is ignored.
    ctl.handle_event(ControllerEvent::Hover(7));
    assert_eq!(ctl.highlight(), None);
}

#[test]
fn click_selection_during_fetch_is_not_reopened_by_late_response() {
    let mut ctl = AutocompleteController::new();
    let (token, _) = type_and_settle(&mut ctl, "55");

    ctl.handle_event(ControllerEvent::Select("55 Picked Rd".into()));
    ctl.handle_event(ControllerEvent::SuggestionsLoaded { token, result: list(&["55 A St"]) });

    assert_eq!(ctl.query(), "55 Picked Rd");
    assert!(!ctl.is_visible());
}

// =========================================================================
// Dismissal and focus
// =========================================================================

#[test]
fn outside_interaction_closes_but_keeps_query() {
    let mut ctl = open_with(&["a", "b"]);
    ctl.handle_event(ControllerEvent::ArrowDown);

    ctl.handle_event(ControllerEvent::OutsideInteraction);

    assert_eq!(ctl.phase(), ControllerPhase::Closed);
    assert!(!ctl.is_visible());
    assert_eq!(ctl.highlight_index(), -1);
    assert_eq!(ctl.query(), "main");
}

#[test]
fn outside_interaction_is_ignored_while_typing() {
    let mut ctl = AutocompleteController::new();
    ctl.handle_event(ControllerEvent::Input("55".into()));
    ctl.handle_event(ControllerEvent::OutsideInteraction);
    assert_eq!(ctl.phase(), ControllerPhase::Typing);
}

#[test]
fn focus_after_dismissal_refetches_current_query() {
    let mut ctl = open_with(&["a"]);
    ctl.handle_event(ControllerEvent::OutsideInteraction);

    let (_, query) = fetch_of(&ctl.handle_event(ControllerEvent::Focus));

    assert_eq!(query, "main");
    assert_eq!(ctl.phase(), ControllerPhase::Fetching);
}

#[test]
fn focus_does_nothing_when_open_fetching_or_blank() {
    let mut ctl = open_with(&["a"]);
    assert!(ctl.handle_event(ControllerEvent::Focus).is_empty());

    let mut ctl = AutocompleteController::new();
    type_and_settle(&mut ctl, "55");
    assert!(ctl.handle_event(ControllerEvent::Focus).is_empty());

    let mut ctl = AutocompleteController::new();
    assert!(ctl.handle_event(ControllerEvent::Focus).is_empty());
}

#[test]
fn dismiss_cancels_pending_debounce() {
    let mut ctl = AutocompleteController::new();
    let ticket = ticket_of(&ctl.handle_event(ControllerEvent::Input("55".into())));

    assert_eq!(ctl.handle_event(ControllerEvent::Dismiss), vec![ControllerCommand::CancelDebounce]);
    assert!(ctl.handle_event(ControllerEvent::DebounceElapsed(ticket)).is_empty());
    assert_eq!(ctl.phase(), ControllerPhase::Closed);
}

#[test]
fn focus_after_dismiss_mid_debounce_refetches() {
    let mut ctl = AutocompleteController::new();
    ctl.handle_event(ControllerEvent::Input("main".into()));
    ctl.handle_event(ControllerEvent::Dismiss);

    let (_, query) = fetch_of(&ctl.handle_event(ControllerEvent::Focus));
    assert_eq!(query, "main");
    assert!(ctl.is_fetching());
}

#[test]
fn focus_after_failed_fetch_retries() {
    let mut ctl = AutocompleteController::new();
    let (token, _) = type_and_settle(&mut ctl, "main");
    ctl.handle_event(ControllerEvent::SuggestionsLoaded {
        token,
        result: SuggestionResult::Error("HTTP 500".into()),
    });

    let (_, query) = fetch_of(&ctl.handle_event(ControllerEvent::Focus));
    assert_eq!(query, "main");
}

#[test]
fn grand_lake_flow() {
    let mut ctl = AutocompleteController::new();
    let (token, query) = type_and_settle(&mut ctl, "5500 Grand");
    assert_eq!(query, "5500 Grand");

    ctl.handle_event(ControllerEvent::SuggestionsLoaded {
        token,
        result: list(&["5500 Grand Lake Dr, San Antonio, TX"]),
    });
    assert_eq!(ctl.phase(), ControllerPhase::Open);
    assert_eq!(ctl.suggestions().len(), 1);
    assert_eq!(ctl.highlight_index(), -1);

    ctl.handle_event(ControllerEvent::ArrowDown);
    ctl.handle_event(ControllerEvent::Enter);

    assert_eq!(ctl.query(), "5500 Grand Lake Dr, San Antonio, TX");
    assert!(!ctl.is_visible());
}

// =========================================================================
// Invariants under arbitrary interaction
// =========================================================================

#[derive(Debug, Clone)]
enum Op {
    Type(String),
    Settle,
    Respond(usize),
    Down,
    Up,
    Enter,
    Hover(usize),
    Leave,
    Outside,
    Focus,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-c ]{0,3}".prop_map(Op::Type),
        Just(Op::Settle),
        (0usize..5).prop_map(Op::Respond),
        Just(Op::Down),
        Just(Op::Up),
        Just(Op::Enter),
        (0usize..6).prop_map(Op::Hover),
        Just(Op::Leave),
        Just(Op::Outside),
        Just(Op::Focus),
    ]
}

proptest! {
    #[test]
    fn visibility_and_highlight_invariants_hold(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut ctl = AutocompleteController::new();
        let mut ticket = None;
        let mut inflight = Vec::new();

        for op in ops {
            let cmds = match op {
                Op::Type(t) => ctl.handle_event(ControllerEvent::Input(t)),
                Op::Settle => match ticket.take() {
                    Some(t) => ctl.handle_event(ControllerEvent::DebounceElapsed(t)),
                    None => vec![],
                },
                Op::Respond(n) => match inflight.pop() {
                    Some(token) => {
                        let items: Vec<String> = (0..n).map(|i| format!("row {}", i)).collect();
                        let result = if items.is_empty() { SuggestionResult::Empty } else { SuggestionResult::Ok(items) };
                        ctl.handle_event(ControllerEvent::SuggestionsLoaded { token, result })
                    }
                    None => vec![],
                },
                Op::Down => ctl.handle_event(ControllerEvent::ArrowDown),
                Op::Up => ctl.handle_event(ControllerEvent::ArrowUp),
                Op::Enter => ctl.handle_event(ControllerEvent::Enter),
                Op::Hover(i) => ctl.handle_event(ControllerEvent::Hover(i)),
                Op::Leave => ctl.handle_event(ControllerEvent::HoverLeave),
                Op::Outside => ctl.handle_event(ControllerEvent::OutsideInteraction),
                Op::Focus => ctl.handle_event(ControllerEvent::Focus),
            };

            for cmd in cmds {
                match cmd {
                    ControllerCommand::ScheduleDebounce { ticket: t } => ticket = Some(t),
                    ControllerCommand::FetchSuggestions { token, .. } => inflight.push(token),
                    _ => {}
                }
            }

            prop_assert_eq!(ctl.is_visible(), ctl.phase() == ControllerPhase::Open);
            prop_assert_eq!(ctl.is_visible(), !ctl.suggestions().is_empty());
            let idx = ctl.highlight_index();
            prop_assert!(idx >= -1);
            prop_assert!(idx < ctl.suggestions().len() as isize);
        }
    }
}
