use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::config::WidgetConfig;
use crate::widget::engine::{AutocompleteController, ControllerCommand, ControllerEvent};
use crate::widget::runtime::debounce::Debouncer;
use crate::widget::runtime::watcher::{InteractionHub, Region, WatcherGuard};
use crate::widget::services::{SuggestionFetcher, SuggestionService, ValuationFetcher, ValuationService};
use crate::widget::session::{SessionCommand, SessionEvent, ValuationSession};
use crate::widget::types::{RequestToken, SuggestionOutcome};

/// Completions and timer firings travelling back into the widget.
#[derive(Debug)]
pub enum WidgetEvent {
    Controller(ControllerEvent),
    Session(SessionEvent),
}

type OutcomeObserver = Box<dyn FnMut(&SuggestionOutcome) + Send>;

/// **AddressWidget**
///
/// The imperative shell around the two state machines. It:
/// 1. Feeds user input to the [`AutocompleteController`] and [`ValuationSession`].
/// 2. Executes the commands they emit (timers, service calls, logging).
/// 3. Routes completions back in through a single event channel, so all state
///    changes happen on the owner's task, one at a time.
///
/// Every method that can start work spawns Tokio tasks and must run inside a
/// runtime.
pub struct AddressWidget {
    controller: AutocompleteController,
    session: ValuationSession,

    suggestions: SuggestionFetcher,
    valuations: ValuationFetcher,

    debouncer: Debouncer,
    config: WidgetConfig,

    events_tx: mpsc::UnboundedSender<WidgetEvent>,
    events_rx: mpsc::UnboundedReceiver<WidgetEvent>,

    /// Debounce ticket whose firing has not been applied yet.
    armed_debounce: Option<RequestToken>,

    /// Spawned service calls whose completion has not been applied yet.
    outstanding: usize,

    on_outcome: Option<OutcomeObserver>,

    /// Outside-interaction listener, held while mounted.
    watcher: Option<WatcherGuard>,

    t0: Instant,
}

impl AddressWidget {
    pub fn new(
        suggestions: Arc<dyn SuggestionService>,
        valuations: Arc<dyn ValuationService>,
        config: WidgetConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            controller: AutocompleteController::new(),
            session: ValuationSession::new(),
            suggestions: SuggestionFetcher::new(suggestions),
            valuations: ValuationFetcher::new(valuations),
            debouncer: Debouncer::new(),
            config,
            events_tx,
            events_rx,
            armed_debounce: None,
            outstanding: 0,
            on_outcome: None,
            watcher: None,
            t0: Instant::now(),
        }
    }

    /// Registers a telemetry hook called for every suggestion outcome,
    /// stale discards included.
    pub fn with_outcome_observer<F: FnMut(&SuggestionOutcome) + Send + 'static>(mut self, f: F) -> Self {
        self.on_outcome = Some(Box::new(f));
        self
    }

    // ================================
    // Lifetime
    // ================================

    /// Starts watching for pointer activity outside `region`.
    ///
    /// Mounting again replaces the previous listener.
    pub fn mount(&mut self, hub: &InteractionHub, region: Region) {
        let tx = self.events_tx.clone();
        self.watcher = Some(hub.watch(region, move |_| {
            let _ = tx.send(WidgetEvent::Controller(ControllerEvent::OutsideInteraction));
        }));
        self.info("mounted");
    }

    /// Detaches the listener and drops pending work; the query is kept.
    pub fn unmount(&mut self) {
        if self.watcher.take().is_some() {
            self.info("unmounted");
        }
        self.process_controller(ControllerEvent::Dismiss);
        self.debouncer.cancel();
        self.armed_debounce = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.watcher.is_some()
    }

    // ================================
    // User input
    // ================================

    pub fn input(&mut self, text: impl Into<String>) {
        self.process_controller(ControllerEvent::Input(text.into()));
    }

    pub fn focus(&mut self) {
        self.process_controller(ControllerEvent::Focus);
    }

    pub fn arrow_down(&mut self) {
        self.process_controller(ControllerEvent::ArrowDown);
    }

    pub fn arrow_up(&mut self) {
        self.process_controller(ControllerEvent::ArrowUp);
    }

    pub fn enter(&mut self) {
        self.process_controller(ControllerEvent::Enter);
    }

    pub fn hover(&mut self, index: usize) {
        self.process_controller(ControllerEvent::Hover(index));
    }

    pub fn hover_leave(&mut self) {
        self.process_controller(ControllerEvent::HoverLeave);
    }

    /// Click or tap on a suggestion row. Out-of-range rows are ignored.
    pub fn click(&mut self, index: usize) {
        if let Some(text) = self.controller.suggestions().get(index).cloned() {
            self.select(text);
        }
    }

    pub fn select(&mut self, text: impl Into<String>) {
        self.process_controller(ControllerEvent::Select(text.into()));
    }

    /// Explicit submit of whatever the input currently holds.
    pub fn submit(&mut self) {
        let address = self.controller.query().to_string();
        self.submit_address(address);
    }

    pub fn submit_address(&mut self, address: impl Into<String>) {
        self.process_session(SessionEvent::Submit(address.into()));
    }

    // ================================
    // Event pumping
    // ================================

    /// Waits for the next completion or timer firing and applies it.
    ///
    /// Pends forever if nothing is outstanding; see [`AddressWidget::settle`].
    pub async fn next_event(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.apply(event);
        }
    }

    /// Applies everything already queued without waiting.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Drives the widget until no debounce or service call is outstanding.
    pub async fn settle(&mut self) {
        self.pump();
        while self.is_busy() {
            self.next_event().await;
        }
    }

    pub fn is_busy(&self) -> bool {
        self.armed_debounce.is_some() || self.outstanding > 0
    }

    // ================================
    // Snapshots
    // ================================

    pub fn controller(&self) -> &AutocompleteController {
        &self.controller
    }

    pub fn session(&self) -> &ValuationSession {
        &self.session
    }

    // ================================
    // Internals
    // ================================

    fn apply(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::Controller(ev) => {
                match &ev {
                    ControllerEvent::DebounceElapsed(ticket) if self.armed_debounce == Some(*ticket) => {
                        self.armed_debounce = None;
                    }
                    ControllerEvent::SuggestionsLoaded { .. } => {
                        self.outstanding = self.outstanding.saturating_sub(1);
                    }
                    _ => {}
                }
                self.process_controller(ev);
            }
            WidgetEvent::Session(ev) => {
                if matches!(ev, SessionEvent::Completed { .. }) {
                    self.outstanding = self.outstanding.saturating_sub(1);
                }
                self.process_session(ev);
            }
        }
    }

    fn process_controller(&mut self, event: ControllerEvent) {
        self.trace(&format!("controller.handle_event({:?})", event));
        let cmds = self.controller.handle_event(event);
        for cmd in cmds {
            self.execute_controller_command(cmd);
        }
    }

    fn process_session(&mut self, event: SessionEvent) {
        self.trace(&format!("session.handle_event({:?})", event));
        let cmds = self.session.handle_event(event);
        for cmd in cmds {
            self.execute_session_command(cmd);
        }
    }

    fn execute_controller_command(&mut self, cmd: ControllerCommand) {
        match cmd {
            ControllerCommand::ScheduleDebounce { ticket } => {
                let tx = self.events_tx.clone();
                self.debouncer.schedule(self.config.debounce, move || {
                    let _ = tx.send(WidgetEvent::Controller(ControllerEvent::DebounceElapsed(ticket)));
                });
                self.armed_debounce = Some(ticket);
            }

            ControllerCommand::CancelDebounce => {
                self.debouncer.cancel();
                self.armed_debounce = None;
            }

            ControllerCommand::FetchSuggestions { token, query } => {
                self.debug(&format!("cmd: FetchSuggestions({}, {:?})", token, query));
                let fetcher = self.suggestions.clone();
                let tx = self.events_tx.clone();
                self.outstanding += 1;

                tokio::spawn(async move {
                    let result = fetcher.fetch(&query).await;
                    let _ = tx.send(WidgetEvent::Controller(ControllerEvent::SuggestionsLoaded { token, result }));
                });
            }

            ControllerCommand::Report(outcome) => {
                match &outcome {
                    SuggestionOutcome::Ok { token, count } => {
                        self.debug(&format!("suggestions {}: {} rows", token, count))
                    }
                    SuggestionOutcome::Empty { token } => self.debug(&format!("suggestions {}: none", token)),
                    SuggestionOutcome::Error { token, detail } => {
                        log::warn!("[WIDGET] suggestion request {} failed: {}", token, detail)
                    }
                    SuggestionOutcome::Stale { token } => self.debug(&format!("suggestions {}: stale", token)),
                }
                if let Some(observer) = self.on_outcome.as_mut() {
                    observer(&outcome);
                }
            }

            ControllerCommand::Committed(text) => {
                self.info(&format!("address committed: {:?}", text));
            }
        }
    }

    fn execute_session_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::CloseSuggestions => {
                self.process_controller(ControllerEvent::Dismiss);
            }

            SessionCommand::FetchValuation { token, address } => {
                self.debug(&format!("cmd: FetchValuation({}, {:?})", token, address));
                let fetcher = self.valuations.clone();
                let tx = self.events_tx.clone();
                self.outstanding += 1;

                tokio::spawn(async move {
                    let outcome = fetcher.fetch(&address).await;
                    let _ = tx.send(WidgetEvent::Session(SessionEvent::Completed { token, outcome }));
                });
            }
        }
    }

    fn t(&self) -> u128 {
        self.t0.elapsed().as_micros()
    }

    fn info(&self, msg: &str) {
        log::info!("[WIDGET] {:>8}us: {}", self.t(), msg);
    }

    fn debug(&self, msg: &str) {
        log::debug!("[WIDGET] {:>8}us: {}", self.t(), msg);
    }

    fn trace(&self, msg: &str) {
        log::trace!("[WIDGET] {:>8}us: {}", self.t(), msg);
    }
}
