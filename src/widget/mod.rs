//! Address input and valuation lookup.
//!
//! Leaves first: `domain` (records, sale history), `services` (remote seams
//! and fetchers), `engine` and `session` (pure state machines), `runtime`
//! (timers, pointer watching, and the widget that wires everything up).

pub mod domain;
pub mod engine;
pub mod runtime;
pub mod services;
pub mod session;
pub mod types;

pub use engine::{AutocompleteController, ControllerPhase};
pub use runtime::{AddressWidget, InteractionHub, Region};
pub use session::{RequestPhase, ValuationSession};
pub use types::{RequestToken, SuggestionOutcome, SuggestionResult};
