pub mod debounce;
pub mod orchestrator;
pub mod watcher;

pub use debounce::Debouncer;
pub use orchestrator::{AddressWidget, WidgetEvent};
pub use watcher::{InteractionHub, PointerEvent, PointerKind, Point, Region, WatcherGuard};
