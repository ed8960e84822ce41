//! Outside-interaction detection.
//!
//! The [`InteractionHub`] stands in for the surrounding document: the host
//! feeds every pointer-down and touch-start into it. A widget registers its
//! bounding region with [`InteractionHub::watch`] and gets a [`WatcherGuard`];
//! the listener lives exactly as long as the guard, so it is released on every
//! exit path, unwinding included.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box of a widget's container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Edges count as inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    PointerDown,
    TouchStart,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self { kind: PointerKind::PointerDown, position: Point::new(x, y) }
    }

    pub fn touch_start(x: f64, y: f64) -> Self {
        Self { kind: PointerKind::TouchStart, position: Point::new(x, y) }
    }
}

type OutsideCallback = Arc<dyn Fn(PointerEvent) + Send + Sync>;

struct Listener {
    region: Region,
    on_outside: OutsideCallback,
}

#[derive(Default)]
struct HubState {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

/// Document-wide pointer listener registry.
#[derive(Clone, Default)]
pub struct InteractionHub {
    state: Arc<Mutex<HubState>>,
}

impl InteractionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a listener for `region`; detached when the guard drops.
    pub fn watch<F>(&self, region: Region, on_outside: F) -> WatcherGuard
    where
        F: Fn(PointerEvent) + Send + Sync + 'static,
    {
        let mut s = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        s.next_id += 1;
        let id = s.next_id;
        s.listeners.insert(
            id,
            Listener {
                region,
                on_outside: Arc::new(on_outside),
            },
        );
        log::debug!("[WATCHER] attached listener {} ({} active)", id, s.listeners.len());

        WatcherGuard {
            id,
            hub: Arc::downgrade(&self.state),
        }
    }

    /// Delivers a pointer event; returns how many listeners saw it as outside.
    pub fn dispatch(&self, event: PointerEvent) -> usize {
        // Callbacks run without the lock held so they may attach or detach.
        let targets: Vec<OutsideCallback> = {
            let s = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            s.listeners
                .values()
                .filter(|l| !l.region.contains(event.position))
                .map(|l| l.on_outside.clone())
                .collect()
        };

        for cb in &targets {
            cb(event);
        }
        targets.len()
    }

    pub fn listener_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }
}

/// Scoped registration of one outside-interaction listener.
#[must_use = "the listener is detached as soon as the guard is dropped"]
pub struct WatcherGuard {
    id: u64,
    hub: Weak<Mutex<HubState>>,
}

impl WatcherGuard {
    /// Moves the watched region, e.g. after a layout change.
    pub fn set_region(&self, region: Region) {
        if let Some(hub) = self.hub.upgrade() {
            let mut s = hub.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(listener) = s.listeners.get_mut(&self.id) {
                listener.region = region;
            }
        }
    }
}

impl Drop for WatcherGuard {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            let mut s = hub.lock().unwrap_or_else(PoisonError::into_inner);
            s.listeners.remove(&self.id);
            log::debug!("[WATCHER] detached listener {} ({} active)", self.id, s.listeners.len());
        }
    }
}
