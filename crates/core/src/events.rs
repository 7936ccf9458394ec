//! Events module - typed publish/subscribe between the controller and its observers
//!
//! Subscribers register a closure per [`EventKind`]. Dispatch is synchronous and
//! runs the callbacks of one kind in registration order. A callback that panics
//! is reported and skipped; the remaining callbacks still run.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::grid::GridSnapshot;
use crate::pieces::PieceCoords;
use crate::types::{Direction, PieceKind};

/// Discriminant of [`Event`], used as the subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    GameStart,
    GameEnd,
    GamePause,
    GameUnpause,
    TetrominoSpawned,
    CoordinatesChanged,
    Collision,
    GridChanged,
    LinesCompleted,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::GameStart,
        EventKind::GameEnd,
        EventKind::GamePause,
        EventKind::GameUnpause,
        EventKind::TetrominoSpawned,
        EventKind::CoordinatesChanged,
        EventKind::Collision,
        EventKind::GridChanged,
        EventKind::LinesCompleted,
    ];
}

/// Something observable happened in the game
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    GameStart,
    GameEnd,
    GamePause,
    GameUnpause,
    /// A new active piece appeared
    TetrominoSpawned {
        coordinates: PieceCoords,
        kind: PieceKind,
    },
    /// The active piece moved or rotated
    CoordinatesChanged {
        old: PieceCoords,
        new: PieceCoords,
        kind: PieceKind,
    },
    /// A move was refused; `coordinates` are the unchanged piece cells
    Collision {
        coordinates: PieceCoords,
        direction: Direction,
    },
    /// Locked cells changed without any line clear
    GridChanged { grid: GridSnapshot },
    /// One or more rows were cleared; `grid` is the compacted result
    LinesCompleted {
        cleared_rows: Vec<i32>,
        grid: GridSnapshot,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::GameStart => EventKind::GameStart,
            Event::GameEnd => EventKind::GameEnd,
            Event::GamePause => EventKind::GamePause,
            Event::GameUnpause => EventKind::GameUnpause,
            Event::TetrominoSpawned { .. } => EventKind::TetrominoSpawned,
            Event::CoordinatesChanged { .. } => EventKind::CoordinatesChanged,
            Event::Collision { .. } => EventKind::Collision,
            Event::GridChanged { .. } => EventKind::GridChanged,
            Event::LinesCompleted { .. } => EventKind::LinesCompleted,
        }
    }
}

/// Handle returned by [`EventDispatcher::add_callback`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u64);

type Callback = Box<dyn FnMut(&Event)>;

/// Registry of subscribers keyed by event kind
#[derive(Default)]
pub struct EventDispatcher {
    callbacks: HashMap<EventKind, Vec<(CallbackId, Callback)>>,
    next_id: u64,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<EventKind, usize> = self
            .callbacks
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("EventDispatcher")
            .field("callbacks", &counts)
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `callback` to `kind`.
    ///
    /// The same closure logic may be registered more than once; each
    /// registration gets its own id and runs separately.
    pub fn add_callback<F>(&mut self, kind: EventKind, callback: F) -> CallbackId
    where
        F: FnMut(&Event) + 'static,
    {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.callbacks
            .entry(kind)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Remove one registration. Returns false if `id` is not subscribed to `kind`.
    pub fn delete_callback(&mut self, kind: EventKind, id: CallbackId) -> bool {
        let Some(list) = self.callbacks.get_mut(&kind) else {
            return false;
        };
        let Some(pos) = list.iter().position(|(cid, _)| *cid == id) else {
            return false;
        };
        list.remove(pos);
        true
    }

    /// Number of registrations for `kind`
    pub fn callback_count(&self, kind: EventKind) -> usize {
        self.callbacks.get(&kind).map_or(0, |list| list.len())
    }

    /// Run every callback subscribed to the event's kind, in order.
    pub fn dispatch(&mut self, event: &Event) {
        let kind = event.kind();
        let Some(list) = self.callbacks.get_mut(&kind) else {
            return;
        };
        for (id, callback) in list.iter_mut() {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(event))) {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                eprintln!("[Events] Callback {:?} for {:?} panicked: {}", id, kind, msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_dispatch_runs_callbacks_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut events = EventDispatcher::new();

        for tag in ["a", "b", "a"] {
            let log = Rc::clone(&log);
            events.add_callback(EventKind::GameStart, move |_| log.borrow_mut().push(tag));
        }
        events.dispatch(&Event::GameStart);

        assert_eq!(*log.borrow(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_dispatch_only_reaches_matching_kind() {
        let hits = Rc::new(RefCell::new(0));
        let mut events = EventDispatcher::new();
        let h = Rc::clone(&hits);
        events.add_callback(EventKind::GamePause, move |_| *h.borrow_mut() += 1);

        events.dispatch(&Event::GameStart);
        events.dispatch(&Event::GameUnpause);
        assert_eq!(*hits.borrow(), 0);

        events.dispatch(&Event::GamePause);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_delete_callback() {
        let hits = Rc::new(RefCell::new(0));
        let mut events = EventDispatcher::new();
        let h = Rc::clone(&hits);
        let id = events.add_callback(EventKind::GameEnd, move |_| *h.borrow_mut() += 1);

        assert!(!events.delete_callback(EventKind::GameStart, id));
        assert!(events.delete_callback(EventKind::GameEnd, id));
        assert!(!events.delete_callback(EventKind::GameEnd, id));
        assert_eq!(events.callback_count(EventKind::GameEnd), 0);

        events.dispatch(&Event::GameEnd);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_panicking_callback_does_not_stop_others() {
        let hits = Rc::new(RefCell::new(0));
        let mut events = EventDispatcher::new();

        events.add_callback(EventKind::GameStart, |_| panic!("subscriber failure"));
        let h = Rc::clone(&hits);
        events.add_callback(EventKind::GameStart, move |_| *h.borrow_mut() += 1);

        events.dispatch(&Event::GameStart);
        events.dispatch(&Event::GameStart);
        assert_eq!(*hits.borrow(), 2);
    }

    #[test]
    fn test_event_kind_matches_variant() {
        let grid = crate::grid::Grid::new(4, 4).snapshot();
        let event = Event::LinesCompleted {
            cleared_rows: vec![3],
            grid,
        };
        assert_eq!(event.kind(), EventKind::LinesCompleted);
        assert_eq!(EventKind::ALL.len(), 9);
    }
}
