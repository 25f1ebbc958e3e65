use std::cell::RefCell;

use crate::event::{EditorEvent, EventHandler};

/// Broadcasts editor events to registered handlers
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    /// Emit an event to all registered handlers.
    ///
    /// Handlers must not emit on the same bus from inside `handle_event`.
    pub fn emit(&self, event: EditorEvent) {
        match self.handlers.try_borrow_mut() {
            Ok(mut handlers) => {
                for handler in handlers.iter_mut() {
                    handler.handle_event(&event);
                }
            }
            Err(_) => log::warn!("Dropped re-entrant event {:?}", event),
        }
    }
}
