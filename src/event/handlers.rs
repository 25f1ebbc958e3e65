use std::cell::RefCell;
use std::rc::Rc;

use super::{EditorEvent, EventHandler};

/// Writes every event to the `log` facade at debug level.
#[derive(Debug, Default)]
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn handle_event(&mut self, event: &EditorEvent) {
        log::debug!("Editor event: {:?}", event);
    }
}

/// Records events into a shared list that the owner can drain.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Rc<RefCell<Vec<EditorEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<EditorEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventHandler for EventLog {
    fn handle_event(&mut self, event: &EditorEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
