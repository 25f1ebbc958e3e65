mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::EditorEvent;
pub use handlers::{EventLog, LoggingEventHandler};

/// Receives every event emitted on an [`EventBus`].
pub trait EventHandler {
    fn handle_event(&mut self, event: &EditorEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&EditorEvent),
{
    fn handle_event(&mut self, event: &EditorEvent) {
        self(event)
    }
}
