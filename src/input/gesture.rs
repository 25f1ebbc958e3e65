use egui::PointerButton;

use super::PointerEvent;

/// Tracks which pointer owns the current gesture.
///
/// A gesture starts only on a primary-button press while no other gesture
/// is active; afterwards only events from the same pointer id match.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureTracker {
    active: Option<u64>,
}

impl GestureTracker {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Tries to start a gesture. Returns false if the event is ignored.
    pub fn begin(&mut self, event: &PointerEvent) -> bool {
        if self.active.is_some() || event.button != PointerButton::Primary {
            return false;
        }
        self.active = Some(event.pointer_id);
        true
    }

    pub fn matches(&self, event: &PointerEvent) -> bool {
        self.active == Some(event.pointer_id)
    }

    /// Ends the gesture if `event` belongs to it.
    pub fn end(&mut self, event: &PointerEvent) -> bool {
        if !self.matches(event) {
            return false;
        }
        self.active = None;
        true
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_pointer_is_ignored() {
        let mut tracker = GestureTracker::default();
        assert!(tracker.begin(&PointerEvent::new(0.0, 0.0).with_id(1)));
        assert!(!tracker.begin(&PointerEvent::new(0.0, 0.0).with_id(2)));
        assert!(!tracker.end(&PointerEvent::new(0.0, 0.0).with_id(2)));
        assert!(tracker.end(&PointerEvent::new(0.0, 0.0).with_id(1)));
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_secondary_button_does_not_start() {
        let mut tracker = GestureTracker::default();
        let event = PointerEvent::new(0.0, 0.0).with_button(PointerButton::Secondary);
        assert!(!tracker.begin(&event));
    }
}
