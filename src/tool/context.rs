use crate::canvas::{CanvasCursor, CanvasSurface};
use crate::color::{AppColorState, ColorProperty, Hsl};
use crate::event::{EditorEvent, EventBus};
use crate::history::HistoryManager;

use super::ListenerRegistry;

/// Global single-key shortcuts, which text entry switches off.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shortcuts {
    suspended: bool,
}

impl Shortcuts {
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }
}

/// Everything a tool may touch while handling input.
pub struct ToolContext<'a> {
    pub surface: &'a mut CanvasSurface,
    pub history: &'a mut HistoryManager,
    pub colors: &'a mut AppColorState,
    pub listeners: &'a mut ListenerRegistry,
    pub shortcuts: &'a mut Shortcuts,
    pub events: &'a EventBus,
}

impl ToolContext<'_> {
    /// Records the main buffer as a new history entry.
    pub fn commit(&mut self) -> bool {
        match self.history.push(self.surface) {
            Ok(()) => {
                self.events.emit(EditorEvent::HistoryChanged {
                    cursor: self.history.cursor(),
                    len: self.history.len(),
                });
                true
            }
            Err(e) => {
                log::error!("Failed to record history snapshot: {}", e);
                false
            }
        }
    }

    pub fn set_cursor(&mut self, cursor: CanvasCursor) {
        if self.surface.cursor() != cursor {
            self.surface.set_cursor(cursor);
            self.events.emit(EditorEvent::CursorChanged(cursor));
        }
    }

    /// Pushes the application colors down to the surface's paint state.
    pub fn sync_colors(&mut self) {
        self.surface.set_fill_color(self.colors.fill.to_rgba());
        self.surface.set_stroke_color(self.colors.stroke.to_rgba());
    }

    pub fn set_color(&mut self, property: ColorProperty, color: Hsl) {
        self.colors.set(property, color);
        self.sync_colors();
        self.events.emit(EditorEvent::ColorChanged {
            property,
            color: self.colors.get(property),
        });
    }
}
