mod gesture;

pub use gesture::GestureTracker;

use egui::{PointerButton, Pos2};

use crate::geometry::Point;

/// Kind of device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// A pointer event in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pos: Pos2,
    pub pointer_id: u64,
    pub pointer_type: PointerType,
    /// Reported pressure in `[0, 1]`; only meaningful for pens
    pub pressure: f32,
    pub button: PointerButton,
    /// Modifier keys held when the event happened
    pub modifiers: egui::Modifiers,
}

impl PointerEvent {
    /// A primary-button mouse event from pointer 1.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Pos2::new(x, y),
            pointer_id: 1,
            pointer_type: PointerType::Mouse,
            pressure: 1.0,
            button: PointerButton::Primary,
            modifiers: egui::Modifiers::NONE,
        }
    }

    pub fn with_id(mut self, pointer_id: u64) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    pub fn with_pen(mut self, pressure: f32) -> Self {
        self.pointer_type = PointerType::Pen;
        self.pressure = pressure;
        self
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: egui::Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Only pens report genuine pressure.
    pub fn has_pressure(&self) -> bool {
        self.pointer_type == PointerType::Pen
    }

    /// The sample as a drawing point; non-pen devices always draw at full pressure.
    pub fn point(&self) -> Point {
        let pressure = if self.has_pressure() { self.pressure } else { 1.0 };
        Point::with_pressure(self.pos.x, self.pos.y, pressure)
    }
}

/// A key press or release, named the way browsers name keys
/// (`"b"`, `"Shift"`, `"Escape"`, `"Enter"`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    pub key: String,
    pub alt: bool,
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: egui::Modifiers) -> Self {
        self.alt = modifiers.alt;
        self.shift = modifiers.shift;
        self.ctrl = modifiers.ctrl;
        self.meta = modifiers.mac_cmd;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Translates an egui key, lower-casing single letters.
    pub fn from_egui(key: egui::Key, modifiers: egui::Modifiers) -> Self {
        let name = key.name();
        let key = if name.chars().count() == 1 {
            name.to_lowercase()
        } else {
            name.to_owned()
        };
        Self::new(key).with_modifiers(modifiers)
    }
}
