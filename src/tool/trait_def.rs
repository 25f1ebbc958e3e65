use crate::input::{KeyEvent, PointerEvent};

use super::{ToolContext, ToolDescriptor};

/// A canvas tool.
///
/// `deactivate` must undo everything `activate` set up (listeners,
/// composite mode, cursor, in-progress previews) so switching tools
/// mid-gesture leaves nothing behind.
pub trait Tool {
    fn descriptor(&self) -> &'static ToolDescriptor;

    fn activate(&mut self, ctx: &mut ToolContext<'_>);

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>);

    fn on_pointer_down(&mut self, _ctx: &mut ToolContext<'_>, _event: &PointerEvent) {}

    fn on_pointer_move(&mut self, _ctx: &mut ToolContext<'_>, _event: &PointerEvent) {}

    fn on_pointer_up(&mut self, _ctx: &mut ToolContext<'_>, _event: &PointerEvent) {}

    /// Returns true if the tool consumed the key.
    fn on_key_down(&mut self, _ctx: &mut ToolContext<'_>, _event: &KeyEvent) -> bool {
        false
    }

    fn on_key_up(&mut self, _ctx: &mut ToolContext<'_>, _event: &KeyEvent) -> bool {
        false
    }

    /// Typed text, delivered while the tool listens to the keyboard.
    fn on_text_input(&mut self, _ctx: &mut ToolContext<'_>, _text: &str) {}
}
