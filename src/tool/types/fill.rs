use crate::canvas::CanvasCursor;
use crate::input::{GestureTracker, PointerEvent};
use crate::tool::descriptor::FILL;
use crate::tool::listeners::release;
use crate::tool::{ListenerHandle, ListenerKind, Tool, ToolContext, ToolDescriptor};

/// Floods the whole canvas with the fill color. Selections are not considered.
#[derive(Debug, Default)]
pub struct FillTool {
    gesture: GestureTracker,
    pointer: Option<ListenerHandle>,
}

impl Tool for FillTool {
    fn descriptor(&self) -> &'static ToolDescriptor {
        &FILL
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        self.pointer = Some(ctx.listeners.subscribe(ListenerKind::Pointer));
        ctx.set_cursor(CanvasCursor::Crosshair);
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.gesture.cancel();
        release(ctx.listeners, &mut self.pointer);
        ctx.set_cursor(CanvasCursor::Default);
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        if !self.gesture.begin(event) {
            return;
        }
        if ctx.surface.fill_all() {
            ctx.commit();
        }
    }

    fn on_pointer_up(&mut self, _ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        self.gesture.end(event);
    }
}
