use egui::PointerButton;

use crate::canvas::CanvasCursor;
use crate::color::Hsl;
use crate::input::PointerEvent;
use crate::tool::descriptor::EYEDROPPER;
use crate::tool::listeners::release;
use crate::tool::{ListenerHandle, ListenerKind, Tool, ToolContext, ToolDescriptor};

/// Picks the main-buffer color under the pointer into the selected color.
#[derive(Debug, Default)]
pub struct EyeDropperTool {
    pointer: Option<ListenerHandle>,
}

impl Tool for EyeDropperTool {
    fn descriptor(&self) -> &'static ToolDescriptor {
        &EYEDROPPER
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        self.pointer = Some(ctx.listeners.subscribe(ListenerKind::Pointer));
        ctx.set_cursor(CanvasCursor::Pick);
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        release(ctx.listeners, &mut self.pointer);
        ctx.set_cursor(CanvasCursor::Default);
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        if event.button != PointerButton::Primary || event.pos.x < 0.0 || event.pos.y < 0.0 {
            return;
        }
        let Some(pixel) = ctx.surface.pixel(event.pos.x as u32, event.pos.y as u32) else {
            return;
        };
        let color = Hsl::from_rgba(pixel);
        let property = ctx.colors.selected;
        log::info!("Picked {} into {:?}", color, property);
        ctx.set_color(property, color);
    }
}
