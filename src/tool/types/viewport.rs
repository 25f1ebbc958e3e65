use crate::canvas::CanvasCursor;
use crate::tool::descriptor::{HAND, ZOOM};
use crate::tool::{Tool, ToolContext, ToolDescriptor};

/// Reserved for panning the view; does nothing yet.
#[derive(Debug, Default)]
pub struct HandTool;

impl Tool for HandTool {
    fn descriptor(&self) -> &'static ToolDescriptor {
        &HAND
    }

    fn activate(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn deactivate(&mut self, _ctx: &mut ToolContext<'_>) {}
}

/// Reserved for view scaling; only changes the cursor.
#[derive(Debug, Default)]
pub struct ZoomTool;

impl Tool for ZoomTool {
    fn descriptor(&self) -> &'static ToolDescriptor {
        &ZOOM
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.set_cursor(CanvasCursor::ZoomIn);
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.set_cursor(CanvasCursor::Default);
    }
}
