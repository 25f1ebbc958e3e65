pub mod eyedropper;
pub mod fill;
pub mod shape;
pub mod stamping;
pub mod text;
pub mod viewport;

pub use eyedropper::EyeDropperTool;
pub use fill::FillTool;
pub use shape::{ShapeSettings, ShapeTool, draw_outline};
pub use stamping::{StampSettings, StampingDrawTool, StrokeMode, line_style, pressure_width};
pub use text::{TextOverlay, TextTool};
pub use viewport::{HandTool, ZoomTool};

use crate::input::{KeyEvent, PointerEvent};

use super::{Tool, ToolContext, ToolDescriptor};

/// Every tool the editor offers.
#[derive(Debug)]
pub enum ToolType {
    Hand(HandTool),
    EyeDropper(EyeDropperTool),
    Brush(StampingDrawTool),
    Eraser(StampingDrawTool),
    Fill(FillTool),
    Shape(ShapeTool),
    Text(TextTool),
    Zoom(ZoomTool),
}

impl ToolType {
    fn as_tool(&self) -> &dyn Tool {
        match self {
            Self::Hand(tool) => tool,
            Self::EyeDropper(tool) => tool,
            Self::Brush(tool) | Self::Eraser(tool) => tool,
            Self::Fill(tool) => tool,
            Self::Shape(tool) => tool,
            Self::Text(tool) => tool,
            Self::Zoom(tool) => tool,
        }
    }

    fn as_tool_mut(&mut self) -> &mut dyn Tool {
        match self {
            Self::Hand(tool) => tool,
            Self::EyeDropper(tool) => tool,
            Self::Brush(tool) | Self::Eraser(tool) => tool,
            Self::Fill(tool) => tool,
            Self::Shape(tool) => tool,
            Self::Text(tool) => tool,
            Self::Zoom(tool) => tool,
        }
    }

    pub fn id(&self) -> &'static str {
        self.descriptor().id
    }

    pub fn stamp_settings_mut(&mut self) -> Option<&mut StampSettings> {
        match self {
            Self::Brush(tool) | Self::Eraser(tool) => Some(&mut tool.settings),
            _ => None,
        }
    }
}

impl Tool for ToolType {
    fn descriptor(&self) -> &'static ToolDescriptor {
        self.as_tool().descriptor()
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        self.as_tool_mut().activate(ctx)
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.as_tool_mut().deactivate(ctx)
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        self.as_tool_mut().on_pointer_down(ctx, event)
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        self.as_tool_mut().on_pointer_move(ctx, event)
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        self.as_tool_mut().on_pointer_up(ctx, event)
    }

    fn on_key_down(&mut self, ctx: &mut ToolContext<'_>, event: &KeyEvent) -> bool {
        self.as_tool_mut().on_key_down(ctx, event)
    }

    fn on_key_up(&mut self, ctx: &mut ToolContext<'_>, event: &KeyEvent) -> bool {
        self.as_tool_mut().on_key_up(ctx, event)
    }

    fn on_text_input(&mut self, ctx: &mut ToolContext<'_>, text: &str) {
        self.as_tool_mut().on_text_input(ctx, text)
    }
}
