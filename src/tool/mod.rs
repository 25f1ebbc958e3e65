mod context;
pub mod descriptor;
mod listeners;
mod registry;
mod trait_def;
pub mod types;

pub use context::{Shortcuts, ToolContext};
pub use descriptor::ToolDescriptor;
pub use listeners::{ListenerHandle, ListenerKind, ListenerRegistry};
pub use registry::{KeyOutcome, ToolRegistry};
pub use trait_def::Tool;
pub use types::ToolType;

// Re-export specific tool implementations
pub use types::{
    EyeDropperTool, FillTool, HandTool, ShapeSettings, ShapeTool, StampSettings, StampingDrawTool,
    StrokeMode, TextOverlay, TextTool, ZoomTool,
};
