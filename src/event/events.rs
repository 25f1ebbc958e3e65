use egui::Pos2;

use crate::canvas::CanvasCursor;
use crate::color::{ColorProperty, Hsl};

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ToolActivated {
        tool_id: &'static str,
    },
    ToolDeactivated {
        tool_id: &'static str,
    },
    ToolChanged {
        old: Option<&'static str>,
        new: &'static str,
    },
    CursorChanged(CanvasCursor),
    HistoryChanged {
        cursor: usize,
        len: usize,
    },
    ColorChanged {
        property: ColorProperty,
        color: Hsl,
    },
    /// The text overlay opened; `origin` is the top-left of its first line
    TextEditingStarted {
        origin: Pos2,
    },
    TextEditingFinished {
        committed: bool,
    },
    CanvasReset,
    ImageImported {
        width: u32,
        height: u32,
    },
    Exported {
        file_name: String,
    },
}
