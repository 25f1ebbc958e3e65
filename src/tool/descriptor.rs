/// Static identity of a tool: how it is named, drawn in the toolbar and selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Icon reference, e.g. a Font Awesome class list
    pub icon: &'static str,
    /// Single-key shortcut that activates the tool
    pub shortcut: &'static str,
}

pub const HAND: ToolDescriptor = ToolDescriptor {
    id: "hand-tool",
    display_name: "Hand",
    icon: "fa-solid fa-hand",
    shortcut: "h",
};

pub const EYEDROPPER: ToolDescriptor = ToolDescriptor {
    id: "eyedropper-tool",
    display_name: "Eyedropper",
    icon: "fa-solid fa-eye-dropper",
    shortcut: "i",
};

pub const BRUSH: ToolDescriptor = ToolDescriptor {
    id: "brush-tool",
    display_name: "Brush",
    icon: "fa-solid fa-paintbrush",
    shortcut: "b",
};

pub const ERASER: ToolDescriptor = ToolDescriptor {
    id: "eraser-tool",
    display_name: "Eraser",
    icon: "fa-solid fa-eraser",
    shortcut: "e",
};

pub const FILL: ToolDescriptor = ToolDescriptor {
    id: "fill-tool",
    display_name: "Fill",
    icon: "fa-solid fa-fill-drip",
    shortcut: "f",
};

pub const SHAPE: ToolDescriptor = ToolDescriptor {
    id: "shape-tool",
    display_name: "Shape",
    icon: "fa-solid fa-draw-polygon",
    shortcut: "u",
};

pub const TEXT: ToolDescriptor = ToolDescriptor {
    id: "text-tool",
    display_name: "Text",
    icon: "fa-solid fa-i-cursor",
    shortcut: "t",
};

pub const ZOOM: ToolDescriptor = ToolDescriptor {
    id: "zoom-tool",
    display_name: "Zoom",
    icon: "fa-solid fa-magnifying-glass",
    shortcut: "z",
};
