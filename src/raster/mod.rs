//! Immediate-mode raster drawing on RGBA buffers.

mod layer;
mod path;
mod text;

pub use layer::{DrawState, Layer, blend};
pub use path::{Path, Subpath, Transform, arc_points};
pub use text::{FontFamily, FontSpec, TextRasterizer};

use serde::{Deserialize, Serialize};

/// Pixel blend rule used when painting onto a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompositeMode {
    /// Normal paint-over
    #[default]
    SourceOver,
    /// Painting clears destination alpha (erasing)
    DestinationOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}
