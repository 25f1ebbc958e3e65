use thiserror::Error;

/// Errors reported by the canvas engine.
///
/// None of these are fatal: callers log them and carry on with the
/// canvas unchanged.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Snapshot index {index} out of range (history has {len} entries)")]
    SnapshotOutOfRange { index: usize, len: usize },

    #[error("Snapshot decode was dropped before completing")]
    DecodeCancelled,

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;
