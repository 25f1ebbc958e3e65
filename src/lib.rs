#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod color;
pub mod components;
pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod file_handler;
pub mod geometry;
pub mod history;
pub mod input;
pub mod raster;
pub mod texture_manager;
pub mod tool;

pub use app::PaintApp;
pub use canvas::{CanvasCursor, CanvasSurface, ExportFormat, ExportedImage};
pub use color::{AppColorState, ColorProperty, Hsl, PickerMode};
pub use config::{ConfigError, EditorConfig};
pub use editor::Editor;
pub use error::{CanvasError, CanvasResult};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use history::HistoryManager;
pub use input::{KeyEvent, PointerEvent, PointerType};
pub use tool::{Tool, ToolRegistry, ToolType};
