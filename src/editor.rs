use image::RgbaImage;

use crate::canvas::{CanvasSurface, ExportedImage};
use crate::color::{AppColorState, ColorProperty, Hsl, PickerMode, hue_from_picker};
use crate::config::EditorConfig;
use crate::error::CanvasResult;
use crate::event::{EditorEvent, EventBus, EventHandler};
use crate::geometry::{ShapeKind, StampShape};
use crate::history::{HistoryManager, InlineDecoder, SnapshotDecoder, ThreadDecoder};
use crate::input::{KeyEvent, PointerEvent};
use crate::raster::FontSpec;
use crate::tool::descriptor::{BRUSH, ERASER, SHAPE, TEXT};
use crate::tool::{
    KeyOutcome, ListenerRegistry, Shortcuts, StampSettings, TextOverlay, ToolContext,
    ToolRegistry, ToolType,
};

/// One editing session: the canvas, its history, the colors and the tools.
///
/// Frontends feed input through the `pointer_*`/`key_*`/`text_input`
/// methods and render [`Editor::surface`].
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    surface: CanvasSurface,
    history: HistoryManager,
    colors: AppColorState,
    listeners: ListenerRegistry,
    shortcuts: Shortcuts,
    events: EventBus,
    registry: ToolRegistry,
}

impl Editor {
    pub fn new(config: EditorConfig) -> CanvasResult<Self> {
        let decoder: Box<dyn SnapshotDecoder> = if config.threaded_decode {
            Box::new(ThreadDecoder)
        } else {
            Box::new(InlineDecoder)
        };
        Self::with_decoder(config, decoder)
    }

    pub fn with_decoder(
        config: EditorConfig,
        decoder: Box<dyn SnapshotDecoder>,
    ) -> CanvasResult<Self> {
        let mut surface = CanvasSurface::new(config.canvas_width, config.canvas_height);
        surface.set_font(config.font.clone());
        let colors = config.colors.clone();
        surface.set_fill_color(colors.fill.to_rgba());
        surface.set_stroke_color(colors.stroke.to_rgba());
        let history = HistoryManager::with_decoder(&surface, decoder)?;
        let registry = ToolRegistry::new(&config);
        let mut editor = Self {
            config,
            surface,
            history,
            colors,
            listeners: ListenerRegistry::default(),
            shortcuts: Shortcuts::default(),
            events: EventBus::new(),
            registry,
        };
        let initial = editor.config.initial_tool.clone();
        if !editor.set_active_tool(&initial) {
            editor.set_active_tool(BRUSH.id);
        }
        log::info!(
            "Editor ready: {}x{} canvas",
            editor.surface.width(),
            editor.surface.height()
        );
        Ok(editor)
    }

    /// Runs `f` with the registry and a context over the rest of the session.
    fn with_tools<R>(&mut self, f: impl FnOnce(&mut ToolRegistry, &mut ToolContext<'_>) -> R) -> R {
        let mut ctx = ToolContext {
            surface: &mut self.surface,
            history: &mut self.history,
            colors: &mut self.colors,
            listeners: &mut self.listeners,
            shortcuts: &mut self.shortcuts,
            events: &self.events,
        };
        f(&mut self.registry, &mut ctx)
    }

    fn emit_history(&self) {
        self.events.emit(EditorEvent::HistoryChanged {
            cursor: self.history.cursor(),
            len: self.history.len(),
        });
    }

    fn record(&mut self) -> CanvasResult<()> {
        self.history.push(&self.surface)?;
        self.emit_history();
        Ok(())
    }

    // --- accessors ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn surface(&self) -> &CanvasSurface {
        &self.surface
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn colors(&self) -> &AppColorState {
        &self.colors
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn active_tool_id(&self) -> Option<&'static str> {
        self.registry.active_id()
    }

    pub fn shortcuts_suspended(&self) -> bool {
        self.shortcuts.is_suspended()
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.events.subscribe(handler);
    }

    /// The open text box, if the text tool is editing.
    pub fn text_overlay(&self) -> Option<&TextOverlay> {
        match self.registry.get(TEXT.id) {
            Some(ToolType::Text(tool)) => tool.overlay(),
            _ => None,
        }
    }

    /// The settings in effect, including edits made since startup.
    pub fn current_config(&self) -> EditorConfig {
        let mut config = self.config.clone();
        config.canvas_width = self.surface.width();
        config.canvas_height = self.surface.height();
        config.font = self.surface.font().clone();
        config.colors = self.colors.clone();
        if let Some(ToolType::Brush(tool)) = self.registry.get(BRUSH.id) {
            config.brush = tool.settings.clone();
        }
        if let Some(ToolType::Eraser(tool)) = self.registry.get(ERASER.id) {
            config.eraser = tool.settings.clone();
        }
        if let Some(ToolType::Shape(tool)) = self.registry.get(SHAPE.id) {
            config.shape = tool.settings.clone();
        }
        if let Some(id) = self.active_tool_id() {
            config.initial_tool = id.to_owned();
        }
        config
    }

    // --- input ---

    pub fn set_active_tool(&mut self, id: &str) -> bool {
        self.with_tools(|registry, ctx| registry.set_active(id, ctx))
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) {
        self.with_tools(|registry, ctx| registry.pointer_down(ctx, event));
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) {
        self.with_tools(|registry, ctx| registry.pointer_move(ctx, event));
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) {
        self.with_tools(|registry, ctx| registry.pointer_up(ctx, event));
    }

    /// Handles a key press. Returns true if anything used it.
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        let outcome = self.with_tools(|registry, ctx| registry.key_down(ctx, event));
        // Boundary errors are already logged by the history.
        match outcome {
            KeyOutcome::Undo => self.undo().is_ok(),
            KeyOutcome::Redo => self.redo().is_ok(),
            KeyOutcome::Ignored => false,
            KeyOutcome::Consumed | KeyOutcome::ToolSwitched => true,
        }
    }

    pub fn key_up(&mut self, event: &KeyEvent) -> bool {
        self.with_tools(|registry, ctx| registry.key_up(ctx, event))
    }

    pub fn text_input(&mut self, text: &str) {
        self.with_tools(|registry, ctx| registry.text_input(ctx, text));
    }

    // --- history ---

    pub fn undo(&mut self) -> CanvasResult<()> {
        self.history.undo()?;
        self.poll_history()?;
        self.emit_history();
        Ok(())
    }

    pub fn redo(&mut self) -> CanvasResult<()> {
        self.history.redo()?;
        self.poll_history()?;
        self.emit_history();
        Ok(())
    }

    /// Applies a finished undo/redo decode. Returns whether the canvas changed.
    pub fn poll_history(&mut self) -> CanvasResult<bool> {
        self.history.apply_ready(&mut self.surface)
    }

    /// Blocks until a pending undo/redo is on the canvas.
    pub fn wait_for_history(&mut self) -> CanvasResult<bool> {
        self.history.wait_for_reload(&mut self.surface)
    }

    // --- canvas ---

    /// Clears the canvas to white as an undoable edit.
    pub fn reset(&mut self) -> CanvasResult<()> {
        self.surface.reset();
        self.events.emit(EditorEvent::CanvasReset);
        self.record()
    }

    /// Decodes an image file and replaces the canvas with it.
    pub fn import_image(&mut self, bytes: &[u8]) -> CanvasResult<()> {
        let image = image::load_from_memory(bytes)?.into_rgba8();
        self.import_rgba(&image)
    }

    pub fn import_rgba(&mut self, image: &RgbaImage) -> CanvasResult<()> {
        self.surface.import(image);
        self.events.emit(EditorEvent::ImageImported {
            width: image.width(),
            height: image.height(),
        });
        self.record()
    }

    pub fn export(&self, format: &str, transparent: bool) -> CanvasResult<ExportedImage> {
        match self.surface.export(format, transparent) {
            Ok(exported) => {
                self.events.emit(EditorEvent::Exported {
                    file_name: exported.file_name.clone(),
                });
                Ok(exported)
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                Err(e)
            }
        }
    }

    // --- colors ---

    pub fn set_color(&mut self, property: ColorProperty, color: Hsl) {
        self.with_tools(|_, ctx| ctx.set_color(property, color));
    }

    /// Applies a 2-D picker position to the selected color.
    pub fn set_color_by_percentages(&mut self, sat: f32, val: f32) -> Hsl {
        let property = self.colors.selected;
        let color = self.colors.set_by_percentages(property, sat, val);
        self.set_color(property, color);
        color
    }

    /// Applies a hue-strip position to the selected color.
    pub fn set_hue_from_picker(&mut self, fraction: f32) -> Hsl {
        let property = self.colors.selected;
        let current = self.colors.get(property);
        let color = Hsl::new(hue_from_picker(fraction), current.s, current.l);
        self.set_color(property, color);
        self.colors.get(property)
    }

    pub fn swap_colors(&mut self) {
        self.colors.swap();
        let (fill, stroke) = (self.colors.fill, self.colors.stroke);
        self.with_tools(|_, ctx| {
            ctx.set_color(ColorProperty::Fill, fill);
            ctx.set_color(ColorProperty::Stroke, stroke);
        });
    }

    pub fn select_color_property(&mut self, property: ColorProperty) {
        self.colors.selected = property;
    }

    pub fn set_picker_mode(&mut self, mode: PickerMode) {
        self.colors.picker_mode = mode;
    }

    // --- tool settings ---

    pub fn stamp_settings_mut(&mut self, tool_id: &str) -> Option<&mut StampSettings> {
        self.registry.get_mut(tool_id)?.stamp_settings_mut()
    }

    /// Sets the brush stamp by name. Unknown names are no match.
    pub fn set_brush_shape(&mut self, name: &str) -> bool {
        let Some(shape) = StampShape::from_name(name) else {
            log::warn!("Unknown brush shape: {}", name);
            return false;
        };
        match self.stamp_settings_mut(BRUSH.id) {
            Some(settings) => {
                settings.shape = shape;
                true
            }
            None => false,
        }
    }

    pub fn set_brush_size(&mut self, size: f32) {
        if let Some(settings) = self.stamp_settings_mut(BRUSH.id) {
            settings.size = size.max(1.0);
        }
    }

    pub fn set_eraser_size(&mut self, size: f32) {
        if let Some(settings) = self.stamp_settings_mut(ERASER.id) {
            settings.size = size.max(1.0);
        }
    }

    /// Sets the shape tool's kind by name. Unknown names are no match.
    pub fn set_shape_kind(&mut self, name: &str) -> bool {
        let Some(kind) = ShapeKind::from_name(name) else {
            log::warn!("Unknown shape kind: {}", name);
            return false;
        };
        match self.registry.get_mut(SHAPE.id) {
            Some(ToolType::Shape(tool)) => {
                tool.settings.kind = kind;
                true
            }
            _ => false,
        }
    }

    pub fn set_shape_stroke_width(&mut self, width: f32) {
        if let Some(ToolType::Shape(tool)) = self.registry.get_mut(SHAPE.id) {
            tool.settings.stroke_width = width.max(0.0);
        }
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.surface.set_font(font);
    }
}
