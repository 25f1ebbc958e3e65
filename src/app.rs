use eframe::egui;
use egui::{Color32, CursorIcon, Pos2, Rect, Sense, Vec2};

use crate::canvas::CanvasCursor;
use crate::color::{ColorProperty, Hsl, PickerMode};
use crate::components::ToolButton;
use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::error::CanvasResult;
use crate::file_handler::FileHandler;
use crate::geometry::{ShapeKind, StampShape};
use crate::input::{KeyEvent, PointerEvent};
use crate::texture_manager::TextureManager;
use crate::tool::ToolType;
use crate::tool::descriptor::{BRUSH, ERASER, SHAPE};

/// Mouse input always comes from one pointer.
const MOUSE_POINTER_ID: u64 = 1;

fn cursor_icon(cursor: CanvasCursor) -> CursorIcon {
    match cursor {
        CanvasCursor::Default => CursorIcon::Default,
        CanvasCursor::Crosshair => CursorIcon::Crosshair,
        CanvasCursor::Pick => CursorIcon::Cell,
        CanvasCursor::Text => CursorIcon::Text,
        CanvasCursor::ZoomIn => CursorIcon::ZoomIn,
    }
}

fn color32(color: Hsl) -> Color32 {
    let rgba = color.to_rgba();
    Color32::from_rgb(rgba[0], rgba[1], rgba[2])
}

/// Positions of the hue strip and saturation/value area.
#[derive(Debug, Clone, Copy, Default)]
struct PickerState {
    hue: f32,
    sat: f32,
    val: f32,
}

/// The eframe shell around an [`Editor`].
pub struct PaintApp {
    editor: Editor,
    textures: TextureManager,
    file_handler: FileHandler,
    picker: PickerState,
    export_transparent: bool,
    modifiers: egui::Modifiers,
    status: String,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> CanvasResult<Self> {
        let config: EditorConfig = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Ok(Self::with_editor(Editor::new(config)?))
    }

    pub fn with_editor(editor: Editor) -> Self {
        Self {
            editor,
            textures: TextureManager::new(),
            file_handler: FileHandler::new(),
            picker: PickerState::default(),
            export_transparent: false,
            modifiers: egui::Modifiers::NONE,
            status: String::new(),
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    fn report<T>(&mut self, what: &str, result: CanvasResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("{} failed: {}", what, e);
                self.status = format!("{}: {}", what, e);
                None
            }
        }
    }

    fn export(&mut self, format: &str) {
        let result = self.editor.export(format, self.export_transparent);
        let Some(exported) = self.report("Export", result) else {
            return;
        };
        #[cfg(not(target_arch = "wasm32"))]
        {
            match std::fs::write(&exported.file_name, &exported.bytes) {
                Ok(()) => self.status = format!("Saved {}", exported.file_name),
                Err(e) => {
                    log::error!("Failed to write {}: {}", exported.file_name, e);
                    self.status = format!("Could not save {}: {}", exported.file_name, e);
                }
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        for dropped in self.file_handler.take_dropped_images(ctx) {
            let result = self.editor.import_image(&dropped.bytes);
            if self.report("Import", result).is_some() {
                self.status = format!("Opened {}", dropped.name);
            }
        }
    }

    /// Feeds keyboard input to the editor unless an egui widget has focus.
    fn handle_keyboard(&mut self, ctx: &egui::Context, events: &[egui::Event]) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let modifiers = ctx.input(|i| i.modifiers);
        // egui reports modifiers as state; the tools want key events.
        for (name, before, now) in [
            ("Shift", self.modifiers.shift, modifiers.shift),
            ("Alt", self.modifiers.alt, modifiers.alt),
        ] {
            let event = KeyEvent::new(name).with_modifiers(modifiers);
            match (before, now) {
                (false, true) => {
                    self.editor.key_down(&event);
                }
                (true, false) => {
                    self.editor.key_up(&event);
                }
                _ => {}
            }
        }
        self.modifiers = modifiers;

        for event in events {
            match event {
                egui::Event::Key {
                    key,
                    pressed,
                    modifiers,
                    ..
                } => {
                    let event = KeyEvent::from_egui(*key, *modifiers);
                    if *pressed {
                        self.editor.key_down(&event);
                    } else {
                        self.editor.key_up(&event);
                    }
                }
                egui::Event::Text(text) => self.editor.text_input(text),
                _ => {}
            }
        }
    }

    /// Translates egui pointer events over the canvas into editor events.
    fn handle_pointer(&mut self, events: &[egui::Event], canvas: Rect, hovered: bool) {
        let to_canvas = |pos: Pos2| {
            PointerEvent::new(pos.x - canvas.min.x, pos.y - canvas.min.y).with_id(MOUSE_POINTER_ID)
        };
        for event in events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    modifiers,
                } => {
                    let event = to_canvas(*pos).with_button(*button).with_modifiers(*modifiers);
                    if *pressed {
                        if hovered && canvas.contains(*pos) {
                            self.editor.pointer_down(&event);
                        }
                    } else {
                        self.editor.pointer_up(&event);
                    }
                }
                egui::Event::PointerMoved(pos) => self.editor.pointer_move(&to_canvas(*pos)),
                _ => {}
            }
        }
    }

    fn tools_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tools");
        let active = self.editor.active_tool_id();
        let descriptors: Vec<_> = self.editor.registry().descriptors().collect();
        ui.horizontal_wrapped(|ui| {
            for descriptor in descriptors {
                let selected = active == Some(descriptor.id);
                if ToolButton::new(descriptor, selected).show(ui).clicked() {
                    log::info!("Tool selected from UI: {}", descriptor.id);
                    self.editor.set_active_tool(descriptor.id);
                }
            }
        });
        ui.separator();

        ui.horizontal(|ui| {
            let history = self.editor.history();
            let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
            if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                let result = self.editor.undo();
                self.report("Undo", result);
            }
            if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                let result = self.editor.redo();
                self.report("Redo", result);
            }
            if ui.button("Reset").clicked() {
                let result = self.editor.reset();
                self.report("Reset", result);
            }
        });
        let history = self.editor.history();
        ui.label(format!("History: {} / {}", history.cursor() + 1, history.len()));
        ui.separator();

        self.color_section(ui);
        ui.separator();
        self.settings_section(ui);
        ui.separator();

        ui.heading("Export");
        ui.checkbox(&mut self.export_transparent, "Transparent background (PNG)");
        ui.horizontal(|ui| {
            if ui.button("JPEG").clicked() {
                self.export("jpeg");
            }
            if ui.button("PNG").clicked() {
                self.export("png");
            }
        });
        if !self.status.is_empty() {
            ui.separator();
            ui.label(&self.status);
        }
    }

    fn color_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Colors");
        let colors = self.editor.colors().clone();
        let mut selected = colors.selected;
        ui.horizontal(|ui| {
            for (property, label, color) in [
                (ColorProperty::Stroke, "Stroke", colors.stroke),
                (ColorProperty::Fill, "Fill", colors.fill),
            ] {
                let (rect, _) = ui.allocate_exact_size(Vec2::splat(16.0), Sense::hover());
                ui.painter().rect_filled(rect, 2.0, color32(color));
                ui.radio_value(&mut selected, property, label)
                    .on_hover_text(color.to_string());
            }
            if ui.button("Swap").clicked() {
                self.editor.swap_colors();
            }
        });
        if selected != colors.selected {
            self.editor.select_color_property(selected);
        }

        let mut mode = colors.picker_mode;
        ui.horizontal(|ui| {
            ui.radio_value(&mut mode, PickerMode::Hsb, "HSB");
            ui.radio_value(&mut mode, PickerMode::Hsl, "HSL");
        });
        if mode != colors.picker_mode {
            self.editor.set_picker_mode(mode);
        }

        if ui
            .add(egui::Slider::new(&mut self.picker.hue, 0.0..=1.0).text("Hue"))
            .changed()
        {
            self.editor.set_hue_from_picker(self.picker.hue);
        }
        let sat = ui.add(egui::Slider::new(&mut self.picker.sat, 0.0..=1.0).text("Saturation"));
        let val = ui.add(egui::Slider::new(&mut self.picker.val, 0.0..=1.0).text("Value"));
        if sat.changed() || val.changed() {
            self.editor
                .set_color_by_percentages(self.picker.sat, self.picker.val);
        }
    }

    fn settings_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Brush");
        let brush = match self.editor.registry().get(BRUSH.id) {
            Some(ToolType::Brush(tool)) => Some(tool.settings.clone()),
            _ => None,
        };
        if let Some(brush) = brush {
            let mut shape = brush.shape;
            egui::ComboBox::from_label("Stamp")
                .selected_text(shape.name())
                .show_ui(ui, |ui| {
                    for option in StampShape::ALL {
                        ui.selectable_value(&mut shape, option, option.name());
                    }
                });
            if shape != brush.shape {
                self.editor.set_brush_shape(shape.name());
            }
            let mut size = brush.size;
            if ui.add(egui::Slider::new(&mut size, 1.0..=100.0).text("Size")).changed() {
                self.editor.set_brush_size(size);
            }
        }
        let eraser = match self.editor.registry().get(ERASER.id) {
            Some(ToolType::Eraser(tool)) => Some(tool.settings.size),
            _ => None,
        };
        if let Some(mut size) = eraser {
            if ui.add(egui::Slider::new(&mut size, 1.0..=100.0).text("Eraser")).changed() {
                self.editor.set_eraser_size(size);
            }
        }

        ui.heading("Shape");
        let shape = match self.editor.registry().get(SHAPE.id) {
            Some(ToolType::Shape(tool)) => Some(tool.settings.clone()),
            _ => None,
        };
        if let Some(settings) = shape {
            let mut kind = settings.kind;
            egui::ComboBox::from_label("Kind")
                .selected_text(kind.name())
                .show_ui(ui, |ui| {
                    for option in ShapeKind::ALL {
                        ui.selectable_value(&mut kind, option, option.name());
                    }
                });
            if kind != settings.kind {
                self.editor.set_shape_kind(kind.name());
            }
            let mut width = settings.stroke_width;
            if ui
                .add(egui::Slider::new(&mut width, 0.0..=20.0).text("Outline"))
                .changed()
            {
                self.editor.set_shape_stroke_width(width);
            }
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui, events: &[egui::Event]) {
        let surface = self.editor.surface();
        let size = Vec2::new(surface.width() as f32, surface.height() as f32);
        let (main, preview) = self.textures.update(ui.ctx(), surface);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        let painter = ui.painter_at(rect);
        painter.image(main, rect, uv, Color32::WHITE);
        painter.image(preview, rect, uv, Color32::WHITE);

        if let Some(overlay) = self.editor.text_overlay() {
            let font = egui::FontId::proportional(overlay.font.size);
            let step = overlay.font.line_height_px();
            let origin = rect.min + overlay.origin.to_vec2();
            let mut caret = origin;
            for (i, line) in overlay.lines().enumerate() {
                let at = origin + Vec2::new(0.0, i as f32 * step);
                let galley = painter.layout_no_wrap(line.to_owned(), font.clone(), color32(overlay.color));
                caret = at + Vec2::new(galley.size().x, 0.0);
                painter.galley(at, galley, Color32::WHITE);
            }
            painter.line_segment(
                [caret, caret + Vec2::new(0.0, step)],
                egui::Stroke::new(1.0, Color32::GRAY),
            );
        }

        let hovered = response.hovered();
        let cursor = cursor_icon(self.editor.surface().cursor());
        response.on_hover_cursor(cursor);
        self.handle_pointer(events, rect, hovered);
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.editor.current_config());
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.editor.poll_history() {
            Ok(_) => {}
            Err(e) => log::error!("Failed to reload history snapshot: {}", e),
        }
        if self.editor.history().is_reloading() {
            ctx.request_repaint();
        }

        self.handle_dropped_files(ctx);
        let events = ctx.input(|i| i.events.clone());
        self.handle_keyboard(ctx, &events);

        egui::SidePanel::left("tools_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.tools_panel(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| self.canvas(ui, &events));
        });

        self.file_handler.preview_files_being_dropped(ctx);
    }
}
