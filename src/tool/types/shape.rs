use std::f32::consts::TAU;

use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::canvas::CanvasCursor;
use crate::geometry::{ShapeKind, ShapeModifiers, ShapeOutline, shape_outline};
use crate::input::{GestureTracker, KeyEvent, PointerEvent};
use crate::raster::Layer;
use crate::tool::descriptor::SHAPE;
use crate::tool::listeners::release;
use crate::tool::{ListenerHandle, ListenerKind, Tool, ToolContext, ToolDescriptor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeSettings {
    pub kind: ShapeKind,
    /// Outline width in px; zero disables the outline
    pub stroke_width: f32,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Rectangle,
            stroke_width: 2.0,
        }
    }
}

impl ShapeSettings {
    pub fn stroke_enabled(&self) -> bool {
        self.stroke_width > 0.0
    }
}

/// Fills `outline` and optionally strokes it. Returns true if anything was painted.
pub fn draw_outline(layer: &mut Layer, outline: &ShapeOutline, stroke_width: f32) -> bool {
    layer.begin_path();
    match outline {
        ShapeOutline::Rect(rect) => layer.rect(rect.min.x, rect.min.y, rect.width(), rect.height()),
        ShapeOutline::Ellipse {
            center,
            radius_x,
            radius_y,
        } => {
            // A unit arc stretched along x.
            layer.save();
            layer.translate(center.x, center.y);
            layer.scale(radius_x / radius_y, 1.0);
            layer.arc(0.0, 0.0, *radius_y, 0.0, TAU);
            layer.close_path();
            layer.restore();
        }
        ShapeOutline::Polygon(vertices) => layer.polygon(vertices),
    }
    let mut drawn = layer.fill();
    if stroke_width > 0.0 {
        layer.save();
        layer.set_line_width(stroke_width);
        drawn |= layer.stroke();
        layer.restore();
    }
    layer.begin_path();
    drawn
}

/// Drag-to-draw rectangles, ellipses and triangles with a live preview.
///
/// Shift makes the shape equilateral and Alt centers it on the anchor;
/// both can change mid-drag.
#[derive(Debug, Default)]
pub struct ShapeTool {
    pub settings: ShapeSettings,
    gesture: GestureTracker,
    pointer: Option<ListenerHandle>,
    keyboard: Option<ListenerHandle>,
    anchor: Pos2,
    last: Pos2,
    modifiers: ShapeModifiers,
    drawn: bool,
}

impl ShapeTool {
    pub fn new(settings: ShapeSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_active()
    }

    pub fn modifiers(&self) -> ShapeModifiers {
        self.modifiers
    }

    /// Outline the current drag would commit.
    pub fn outline(&self) -> ShapeOutline {
        shape_outline(self.settings.kind, self.anchor, self.last, self.modifiers)
    }

    fn redraw(&mut self, ctx: &mut ToolContext<'_>) {
        let outline = self.outline();
        let stroke_width = self.settings.stroke_width;
        let preview = ctx.surface.preview_mut();
        preview.clear();
        self.drawn = !outline.is_empty() && draw_outline(preview, &outline, stroke_width);
    }

    fn on_modifier(&mut self, ctx: &mut ToolContext<'_>, event: &KeyEvent, pressed: bool) -> bool {
        if !self.gesture.is_active() {
            return false;
        }
        match event.key.as_str() {
            "Shift" => self.modifiers.equilateral = pressed,
            "Alt" => self.modifiers.centered = pressed,
            _ => return false,
        }
        self.redraw(ctx);
        true
    }
}

impl Tool for ShapeTool {
    fn descriptor(&self) -> &'static ToolDescriptor {
        &SHAPE
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        self.pointer = Some(ctx.listeners.subscribe(ListenerKind::Pointer));
        ctx.set_cursor(CanvasCursor::Crosshair);
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        if self.gesture.is_active() {
            self.gesture.cancel();
            ctx.surface.clear_preview();
            self.drawn = false;
        }
        release(ctx.listeners, &mut self.keyboard);
        release(ctx.listeners, &mut self.pointer);
        ctx.set_cursor(CanvasCursor::Default);
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        if !self.gesture.begin(event) {
            return;
        }
        self.anchor = event.pos;
        self.last = event.pos;
        // Modifiers already held at the press apply from the start.
        self.modifiers = ShapeModifiers::new(event.modifiers.shift, event.modifiers.alt);
        self.drawn = false;
        self.keyboard = Some(ctx.listeners.subscribe(ListenerKind::Keyboard));
        ctx.surface.clear_preview();
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        if !self.gesture.matches(event) {
            return;
        }
        self.last = event.pos;
        self.redraw(ctx);
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        if !self.gesture.end(event) {
            return;
        }
        release(ctx.listeners, &mut self.keyboard);
        if event.pos != self.last {
            self.last = event.pos;
            self.redraw(ctx);
        }
        ctx.surface.commit_preview();
        if self.drawn {
            ctx.commit();
        }
        self.drawn = false;
    }

    fn on_key_down(&mut self, ctx: &mut ToolContext<'_>, event: &KeyEvent) -> bool {
        self.on_modifier(ctx, event, true)
    }

    fn on_key_up(&mut self, ctx: &mut ToolContext<'_>, event: &KeyEvent) -> bool {
        self.on_modifier(ctx, event, false)
    }
}
