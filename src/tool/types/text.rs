use egui::{PointerButton, Pos2};

use crate::canvas::CanvasCursor;
use crate::color::Hsl;
use crate::event::EditorEvent;
use crate::input::{KeyEvent, PointerEvent};
use crate::raster::FontSpec;
use crate::tool::descriptor::TEXT;
use crate::tool::listeners::release;
use crate::tool::{ListenerHandle, ListenerKind, Tool, ToolContext, ToolDescriptor};

/// The editable text box shown while typing.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    /// Top-left of the first line, in canvas px
    pub origin: Pos2,
    pub text: String,
    pub color: Hsl,
    pub font: FontSpec,
}

impl TextOverlay {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Click to place a text box, type, then press Escape or click again to
/// bake the text into the canvas.
#[derive(Debug, Default)]
pub struct TextTool {
    pointer: Option<ListenerHandle>,
    keyboard: Option<ListenerHandle>,
    editing: Option<TextOverlay>,
}

impl TextTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&self) -> Option<&TextOverlay> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn begin(&mut self, ctx: &mut ToolContext<'_>, at: Pos2) {
        ctx.shortcuts.suspend();
        self.keyboard = Some(ctx.listeners.subscribe(ListenerKind::Keyboard));
        let font = ctx.surface.font().clone();
        // Center the first line box on the click.
        let origin = Pos2::new(at.x, at.y - font.line_height_px() / 2.0);
        self.editing = Some(TextOverlay {
            origin,
            text: String::new(),
            color: ctx.colors.fill,
            font,
        });
        ctx.events.emit(EditorEvent::TextEditingStarted { origin });
    }

    /// Closes the overlay, rasterizing its text unless it is blank.
    pub fn commit(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(overlay) = self.editing.take() else {
            return;
        };
        let committed = !overlay.is_blank();
        if committed {
            let lines: Vec<&str> = overlay.lines().collect();
            ctx.surface.main_mut().save();
            ctx.surface.main_mut().set_fill_color(overlay.color.to_rgba());
            ctx.surface.draw_text_lines(&lines, overlay.origin);
            ctx.surface.main_mut().restore();
            ctx.commit();
        }
        release(ctx.listeners, &mut self.keyboard);
        ctx.shortcuts.resume();
        ctx.events.emit(EditorEvent::TextEditingFinished { committed });
    }
}

impl Tool for TextTool {
    fn descriptor(&self) -> &'static ToolDescriptor {
        &TEXT
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        self.pointer = Some(ctx.listeners.subscribe(ListenerKind::Pointer));
        ctx.set_cursor(CanvasCursor::Text);
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.commit(ctx);
        release(ctx.listeners, &mut self.pointer);
        ctx.set_cursor(CanvasCursor::Default);
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        if event.button != PointerButton::Primary {
            return;
        }
        // A click outside the box blurs it.
        if self.editing.is_some() {
            self.commit(ctx);
        } else {
            self.begin(ctx, event.pos);
        }
    }

    fn on_key_down(&mut self, ctx: &mut ToolContext<'_>, event: &KeyEvent) -> bool {
        let Some(overlay) = self.editing.as_mut() else {
            return false;
        };
        match event.key.as_str() {
            "Escape" => self.commit(ctx),
            "Enter" => overlay.text.push('\n'),
            "Backspace" => {
                overlay.text.pop();
            }
            _ => {}
        }
        true
    }

    fn on_key_up(&mut self, _ctx: &mut ToolContext<'_>, _event: &KeyEvent) -> bool {
        self.editing.is_some()
    }

    fn on_text_input(&mut self, _ctx: &mut ToolContext<'_>, text: &str) {
        if let Some(overlay) = self.editing.as_mut() {
            overlay.text.extend(text.chars().filter(|c| !c.is_control()));
        }
    }
}
