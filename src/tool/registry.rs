use crate::config::EditorConfig;
use crate::event::EditorEvent;
use crate::input::{KeyEvent, PointerEvent};

use super::types::{
    EyeDropperTool, FillTool, HandTool, ShapeTool, StampingDrawTool, TextTool, ZoomTool,
};
use super::{ListenerKind, Tool, ToolContext, ToolDescriptor, ToolType};

/// What a key press turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The active tool consumed it
    Consumed,
    /// It switched the active tool
    ToolSwitched,
    Undo,
    Redo,
    /// No tool or shortcut matched
    Ignored,
}

/// The editor's tools and which one is active.
#[derive(Debug)]
pub struct ToolRegistry {
    tools: Vec<ToolType>,
    active: Option<usize>,
}

impl ToolRegistry {
    /// Builds every tool, in toolbar order. Nothing is active yet.
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            tools: vec![
                ToolType::Hand(HandTool),
                ToolType::EyeDropper(EyeDropperTool::default()),
                ToolType::Brush(StampingDrawTool::brush(config.brush.clone())),
                ToolType::Eraser(StampingDrawTool::eraser(config.eraser.clone())),
                ToolType::Fill(FillTool::default()),
                ToolType::Shape(ShapeTool::new(config.shape.clone())),
                ToolType::Text(TextTool::new()),
                ToolType::Zoom(ZoomTool),
            ],
            active: None,
        }
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'static ToolDescriptor> + '_ {
        self.tools.iter().map(|tool| tool.descriptor())
    }

    pub fn get(&self, id: &str) -> Option<&ToolType> {
        self.tools.iter().find(|tool| tool.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ToolType> {
        self.tools.iter_mut().find(|tool| tool.id() == id)
    }

    pub fn active(&self) -> Option<&ToolType> {
        self.active.map(|i| &self.tools[i])
    }

    pub fn active_id(&self) -> Option<&'static str> {
        self.active().map(|tool| tool.id())
    }

    /// Deactivates the current tool and activates `id`.
    ///
    /// Unknown ids are no match and leave the active tool in place.
    pub fn set_active(&mut self, id: &str, ctx: &mut ToolContext<'_>) -> bool {
        let Some(index) = self.tools.iter().position(|tool| tool.id() == id) else {
            log::warn!("Unknown tool id: {}", id);
            return false;
        };
        if self.active == Some(index) {
            return true;
        }
        let old = self.deactivate(ctx);
        let tool = &mut self.tools[index];
        tool.activate(ctx);
        self.active = Some(index);
        let new = tool.id();
        log::info!("Tool changed: {:?} -> {}", old, new);
        ctx.events.emit(EditorEvent::ToolActivated { tool_id: new });
        ctx.events.emit(EditorEvent::ToolChanged { old, new });
        true
    }

    /// Deactivates the active tool, if any, returning its id.
    pub fn deactivate(&mut self, ctx: &mut ToolContext<'_>) -> Option<&'static str> {
        let index = self.active.take()?;
        let tool = &mut self.tools[index];
        tool.deactivate(ctx);
        let leftover = ctx.listeners.clear();
        if leftover > 0 {
            log::warn!("{} left {} listener(s) subscribed", tool.id(), leftover);
        }
        ctx.events.emit(EditorEvent::ToolDeactivated { tool_id: tool.id() });
        Some(tool.id())
    }

    fn active_mut(&mut self) -> Option<&mut ToolType> {
        self.active.map(|i| &mut self.tools[i])
    }

    pub fn pointer_down(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        if !ctx.listeners.is_subscribed(ListenerKind::Pointer) {
            return;
        }
        if let Some(tool) = self.active_mut() {
            tool.on_pointer_down(ctx, event);
        }
    }

    pub fn pointer_move(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        if !ctx.listeners.is_subscribed(ListenerKind::Pointer) {
            return;
        }
        if let Some(tool) = self.active_mut() {
            tool.on_pointer_move(ctx, event);
        }
    }

    pub fn pointer_up(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        if !ctx.listeners.is_subscribed(ListenerKind::Pointer) {
            return;
        }
        if let Some(tool) = self.active_mut() {
            tool.on_pointer_up(ctx, event);
        }
    }

    /// Routes a key press: first to a tool listening to the keyboard, then
    /// to the global shortcuts unless they are suspended.
    pub fn key_down(&mut self, ctx: &mut ToolContext<'_>, event: &KeyEvent) -> KeyOutcome {
        if ctx.listeners.is_subscribed(ListenerKind::Keyboard) {
            if let Some(tool) = self.active_mut() {
                if tool.on_key_down(ctx, event) {
                    return KeyOutcome::Consumed;
                }
            }
        }
        if ctx.shortcuts.is_suspended() {
            return KeyOutcome::Ignored;
        }
        if event.command() {
            return match event.key.to_lowercase().as_str() {
                "z" if event.shift => KeyOutcome::Redo,
                "z" => KeyOutcome::Undo,
                "y" => KeyOutcome::Redo,
                _ => KeyOutcome::Ignored,
            };
        }
        if event.alt {
            return KeyOutcome::Ignored;
        }
        let key = event.key.to_lowercase();
        let target = self
            .descriptors()
            .find(|descriptor| descriptor.shortcut == key)
            .map(|descriptor| descriptor.id);
        match target {
            Some(id) => {
                self.set_active(id, ctx);
                KeyOutcome::ToolSwitched
            }
            None => KeyOutcome::Ignored,
        }
    }

    pub fn key_up(&mut self, ctx: &mut ToolContext<'_>, event: &KeyEvent) -> bool {
        if !ctx.listeners.is_subscribed(ListenerKind::Keyboard) {
            return false;
        }
        self.active_mut()
            .is_some_and(|tool| tool.on_key_up(ctx, event))
    }

    pub fn text_input(&mut self, ctx: &mut ToolContext<'_>, text: &str) {
        if !ctx.listeners.is_subscribed(ListenerKind::Keyboard) {
            return;
        }
        if let Some(tool) = self.active_mut() {
            tool.on_text_input(ctx, text);
        }
    }
}
