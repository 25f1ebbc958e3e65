use eframe::egui;

use crate::tool::ToolDescriptor;

/// Square toolbar button showing a tool's shortcut key.
pub struct ToolButton {
    pub descriptor: &'static ToolDescriptor,
    pub selected: bool,
}

impl ToolButton {
    pub fn new(descriptor: &'static ToolDescriptor, selected: bool) -> Self {
        Self {
            descriptor,
            selected,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(32.0, 32.0);
        let (rect, response) = ui.allocate_exact_size(button_size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                egui::Color32::from_rgb(100, 181, 246) // Light blue when selected
            } else if response.hovered() {
                egui::Color32::from_gray(40)
            } else {
                egui::Color32::from_gray(30)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let text_color = if self.selected {
                egui::Color32::BLACK
            } else {
                egui::Color32::WHITE
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.descriptor.shortcut.to_uppercase(),
                egui::FontId::proportional(18.0),
                text_color,
            );

            if self.selected {
                ui.painter().rect_stroke(
                    rect,
                    4.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(33, 150, 243)),
                );
            }
        }

        response.on_hover_text(format!(
            "{} ({})",
            self.descriptor.display_name, self.descriptor.shortcut
        ))
    }
}
