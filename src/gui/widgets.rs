//! Small centered widgets shared by both columns.

use eframe::egui;
use shiny_hunter::counter::{Feedback, FeedbackKind, MAX_ENCOUNTERS};

pub const RED: egui::Color32 = egui::Color32::from_rgb(235, 80, 80);
pub const GREEN: egui::Color32 = egui::Color32::from_rgb(90, 210, 110);
pub const YELLOW: egui::Color32 = egui::Color32::from_rgb(240, 210, 70);

/// Stepper bounds. Negative values are allowed so the counter can report them.
const INPUT_LIMIT: i32 = MAX_ENCOUNTERS as i32;

pub fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(text).size(17.0).strong());
    });
    ui.add_space(4.0);
}

pub fn centered_text(ui: &mut egui::Ui, text: impl Into<String>, color: Option<egui::Color32>) {
    let mut rich = egui::RichText::new(text.into());
    if let Some(color) = color {
        rich = rich.color(color);
    }
    ui.vertical_centered(|ui| {
        ui.label(rich);
    });
}

pub fn hint(ui: &mut egui::Ui, text: &str) {
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(text).small().weak());
    });
}

pub fn centered_button(ui: &mut egui::Ui, label: &str) -> bool {
    ui.vertical_centered(|ui| ui.button(label).clicked()).inner
}

pub fn feedback_color(feedback: &Feedback) -> egui::Color32 {
    match feedback.kind {
        FeedbackKind::Invalid => RED,
        FeedbackKind::Ok | FeedbackKind::Capped => GREEN,
    }
}

pub fn feedback(ui: &mut egui::Ui, feedback: &Feedback) {
    centered_text(ui, feedback.message.as_str(), Some(feedback_color(feedback)));
}

/// `-` / value / `+` row, centered, clamped to ±999999.
pub fn centered_stepper(ui: &mut egui::Ui, id: &str, value: &mut i32) {
    const INPUT_WIDTH: f32 = 80.0;
    let button_width = ui.spacing().interact_size.y + ui.spacing().button_padding.x * 2.0;
    let total = INPUT_WIDTH + button_width * 2.0 + ui.spacing().item_spacing.x * 2.0;
    let offset = ((ui.available_width() - total) * 0.5).max(0.0);

    ui.push_id(id, |ui| {
        ui.horizontal(|ui| {
            ui.add_space(offset);
            if ui.button("-").clicked() {
                *value = value.saturating_sub(1).max(-INPUT_LIMIT);
            }
            ui.add_sized(
                [INPUT_WIDTH, ui.spacing().interact_size.y],
                egui::DragValue::new(value).range(-INPUT_LIMIT..=INPUT_LIMIT),
            );
            if ui.button("+").clicked() {
                *value = value.saturating_add(1).min(INPUT_LIMIT);
            }
        });
    });
}
