// Controller manager column

use crate::gui::ShinyHunterGui;
use crate::gui::widgets::{self, GREEN, RED, YELLOW};
use eframe::egui;
use shiny_hunter::state::{Command, RepeatStatus};

impl ShinyHunterGui {
    pub(super) fn render_controller_panel(&mut self, ui: &mut egui::Ui) {
        widgets::section_heading(ui, "Controller Manager");
        ui.separator();

        self.render_controller_states(ui);
        ui.separator();

        self.render_repeat_section(ui);
        ui.separator();

        self.render_macro_section(ui);
    }

    fn render_controller_states(&mut self, ui: &mut egui::Ui) {
        widgets::section_heading(ui, "Controller Status");

        let (physical_text, physical_color) = if self.app_state.is_physical_connected() {
            ("Connected!", GREEN)
        } else {
            ("Disconnected!", RED)
        };
        widgets::centered_text(ui, "Physical Controller:", Some(physical_color));
        widgets::centered_text(ui, physical_text, Some(physical_color));
        ui.add_space(6.0);

        let (virtual_text, virtual_color) = virtual_status(
            self.app_state.is_virtual_connected(),
            self.app_state.is_physical_connected(),
        );
        widgets::centered_text(ui, "Virtual Controller:", Some(virtual_color));
        widgets::centered_text(ui, virtual_text, Some(virtual_color));
        ui.add_space(6.0);
    }

    fn render_repeat_section(&mut self, ui: &mut egui::Ui) {
        widgets::section_heading(ui, "Automatic Button Press");

        if !self.app_state.is_physical_connected() {
            widgets::centered_text(ui, "Please connect a controller to use this feature.", Some(RED));
            ui.add_space(6.0);
            return;
        }

        let status = self.app_state.repeat_status();
        let label = match status {
            RepeatStatus::Idle => "Engage Automatic Button Press",
            RepeatStatus::Armed | RepeatStatus::Running(_) => "Disengage Automatic Button Press",
        };
        if widgets::centered_button(ui, label) {
            self.app_state.send_command(Command::ToggleRepeat);
        }
        ui.add_space(4.0);

        match status {
            RepeatStatus::Idle => {
                widgets::centered_text(ui, "automatic button press disengaged.", Some(RED));
            }
            RepeatStatus::Armed => {
                widgets::centered_text(
                    ui,
                    "Press any button to start automatic button presses.",
                    Some(YELLOW),
                );
            }
            RepeatStatus::Running(button) => {
                widgets::centered_text(
                    ui,
                    format!("automatic button press engaged! ({})", button),
                    Some(GREEN),
                );
            }
        }
        ui.add_space(6.0);
    }

    fn render_macro_section(&mut self, ui: &mut egui::Ui) {
        widgets::section_heading(ui, "Macros");

        if !self.app_state.is_physical_connected() {
            widgets::centered_text(ui, "Please connect a controller to use this feature.", Some(RED));
            return;
        }

        let recording = self.app_state.is_recording();
        let playing = self.app_state.is_playing();
        let hold = hold_description(self.config.controller.record_hold);

        if !playing {
            let label = if recording {
                "Stop Recording Macro"
            } else {
                "Start Recording Macro"
            };
            if widgets::centered_button(ui, label) {
                self.app_state.send_command(Command::ToggleRecording);
            }
            let action = if recording { "stop" } else { "begin" };
            widgets::hint(
                ui,
                &format!("(Or hold both triggers for {} to {} recording!)", hold, action),
            );
            ui.add_space(4.0);

            let sequence = self.app_state.sequence();
            if recording {
                widgets::centered_text(ui, "Recording macro...", Some(YELLOW));
            } else if sequence.is_empty() {
                widgets::centered_text(ui, "No macro recorded.", Some(RED));
            } else {
                widgets::centered_text(
                    ui,
                    format!(
                        "Macro ready for playback. ({} steps, {:.1} s)",
                        sequence.len(),
                        sequence.duration().as_secs_f32()
                    ),
                    Some(GREEN),
                );
            }
            ui.add_space(6.0);
        }

        if self.app_state.has_sequence() && !recording {
            let label = if playing {
                "Stop Macro Playback"
            } else {
                "Start Macro Playback"
            };
            if widgets::centered_button(ui, label) {
                self.app_state.send_command(Command::TogglePlayback);
            }
            let action = if playing { "stop" } else { "begin" };
            widgets::hint(ui, &format!("(Or press L3 + R3 to {} playback!)", action));
            ui.add_space(4.0);

            if playing {
                widgets::centered_text(ui, "Macro engaged!", Some(GREEN));
            } else {
                widgets::centered_text(ui, "Macro disengaged.", Some(RED));
            }
            ui.add_space(6.0);
        }

        #[cfg(windows)]
        self.render_macro_files(ui, recording || playing);
    }

    #[cfg(windows)]
    fn render_macro_files(&mut self, ui: &mut egui::Ui, busy: bool) {
        use shiny_hunter::sequence::ButtonSequence;

        ui.vertical_centered(|ui| {
            ui.horizontal(|ui| {
                let has_sequence = self.app_state.has_sequence();
                if ui
                    .add_enabled(has_sequence && !busy, egui::Button::new("Save Macro..."))
                    .clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .add_filter("Macro", &["toml"])
                        .set_title("Save Macro")
                        .set_file_name("macro.toml")
                        .save_file()
                {
                    self.macro_file_message = Some(match self.app_state.sequence().save_to_file(&path) {
                        Ok(()) => (format!("Macro saved to {}", path.display()), true),
                        Err(e) => (format!("{:#}", e), false),
                    });
                }

                if ui
                    .add_enabled(!busy, egui::Button::new("Load Macro..."))
                    .clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .add_filter("Macro", &["toml"])
                        .set_title("Load Macro")
                        .pick_file()
                {
                    self.macro_file_message = Some(match ButtonSequence::load_from_file(&path) {
                        Ok(sequence) if self.app_state.replace_sequence(sequence) => {
                            (format!("Macro loaded from {}", path.display()), true)
                        }
                        Ok(_) => ("Macro busy, try again once it stops.".to_string(), false),
                        Err(e) => (format!("{:#}", e), false),
                    });
                }
            });
        });

        if let Some((message, ok)) = &self.macro_file_message {
            widgets::centered_text(ui, message.as_str(), Some(if *ok { GREEN } else { RED }));
        }
    }
}

/// A connected physical pad without a virtual one means plugging in failed.
fn virtual_status(virtual_connected: bool, physical_connected: bool) -> (&'static str, egui::Color32) {
    match (virtual_connected, physical_connected) {
        (true, _) => ("Connected!", GREEN),
        (false, true) => ("Failed to create virtual controller! See the log.", RED),
        (false, false) => ("Waiting for Physical Controller...", RED),
    }
}

/// "1 second", "2 seconds" or "1500 ms".
fn hold_description(hold_ms: u64) -> String {
    match hold_ms {
        1000 => "1 second".to_string(),
        ms if ms % 1000 == 0 => format!("{} seconds", ms / 1000),
        ms => format!("{} ms", ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_status_texts() {
        assert_eq!(virtual_status(true, true), ("Connected!", GREEN));
        assert_eq!(
            virtual_status(false, false),
            ("Waiting for Physical Controller...", RED)
        );
        let (failed, color) = virtual_status(false, true);
        assert!(failed.starts_with("Failed to create virtual controller"));
        assert_eq!(color, RED);
    }

    #[test]
    fn test_hold_description() {
        assert_eq!(hold_description(1000), "1 second");
        assert_eq!(hold_description(2000), "2 seconds");
        assert_eq!(hold_description(1500), "1500 ms");
    }
}
