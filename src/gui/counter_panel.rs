// Shiny counter column

use crate::gui::ShinyHunterGui;
use crate::gui::widgets::{self, RED};
use eframe::egui;
use shiny_hunter::counter::Generation;

impl ShinyHunterGui {
    pub(super) fn render_counter_panel(&mut self, ui: &mut egui::Ui) {
        widgets::section_heading(ui, "Shiny Counter");
        ui.separator();

        self.render_generation_input(ui);
        ui.separator();

        self.render_encounters_per_reset_input(ui);
        ui.separator();

        self.render_current_encounters_input(ui);
        ui.separator();

        self.render_increment(ui);
        ui.separator();

        self.render_encounters(ui);
    }

    fn render_generation_input(&mut self, ui: &mut egui::Ui) {
        widgets::section_heading(ui, "Generation");

        ui.vertical_centered(|ui| {
            egui::ComboBox::from_id_salt("generation_combo")
                .width(220.0)
                .selected_text(self.selected_generation.label())
                .show_ui(ui, |ui| {
                    for generation in Generation::ALL {
                        ui.selectable_value(
                            &mut self.selected_generation,
                            generation,
                            generation.label(),
                        );
                    }
                });
        });

        if self.selected_generation != self.app_state.counter.generation() {
            self.generation_feedback = self
                .app_state
                .counter
                .set_generation(self.selected_generation.number() as i32);
        }

        ui.add_space(4.0);
        widgets::feedback(ui, &self.generation_feedback);
        ui.add_space(4.0);
    }

    fn render_encounters_per_reset_input(&mut self, ui: &mut egui::Ui) {
        widgets::section_heading(ui, "Encounters Per Reset");
        widgets::centered_stepper(
            ui,
            "encounters_per_reset",
            &mut self.input_encounters_per_reset,
        );

        // Applied live, like the generation
        let counter = &self.app_state.counter;
        if self.input_encounters_per_reset != counter.encounters_per_reset() as i32 {
            self.encounters_per_reset_feedback =
                counter.set_encounters_per_reset(self.input_encounters_per_reset);
        }

        ui.add_space(4.0);
        widgets::feedback(ui, &self.encounters_per_reset_feedback);
        ui.add_space(4.0);
    }

    fn render_current_encounters_input(&mut self, ui: &mut egui::Ui) {
        widgets::section_heading(ui, "Current Encounters");
        widgets::centered_stepper(
            ui,
            "current_encounters",
            &mut self.input_current_encounters,
        );

        ui.add_space(4.0);
        if widgets::centered_button(ui, "Set Current Encounters") {
            self.current_encounters_feedback = self
                .app_state
                .counter
                .set_current_encounters(self.input_current_encounters);
        }

        ui.add_space(4.0);
        widgets::feedback(ui, &self.current_encounters_feedback);
        ui.add_space(4.0);
    }

    fn render_increment(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        if widgets::centered_button(ui, "Manually Increment Encounters") {
            self.app_state.counter.increment();
        }

        if self.app_state.is_physical_connected() {
            ui.add_space(4.0);
            widgets::centered_text(ui, "OR", None);
            ui.add_space(4.0);
            widgets::hint(
                ui,
                "Press the reset combo on the connected controller to automatically increment the shiny counter.",
            );
            let generation = self.app_state.counter.generation();
            widgets::hint(
                ui,
                &format!(
                    "(Generation {} : {}).",
                    generation.number(),
                    generation.reset_combo_hint()
                ),
            );
        }
        ui.add_space(4.0);
    }

    fn render_encounters(&mut self, ui: &mut egui::Ui) {
        widgets::centered_text(ui, "Current Number of Encounters:", None);
        ui.add_space(6.0);

        let count = self.app_state.counter.current_encounters();
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(count.to_string()).size(40.0).strong());
        });
        ui.add_space(10.0);

        if self.app_state.counter.is_maxed() {
            widgets::centered_text(
                ui,
                "The shiny counter has reached its maximum value!",
                Some(RED),
            );
            widgets::centered_text(ui, "You are the unluckiest person alive!", Some(RED));
        }
    }
}
