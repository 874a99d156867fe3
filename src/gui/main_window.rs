// Main window implementation

use crate::gui::ShinyHunterGui;
use eframe::egui;

impl eframe::App for ShinyHunterGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check if exit was requested at the very beginning
        if self.app_state.should_exit() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let visuals = if self.dark_mode {
            self.cached_dark_visuals.clone()
        } else {
            self.cached_light_visuals.clone()
        };
        ctx.set_visuals(visuals);

        // Status flags change on the polling thread
        ctx.request_repaint_after(std::time::Duration::from_millis(100));

        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            self.render_title_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                egui::ScrollArea::vertical()
                    .id_salt("counter_column")
                    .show(&mut columns[0], |ui| {
                        self.render_counter_panel(ui);
                    });
                egui::ScrollArea::vertical()
                    .id_salt("controller_column")
                    .show(&mut columns[1], |ui| {
                        self.render_controller_panel(ui);
                    });
            });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.app_state.exit();
    }
}

impl ShinyHunterGui {
    // Title with theme toggle
    fn render_title_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("Shiny Hunter Tool Kit")
                    .size(20.0)
                    .strong(),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(10.0);

                let theme_icon = if self.dark_mode { "☀" } else { "🌙" };
                if ui
                    .button(theme_icon)
                    .on_hover_text("Toggle theme")
                    .clicked()
                {
                    self.dark_mode = !self.dark_mode;
                }
            });
        });
    }
}
