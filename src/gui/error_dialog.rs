//! Error dialog for startup failures.

use eframe::egui;

/// Standalone window showing a single error message.
struct ErrorDialog {
    error_msg: String,
}

impl eframe::App for ErrorDialog {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut visuals = egui::Visuals::dark();
        visuals.widgets.noninteractive.corner_radius = egui::CornerRadius::same(6);
        visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
        visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
        visuals.widgets.active.corner_radius = egui::CornerRadius::same(6);
        visuals.window_fill = egui::Color32::from_rgb(25, 27, 35);
        visuals.panel_fill = egui::Color32::from_rgb(30, 32, 40);
        ctx.set_visuals(visuals);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(20.0);

            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new("❌ Startup Error")
                        .size(22.0)
                        .color(egui::Color32::from_rgb(235, 80, 80))
                        .strong(),
                );
            });

            ui.add_space(16.0);

            egui::Frame::NONE
                .fill(egui::Color32::from_rgb(42, 44, 55))
                .corner_radius(egui::CornerRadius::same(8))
                .inner_margin(egui::Margin::same(14))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(&self.error_msg).size(14.0));
                });

            ui.add_space(16.0);

            ui.vertical_centered(|ui| {
                if ui
                    .add_sized([120.0, 32.0], egui::Button::new("Close"))
                    .clicked()
                {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
        });
    }
}

/// Displays an error dialog in a separate window.
///
/// Returns once the dialog is closed.
///
/// # Errors
///
/// Returns an error if the GUI framework fails to initialize.
pub fn show_error(error_msg: &str) -> anyhow::Result<()> {
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([450.0, 260.0])
        .with_resizable(false)
        .with_title("Shiny Hunter Tool Kit - Error")
        .with_always_on_top();

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Shiny Hunter Tool Kit Error",
        options,
        Box::new(|_cc| {
            Ok(Box::new(ErrorDialog {
                error_msg: error_msg.to_string(),
            }))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to show error dialog: {}", e))
}
