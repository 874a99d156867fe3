//! GUI module for application interface components.
//!
//! This module provides the graphical user interface using the `egui` framework:
//! the counter column, the controller manager column and the error dialog.

mod controller_panel;
mod counter_panel;
mod error_dialog;
mod main_window;
mod widgets;

use eframe::egui;
use shiny_hunter::config::AppConfig;
use shiny_hunter::counter::{Feedback, Generation};
use shiny_hunter::state::AppState;
use std::sync::Arc;

pub use error_dialog::show_error;

/// Main GUI application structure.
pub struct ShinyHunterGui {
    /// Shared application state
    app_state: Arc<AppState>,
    /// Application configuration
    config: AppConfig,
    /// Current theme mode
    dark_mode: bool,
    /// Generation picked in the combo box
    selected_generation: Generation,
    generation_feedback: Feedback,
    /// Encounters per reset stepper value, applied live
    input_encounters_per_reset: i32,
    encounters_per_reset_feedback: Feedback,
    /// Current encounters stepper value, applied on button press
    input_current_encounters: i32,
    current_encounters_feedback: Feedback,
    /// Result of the last macro save/load
    #[cfg(windows)]
    macro_file_message: Option<(String, bool)>,
    /// Cached dark theme visuals
    cached_dark_visuals: egui::Visuals,
    /// Cached light theme visuals
    cached_light_visuals: egui::Visuals,
}

impl ShinyHunterGui {
    /// Creates a new GUI instance with the given state and configuration.
    pub fn new(app_state: Arc<AppState>, config: AppConfig) -> Self {
        let counter = &app_state.counter;

        let selected_generation = counter.generation();
        let generation_feedback = counter.set_generation(selected_generation.number() as i32);

        let input_encounters_per_reset = counter.encounters_per_reset() as i32;
        let encounters_per_reset_feedback =
            counter.set_encounters_per_reset(input_encounters_per_reset);

        let input_current_encounters = counter.current_encounters() as i32;
        let current_encounters_feedback = counter.set_current_encounters(input_current_encounters);

        Self {
            dark_mode: config.dark_mode,
            app_state,
            config,
            selected_generation,
            generation_feedback,
            input_encounters_per_reset,
            encounters_per_reset_feedback,
            input_current_encounters,
            current_encounters_feedback,
            #[cfg(windows)]
            macro_file_message: None,
            cached_dark_visuals: Self::create_visuals(true),
            cached_light_visuals: Self::create_visuals(false),
        }
    }

    /// Flat theme with rounded widgets.
    fn create_visuals(dark: bool) -> egui::Visuals {
        let mut visuals = if dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };

        visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
        visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
        visuals.widgets.active.corner_radius = egui::CornerRadius::same(6);
        visuals.widgets.noninteractive.corner_radius = egui::CornerRadius::same(4);
        visuals.widgets.open.corner_radius = egui::CornerRadius::same(6);

        if dark {
            visuals.window_fill = egui::Color32::from_rgb(25, 27, 35);
            visuals.panel_fill = egui::Color32::from_rgb(30, 32, 40);
            visuals.extreme_bg_color = egui::Color32::from_rgb(42, 44, 55);
        } else {
            visuals.window_fill = egui::Color32::from_rgb(245, 245, 250);
            visuals.panel_fill = egui::Color32::from_rgb(240, 241, 247);
            visuals.extreme_bg_color = egui::Color32::from_rgb(232, 233, 242);
        }

        visuals
    }

    /// Launches the GUI application.
    ///
    /// # Errors
    ///
    /// Returns an error if the GUI framework fails to initialize or run.
    pub fn run(app_state: Arc<AppState>, config: AppConfig) -> anyhow::Result<()> {
        let mut viewport = egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([960.0, 640.0])
            .with_resizable(true)
            .with_title("Shiny Hunter Tool Kit");

        if config.always_on_top {
            viewport = viewport.with_always_on_top();
        }

        let options = eframe::NativeOptions {
            viewport,
            ..Default::default()
        };

        eframe::run_native(
            "Shiny Hunter Tool Kit",
            options,
            Box::new(move |_cc| Ok(Box::new(ShinyHunterGui::new(app_state, config)))),
        )
        .map_err(|e| anyhow::anyhow!("Failed to run GUI: {}", e))
    }
}
