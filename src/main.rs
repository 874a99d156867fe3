// Hide console window in release mode
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;
#[cfg(windows)]
mod signal;

use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use gui::{ShinyHunterGui, show_error};
use shiny_hunter::config::AppConfig;
use shiny_hunter::device;
use shiny_hunter::logging;
use shiny_hunter::manager::{ControllerManager, ManagerSettings};
use shiny_hunter::state::{self, AppState};
use tracing::{error, info};

const CONFIG_PATH: &str = "Config.toml";

fn main() -> Result<()> {
    // Request 1ms timer resolution for precise press timing
    #[cfg(windows)]
    unsafe {
        windows::Win32::Media::timeBeginPeriod(1);
    }

    // Load config or create default if not exists
    let mut config = match AppConfig::load_or_create(CONFIG_PATH) {
        Ok(cfg) => cfg,
        Err(e) => {
            let error_msg = format!("Failed to load configuration: {}", e);
            return show_error(&error_msg);
        }
    };

    logging::init(&config.log_level);
    info!("Shiny Hunter Tool Kit {}", env!("CARGO_PKG_VERSION"));

    let app_state = Arc::new(AppState::new(&config));
    state::set_global_state(app_state.clone());

    #[cfg(windows)]
    signal::install_console_handler()?;

    let (physical, virtual_pad) = match device::open_default(config.controller.user_index) {
        Ok(devices) => devices,
        Err(e) => {
            error!("Failed to initialize controllers: {:#}", e);
            let error_msg = format!("Failed to initialize controllers: {:#}", e);
            return show_error(&error_msg);
        }
    };

    let manager = ControllerManager::new(
        app_state.clone(),
        physical,
        virtual_pad,
        ManagerSettings::from(&config.controller),
    );
    let poller = thread::Builder::new()
        .name("controller-poll".to_string())
        .spawn(move || manager.run())
        .context("Failed to start controller polling thread")?;

    let gui_result = ShinyHunterGui::run(app_state.clone(), config.clone());

    app_state.exit();
    if poller.join().is_err() {
        error!("Controller polling thread panicked");
    }

    // Keep the hunt across restarts
    config.counter = app_state.counter.snapshot();
    if let Err(e) = config.save_to_file(CONFIG_PATH) {
        error!("Failed to save encounter count: {:#}", e);
    }

    gui_result
}
