//! Console control events: Ctrl+C, Ctrl+Break, closing the console, logoff and shutdown.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use shiny_hunter::state::{AppState, get_global_state};
use windows::Win32::System::Console::{
    CTRL_BREAK_EVENT, CTRL_C_EVENT, CTRL_CLOSE_EVENT, CTRL_LOGOFF_EVENT, CTRL_SHUTDOWN_EVENT,
    SetConsoleCtrlHandler,
};
use windows::core::BOOL;

/// Windows kills the process shortly after a close event returns.
const UNPLUG_GRACE: Duration = Duration::from_secs(2);

pub fn install_console_handler() -> anyhow::Result<()> {
    unsafe { SetConsoleCtrlHandler(Some(on_console_event), true) }
        .context("Failed to install console control handler")
}

unsafe extern "system" fn on_console_event(event: u32) -> BOOL {
    let closing = matches!(event, CTRL_CLOSE_EVENT | CTRL_LOGOFF_EVENT | CTRL_SHUTDOWN_EVENT);
    if !closing && !matches!(event, CTRL_C_EVENT | CTRL_BREAK_EVENT) {
        return BOOL(0);
    }

    let Some(state) = get_global_state() else {
        std::process::exit(0);
    };
    state.exit();
    if closing {
        wait_for_unplug(state);
    }
    BOOL(1)
}

/// Blocks until the polling thread has removed the virtual controller.
fn wait_for_unplug(state: &AppState) {
    let deadline = Instant::now() + UNPLUG_GRACE;
    while state.is_virtual_connected() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(20));
    }
}
