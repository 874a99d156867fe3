//! Core modules for the Shiny Hunter Tool Kit.
//!
//! The binary adds the GUI on top; everything that can run without a window or
//! real hardware lives here so it can be tested.

pub mod automation;
pub mod combo;
pub mod config;
pub mod counter;
pub mod device;
pub mod gamepad;
pub mod logging;
pub mod manager;
pub mod sequence;
pub mod state;
#[cfg(windows)]
pub mod vigem;
#[cfg(windows)]
pub mod xinput;

// Re-export types for test modules
pub use config::{AppConfig, ControllerConfig};
pub use counter::{CounterConfig, Feedback, FeedbackKind, Generation, ShinyCounter};
pub use gamepad::{Buttons, GamepadState};
pub use manager::{ControllerManager, ManagerSettings};
pub use state::{AppState, Command, RepeatStatus};
