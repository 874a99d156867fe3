use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::Path};

use crate::combo::DEFAULT_TRIGGER_THRESHOLD;
use crate::counter::CounterConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,
    #[serde(default)]
    pub always_on_top: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub counter: CounterConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub user_index: u32,
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    #[serde(default = "default_repeat_interval")]
    pub repeat_interval: u64,
    #[serde(default = "default_press_duration")]
    pub press_duration: u64,
    #[serde(default = "default_record_hold")]
    pub record_hold: u64,
    #[serde(default = "default_trigger_threshold")]
    pub trigger_threshold: u8,
}

fn default_dark_mode() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_poll_interval() -> u64 {
    10
}
fn default_repeat_interval() -> u64 {
    200
}
fn default_press_duration() -> u64 {
    100
}
fn default_record_hold() -> u64 {
    1000
}
fn default_trigger_threshold() -> u8 {
    DEFAULT_TRIGGER_THRESHOLD
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            user_index: 0,
            poll_interval: default_poll_interval(),
            repeat_interval: default_repeat_interval(),
            press_duration: default_press_duration(),
            record_hold: default_record_hold(),
            trigger_threshold: default_trigger_threshold(),
        }
    }
}

impl ControllerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval)
    }

    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_interval)
    }

    pub fn press_duration(&self) -> Duration {
        Duration::from_millis(self.press_duration)
    }

    pub fn record_hold(&self) -> Duration {
        Duration::from_millis(self.record_hold)
    }

    /// Clamps hand-edited values to something the polling loop can run with.
    pub fn validate(&mut self) {
        if self.user_index > 3 {
            self.user_index = 0;
        }
        if self.poll_interval < 1 {
            self.poll_interval = 1;
        }
        if self.press_duration < 5 {
            self.press_duration = 5;
        }
        if self.repeat_interval <= self.press_duration {
            self.repeat_interval = self.press_duration * 2;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dark_mode: default_dark_mode(),
            always_on_top: false,
            log_level: default_log_level(),
            controller: ControllerConfig::default(),
            counter: CounterConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config from file, or create default if not exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if !path.as_ref().exists() {
            let default_config = Self::default();
            default_config.save_to_file(&path)?;
            return Ok(default_config);
        }
        Self::load_from_file(path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&content)?;

        config.controller.validate();
        config.counter.sanitize();

        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        // Add comments to make the config file more readable
        let result = format!(
            "dark_mode = {}               # Use dark theme\n\
             always_on_top = {}          # Keep window always on top of other windows\n\
             log_level = \"{}\"            # trace, debug, info, warn or error (RUST_LOG overrides)\n\n\
             [controller]\n\
             user_index = {}                # XInput slot of the physical controller (0-3)\n\
             poll_interval = {}            # Controller polling interval (ms)\n\
             repeat_interval = {}         # Automatic button press period (ms)\n\
             press_duration = {}          # How long each automatic press is held (ms)\n\
             record_hold = {}            # Hold both triggers this long to start/stop recording (ms)\n\
             trigger_threshold = {}        # Trigger value counted as pulled (0-255)\n\n\
             [counter]\n\
             generation = {}                # Game generation (1-7), decides the reset combo\n\
             encounters_per_reset = {}      # Encounters added per soft reset\n\
             current_encounters = {}        # Current encounter count\n",
            self.dark_mode,
            self.always_on_top,
            self.log_level,
            self.controller.user_index,
            self.controller.poll_interval,
            self.controller.repeat_interval,
            self.controller.press_duration,
            self.controller.record_hold,
            self.controller.trigger_threshold,
            self.counter.generation,
            self.counter.encounters_per_reset,
            self.counter.current_encounters,
        );

        fs::write(path, result)?;
        Ok(())
    }
}
