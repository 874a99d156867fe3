//! Recorded button macros.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::gamepad::Buttons;

/// Mask to apply once `delay` has passed since the previous step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SequenceStep {
    pub buttons: Buttons,
    #[serde(rename = "delay_ms", with = "millis")]
    pub delay: Duration,
}

impl SequenceStep {
    pub fn new(buttons: Buttons, delay: Duration) -> Self {
        Self { buttons, delay }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ButtonSequence {
    #[serde(default)]
    pub steps: Vec<SequenceStep>,
}

impl ButtonSequence {
    pub fn new(steps: Vec<SequenceStep>) -> Self {
        Self { steps }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Length of one playback pass.
    pub fn duration(&self) -> Duration {
        self.steps.iter().map(|step| step.delay).sum()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read macro file {}", path.display()))?;
        let sequence: ButtonSequence = toml::from_str(&content)
            .with_context(|| format!("Invalid macro file {}", path.display()))?;
        Ok(sequence)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let mut result = String::from(
            "# Recorded button macro\n\
             # buttons  = XInput button mask applied at this step (0 = release)\n\
             # delay_ms = wait since the previous step\n\n",
        );
        result.push_str(&toml::to_string(self)?);
        fs::write(path, result)
            .with_context(|| format!("Failed to write macro file {}", path.display()))?;
        Ok(())
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Turns a stream of button samples into a [`ButtonSequence`].
#[derive(Debug)]
pub struct SequenceRecorder {
    steps: Vec<SequenceStep>,
    last_change: Instant,
    last_buttons: Buttons,
}

impl SequenceRecorder {
    pub fn new(started: Instant) -> Self {
        Self {
            steps: Vec::new(),
            last_change: started,
            last_buttons: Buttons::NONE,
        }
    }

    /// Records a step whenever the held mask differs from the previous sample.
    pub fn feed(&mut self, buttons: Buttons, now: Instant) {
        if buttons == self.last_buttons {
            return;
        }

        let delay = now.saturating_duration_since(self.last_change);
        self.steps.push(SequenceStep::new(buttons, delay));
        self.last_change = now;
        self.last_buttons = buttons;
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Ends the recording.
    ///
    /// A non-empty sequence gets a trailing release step carrying the idle time
    /// after the last change, so looped playback keeps the same rhythm.
    pub fn finish(mut self, now: Instant) -> ButtonSequence {
        if self.steps.is_empty() {
            return ButtonSequence::default();
        }
        let idle = now.saturating_duration_since(self.last_change);
        self.steps.push(SequenceStep::new(Buttons::NONE, idle));
        ButtonSequence::new(self.steps)
    }
}
