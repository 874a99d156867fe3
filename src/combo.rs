//! Controller combos that drive the counter and the automation.

use std::time::{Duration, Instant};

use smallvec::{SmallVec, smallvec};

use crate::counter::Generation;
use crate::gamepad::{Buttons, GamepadState};

/// XInput's own trigger threshold.
pub const DEFAULT_TRIGGER_THRESHOLD: u8 = 30;

/// Button sets that count as a soft reset for the generation.
///
/// The combo matches when any one of the returned sets is fully held.
pub fn reset_combos(generation: Generation) -> SmallVec<[Buttons; 2]> {
    match generation {
        Generation::Gen1 | Generation::Gen2 | Generation::Gen3 => {
            smallvec![Buttons::START | Buttons::BACK | Buttons::A | Buttons::B]
        }
        Generation::Gen4 | Generation::Gen5 => {
            smallvec![Buttons::START | Buttons::BACK | Buttons::LEFT_SHOULDER | Buttons::RIGHT_SHOULDER]
        }
        Generation::Gen6 | Generation::Gen7 => smallvec![
            Buttons::START | Buttons::LEFT_SHOULDER | Buttons::RIGHT_SHOULDER,
            Buttons::BACK | Buttons::LEFT_SHOULDER | Buttons::RIGHT_SHOULDER,
        ],
    }
}

#[inline]
pub fn is_reset_combo(generation: Generation, buttons: Buttons) -> bool {
    reset_combos(generation)
        .iter()
        .any(|&combo| buttons.contains(combo))
}

/// Both triggers pulled past `threshold`.
#[inline]
pub fn is_record_combo(state: &GamepadState, threshold: u8) -> bool {
    state.left_trigger > threshold && state.right_trigger > threshold
}

/// Both thumb sticks clicked.
#[inline]
pub fn is_play_combo(buttons: Buttons) -> bool {
    buttons.contains(Buttons::LEFT_THUMB | Buttons::RIGHT_THUMB)
}

/// Transition reported by [`EdgeDetector::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    None,
    Pressed,
    Released,
}

#[derive(Debug, Default)]
pub struct EdgeDetector {
    was_pressed: bool,
}

impl EdgeDetector {
    pub fn update(&mut self, pressed: bool) -> Edge {
        let edge = match (self.was_pressed, pressed) {
            (false, true) => Edge::Pressed,
            (true, false) => Edge::Released,
            _ => Edge::None,
        };
        self.was_pressed = pressed;
        edge
    }

    pub fn reset(&mut self) {
        self.was_pressed = false;
    }
}

/// Fires once when a condition stays true for the hold time.
///
/// After firing it stays quiet until the condition is released.
#[derive(Debug)]
pub struct HoldDetector {
    hold: Duration,
    held_since: Option<Instant>,
    fired: bool,
}

impl HoldDetector {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            held_since: None,
            fired: false,
        }
    }

    pub fn update(&mut self, pressed: bool, now: Instant) -> bool {
        if !pressed {
            self.reset();
            return false;
        }

        let since = *self.held_since.get_or_insert(now);
        if !self.fired && now.saturating_duration_since(since) >= self.hold {
            self.fired = true;
            return true;
        }
        false
    }

    /// When the current hold began, if the input is held.
    pub fn held_since(&self) -> Option<Instant> {
        self.held_since
    }

    pub fn reset(&mut self) {
        self.held_since = None;
        self.fired = false;
    }
}
