//! Shiny encounter counter.
//!
//! The polling thread increments the count when a reset combo is released while
//! the GUI edits the same values, so everything is kept in atomics.

use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// Upper bound for both the count and the per-reset increment.
pub const MAX_ENCOUNTERS: u32 = 999_999;

/// Game generation, which decides the soft-reset combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generation {
    Gen1 = 1,
    Gen2,
    Gen3,
    Gen4,
    Gen5,
    Gen6,
    Gen7,
}

impl Generation {
    pub const ALL: [Generation; 7] = [
        Generation::Gen1,
        Generation::Gen2,
        Generation::Gen3,
        Generation::Gen4,
        Generation::Gen5,
        Generation::Gen6,
        Generation::Gen7,
    ];

    pub fn from_number(number: i32) -> Option<Self> {
        match number {
            1 => Some(Generation::Gen1),
            2 => Some(Generation::Gen2),
            3 => Some(Generation::Gen3),
            4 => Some(Generation::Gen4),
            5 => Some(Generation::Gen5),
            6 => Some(Generation::Gen6),
            7 => Some(Generation::Gen7),
            _ => None,
        }
    }

    #[inline]
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Combo box label.
    pub fn label(self) -> &'static str {
        match self {
            Generation::Gen1 => "Generation 1 (RBY)",
            Generation::Gen2 => "Generation 2 (GSC)",
            Generation::Gen3 => "Generation 3 (RSE/FRLG)",
            Generation::Gen4 => "Generation 4 (DPPt/HGSS)",
            Generation::Gen5 => "Generation 5 (BW/BW2)",
            Generation::Gen6 => "Generation 6 (XY/ORAS)",
            Generation::Gen7 => "Generation 7 (SM/USUM)",
        }
    }

    /// Full list of games in the generation.
    pub fn games(self) -> &'static str {
        match self {
            Generation::Gen1 => "(Red/Blue/Yellow)",
            Generation::Gen2 => "(Gold/Silver/Crystal)",
            Generation::Gen3 => "(Ruby/Sapphire/Emerald/FireRed/LeafGreen)",
            Generation::Gen4 => "(Diamond/Pearl/Platinum/HeartGold/SoulSilver)",
            Generation::Gen5 => "(Black/White/Black 2/White 2)",
            Generation::Gen6 => "(X/Y/Omega Ruby/Alpha Sapphire)",
            Generation::Gen7 => "(Sun/Moon/Ultra Sun/Ultra Moon)",
        }
    }

    /// Human readable soft-reset combo.
    pub fn reset_combo_hint(self) -> &'static str {
        match self {
            Generation::Gen1 | Generation::Gen2 | Generation::Gen3 => "START + SELECT + A + B",
            Generation::Gen4 | Generation::Gen5 => "START + SELECT + LB + RB",
            Generation::Gen6 | Generation::Gen7 => "START/SELECT + LB + RB",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome class of a counter edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Ok,
    Capped,
    Invalid,
}

/// Message shown under a counter input after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

impl Feedback {
    fn new(kind: FeedbackKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.kind == FeedbackKind::Invalid
    }
}

/// Persisted counter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CounterConfig {
    #[serde(default = "default_generation")]
    pub generation: u8,
    #[serde(default = "default_encounters_per_reset")]
    pub encounters_per_reset: u32,
    #[serde(default)]
    pub current_encounters: u32,
}

fn default_generation() -> u8 {
    1
}
fn default_encounters_per_reset() -> u32 {
    1
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            generation: default_generation(),
            encounters_per_reset: default_encounters_per_reset(),
            current_encounters: 0,
        }
    }
}

impl CounterConfig {
    /// Brings hand-edited values back into range.
    pub fn sanitize(&mut self) {
        if Generation::from_number(self.generation as i32).is_none() {
            self.generation = default_generation();
        }
        self.encounters_per_reset = self.encounters_per_reset.min(MAX_ENCOUNTERS);
        self.current_encounters = self.current_encounters.min(MAX_ENCOUNTERS);
    }
}

pub struct ShinyCounter {
    generation: AtomicU8,
    encounters_per_reset: AtomicU32,
    current_encounters: AtomicU32,
}

impl ShinyCounter {
    pub fn new(config: CounterConfig) -> Self {
        let counter = Self {
            generation: AtomicU8::new(default_generation()),
            encounters_per_reset: AtomicU32::new(0),
            current_encounters: AtomicU32::new(0),
        };
        counter.restore(config);
        counter
    }

    pub fn generation(&self) -> Generation {
        Generation::from_number(self.generation.load(Ordering::Relaxed) as i32)
            .unwrap_or(Generation::Gen1)
    }

    pub fn encounters_per_reset(&self) -> u32 {
        self.encounters_per_reset.load(Ordering::Relaxed)
    }

    pub fn current_encounters(&self) -> u32 {
        self.current_encounters.load(Ordering::Relaxed)
    }

    pub fn is_maxed(&self) -> bool {
        self.current_encounters() >= MAX_ENCOUNTERS
    }

    pub fn set_generation(&self, number: i32) -> Feedback {
        match Generation::from_number(number) {
            Some(generation) => {
                self.generation
                    .store(generation.number(), Ordering::Relaxed);
                Feedback::new(FeedbackKind::Ok, format!("{}.", generation.games()))
            }
            None => Feedback::new(
                FeedbackKind::Invalid,
                "Invalid generation. Please enter a number between 1 and 7.",
            ),
        }
    }

    pub fn set_encounters_per_reset(&self, value: i32) -> Feedback {
        if value <= 0 {
            self.encounters_per_reset.store(0, Ordering::Relaxed);
            return Feedback::new(
                FeedbackKind::Invalid,
                "Invalid input. Please enter a non-negative whole number greater than 0.",
            );
        }

        let value = value as u32;
        if value >= MAX_ENCOUNTERS {
            self.encounters_per_reset
                .store(MAX_ENCOUNTERS, Ordering::Relaxed);
            return Feedback::new(
                FeedbackKind::Capped,
                format!(
                    "The shiny counter will increment by its maximum value {}!",
                    MAX_ENCOUNTERS
                ),
            );
        }

        self.encounters_per_reset.store(value, Ordering::Relaxed);
        Feedback::new(
            FeedbackKind::Ok,
            format!("Each reset will increment the shiny counter by {}.", value),
        )
    }

    pub fn set_current_encounters(&self, value: i32) -> Feedback {
        if value < 0 {
            self.current_encounters.store(0, Ordering::Relaxed);
            return Feedback::new(
                FeedbackKind::Invalid,
                "Invalid input. Please enter a non-negative whole number.",
            );
        }

        let value = value as u32;
        if value >= MAX_ENCOUNTERS {
            self.current_encounters
                .store(MAX_ENCOUNTERS, Ordering::Relaxed);
            return Feedback::new(
                FeedbackKind::Capped,
                format!(
                    "The shiny counter has been set to its maximum value {}!",
                    MAX_ENCOUNTERS
                ),
            );
        }

        self.current_encounters.store(value, Ordering::Relaxed);
        Feedback::new(
            FeedbackKind::Ok,
            format!("The shiny counter has been set to {}.", value),
        )
    }

    /// Adds one reset's worth of encounters, saturating at [`MAX_ENCOUNTERS`].
    ///
    /// Returns the new count.
    pub fn increment(&self) -> u32 {
        let step = self.encounters_per_reset();
        let previous = self
            .current_encounters
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(current.saturating_add(step).min(MAX_ENCOUNTERS))
            })
            .unwrap_or_else(|current| current);
        previous.saturating_add(step).min(MAX_ENCOUNTERS)
    }

    pub fn snapshot(&self) -> CounterConfig {
        CounterConfig {
            generation: self.generation().number(),
            encounters_per_reset: self.encounters_per_reset(),
            current_encounters: self.current_encounters(),
        }
    }

    pub fn restore(&self, mut config: CounterConfig) {
        config.sanitize();
        self.generation.store(config.generation, Ordering::Relaxed);
        self.encounters_per_reset
            .store(config.encounters_per_reset, Ordering::Relaxed);
        self.current_encounters
            .store(config.current_encounters, Ordering::Relaxed);
    }
}

impl Default for ShinyCounter {
    fn default() -> Self {
        Self::new(CounterConfig::default())
    }
}
