//! Controller report types shared by the physical reader and the virtual target.
//!
//! Button masks use the XInput/XUSB layout, which both sides of the bridge share,
//! so a report read from the physical pad can be forwarded without translation.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// XInput button bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Buttons(pub u16);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const DPAD_UP: Buttons = Buttons(0x0001);
    pub const DPAD_DOWN: Buttons = Buttons(0x0002);
    pub const DPAD_LEFT: Buttons = Buttons(0x0004);
    pub const DPAD_RIGHT: Buttons = Buttons(0x0008);
    pub const START: Buttons = Buttons(0x0010);
    pub const BACK: Buttons = Buttons(0x0020);
    pub const LEFT_THUMB: Buttons = Buttons(0x0040);
    pub const RIGHT_THUMB: Buttons = Buttons(0x0080);
    pub const LEFT_SHOULDER: Buttons = Buttons(0x0100);
    pub const RIGHT_SHOULDER: Buttons = Buttons(0x0200);
    pub const A: Buttons = Buttons(0x1000);
    pub const B: Buttons = Buttons(0x2000);
    pub const X: Buttons = Buttons(0x4000);
    pub const Y: Buttons = Buttons(0x8000);

    /// Order in which a held button is picked for automatic repeat.
    ///
    /// Thumb clicks are left out since L3 + R3 is the playback combo.
    const REPEAT_PRIORITY: [Buttons; 12] = [
        Buttons::A,
        Buttons::B,
        Buttons::X,
        Buttons::Y,
        Buttons::START,
        Buttons::BACK,
        Buttons::DPAD_UP,
        Buttons::DPAD_DOWN,
        Buttons::DPAD_LEFT,
        Buttons::DPAD_RIGHT,
        Buttons::LEFT_SHOULDER,
        Buttons::RIGHT_SHOULDER,
    ];

    /// Every named button, in mask order.
    const ALL: [Buttons; 14] = [
        Buttons::DPAD_UP,
        Buttons::DPAD_DOWN,
        Buttons::DPAD_LEFT,
        Buttons::DPAD_RIGHT,
        Buttons::START,
        Buttons::BACK,
        Buttons::LEFT_THUMB,
        Buttons::RIGHT_THUMB,
        Buttons::LEFT_SHOULDER,
        Buttons::RIGHT_SHOULDER,
        Buttons::A,
        Buttons::B,
        Buttons::X,
        Buttons::Y,
    ];

    #[inline(always)]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is held.
    #[inline(always)]
    pub const fn contains(self, other: Buttons) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline(always)]
    pub const fn union(self, other: Buttons) -> Buttons {
        Buttons(self.0 | other.0)
    }

    /// Picks the single button used for repeat press, if any eligible one is held.
    pub fn first_pressed(self) -> Option<Buttons> {
        Self::REPEAT_PRIORITY
            .into_iter()
            .find(|&button| self.contains(button))
    }

    /// Splits the mask into its named buttons.
    pub fn iter(self) -> impl Iterator<Item = Buttons> {
        Self::ALL.into_iter().filter(move |&b| self.contains(b))
    }

    /// Name of a single-button mask; anything else is `"NULL"`.
    pub fn name(self) -> &'static str {
        match self {
            Buttons::A => "A",
            Buttons::B => "B",
            Buttons::X => "X",
            Buttons::Y => "Y",
            Buttons::DPAD_UP => "DPAD_UP",
            Buttons::DPAD_DOWN => "DPAD_DOWN",
            Buttons::DPAD_LEFT => "DPAD_LEFT",
            Buttons::DPAD_RIGHT => "DPAD_RIGHT",
            Buttons::START => "START",
            Buttons::BACK => "BACK",
            Buttons::LEFT_THUMB => "LEFT_THUMB",
            Buttons::RIGHT_THUMB => "RIGHT_THUMB",
            Buttons::LEFT_SHOULDER => "LEFT_SHOULDER",
            Buttons::RIGHT_SHOULDER => "RIGHT_SHOULDER",
            _ => "NULL",
        }
    }
}

impl std::ops::BitOr for Buttons {
    type Output = Buttons;

    fn bitor(self, rhs: Buttons) -> Buttons {
        self.union(rhs)
    }
}

impl fmt::Display for Buttons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let names: SmallVec<[&str; 4]> = self.iter().map(Buttons::name).collect();
        f.write_str(&names.join("+"))
    }
}

/// One controller report: what XInput reads and what the virtual target accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GamepadState {
    pub buttons: Buttons,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

impl GamepadState {
    /// Report with nothing pressed and sticks centered.
    pub const fn neutral() -> Self {
        Self {
            buttons: Buttons::NONE,
            left_trigger: 0,
            right_trigger: 0,
            thumb_lx: 0,
            thumb_ly: 0,
            thumb_rx: 0,
            thumb_ry: 0,
        }
    }

    /// Buttons-only report, as sent by the automation workers.
    pub const fn with_buttons(buttons: Buttons) -> Self {
        let mut state = Self::neutral();
        state.buttons = buttons;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pressed_follows_priority() {
        let held = Buttons::DPAD_UP | Buttons::B | Buttons::Y;
        assert_eq!(held.first_pressed(), Some(Buttons::B));

        let held = Buttons::RIGHT_SHOULDER | Buttons::START;
        assert_eq!(held.first_pressed(), Some(Buttons::START));
    }

    #[test]
    fn test_first_pressed_ignores_thumb_clicks() {
        let held = Buttons::LEFT_THUMB | Buttons::RIGHT_THUMB;
        assert_eq!(held.first_pressed(), None);
        assert_eq!(Buttons::NONE.first_pressed(), None);
    }

    #[test]
    fn test_contains_requires_all_bits() {
        let held = Buttons::START | Buttons::A;
        assert!(held.contains(Buttons::START));
        assert!(!held.contains(Buttons::START | Buttons::B));
    }

    #[test]
    fn test_single_button_names() {
        assert_eq!(Buttons::A.name(), "A");
        assert_eq!(Buttons::DPAD_LEFT.name(), "DPAD_LEFT");
        assert_eq!(Buttons::RIGHT_SHOULDER.name(), "RIGHT_SHOULDER");
        assert_eq!((Buttons::A | Buttons::B).name(), "NULL");
    }

    #[test]
    fn test_display_joins_chords() {
        assert_eq!(Buttons::NONE.to_string(), "NONE");
        assert_eq!((Buttons::A | Buttons::DPAD_UP).to_string(), "DPAD_UP+A");
    }

    #[test]
    fn test_with_buttons_is_otherwise_neutral() {
        let report = GamepadState::with_buttons(Buttons::X);
        assert_eq!(report.buttons, Buttons::X);
        assert_eq!(report.left_trigger, 0);
        assert_eq!(report.thumb_ry, 0);
    }
}
