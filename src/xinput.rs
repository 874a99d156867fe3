//! XInput reader for the physical controller.

use windows::Win32::UI::Input::XboxController::*;

use crate::device::PhysicalPad;
use crate::gamepad::{Buttons, GamepadState};

/// Reads one XInput user slot.
pub struct XInputPad {
    user_index: u32,
    packet_number: u32,
    last_state: GamepadState,
}

impl XInputPad {
    pub fn new(user_index: u32) -> anyhow::Result<Self> {
        if user_index >= XUSER_MAX_COUNT {
            anyhow::bail!(
                "XInput user index {} is out of range (0-{})",
                user_index,
                XUSER_MAX_COUNT - 1
            );
        }
        Ok(Self {
            user_index,
            packet_number: 0,
            last_state: GamepadState::neutral(),
        })
    }

    #[inline(always)]
    fn convert(gamepad: &XINPUT_GAMEPAD) -> GamepadState {
        GamepadState {
            buttons: Buttons(gamepad.wButtons.0),
            left_trigger: gamepad.bLeftTrigger,
            right_trigger: gamepad.bRightTrigger,
            thumb_lx: gamepad.sThumbLX,
            thumb_ly: gamepad.sThumbLY,
            thumb_rx: gamepad.sThumbRX,
            thumb_ry: gamepad.sThumbRY,
        }
    }
}

impl PhysicalPad for XInputPad {
    fn read(&mut self) -> Option<GamepadState> {
        let mut state = XINPUT_STATE::default();

        match unsafe { XInputGetState(self.user_index, &mut state) } {
            0 => {
                // Unchanged packet number means the report is identical
                if state.dwPacketNumber != self.packet_number {
                    self.packet_number = state.dwPacketNumber;
                    self.last_state = Self::convert(&state.Gamepad);
                }
                Some(self.last_state)
            }
            _ => {
                self.packet_number = 0;
                self.last_state = GamepadState::neutral();
                None
            }
        }
    }
}
