//! ViGEm virtual Xbox 360 controller.

use anyhow::{Context, anyhow};
use tracing::{debug, info};
use vigem_client::{Client, TargetId, XButtons, XGamepad, Xbox360Wired};

use crate::device::VirtualPad;
use crate::gamepad::GamepadState;

pub struct ViGEmPad {
    client: Client,
    target: Option<Xbox360Wired<Client>>,
}

impl ViGEmPad {
    /// Connects to the ViGEm bus. The target is only created on [`VirtualPad::plug_in`].
    pub fn connect() -> anyhow::Result<Self> {
        let client = Client::connect().map_err(|e| {
            anyhow!(
                "Failed to connect to the ViGEm bus. Make sure the ViGEmBus driver is installed. Error: {}",
                e
            )
        })?;
        info!("Connected to ViGEm bus");
        Ok(Self {
            client,
            target: None,
        })
    }

    #[inline(always)]
    fn to_report(state: &GamepadState) -> XGamepad {
        XGamepad {
            buttons: XButtons {
                raw: state.buttons.bits(),
            },
            left_trigger: state.left_trigger,
            right_trigger: state.right_trigger,
            thumb_lx: state.thumb_lx,
            thumb_ly: state.thumb_ly,
            thumb_rx: state.thumb_rx,
            thumb_ry: state.thumb_ry,
        }
    }
}

impl VirtualPad for ViGEmPad {
    fn plug_in(&mut self) -> anyhow::Result<()> {
        if self.target.is_some() {
            return Ok(());
        }

        let client = self
            .client
            .try_clone()
            .map_err(|e| anyhow!("Failed to clone ViGEm client: {}", e))?;
        let mut target = Xbox360Wired::new(client, TargetId::XBOX360_WIRED);
        target
            .plugin()
            .map_err(|e| anyhow!("Failed to add Xbox 360 target: {}", e))?;
        target
            .wait_ready()
            .map_err(|e| anyhow!("Virtual controller failed to become ready: {}", e))?;

        debug!("Xbox 360 target plugged in");
        self.target = Some(target);
        Ok(())
    }

    fn unplug(&mut self) -> anyhow::Result<()> {
        if let Some(mut target) = self.target.take() {
            target
                .unplug()
                .map_err(|e| anyhow!("Failed to remove Xbox 360 target: {}", e))?;
            debug!("Xbox 360 target removed");
        }
        Ok(())
    }

    fn submit(&mut self, report: &GamepadState) -> anyhow::Result<()> {
        let target = self
            .target
            .as_mut()
            .context("ViGEm target is not initialized")?;
        target
            .update(&Self::to_report(report))
            .map_err(|e| anyhow!("Failed to update Xbox 360 controller state: {}", e))
    }
}
