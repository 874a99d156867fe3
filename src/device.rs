//! Physical and virtual controller seams.
//!
//! The polling loop and the automation workers only see these traits; the
//! XInput reader and the ViGEm target plug in behind them on Windows.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::bail;

use crate::gamepad::GamepadState;

/// Source of physical controller reports.
pub trait PhysicalPad: Send {
    /// Current report, or `None` while no controller is connected.
    fn read(&mut self) -> Option<GamepadState>;
}

/// Emulated controller fed with reports.
pub trait VirtualPad: Send {
    fn plug_in(&mut self) -> anyhow::Result<()>;
    fn unplug(&mut self) -> anyhow::Result<()>;
    fn submit(&mut self, report: &GamepadState) -> anyhow::Result<()>;
}

/// Shared handle to the virtual controller.
///
/// The polling loop plugs it in and out; the polling loop and the automation
/// workers submit reports through clones of the same handle.
#[derive(Clone)]
pub struct VirtualOutput {
    pad: Arc<Mutex<Box<dyn VirtualPad>>>,
    plugged: Arc<AtomicBool>,
}

impl VirtualOutput {
    pub fn new(pad: Box<dyn VirtualPad>) -> Self {
        Self {
            pad: Arc::new(Mutex::new(pad)),
            plugged: Arc::new(AtomicBool::new(false)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn VirtualPad>> {
        // Recover from a panicked worker
        self.pad.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[inline]
    pub fn is_plugged(&self) -> bool {
        self.plugged.load(Ordering::Acquire)
    }

    pub fn plug_in(&self) -> anyhow::Result<()> {
        let mut pad = self.lock();
        if self.is_plugged() {
            return Ok(());
        }
        pad.plug_in()?;
        self.plugged.store(true, Ordering::Release);
        Ok(())
    }

    pub fn unplug(&self) -> anyhow::Result<()> {
        let mut pad = self.lock();
        if !self.is_plugged() {
            return Ok(());
        }
        self.plugged.store(false, Ordering::Release);
        pad.unplug()
    }

    pub fn submit(&self, report: &GamepadState) -> anyhow::Result<()> {
        let mut pad = self.lock();
        if !self.is_plugged() {
            bail!("Virtual controller is not plugged in");
        }
        pad.submit(report)
    }
}

/// Opens the XInput reader for `user_index` and connects to the ViGEm bus.
#[cfg(windows)]
pub fn open_default(user_index: u32) -> anyhow::Result<(Box<dyn PhysicalPad>, Box<dyn VirtualPad>)> {
    let physical = crate::xinput::XInputPad::new(user_index)?;
    let virtual_pad = crate::vigem::ViGEmPad::connect()?;
    Ok((Box::new(physical), Box::new(virtual_pad)))
}

#[cfg(not(windows))]
pub fn open_default(_user_index: u32) -> anyhow::Result<(Box<dyn PhysicalPad>, Box<dyn VirtualPad>)> {
    bail!("Controller bridging needs XInput and the ViGEm bus driver, which are only available on Windows")
}
