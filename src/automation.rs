//! Background workers that drive the virtual controller.
//!
//! Each worker owns a stop channel; every wait is a `recv_timeout` on that
//! channel so stopping never has to sit out a full press period.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, warn};

use crate::device::VirtualOutput;
use crate::gamepad::{Buttons, GamepadState};
use crate::sequence::ButtonSequence;

/// Press/release timing of the automatic button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatTiming {
    pub interval: Duration,
    pub press: Duration,
}

impl RepeatTiming {
    #[inline]
    fn release(&self) -> Duration {
        self.interval.saturating_sub(self.press)
    }
}

impl Default for RepeatTiming {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(200),
            press: Duration::from_millis(100),
        }
    }
}

/// Handle to a running worker thread.
pub struct Worker {
    stop_sender: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    fn spawn<F>(name: &str, body: F) -> anyhow::Result<Self>
    where
        F: FnOnce(Receiver<()>) + Send + 'static,
    {
        let (stop_sender, stop_receiver) = crossbeam_channel::bounded(1);
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || body(stop_receiver))?;

        Ok(Self {
            stop_sender,
            handle: Some(handle),
        })
    }

    /// Starts pressing `button` until stopped.
    pub fn repeat(output: VirtualOutput, button: Buttons, timing: RepeatTiming) -> anyhow::Result<Self> {
        Self::spawn("repeat-press", move |stop| run_repeat(&output, button, timing, &stop))
    }

    /// Starts looping `sequence` until stopped.
    pub fn playback(output: VirtualOutput, sequence: ButtonSequence) -> anyhow::Result<Self> {
        Self::spawn("macro-playback", move |stop| run_playback(&output, &sequence, &stop))
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|handle| handle.is_finished())
    }

    /// Signals the worker and waits for it to release the controller.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_sender.try_send(());
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("Automation worker panicked");
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Sleeps for `duration` unless a stop arrives first. Returns `true` to keep going.
#[inline]
fn wait(stop: &Receiver<()>, duration: Duration) -> bool {
    match stop.recv_timeout(duration) {
        Err(RecvTimeoutError::Timeout) => true,
        Ok(()) | Err(RecvTimeoutError::Disconnected) => false,
    }
}

fn submit(output: &VirtualOutput, buttons: Buttons) {
    if let Err(e) = output.submit(&GamepadState::with_buttons(buttons)) {
        debug!("Dropped automated report: {:#}", e);
    }
}

pub(crate) fn run_repeat(
    output: &VirtualOutput,
    button: Buttons,
    timing: RepeatTiming,
    stop: &Receiver<()>,
) {
    debug!("Repeated {} button press started", button);

    loop {
        submit(output, button);
        if !wait(stop, timing.press) {
            break;
        }
        submit(output, Buttons::NONE);
        if !wait(stop, timing.release()) {
            break;
        }
    }

    submit(output, Buttons::NONE);
    debug!("Repeated button press stopped");
}

pub(crate) fn run_playback(output: &VirtualOutput, sequence: &ButtonSequence, stop: &Receiver<()>) {
    debug!("Macro playback started ({} steps)", sequence.len());

    // An all-zero sequence would spin without ever sleeping
    if sequence.duration().is_zero() {
        let _ = stop.recv();
    } else {
        'outer: loop {
            for step in &sequence.steps {
                if !step.delay.is_zero() && !wait(stop, step.delay) {
                    break 'outer;
                }
                submit(output, step.buttons);
            }
        }
    }

    submit(output, Buttons::NONE);
    debug!("Macro playback stopped");
}
