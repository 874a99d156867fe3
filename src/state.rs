//! Application state shared by the GUI, the polling loop and the workers.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

use crossbeam_channel::{Receiver, Sender};

use crate::config::AppConfig;
use crate::counter::ShinyCounter;
use crate::gamepad::Buttons;
use crate::sequence::ButtonSequence;

static GLOBAL_STATE: OnceLock<Arc<AppState>> = OnceLock::new();

/// Registers the state for handlers that cannot capture it (console control).
pub fn set_global_state(state: Arc<AppState>) {
    let _ = GLOBAL_STATE.set(state);
}

pub fn get_global_state() -> Option<&'static Arc<AppState>> {
    GLOBAL_STATE.get()
}

/// Requests from the GUI to the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleRepeat,
    ToggleRecording,
    TogglePlayback,
}

/// Automatic button press status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatStatus {
    Idle,
    /// Waiting for the user to press the button to repeat.
    Armed,
    Running(Buttons),
}

const REPEAT_IDLE: u8 = 0;
const REPEAT_ARMED: u8 = 1;
const REPEAT_RUNNING: u8 = 2;

pub struct AppState {
    pub counter: ShinyCounter,
    pub should_exit: Arc<AtomicBool>,
    physical_connected: AtomicBool,
    virtual_connected: AtomicBool,
    repeat_status: AtomicU8,
    repeat_button: AtomicU16,
    recording: AtomicBool,
    playback: AtomicBool,
    sequence: RwLock<ButtonSequence>,
    command_sender: Sender<Command>,
    command_receiver: Receiver<Command>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let (command_sender, command_receiver) = crossbeam_channel::unbounded();

        Self {
            counter: ShinyCounter::new(config.counter),
            should_exit: Arc::new(AtomicBool::new(false)),
            physical_connected: AtomicBool::new(false),
            virtual_connected: AtomicBool::new(false),
            repeat_status: AtomicU8::new(REPEAT_IDLE),
            repeat_button: AtomicU16::new(0),
            recording: AtomicBool::new(false),
            playback: AtomicBool::new(false),
            sequence: RwLock::new(ButtonSequence::default()),
            command_sender,
            command_receiver,
        }
    }

    #[inline]
    pub fn should_exit(&self) -> bool {
        self.should_exit.load(Ordering::Relaxed)
    }

    pub fn exit(&self) {
        self.should_exit.store(true, Ordering::Relaxed);
    }

    /// Queues a command for the polling loop.
    pub fn send_command(&self, command: Command) {
        let _ = self.command_sender.send(command);
    }

    /// Drains queued commands; only the polling loop calls this.
    pub fn take_commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.command_receiver.try_iter()
    }

    #[inline]
    pub fn is_physical_connected(&self) -> bool {
        self.physical_connected.load(Ordering::Acquire)
    }

    pub(crate) fn set_physical_connected(&self, connected: bool) {
        self.physical_connected.store(connected, Ordering::Release);
    }

    #[inline]
    pub fn is_virtual_connected(&self) -> bool {
        self.virtual_connected.load(Ordering::Acquire)
    }

    pub(crate) fn set_virtual_connected(&self, connected: bool) {
        self.virtual_connected.store(connected, Ordering::Release);
    }

    pub fn repeat_status(&self) -> RepeatStatus {
        match self.repeat_status.load(Ordering::Acquire) {
            REPEAT_ARMED => RepeatStatus::Armed,
            REPEAT_RUNNING => {
                RepeatStatus::Running(Buttons(self.repeat_button.load(Ordering::Acquire)))
            }
            _ => RepeatStatus::Idle,
        }
    }

    pub(crate) fn set_repeat_status(&self, status: RepeatStatus) {
        let (code, button) = match status {
            RepeatStatus::Idle => (REPEAT_IDLE, Buttons::NONE),
            RepeatStatus::Armed => (REPEAT_ARMED, Buttons::NONE),
            RepeatStatus::Running(button) => (REPEAT_RUNNING, button),
        };
        self.repeat_button.store(button.bits(), Ordering::Release);
        self.repeat_status.store(code, Ordering::Release);
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::Acquire)
    }

    pub(crate) fn set_recording(&self, recording: bool) {
        self.recording.store(recording, Ordering::Release);
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playback.load(Ordering::Acquire)
    }

    pub(crate) fn set_playing(&self, playing: bool) {
        self.playback.store(playing, Ordering::Release);
    }

    /// True while a worker, rather than the physical pad, drives the virtual pad.
    pub fn is_automation_driving(&self) -> bool {
        matches!(self.repeat_status(), RepeatStatus::Running(_)) || self.is_playing()
    }

    pub fn sequence(&self) -> ButtonSequence {
        self.sequence
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn has_sequence(&self) -> bool {
        !self
            .sequence
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_empty()
    }

    pub(crate) fn store_sequence(&self, sequence: ButtonSequence) {
        *self
            .sequence
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = sequence;
    }

    /// Replaces the macro from outside the polling loop (e.g. a loaded file).
    ///
    /// Refused while recording or playing back.
    pub fn replace_sequence(&self, sequence: ButtonSequence) -> bool {
        if self.is_recording() || self.is_playing() {
            return false;
        }
        self.store_sequence(sequence);
        true
    }
}
