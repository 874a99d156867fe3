//! Controller polling loop.
//!
//! One thread owns this manager. It reads the physical pad, forwards reports to
//! the virtual pad, watches the counter and automation combos, applies GUI
//! commands and starts/stops the automation workers. Everything the GUI shows
//! is mirrored into [`AppState`].

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::automation::{RepeatTiming, Worker};
use crate::combo::{self, Edge, EdgeDetector, HoldDetector};
use crate::config::ControllerConfig;
use crate::device::{PhysicalPad, VirtualOutput, VirtualPad};
use crate::gamepad::{Buttons, GamepadState};
use crate::sequence::SequenceRecorder;
use crate::state::{AppState, Command, RepeatStatus};

/// Timing knobs of the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerSettings {
    pub poll_interval: Duration,
    pub repeat: RepeatTiming,
    pub record_hold: Duration,
    pub trigger_threshold: u8,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self::from(&ControllerConfig::default())
    }
}

impl From<&ControllerConfig> for ManagerSettings {
    fn from(config: &ControllerConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            repeat: RepeatTiming {
                interval: config.repeat_interval(),
                press: config.press_duration(),
            },
            record_hold: config.record_hold(),
            trigger_threshold: config.trigger_threshold,
        }
    }
}

pub struct ControllerManager {
    state: Arc<AppState>,
    physical: Box<dyn PhysicalPad>,
    output: VirtualOutput,
    settings: ManagerSettings,
    connected: bool,
    reset_edge: EdgeDetector,
    play_edge: EdgeDetector,
    record_hold: HoldDetector,
    recorder: Option<SequenceRecorder>,
    repeat_worker: Option<Worker>,
    playback_worker: Option<Worker>,
}

impl ControllerManager {
    pub fn new(
        state: Arc<AppState>,
        physical: Box<dyn PhysicalPad>,
        virtual_pad: Box<dyn VirtualPad>,
        settings: ManagerSettings,
    ) -> Self {
        Self {
            state,
            physical,
            output: VirtualOutput::new(virtual_pad),
            settings,
            connected: false,
            reset_edge: EdgeDetector::default(),
            play_edge: EdgeDetector::default(),
            record_hold: HoldDetector::new(settings.record_hold),
            recorder: None,
            repeat_worker: None,
            playback_worker: None,
        }
    }

    /// Polls until the application exits, then releases the virtual controller.
    pub fn run(mut self) {
        info!(
            "Controller polling started ({} ms interval)",
            self.settings.poll_interval.as_millis()
        );

        while !self.state.should_exit() {
            self.tick(Instant::now());
            thread::sleep(self.settings.poll_interval);
        }

        self.shutdown();
        info!("Controller polling stopped");
    }

    /// One polling step.
    pub fn tick(&mut self, now: Instant) {
        let sample = self.physical.read();
        self.update_connection(sample.is_some(), now);
        self.reap_workers();

        let commands: Vec<Command> = self.state.take_commands().collect();
        for command in commands {
            self.apply_command(command, now);
        }

        if let Some(sample) = sample {
            self.handle_input(&sample, now);
            self.forward(&sample);
        }
    }

    /// Stops every worker, keeps any recording in progress and unplugs the virtual controller.
    pub fn shutdown(&mut self) {
        self.stop_repeat();
        self.stop_playback();
        self.finish_recording(Instant::now());

        if let Err(e) = self.output.unplug() {
            warn!("Failed to unplug virtual controller: {:#}", e);
        }
        self.state.set_virtual_connected(false);
    }

    fn update_connection(&mut self, connected: bool, now: Instant) {
        if connected == self.connected {
            return;
        }
        self.connected = connected;
        self.state.set_physical_connected(connected);

        if connected {
            info!("Physical controller connected");
            match self.output.plug_in() {
                Ok(()) => {
                    self.state.set_virtual_connected(true);
                    info!("Virtual controller connected");
                }
                Err(e) => {
                    self.state.set_virtual_connected(false);
                    error!("Failed to connect virtual controller: {:#}", e);
                }
            }
        } else {
            info!("Physical controller disconnected");
            if let Some(recorder) = &self.recorder {
                info!(
                    "Recording cut short, keeping {} recorded steps",
                    recorder.step_count()
                );
            }
            self.finish_recording(now);
            self.shutdown();
            self.reset_edge.reset();
            self.play_edge.reset();
            self.record_hold.reset();
        }
    }

    fn apply_command(&mut self, command: Command, now: Instant) {
        debug!("GUI command: {:?}", command);
        match command {
            Command::ToggleRepeat => self.toggle_repeat(),
            Command::ToggleRecording => self.toggle_recording(now, now),
            Command::TogglePlayback => self.toggle_playback(),
        }
    }

    fn handle_input(&mut self, sample: &GamepadState, now: Instant) {
        let buttons = sample.buttons;

        let generation = self.state.counter.generation();
        if self.reset_edge.update(combo::is_reset_combo(generation, buttons)) == Edge::Released {
            let count = self.state.counter.increment();
            info!("Reset combo released, encounters: {}", count);
        }

        if self.state.repeat_status() == RepeatStatus::Armed
            && let Some(button) = buttons.first_pressed()
        {
            self.start_repeat(button);
        }

        let record_combo = combo::is_record_combo(sample, self.settings.trigger_threshold);
        if self.record_hold.update(record_combo, now) {
            // The trigger hold that stops a recording is not part of the macro
            let hold_started = self.record_hold.held_since().unwrap_or(now);
            self.toggle_recording(now, hold_started);
        }

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.feed(buttons, now);
        }

        if self.play_edge.update(combo::is_play_combo(buttons)) == Edge::Pressed {
            self.toggle_playback();
        }
    }

    fn forward(&self, sample: &GamepadState) {
        if !self.output.is_plugged() || self.state.is_automation_driving() {
            return;
        }
        if let Err(e) = self.output.submit(sample) {
            warn!("Failed to forward report: {:#}", e);
        }
    }

    fn toggle_repeat(&mut self) {
        match self.state.repeat_status() {
            RepeatStatus::Armed | RepeatStatus::Running(_) => self.stop_repeat(),
            RepeatStatus::Idle if self.connected => {
                self.state.set_repeat_status(RepeatStatus::Armed);
                info!("Waiting for a button to repeat");
            }
            RepeatStatus::Idle => debug!("Repeat ignored: no controller connected"),
        }
    }

    fn start_repeat(&mut self, button: Buttons) {
        self.stop_playback();

        match Worker::repeat(self.output.clone(), button, self.settings.repeat) {
            Ok(worker) => {
                self.repeat_worker = Some(worker);
                self.state.set_repeat_status(RepeatStatus::Running(button));
                info!("Repeated {} button press started", button);
            }
            Err(e) => {
                self.state.set_repeat_status(RepeatStatus::Idle);
                error!("Failed to start repeat worker: {:#}", e);
            }
        }
    }

    fn stop_repeat(&mut self) {
        self.state.set_repeat_status(RepeatStatus::Idle);
        if let Some(worker) = self.repeat_worker.take() {
            worker.stop();
            info!("Repeated button press stopped");
        }
    }

    /// Starts a recording at `now`, or ends the running one at `ends_at`.
    fn toggle_recording(&mut self, now: Instant, ends_at: Instant) {
        if self.state.is_playing() {
            debug!("Recording ignored while a macro is playing");
            return;
        }

        if self.recorder.is_some() {
            self.finish_recording(ends_at);
        } else if self.connected {
            self.state.store_sequence(Default::default());
            self.recorder = Some(SequenceRecorder::new(now));
            self.state.set_recording(true);
            info!("Recording button sequence");
        } else {
            debug!("Recording ignored: no controller connected");
        }
    }

    fn finish_recording(&mut self, ends_at: Instant) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };

        let sequence = recorder.finish(ends_at);
        if sequence.is_empty() {
            info!("No button sequence recorded");
        } else {
            info!("Button sequence recorded ({} steps)", sequence.len());
        }
        self.state.store_sequence(sequence);
        self.state.set_recording(false);
    }

    /// Clears workers whose thread ended without being stopped.
    fn reap_workers(&mut self) {
        if self.repeat_worker.as_ref().is_some_and(Worker::is_finished) {
            warn!("Repeat worker exited unexpectedly");
            self.stop_repeat();
        }
        if self.playback_worker.as_ref().is_some_and(Worker::is_finished) {
            warn!("Playback worker exited unexpectedly");
            self.stop_playback();
        }
    }

    fn toggle_playback(&mut self) {
        if self.playback_worker.is_some() {
            self.stop_playback();
            return;
        }
        if self.recorder.is_some() {
            debug!("Playback ignored while recording");
            return;
        }

        let sequence = self.state.sequence();
        if sequence.is_empty() {
            debug!("Playback ignored: no macro recorded");
            return;
        }

        self.stop_repeat();
        match Worker::playback(self.output.clone(), sequence) {
            Ok(worker) => {
                self.playback_worker = Some(worker);
                self.state.set_playing(true);
                info!("Macro playback started");
            }
            Err(e) => error!("Failed to start playback worker: {:#}", e),
        }
    }

    fn stop_playback(&mut self) {
        self.state.set_playing(false);
        if let Some(worker) = self.playback_worker.take() {
            worker.stop();
            info!("Macro playback stopped");
        }
    }
}
