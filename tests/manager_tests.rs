//! Tests for the controller polling loop driven by scripted controllers.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use shiny_hunter::automation::RepeatTiming;
use shiny_hunter::config::AppConfig;
use shiny_hunter::counter::CounterConfig;
use shiny_hunter::device::{PhysicalPad, VirtualPad};
use shiny_hunter::gamepad::{Buttons, GamepadState};
use shiny_hunter::manager::{ControllerManager, ManagerSettings};
use shiny_hunter::sequence::{ButtonSequence, SequenceStep};
use shiny_hunter::state::{AppState, Command, RepeatStatus};

/// Physical pad whose next sample is set by the test. `None` means unplugged.
#[derive(Clone, Default)]
struct ScriptedPad {
    sample: Arc<Mutex<Option<GamepadState>>>,
}

impl ScriptedPad {
    fn set(&self, sample: Option<GamepadState>) {
        *self.sample.lock().unwrap() = sample;
    }

    fn press(&self, buttons: Buttons) {
        self.set(Some(GamepadState::with_buttons(buttons)));
    }
}

impl PhysicalPad for ScriptedPad {
    fn read(&mut self) -> Option<GamepadState> {
        *self.sample.lock().unwrap()
    }
}

/// Virtual pad that keeps every report it receives.
#[derive(Clone, Default)]
struct RecordingPad {
    plugged: Arc<Mutex<bool>>,
    reports: Arc<Mutex<Vec<GamepadState>>>,
}

impl RecordingPad {
    fn is_plugged(&self) -> bool {
        *self.plugged.lock().unwrap()
    }

    fn reports(&self) -> Vec<GamepadState> {
        self.reports.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.reports.lock().unwrap().clear();
    }
}

impl VirtualPad for RecordingPad {
    fn plug_in(&mut self) -> anyhow::Result<()> {
        *self.plugged.lock().unwrap() = true;
        Ok(())
    }

    fn unplug(&mut self) -> anyhow::Result<()> {
        *self.plugged.lock().unwrap() = false;
        Ok(())
    }

    fn submit(&mut self, report: &GamepadState) -> anyhow::Result<()> {
        self.reports.lock().unwrap().push(*report);
        Ok(())
    }
}

struct Harness {
    state: Arc<AppState>,
    manager: ControllerManager,
    physical: ScriptedPad,
    output: RecordingPad,
}

fn fast_settings() -> ManagerSettings {
    ManagerSettings {
        repeat: RepeatTiming {
            interval: Duration::from_millis(20),
            press: Duration::from_millis(10),
        },
        ..ManagerSettings::default()
    }
}

fn harness_with(config: AppConfig) -> Harness {
    let state = Arc::new(AppState::new(&config));
    let physical = ScriptedPad::default();
    let output = RecordingPad::default();
    let manager = ControllerManager::new(
        state.clone(),
        Box::new(physical.clone()),
        Box::new(output.clone()),
        fast_settings(),
    );
    Harness {
        state,
        manager,
        physical,
        output,
    }
}

fn harness() -> Harness {
    harness_with(AppConfig::default())
}

fn connected_harness() -> Harness {
    let mut h = harness();
    h.physical.press(Buttons::NONE);
    h.manager.tick(Instant::now());
    h
}

fn triggers_held() -> GamepadState {
    GamepadState {
        left_trigger: 255,
        right_trigger: 255,
        ..GamepadState::neutral()
    }
}

#[test]
fn test_disconnected_controller_leaves_virtual_pad_unplugged() {
    let mut h = harness();
    h.manager.tick(Instant::now());

    assert!(!h.state.is_physical_connected());
    assert!(!h.state.is_virtual_connected());
    assert!(!h.output.is_plugged());
}

#[test]
fn test_connecting_plugs_in_virtual_pad() {
    let h = connected_harness();

    assert!(h.state.is_physical_connected());
    assert!(h.state.is_virtual_connected());
    assert!(h.output.is_plugged());
}

#[test]
fn test_reports_are_passed_through() {
    let mut h = connected_harness();
    let sample = GamepadState {
        buttons: Buttons::A | Buttons::DPAD_LEFT,
        left_trigger: 12,
        thumb_lx: -3000,
        thumb_ry: 16000,
        ..GamepadState::neutral()
    };
    h.physical.set(Some(sample));
    h.manager.tick(Instant::now());

    assert_eq!(h.output.reports().last(), Some(&sample));
}

#[test]
fn test_reset_combo_counts_on_release() {
    let mut config = AppConfig::default();
    config.counter = CounterConfig {
        generation: 1,
        encounters_per_reset: 5,
        current_encounters: 10,
    };
    let mut h = harness_with(config);
    let combo = Buttons::START | Buttons::BACK | Buttons::A | Buttons::B;

    h.physical.press(combo);
    h.manager.tick(Instant::now());
    h.manager.tick(Instant::now());
    assert_eq!(h.state.counter.current_encounters(), 10);

    h.physical.press(Buttons::NONE);
    h.manager.tick(Instant::now());
    assert_eq!(h.state.counter.current_encounters(), 15);

    h.manager.tick(Instant::now());
    assert_eq!(h.state.counter.current_encounters(), 15);
}

#[test]
fn test_reset_combo_follows_generation() {
    let mut h = connected_harness();
    h.state.counter.set_generation(6);

    // Early generation combo does nothing in generation 6
    h.physical
        .press(Buttons::START | Buttons::BACK | Buttons::A | Buttons::B);
    h.manager.tick(Instant::now());
    h.physical.press(Buttons::NONE);
    h.manager.tick(Instant::now());
    assert_eq!(h.state.counter.current_encounters(), 0);

    h.physical
        .press(Buttons::BACK | Buttons::LEFT_SHOULDER | Buttons::RIGHT_SHOULDER);
    h.manager.tick(Instant::now());
    h.physical.press(Buttons::NONE);
    h.manager.tick(Instant::now());
    assert_eq!(h.state.counter.current_encounters(), 1);
}

#[test]
fn test_repeat_needs_a_controller() {
    let mut h = harness();
    h.state.send_command(Command::ToggleRepeat);
    h.manager.tick(Instant::now());

    assert_eq!(h.state.repeat_status(), RepeatStatus::Idle);
}

#[test]
fn test_repeat_arms_then_locks_onto_pressed_button() {
    let mut h = connected_harness();

    h.state.send_command(Command::ToggleRepeat);
    h.manager.tick(Instant::now());
    assert_eq!(h.state.repeat_status(), RepeatStatus::Armed);

    h.physical.press(Buttons::B | Buttons::RIGHT_SHOULDER);
    h.manager.tick(Instant::now());
    assert_eq!(h.state.repeat_status(), RepeatStatus::Running(Buttons::B));
    assert!(h.state.is_automation_driving());

    thread::sleep(Duration::from_millis(80));
    let reports = h.output.reports();
    assert!(reports.iter().any(|r| r.buttons == Buttons::B));
    assert!(reports.iter().any(|r| r.buttons == Buttons::NONE));

    h.state.send_command(Command::ToggleRepeat);
    h.manager.tick(Instant::now());
    assert_eq!(h.state.repeat_status(), RepeatStatus::Idle);
    assert_eq!(
        h.output.reports().last(),
        Some(&GamepadState::with_buttons(Buttons::B | Buttons::RIGHT_SHOULDER))
    );
}

#[test]
fn test_armed_repeat_can_be_cancelled() {
    let mut h = connected_harness();
    h.state.send_command(Command::ToggleRepeat);
    h.state.send_command(Command::ToggleRepeat);
    h.manager.tick(Instant::now());

    assert_eq!(h.state.repeat_status(), RepeatStatus::Idle);
}

#[test]
fn test_trigger_hold_records_a_macro() {
    let mut h = connected_harness();
    let t0 = Instant::now();
    let ms = Duration::from_millis;

    h.physical.set(Some(triggers_held()));
    h.manager.tick(t0);
    assert!(!h.state.is_recording());
    h.manager.tick(t0 + ms(1000));
    assert!(h.state.is_recording());
    assert!(!h.state.has_sequence());

    h.physical.press(Buttons::A);
    h.manager.tick(t0 + ms(1200));
    h.physical.press(Buttons::NONE);
    h.manager.tick(t0 + ms(1300));

    h.physical.set(Some(triggers_held()));
    h.manager.tick(t0 + ms(2000));
    assert!(h.state.is_recording());
    h.manager.tick(t0 + ms(3000));
    assert!(!h.state.is_recording());

    assert_eq!(
        h.state.sequence().steps,
        vec![
            SequenceStep::new(Buttons::A, ms(200)),
            SequenceStep::new(Buttons::NONE, ms(100)),
            SequenceStep::new(Buttons::NONE, ms(700)),
        ]
    );
}

#[test]
fn test_holding_triggers_toggles_recording_once() {
    let mut h = connected_harness();
    let t0 = Instant::now();

    h.physical.set(Some(triggers_held()));
    for step in 0..=30 {
        h.manager.tick(t0 + Duration::from_millis(step * 100));
    }

    assert!(h.state.is_recording());
}

#[test]
fn test_recording_from_gui_command() {
    let mut h = connected_harness();
    let t0 = Instant::now();

    h.state.send_command(Command::ToggleRecording);
    h.manager.tick(t0);
    assert!(h.state.is_recording());

    h.physical.press(Buttons::X);
    h.manager.tick(t0 + Duration::from_millis(50));

    h.state.send_command(Command::ToggleRecording);
    h.physical.press(Buttons::NONE);
    h.manager.tick(t0 + Duration::from_millis(100));
    assert!(!h.state.is_recording());
    assert_eq!(h.state.sequence().len(), 2);
}

#[test]
fn test_play_combo_toggles_playback() {
    let mut h = connected_harness();
    let sequence = ButtonSequence::new(vec![
        SequenceStep::new(Buttons::Y, Duration::from_millis(5)),
        SequenceStep::new(Buttons::NONE, Duration::from_millis(5)),
    ]);
    assert!(h.state.replace_sequence(sequence));
    let play = Buttons::LEFT_THUMB | Buttons::RIGHT_THUMB;

    h.physical.press(play);
    h.manager.tick(Instant::now());
    assert!(h.state.is_playing());

    // Still held: no second toggle
    h.manager.tick(Instant::now());
    assert!(h.state.is_playing());

    thread::sleep(Duration::from_millis(60));
    assert!(h.output.reports().iter().any(|r| r.buttons == Buttons::Y));

    h.physical.press(Buttons::NONE);
    h.manager.tick(Instant::now());
    h.physical.press(play);
    h.manager.tick(Instant::now());
    assert!(!h.state.is_playing());
}

#[test]
fn test_playback_without_macro_is_ignored() {
    let mut h = connected_harness();
    h.state.send_command(Command::TogglePlayback);
    h.manager.tick(Instant::now());

    assert!(!h.state.is_playing());
}

#[test]
fn test_playback_replaces_running_repeat() {
    let mut h = connected_harness();
    h.state.replace_sequence(ButtonSequence::new(vec![SequenceStep::new(
        Buttons::X,
        Duration::from_millis(10),
    )]));

    h.state.send_command(Command::ToggleRepeat);
    h.manager.tick(Instant::now());
    h.physical.press(Buttons::A);
    h.manager.tick(Instant::now());
    assert_eq!(h.state.repeat_status(), RepeatStatus::Running(Buttons::A));

    h.state.send_command(Command::TogglePlayback);
    h.manager.tick(Instant::now());
    assert!(h.state.is_playing());
    assert_eq!(h.state.repeat_status(), RepeatStatus::Idle);

    h.manager.shutdown();
}

#[test]
fn test_loaded_macro_refused_while_recording() {
    let mut h = connected_harness();
    h.state.send_command(Command::ToggleRecording);
    h.manager.tick(Instant::now());

    let sequence = ButtonSequence::new(vec![SequenceStep::new(Buttons::A, Duration::ZERO)]);
    assert!(!h.state.replace_sequence(sequence));
}

#[test]
fn test_passthrough_suppressed_during_playback() {
    let mut h = connected_harness();
    h.state.replace_sequence(ButtonSequence::new(vec![SequenceStep::new(
        Buttons::DPAD_UP,
        Duration::from_millis(10),
    )]));
    h.state.send_command(Command::TogglePlayback);
    h.manager.tick(Instant::now());
    assert!(h.state.is_playing());

    h.physical.press(Buttons::START);
    for _ in 0..5 {
        h.manager.tick(Instant::now());
        thread::sleep(Duration::from_millis(5));
    }
    assert!(h.output.reports().iter().all(|r| r.buttons != Buttons::START));

    h.manager.shutdown();
}

#[test]
fn test_disconnect_stops_everything_and_unplugs() {
    let mut h = connected_harness();
    h.state.replace_sequence(ButtonSequence::new(vec![SequenceStep::new(
        Buttons::B,
        Duration::from_millis(10),
    )]));
    h.state.send_command(Command::TogglePlayback);
    h.manager.tick(Instant::now());
    assert!(h.state.is_playing());

    h.physical.set(None);
    h.manager.tick(Instant::now());

    assert!(!h.state.is_physical_connected());
    assert!(!h.state.is_virtual_connected());
    assert!(!h.state.is_playing());
    assert!(!h.output.is_plugged());

    // Reconnecting brings the virtual pad back
    h.output.clear();
    h.physical.press(Buttons::A);
    h.manager.tick(Instant::now());
    assert!(h.output.is_plugged());
    assert_eq!(
        h.output.reports(),
        vec![GamepadState::with_buttons(Buttons::A)]
    );
}

#[test]
fn test_run_returns_after_exit() {
    let h = connected_harness();
    h.state.exit();
    h.manager.run();

    assert!(!h.output.is_plugged());
    assert!(!h.state.is_virtual_connected());
}

#[test]
fn test_stop_hold_is_not_recorded() {
    let mut h = connected_harness();
    let t0 = Instant::now();
    let ms = Duration::from_millis;

    h.state.send_command(Command::ToggleRecording);
    h.manager.tick(t0);
    h.physical.press(Buttons::A);
    h.manager.tick(t0 + ms(100));
    h.physical.press(Buttons::NONE);
    h.manager.tick(t0 + ms(200));

    h.physical.set(Some(triggers_held()));
    h.manager.tick(t0 + ms(300));
    h.manager.tick(t0 + ms(1300));
    assert!(!h.state.is_recording());

    let sequence = h.state.sequence();
    assert_eq!(
        sequence.steps,
        vec![
            SequenceStep::new(Buttons::A, ms(100)),
            SequenceStep::new(Buttons::NONE, ms(100)),
            SequenceStep::new(Buttons::NONE, ms(100)),
        ]
    );
    assert_eq!(sequence.duration(), ms(300));
}

#[test]
fn test_disconnect_keeps_partial_recording() {
    let mut h = connected_harness();
    let t0 = Instant::now();
    let ms = Duration::from_millis;
    h.state.replace_sequence(ButtonSequence::new(vec![SequenceStep::new(
        Buttons::Y,
        ms(10),
    )]));

    h.state.send_command(Command::ToggleRecording);
    h.manager.tick(t0);
    h.physical.press(Buttons::A);
    h.manager.tick(t0 + ms(100));

    h.physical.set(None);
    h.manager.tick(t0 + ms(300));

    assert!(!h.state.is_recording());
    assert!(h.state.has_sequence());
    assert_eq!(
        h.state.sequence().steps,
        vec![
            SequenceStep::new(Buttons::A, ms(100)),
            SequenceStep::new(Buttons::NONE, ms(200)),
        ]
    );
}

#[test]
fn test_repeat_replaces_running_playback() {
    let mut h = connected_harness();
    h.state.replace_sequence(ButtonSequence::new(vec![SequenceStep::new(
        Buttons::X,
        Duration::from_millis(10),
    )]));
    h.state.send_command(Command::TogglePlayback);
    h.manager.tick(Instant::now());
    assert!(h.state.is_playing());

    h.state.send_command(Command::ToggleRepeat);
    h.manager.tick(Instant::now());
    assert_eq!(h.state.repeat_status(), RepeatStatus::Armed);

    h.physical.press(Buttons::Y);
    h.manager.tick(Instant::now());
    assert_eq!(h.state.repeat_status(), RepeatStatus::Running(Buttons::Y));
    assert!(!h.state.is_playing());

    h.manager.shutdown();
}

#[test]
fn test_recording_ignored_during_playback() {
    let mut h = connected_harness();
    let t0 = Instant::now();
    h.state.replace_sequence(ButtonSequence::new(vec![SequenceStep::new(
        Buttons::B,
        Duration::from_millis(10),
    )]));
    h.state.send_command(Command::TogglePlayback);
    h.manager.tick(t0);
    assert!(h.state.is_playing());

    h.state.send_command(Command::ToggleRecording);
    h.manager.tick(t0 + Duration::from_millis(10));
    assert!(!h.state.is_recording());

    h.physical.set(Some(triggers_held()));
    h.manager.tick(t0 + Duration::from_millis(100));
    h.manager.tick(t0 + Duration::from_millis(1100));
    assert!(!h.state.is_recording());
    assert!(h.state.is_playing());
    assert_eq!(h.state.sequence().len(), 1);

    h.manager.shutdown();
}

#[test]
fn test_playback_ignored_while_recording() {
    let mut h = connected_harness();
    let t0 = Instant::now();

    h.state.send_command(Command::ToggleRecording);
    h.manager.tick(t0);
    h.physical.press(Buttons::A);
    h.manager.tick(t0 + Duration::from_millis(50));

    h.state.send_command(Command::TogglePlayback);
    h.manager.tick(t0 + Duration::from_millis(100));
    assert!(!h.state.is_playing());

    h.physical.press(Buttons::LEFT_THUMB | Buttons::RIGHT_THUMB);
    h.manager.tick(t0 + Duration::from_millis(150));
    assert!(!h.state.is_playing());
    assert!(h.state.is_recording());
}

/// Virtual pad whose bus refuses new targets.
struct BrokenBusPad;

impl VirtualPad for BrokenBusPad {
    fn plug_in(&mut self) -> anyhow::Result<()> {
        anyhow::bail!("bus unavailable")
    }

    fn unplug(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn submit(&mut self, _report: &GamepadState) -> anyhow::Result<()> {
        anyhow::bail!("not plugged in")
    }
}

#[test]
fn test_failed_plug_in_leaves_virtual_disconnected() {
    let state = Arc::new(AppState::new(&AppConfig::default()));
    let physical = ScriptedPad::default();
    let mut manager = ControllerManager::new(
        state.clone(),
        Box::new(physical.clone()),
        Box::new(BrokenBusPad),
        fast_settings(),
    );

    physical.press(Buttons::A);
    manager.tick(Instant::now());

    assert!(state.is_physical_connected());
    assert!(!state.is_virtual_connected());
}
