use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use servotune_core::mocks::{
    ActuatorLog, FakeActuator, LastFrameDisplay, MemoryStore, SharedButton, SharedSensor,
};
use servotune_core::{CalibrationTable, Gesture, ModeKind, PulseRange, TickReport, Tuner};
use servotune_traits::{Clock, Glyph};

/// Deterministic clock advanced manually by the test.
#[derive(Clone)]
struct ManualClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }
    fn advance(&self, d: Duration) {
        *self.offset.lock().unwrap() += d;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock().unwrap()
    }
    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

const TICK_MS: u64 = 5;

struct Rig {
    tuner: Tuner,
    pot: Rc<Cell<u16>>,
    btn: Rc<Cell<bool>>,
    act: Rc<RefCell<ActuatorLog>>,
    frame: Rc<Cell<Option<[Glyph; 3]>>>,
    store: Rc<RefCell<Option<[u8; 12]>>>,
    clock: ManualClock,
    reports: Vec<TickReport>,
}

fn rig_with_pot(pot_value: u16) -> Rig {
    let sensor = SharedSensor::new(pot_value);
    let button = SharedButton::default();
    let actuator = FakeActuator::default();
    let display = LastFrameDisplay::default();
    let store = MemoryStore::preloaded(
        CalibrationTable::factory(CalibrationTable::FACTORY_RANGE).encode(),
    );
    let clock = ManualClock::new();

    let tuner = Tuner::builder()
        .with_sensor(sensor.clone())
        .with_button(button.clone())
        .with_actuator(actuator.clone())
        .with_display(display.clone())
        .with_store(store.clone())
        .with_clock(Box::new(clock.clone()))
        .try_build()
        .expect("build tuner");

    Rig {
        tuner,
        pot: sensor.handle(),
        btn: button.handle(),
        act: actuator.log(),
        frame: display.handle(),
        store: store.handle(),
        clock,
        reports: Vec::new(),
    }
}

impl Rig {
    fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            let report = self.tuner.tick().expect("tick");
            self.reports.push(report);
            self.clock.advance(Duration::from_millis(TICK_MS));
        }
    }

    /// Press and release quickly enough to read as a short tap.
    fn tap(&mut self) {
        self.btn.set(true);
        self.ticks(13);
        self.btn.set(false);
        self.ticks(13);
    }

    /// Tap, then wait out the double-press window so the timeout fires.
    fn tap_and_wait(&mut self) {
        self.tap();
        self.ticks(70);
    }

    fn long_press(&mut self) {
        self.btn.set(true);
        self.ticks(215);
        self.btn.set(false);
        self.ticks(13);
    }

    fn gestures(&self) -> Vec<Gesture> {
        self.reports.iter().filter_map(|r| r.gesture).collect()
    }

    fn report_for(&self, wanted: Gesture) -> &TickReport {
        self.reports
            .iter()
            .find(|r| r.gesture == Some(wanted))
            .expect("gesture not observed")
    }
}

#[test]
fn startup_attaches_active_slot_and_takes_mid_posture() {
    let mut rig = rig_with_pot(900);
    rig.tuner.startup().unwrap();
    let log = rig.act.borrow();
    assert_eq!(log.attached, Some((600, 2400)));
    assert_eq!(log.pulse_us, 1500);
}

#[test]
fn manual_mode_converges_to_mapped_reading_without_overshoot() {
    let mut rig = rig_with_pot(900);
    rig.tuner.startup().unwrap();

    // 900/1023 over [600, 2400] maps to 2183; 683 µs at 10 µs per tick.
    rig.ticks(69);
    assert_eq!(rig.tuner.current_pulse(), 2183);

    {
        let log = rig.act.borrow();
        let travel = &log.commands[1..]; // skip the startup posture
        assert!(travel.windows(2).all(|w| w[0] < w[1]), "monotonic approach");
        assert!(travel.iter().all(|&p| p <= 2183), "no overshoot");
    }

    // converged: no further commands are issued
    let issued = rig.act.borrow().commands.len();
    rig.ticks(5);
    assert_eq!(rig.tuner.current_pulse(), 2183);
    assert_eq!(rig.act.borrow().commands.len(), issued);

    // display shows the angle over the active range: 2183 -> 158 degrees
    assert_eq!(
        rig.frame.get().unwrap(),
        [Glyph::Digit(1), Glyph::Digit(5), Glyph::Digit(8)]
    );
}

#[test]
fn double_tap_toggles_between_manual_and_sweep() {
    let mut rig = rig_with_pot(512);
    rig.tuner.startup().unwrap();
    rig.ticks(5);

    rig.tap();
    rig.tap();
    assert_eq!(rig.report_for(Gesture::DoubleTap).mode, ModeKind::Sweep);
    assert_eq!(rig.tuner.mode_kind(), ModeKind::Sweep);

    // sweep steps forward by 10 µs on its cadence, display shows the cadence
    let before = rig.act.borrow().pulse_us;
    rig.ticks(20);
    let after = rig.act.borrow().pulse_us;
    assert!(after > before);
    assert_eq!(
        rig.frame.get().unwrap(),
        [Glyph::Blank, Glyph::Digit(1), Glyph::Digit(5)]
    );

    rig.reports.clear();
    rig.tap();
    rig.tap();
    assert_eq!(rig.report_for(Gesture::DoubleTap).mode, ModeKind::Manual);
    assert_eq!(rig.tuner.mode_kind(), ModeKind::Manual);
}

#[test]
fn long_press_centers_once_then_tracks_again() {
    let mut rig = rig_with_pot(900);
    rig.tuner.startup().unwrap();
    rig.ticks(69);
    assert_eq!(rig.tuner.current_pulse(), 2183);

    rig.long_press();
    let centered = rig.report_for(Gesture::ReleaseLong);
    assert_eq!(centered.mode, ModeKind::Center);
    assert_eq!(centered.pulse_us, 1500);

    // the one-shot falls back to manual tracking toward the pot
    assert_eq!(rig.tuner.mode_kind(), ModeKind::Manual);
    rig.ticks(80);
    assert_eq!(rig.tuner.current_pulse(), 2183);
}

#[test]
fn tap_timeout_enters_calibration_with_live_slot_preview() {
    let mut rig = rig_with_pot(100);
    rig.tuner.startup().unwrap();

    rig.tap_and_wait();
    assert_eq!(rig.report_for(Gesture::TapTimeout).mode, ModeKind::Calibrate);
    assert_eq!(
        rig.frame.get().unwrap(),
        [Glyph::UpperC, Glyph::Dash, Glyph::Digit(0)]
    );

    // the slot preview follows the pot while selecting
    rig.pot.set(900);
    rig.ticks(2);
    assert_eq!(
        rig.frame.get().unwrap(),
        [Glyph::UpperC, Glyph::Dash, Glyph::Digit(2)]
    );
}

#[test]
fn full_calibration_session_persists_ordered_endpoints() {
    let mut rig = rig_with_pot(900); // slot 2 band
    rig.tuner.startup().unwrap();

    // enter calibration, then lock the slot
    rig.tap_and_wait();
    assert_eq!(rig.tuner.mode_kind(), ModeKind::Calibrate);
    rig.tap_and_wait();

    // locking reattached with the full hardware envelope
    {
        let log = rig.act.borrow();
        assert_eq!(log.attached, Some((400, 2600)));
        assert!(log.detach_calls >= 1);
    }

    // drive to the low endpoint and capture it: 100 -> 615 µs over the envelope
    rig.pot.set(100);
    rig.ticks(400);
    assert_eq!(rig.tuner.current_pulse(), 615);
    rig.tap_and_wait();

    // drive to the high endpoint and capture it: 900 -> 2335 µs
    rig.pot.set(900);
    rig.ticks(400);
    assert_eq!(rig.tuner.current_pulse(), 2335);
    rig.reports.clear();
    rig.tap_and_wait();

    // session complete: back to manual, slot 2 active, record persisted
    assert_eq!(rig.tuner.mode_kind(), ModeKind::Manual);
    assert_eq!(rig.tuner.active_slot(), 2);
    let record = (*rig.store.borrow()).expect("record written");
    let table =
        CalibrationTable::decode(&record, CalibrationTable::FACTORY_RANGE).expect("decode");
    let slot = table.slot(2);
    assert_eq!(
        slot,
        PulseRange {
            min_us: 615,
            max_us: 2335
        }
    );
    assert!(slot.min_us < slot.max_us);

    // actuator now clamps to the freshly calibrated range
    assert_eq!(rig.act.borrow().attached, Some((615, 2335)));

    // the display holds the confirmation frame, then returns to the angle
    assert_eq!(rig.frame.get().unwrap(), servotune_core::CONFIRM_FRAME);
    rig.ticks(170);
    assert_ne!(rig.frame.get().unwrap(), servotune_core::CONFIRM_FRAME);
}

#[test]
fn long_press_while_selecting_commits_slot_without_touching_endpoints() {
    let mut rig = rig_with_pot(512); // slot 1 band
    rig.tuner.startup().unwrap();

    rig.tap_and_wait();
    assert_eq!(rig.tuner.mode_kind(), ModeKind::Calibrate);

    let before = *rig.store.borrow();
    rig.long_press();
    assert_eq!(rig.tuner.mode_kind(), ModeKind::Manual);
    assert_eq!(rig.tuner.active_slot(), 1);
    // abandoned session persisted nothing
    assert_eq!(*rig.store.borrow(), before);

    let timeouts = rig
        .gestures()
        .iter()
        .filter(|g| **g == Gesture::TapTimeout)
        .count();
    assert_eq!(timeouts, 1, "only the calibrate entry resolved by timeout");
}

#[test]
fn unreadable_store_falls_back_to_factory_defaults() {
    let sensor = SharedSensor::new(512);
    let button = SharedButton::default();
    let actuator = FakeActuator::default();
    let display = LastFrameDisplay::default();
    let store = MemoryStore::default(); // reads fail until first write

    let tuner = Tuner::builder()
        .with_sensor(sensor)
        .with_button(button)
        .with_actuator(actuator)
        .with_display(display)
        .with_store(store)
        .try_build()
        .expect("build tuner");

    let factory = CalibrationTable::factory(CalibrationTable::FACTORY_RANGE);
    assert_eq!(*tuner.table(), factory);
}
