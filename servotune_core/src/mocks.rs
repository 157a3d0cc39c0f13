//! Test and helper mocks for servotune_core.
//!
//! All of them hand out shared handles (`Rc<Cell<_>>` / `Rc<RefCell<_>>`) so
//! a test keeps control after the value moves into the controller.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use servotune_traits::{
    Actuator, Button, CalibrationStore, Display, Glyph, HwResult, PositionSensor, RECORD_LEN,
};

/// Sensor returning whatever the shared handle currently holds.
#[derive(Clone, Default)]
pub struct SharedSensor {
    value: Rc<Cell<u16>>,
}

impl SharedSensor {
    pub fn new(initial: u16) -> Self {
        Self {
            value: Rc::new(Cell::new(initial)),
        }
    }
    pub fn handle(&self) -> Rc<Cell<u16>> {
        Rc::clone(&self.value)
    }
}

impl PositionSensor for SharedSensor {
    fn read(&mut self) -> HwResult<u16> {
        Ok(self.value.get())
    }
}

/// Button whose level a test flips through the shared handle.
#[derive(Clone, Default)]
pub struct SharedButton {
    pressed: Rc<Cell<bool>>,
}

impl SharedButton {
    pub fn handle(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.pressed)
    }
}

impl Button for SharedButton {
    fn is_pressed(&mut self) -> HwResult<bool> {
        Ok(self.pressed.get())
    }
}

/// Snapshot of everything a `FakeActuator` has been asked to do.
#[derive(Debug, Default, Clone)]
pub struct ActuatorLog {
    pub attached: Option<(u16, u16)>,
    pub pulse_us: u16,
    pub commands: Vec<u16>,
    pub attach_calls: Vec<(u16, u16)>,
    pub detach_calls: usize,
}

/// Actuator that records commands and clamps them into the attach bounds,
/// like a real driver would.
#[derive(Clone, Default)]
pub struct FakeActuator {
    log: Rc<RefCell<ActuatorLog>>,
}

impl FakeActuator {
    pub fn log(&self) -> Rc<RefCell<ActuatorLog>> {
        Rc::clone(&self.log)
    }
}

impl Actuator for FakeActuator {
    fn attach(&mut self, min_pulse_us: u16, max_pulse_us: u16) -> HwResult<()> {
        let mut log = self.log.borrow_mut();
        log.attached = Some((min_pulse_us, max_pulse_us));
        log.attach_calls.push((min_pulse_us, max_pulse_us));
        Ok(())
    }
    fn detach(&mut self) -> HwResult<()> {
        let mut log = self.log.borrow_mut();
        log.attached = None;
        log.detach_calls += 1;
        Ok(())
    }
    fn command_pulse(&mut self, pulse_us: u16) -> HwResult<()> {
        let mut log = self.log.borrow_mut();
        let Some((min, max)) = log.attached else {
            return Err("commanded while detached".into());
        };
        let clamped = pulse_us.clamp(min, max);
        log.pulse_us = clamped;
        log.commands.push(clamped);
        Ok(())
    }
    fn current_pulse(&self) -> u16 {
        self.log.borrow().pulse_us
    }
}

/// Display keeping only the most recent frame.
#[derive(Clone, Default)]
pub struct LastFrameDisplay {
    frame: Rc<Cell<Option<[Glyph; 3]>>>,
}

impl LastFrameDisplay {
    pub fn handle(&self) -> Rc<Cell<Option<[Glyph; 3]>>> {
        Rc::clone(&self.frame)
    }
}

impl Display for LastFrameDisplay {
    fn show(&mut self, frame: [Glyph; 3]) -> HwResult<()> {
        self.frame.set(Some(frame));
        Ok(())
    }
}

/// In-memory store. Starts empty (reads fail) until something is written or
/// it is preloaded, mirroring a blank EEPROM.
#[derive(Clone, Default)]
pub struct MemoryStore {
    record: Rc<RefCell<Option<[u8; RECORD_LEN]>>>,
}

impl MemoryStore {
    pub fn preloaded(record: [u8; RECORD_LEN]) -> Self {
        Self {
            record: Rc::new(RefCell::new(Some(record))),
        }
    }
    pub fn handle(&self) -> Rc<RefCell<Option<[u8; RECORD_LEN]>>> {
        Rc::clone(&self.record)
    }
}

impl CalibrationStore for MemoryStore {
    fn read_record(&mut self) -> HwResult<[u8; RECORD_LEN]> {
        self.record
            .borrow()
            .as_ref()
            .copied()
            .ok_or_else(|| "empty store".into())
    }
    fn write_record(&mut self, record: &[u8; RECORD_LEN]) -> HwResult<()> {
        *self.record.borrow_mut() = Some(*record);
        Ok(())
    }
}
