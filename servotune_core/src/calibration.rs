//! Calibrated travel ranges and their persisted form.
//!
//! Three independent min/max pulse pairs ("slots") are kept in a fixed
//! 12-byte record: all three minimums, then all three maximums, u16
//! little-endian. The record carries no checksum; safety comes from seeding
//! the store with factory defaults before first read and from sanitizing
//! whatever comes back.

use servotune_traits::{CalibrationStore, RECORD_LEN};

pub const SLOT_COUNT: usize = 3;

/// Commanded pulse at startup, before any mode has driven the actuator.
pub const STARTUP_PULSE_US: u16 = 1500;

/// One calibrated travel range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseRange {
    pub min_us: u16,
    pub max_us: u16,
}

impl PulseRange {
    pub fn midpoint(self) -> u16 {
        self.min_us + (self.max_us - self.min_us) / 2
    }

    pub fn clamp(self, pulse_us: u16) -> u16 {
        pulse_us.clamp(self.min_us, self.max_us)
    }

    /// A slot is usable when its bounds are strictly ordered and sit inside
    /// the hardware envelope.
    pub fn is_valid_within(self, envelope: Envelope) -> bool {
        self.min_us < self.max_us
            && self.min_us >= envelope.min_us
            && self.max_us <= envelope.max_us
    }
}

/// Hardware-safe absolute pulse bounds, wider than any slot's range. Passed
/// to the actuator during endpoint capture so captured pulses are clamped by
/// hardware limits only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    pub min_us: u16,
    pub max_us: u16,
}

impl Envelope {
    pub fn as_range(self) -> PulseRange {
        PulseRange {
            min_us: self.min_us,
            max_us: self.max_us,
        }
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            min_us: 400,
            max_us: 2600,
        }
    }
}

/// The three-slot calibration table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationTable {
    slots: [PulseRange; SLOT_COUNT],
    factory: PulseRange,
}

impl CalibrationTable {
    pub const FACTORY_RANGE: PulseRange = PulseRange {
        min_us: 600,
        max_us: 2400,
    };

    /// All slots at the given factory-default range.
    pub fn factory(range: PulseRange) -> Self {
        Self {
            slots: [range; SLOT_COUNT],
            factory: range,
        }
    }

    pub fn slot(&self, idx: usize) -> PulseRange {
        self.slots[idx]
    }

    pub fn set_slot(&mut self, idx: usize, range: PulseRange) {
        self.slots[idx] = range;
    }

    /// Serialize to the fixed 12-byte record.
    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut out = [0u8; RECORD_LEN];
        for (i, slot) in self.slots.iter().enumerate() {
            out[2 * i..2 * i + 2].copy_from_slice(&slot.min_us.to_le_bytes());
            out[6 + 2 * i..6 + 2 * i + 2].copy_from_slice(&slot.max_us.to_le_bytes());
        }
        out
    }

    /// Deserialize from a record. `None` only when the length is wrong;
    /// content is not judged here (see `sanitized`).
    pub fn decode(bytes: &[u8], factory: PulseRange) -> Option<Self> {
        if bytes.len() != RECORD_LEN {
            return None;
        }
        let mut slots = [factory; SLOT_COUNT];
        for (i, slot) in slots.iter_mut().enumerate() {
            let min_us = u16::from_le_bytes([bytes[2 * i], bytes[2 * i + 1]]);
            let max_us = u16::from_le_bytes([bytes[6 + 2 * i], bytes[6 + 2 * i + 1]]);
            *slot = PulseRange { min_us, max_us };
        }
        Some(Self { slots, factory })
    }

    /// Replace every slot that is unusable under `envelope` with the factory
    /// range. Returns whether anything was replaced.
    pub fn sanitize(&mut self, envelope: Envelope) -> bool {
        let mut replaced = false;
        for slot in &mut self.slots {
            if !slot.is_valid_within(envelope) {
                *slot = self.factory;
                replaced = true;
            }
        }
        replaced
    }
}

/// Map a sensor reading onto a slot index by splitting the raw range into
/// three equal bands (low/mid/high).
pub fn slot_for_reading(reading: u16, full_scale: u16) -> usize {
    let scale = u32::from(full_scale) + 1;
    let band = u32::from(reading.min(full_scale)) * SLOT_COUNT as u32 / scale;
    band as usize
}

/// Load the table from the store, falling back to factory defaults when the
/// record is unreadable and replacing individually unusable slots.
pub fn load_table<S: CalibrationStore + ?Sized>(
    store: &mut S,
    factory: PulseRange,
    envelope: Envelope,
) -> CalibrationTable {
    let mut table = match store.read_record() {
        Ok(bytes) => CalibrationTable::decode(&bytes, factory)
            .unwrap_or_else(|| CalibrationTable::factory(factory)),
        Err(e) => {
            tracing::warn!(error = %e, "calibration record unavailable; using factory defaults");
            CalibrationTable::factory(factory)
        }
    };
    if table.sanitize(envelope) {
        tracing::warn!("replaced out-of-envelope calibration slots with factory defaults");
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout_is_mins_then_maxes_le() {
        let mut table = CalibrationTable::factory(CalibrationTable::FACTORY_RANGE);
        table.set_slot(
            1,
            PulseRange {
                min_us: 0x0102,
                max_us: 0x0304,
            },
        );
        let bytes = table.encode();
        // slot 1 min at offset 2, max at offset 8
        assert_eq!(&bytes[2..4], &[0x02, 0x01]);
        assert_eq!(&bytes[8..10], &[0x04, 0x03]);
    }

    #[test]
    fn tri_section_covers_full_scale() {
        assert_eq!(slot_for_reading(0, 1023), 0);
        assert_eq!(slot_for_reading(341, 1023), 0);
        assert_eq!(slot_for_reading(342, 1023), 1);
        assert_eq!(slot_for_reading(682, 1023), 1);
        assert_eq!(slot_for_reading(683, 1023), 2);
        assert_eq!(slot_for_reading(1023, 1023), 2);
        // readings past full scale stay in the top band
        assert_eq!(slot_for_reading(u16::MAX, 1023), 2);
    }

    #[test]
    fn sanitize_replaces_inverted_and_out_of_envelope_slots() {
        let envelope = Envelope::default();
        let factory = CalibrationTable::FACTORY_RANGE;
        let mut table = CalibrationTable::factory(factory);
        table.set_slot(
            0,
            PulseRange {
                min_us: 2000,
                max_us: 900,
            },
        );
        table.set_slot(
            2,
            PulseRange {
                min_us: 100,
                max_us: 2400,
            },
        );
        assert!(table.sanitize(envelope));
        assert_eq!(table.slot(0), factory);
        assert_eq!(table.slot(2), factory);
        // untouched slot survives
        assert_eq!(table.slot(1), factory);
        assert!(!table.sanitize(envelope));
    }
}
