#![no_main]
use libfuzzer_sys::fuzz_target;

use servotune_core::{CalibrationTable, Envelope};

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic, and whatever decodes must
    // sanitize into a table that is safe under the default envelope.
    if let Some(mut table) = CalibrationTable::decode(data, CalibrationTable::FACTORY_RANGE) {
        table.sanitize(Envelope::default());
        let envelope = Envelope::default();
        for idx in 0..servotune_core::SLOT_COUNT {
            let slot = table.slot(idx);
            assert!(slot.is_valid_within(envelope));
        }
        // a sanitized table always round-trips
        let bytes = table.encode();
        assert_eq!(
            CalibrationTable::decode(&bytes, CalibrationTable::FACTORY_RANGE),
            Some(table)
        );
    }
});
