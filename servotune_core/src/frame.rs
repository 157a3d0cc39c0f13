//! Display frame composition.

use servotune_traits::Glyph;

/// One refresh of the 3-digit display, leftmost glyph first.
pub type Frame = [Glyph; 3];

/// Shown briefly after a calibration session persists.
pub const CONFIRM_FRAME: Frame = [Glyph::UpperC, Glyph::UpperC, Glyph::UpperC];

/// Render a value 0..=999 with leading digits blanked.
pub fn number_frame(value: u16) -> Frame {
    let v = value.min(999);
    let hundreds = v / 100;
    let tens = (v / 10) % 10;
    let ones = v % 10;
    [
        if v >= 100 {
            Glyph::Digit(hundreds as u8)
        } else {
            Glyph::Blank
        },
        if v >= 10 {
            Glyph::Digit(tens as u8)
        } else {
            Glyph::Blank
        },
        Glyph::Digit(ones as u8),
    ]
}

/// `C-<n>` while choosing a calibration slot.
pub fn slot_select_frame(slot: usize) -> Frame {
    [Glyph::UpperC, Glyph::Dash, Glyph::Digit(slot as u8)]
}
