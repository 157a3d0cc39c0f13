//! Button gesture recognition.
//!
//! Classifies a raw button level into debounced edges and higher-level
//! gestures using elapsed-time windows only. The classification policy is
//! mode-independent and runs once per tick:
//!
//! 1. debounce the raw level,
//! 2. detect press/release edges,
//! 3. classify a release held past the long-press threshold immediately,
//! 4. otherwise disambiguate tap vs. double tap against the pending-tap
//!    window,
//! 5. resolve a pending tap whose window expired with no second tap.
//!
//! Edge timestamps use the raw change time rather than the acceptance time,
//! so press durations and tap windows are not inflated by the debounce
//! window.

use crate::config::GestureCfg;

/// At most one gesture is produced per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Debounced transition to pressed.
    PressStart,
    /// Short release that armed a pending tap; informational.
    ReleaseShort,
    /// Release after a hold of at least the long-press threshold. Cancels a
    /// pending tap without resolving it.
    ReleaseLong,
    /// Second short release inside the double-press window.
    DoubleTap,
    /// A pending tap's window expired with no second tap.
    TapTimeout,
}

/// Debounce and tap-window bookkeeping. Owned by the recognizer, mutated
/// every tick, never persisted.
#[derive(Debug)]
pub struct GestureRecognizer {
    cfg: GestureCfg,
    last_raw: bool,
    debounced: bool,
    last_change_ms: u64,
    press_start_ms: u64,
    awaiting_second_tap: bool,
    first_tap_ms: u64,
}

impl GestureRecognizer {
    pub fn new(cfg: GestureCfg) -> Self {
        Self {
            cfg,
            last_raw: false,
            debounced: false,
            last_change_ms: 0,
            press_start_ms: 0,
            awaiting_second_tap: false,
            first_tap_ms: 0,
        }
    }

    /// Whether a short tap is waiting for a second tap or a timeout.
    pub fn tap_pending(&self) -> bool {
        self.awaiting_second_tap
    }

    /// Run the per-tick classification policy.
    pub fn update(&mut self, raw_pressed: bool, now_ms: u64) -> Option<Gesture> {
        if raw_pressed != self.last_raw {
            self.last_change_ms = now_ms;
            self.last_raw = raw_pressed;
        }

        let mut out = None;
        let stable_for = now_ms.saturating_sub(self.last_change_ms);
        if raw_pressed != self.debounced && stable_for >= self.cfg.debounce_ms {
            self.debounced = raw_pressed;
            if raw_pressed {
                self.press_start_ms = self.last_change_ms;
                out = Some(Gesture::PressStart);
            } else {
                out = Some(self.classify_release(self.last_change_ms));
            }
        }

        // Deferred single-tap resolution. Held off while a press is in
        // progress: that press either becomes the second tap, or a long press
        // that cancels the pending tap outright.
        if out.is_none()
            && !self.debounced
            && self.awaiting_second_tap
            && now_ms.saturating_sub(self.first_tap_ms) > self.cfg.double_press_window_ms
        {
            self.awaiting_second_tap = false;
            out = Some(Gesture::TapTimeout);
        }
        out
    }

    fn classify_release(&mut self, released_ms: u64) -> Gesture {
        let held = released_ms.saturating_sub(self.press_start_ms);
        if held >= self.cfg.long_press_ms {
            self.awaiting_second_tap = false;
            return Gesture::ReleaseLong;
        }
        if self.awaiting_second_tap {
            let since_first = released_ms.saturating_sub(self.first_tap_ms);
            if since_first <= self.cfg.double_press_window_ms {
                self.awaiting_second_tap = false;
                return Gesture::DoubleTap;
            }
            // The window closed while this press was in progress: the stale
            // tap resolves now and this release arms a fresh one.
            self.first_tap_ms = released_ms;
            return Gesture::TapTimeout;
        }
        self.awaiting_second_tap = true;
        self.first_tap_ms = released_ms;
        Gesture::ReleaseShort
    }
}
