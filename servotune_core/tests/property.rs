use proptest::prelude::*;
use servotune_core::motion::advance;
use servotune_core::{Gesture, GestureCfg, GestureRecognizer};

proptest! {
    /// Repeated smoothing reaches the target in at most
    /// ceil(|target - current| / step) calls, approaches monotonically, never
    /// overshoots, and is a no-op once there.
    #[test]
    fn smoother_converges_within_bound(
        start in 0u16..3000,
        target in 0u16..3000,
        step in 1u16..64,
    ) {
        let bound = u32::from(start.abs_diff(target)).div_ceil(u32::from(step));
        let mut current = start;
        let mut calls = 0u32;
        while current != target {
            let next = advance(current, target, step);
            if start <= target {
                prop_assert!(next > current && next <= target);
            } else {
                prop_assert!(next < current && next >= target);
            }
            current = next;
            calls += 1;
            prop_assert!(calls <= bound);
        }
        prop_assert_eq!(advance(current, target, step), target);
    }
}

prop_compose! {
    /// Sequences of short taps: (hold, gap-before-next) in milliseconds.
    /// Holds are long enough to debounce and short of the long-press
    /// threshold; gaps leave room for the release to debounce.
    fn taps_strategy()(taps in prop::collection::vec((60u64..400, 60u64..600), 1..8)) -> Vec<(u64, u64)> {
        taps
    }
}

proptest! {
    /// Every short tap is resolved exactly once: as half of a double tap or
    /// by its own timeout, never both, never neither.
    #[test]
    fn every_tap_resolves_exactly_once(taps in taps_strategy()) {
        let mut rec = GestureRecognizer::new(GestureCfg::default());
        let mut doubles = 0usize;
        let mut timeouts = 0usize;
        let mut drive = |rec: &mut GestureRecognizer, pressed: bool, from: u64, to: u64| {
            for t in from..to {
                match rec.update(pressed, t) {
                    Some(Gesture::DoubleTap) => doubles += 1,
                    Some(Gesture::TapTimeout) => timeouts += 1,
                    Some(Gesture::ReleaseLong) => panic!("no long press generated"),
                    _ => {}
                }
            }
        };

        let mut t = 0u64;
        for &(hold, gap) in &taps {
            drive(&mut rec, true, t, t + hold);
            t += hold;
            drive(&mut rec, false, t, t + gap);
            t += gap;
        }
        // let any pending tap time out
        drive(&mut rec, false, t, t + 500);

        prop_assert_eq!(2 * doubles + timeouts, taps.len());
    }
}
