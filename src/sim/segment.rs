//! Keyframe bracketing
//!
//! Picks the keyframe a query time integrates from.

use super::shot::Keyframe;

/// Latest keyframe not after `elapsed`.
///
/// Returns `None` when there are no keyframes or `elapsed` is before the
/// first one; the ball then keeps its pre-shot state. The upper bound is
/// inclusive so a query exactly at a keyframe's time lands on that keyframe.
/// Keyframes are assumed chronological.
pub fn bracket(keyframes: &[Keyframe], elapsed: f64) -> Option<&Keyframe> {
    let (first, rest) = keyframes.split_first()?;
    if elapsed < first.time {
        return None;
    }

    let mut current = first;
    for frame in rest {
        if current.time < frame.time && frame.time <= elapsed {
            current = frame;
        }
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shot::{BallSnapshot, EventKind};
    use glam::DVec2;

    fn frames(times: &[f64]) -> Vec<Keyframe> {
        times
            .iter()
            .enumerate()
            .map(|(i, &time)| Keyframe {
                time,
                kind: EventKind::StateChange,
                snapshot: BallSnapshot::at_rest(DVec2::new(i as f64, 0.0)),
            })
            .collect()
    }

    fn index_at(keyframes: &[Keyframe], elapsed: f64) -> Option<f64> {
        bracket(keyframes, elapsed).map(|k| k.snapshot.position.x)
    }

    #[test]
    fn test_bracket_empty() {
        assert!(bracket(&[], 1.0).is_none());
    }

    #[test]
    fn test_bracket_before_first() {
        let keys = frames(&[0.2, 0.5]);
        assert_eq!(index_at(&keys, 0.1), None);
        assert_eq!(index_at(&keys, 0.2), Some(0.0));
    }

    #[test]
    fn test_bracket_inclusive_upper_bound() {
        let keys = frames(&[0.0, 0.5, 1.2]);
        assert_eq!(index_at(&keys, 0.49), Some(0.0));
        assert_eq!(index_at(&keys, 0.5), Some(1.0));
        assert_eq!(index_at(&keys, 1.19), Some(1.0));
        assert_eq!(index_at(&keys, 1.2), Some(2.0));
        assert_eq!(index_at(&keys, 9.0), Some(2.0));
    }

    #[test]
    fn test_bracket_equal_times_keep_earliest() {
        // A second keyframe at the same instant is not strictly later
        let keys = frames(&[0.0, 0.5, 0.5]);
        assert_eq!(index_at(&keys, 0.7), Some(1.0));
    }
}
