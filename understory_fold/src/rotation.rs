// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The global rotation model.
//!
//! A single scalar `R` drives the whole list: every 180 degrees is one item
//! transition. [`FoldFrame`] decomposes `R` into the focus position, the local
//! angle, and the front/back assignment of the (at most) two live items.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Rotation covering one full item transition.
pub const DEGREES_PER_ITEM: f64 = 180.0;

/// Largest valid rotation for a list of `count` items.
#[allow(clippy::cast_precision_loss, reason = "Item counts are far below 2^52")]
pub fn max_rotation(count: usize) -> f64 {
    count.saturating_sub(1) as f64 * DEGREES_PER_ITEM
}

/// Clamp `rotation` into `[0, max_rotation(count)]`. NaN maps to zero.
pub fn clamp_rotation(rotation: f64, count: usize) -> f64 {
    if rotation.is_nan() {
        return 0.0;
    }
    rotation.clamp(0.0, max_rotation(count))
}

/// Rotation that shows `position` at rest.
#[allow(clippy::cast_precision_loss, reason = "Item counts are far below 2^52")]
pub fn rotation_for_position(position: usize) -> f64 {
    position as f64 * DEGREES_PER_ITEM
}

/// Position nearest to `rotation`, clamped to `[0, count - 1]`.
///
/// Returns 0 for an empty list.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is floored and clamped to a valid position first"
)]
pub fn nearest_position(rotation: f64, count: usize) -> usize {
    let last = count.saturating_sub(1);
    let nearest = ((rotation + DEGREES_PER_ITEM / 2.0) / DEGREES_PER_ITEM).floor();
    if nearest.is_nan() || nearest <= 0.0 {
        0
    } else {
        (nearest as usize).min(last)
    }
}

/// Decomposition of a clamped rotation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FoldFrame {
    /// The clamped global rotation.
    pub rotation: f64,
    /// The item the local angle belongs to.
    pub focus: usize,
    /// `rotation mod 180`, in `[0, 180)`.
    pub local: f64,
    /// Topmost item, if any.
    pub front: Option<usize>,
    /// Item drawn beneath the front one, if any.
    pub back: Option<usize>,
}

impl FoldFrame {
    /// Clamp `rotation` for a list of `count` items and decompose it.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "The quotient is a non-negative integer at most count - 1"
    )]
    pub fn new(rotation: f64, count: usize) -> Self {
        let rotation = clamp_rotation(rotation, count);
        let local = rotation % DEGREES_PER_ITEM;
        let focus = ((rotation - local) / DEGREES_PER_ITEM).round() as usize;
        let next = focus + 1;

        let (front, back) = if count == 0 {
            (None, None)
        } else if next >= count {
            (Some(focus), None)
        } else if local <= 90.0 {
            (Some(focus), Some(next))
        } else {
            (Some(next), Some(focus))
        };

        Self {
            rotation,
            focus,
            local,
            front,
            back,
        }
    }

    /// Live items and their local angles: the focus item at `local`, and the
    /// next one at `local - 180` when it exists.
    pub fn live_items(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        let focus = self.front.map(|_| (self.focus, self.local));
        let next = self.back.map(|_| (self.focus + 1, self.local - DEGREES_PER_ITEM));
        focus.into_iter().chain(next)
    }

    /// Local angle of `position`, if it is live.
    pub fn angle_of(&self, position: usize) -> Option<f64> {
        self.live_items()
            .find(|(live, _)| *live == position)
            .map(|(_, angle)| angle)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn clamp_holds_for_empty_and_single_lists() {
        assert_eq!(clamp_rotation(500.0, 0), 0.0);
        assert_eq!(clamp_rotation(500.0, 1), 0.0);
        assert_eq!(clamp_rotation(-5.0, 4), 0.0);
        assert_eq!(clamp_rotation(10_000.0, 4), 540.0);
        assert_eq!(clamp_rotation(f64::NAN, 4), 0.0);
    }

    #[test]
    fn front_back_follows_local_angle() {
        let eps = 1e-6;
        let cases = [
            (0.0, Some(0), Some(1)),
            (90.0, Some(0), Some(1)),
            (90.0 + eps, Some(1), Some(0)),
            (180.0 - eps, Some(1), Some(0)),
            (180.0, Some(1), Some(2)),
        ];
        for (rotation, front, back) in cases {
            let frame = FoldFrame::new(rotation, 3);
            assert_eq!(
                (frame.front, frame.back),
                (front, back),
                "rotation {rotation}"
            );
        }
    }

    #[test]
    fn two_items_at_rest() {
        let frame = FoldFrame::new(0.0, 2);
        assert_eq!(frame.focus, 0);
        assert_eq!(frame.local, 0.0);
        let live: Vec<_> = frame.live_items().collect();
        assert_eq!(live, [(0, 0.0), (1, -180.0)]);
    }

    #[test]
    fn last_item_has_no_partner() {
        let frame = FoldFrame::new(900.0, 3);
        assert_eq!(frame.rotation, 360.0);
        assert_eq!(frame.focus, 2);
        assert_eq!((frame.front, frame.back), (Some(2), None));
        assert_eq!(frame.live_items().count(), 1);
    }

    #[test]
    fn empty_list_has_no_live_items() {
        let frame = FoldFrame::new(42.0, 0);
        assert_eq!(frame.rotation, 0.0);
        assert_eq!(frame.live_items().count(), 0);
        assert_eq!(frame.angle_of(0), None);
    }

    #[test]
    fn angles_of_live_items() {
        let frame = FoldFrame::new(210.0, 5);
        assert_eq!(frame.focus, 1);
        assert_eq!(frame.angle_of(1), Some(30.0));
        assert_eq!(frame.angle_of(2), Some(-150.0));
        assert_eq!(frame.angle_of(0), None);
    }

    #[test]
    fn nearest_position_rounds_half_up_and_clamps() {
        assert_eq!(nearest_position(0.0, 4), 0);
        assert_eq!(nearest_position(89.0, 4), 0);
        assert_eq!(nearest_position(90.0, 4), 1);
        assert_eq!(nearest_position(-500.0, 4), 0);
        assert_eq!(nearest_position(10_000.0, 4), 3);
        assert_eq!(nearest_position(10.0, 0), 0);
    }
}
