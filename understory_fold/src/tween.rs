// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Eased snap animation between two rotations.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::rotation::DEGREES_PER_ITEM;

/// Accelerate-decelerate easing: `cos((t + 1)π) / 2 + 0.5`.
pub fn accelerate_decelerate(t: f64) -> f64 {
    ((t + 1.0) * core::f64::consts::PI).cos() / 2.0 + 0.5
}

/// Duration of a snap from `from` to `to`, proportional to the distance.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "Durations are small non-negative millisecond counts"
)]
pub fn snap_duration(from: f64, to: f64, per_item_ms: u64) -> u64 {
    (per_item_ms as f64 * (to - from) / DEGREES_PER_ITEM).abs() as u64
}

/// A running snap animation.
///
/// The clock starts at the first sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapTween {
    from: f64,
    to: f64,
    duration_ms: u64,
    start: Option<u64>,
}

/// Result of sampling a [`SnapTween`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TweenSample {
    /// Rotation at the sampled time.
    pub rotation: f64,
    /// `true` once the target was reached.
    pub finished: bool,
}

impl SnapTween {
    /// Animate from `from` to `to` over `duration_ms`.
    pub fn new(from: f64, to: f64, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            duration_ms,
            start: None,
        }
    }

    /// Target rotation.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Sample the animation at `now` (milliseconds).
    #[allow(clippy::cast_precision_loss, reason = "Durations are small")]
    pub fn sample(&mut self, now: u64) -> TweenSample {
        let start = *self.start.get_or_insert(now);
        let elapsed = now.saturating_sub(start);
        if elapsed >= self.duration_ms {
            return TweenSample {
                rotation: self.to,
                finished: true,
            };
        }
        let t = elapsed as f64 / self.duration_ms as f64;
        TweenSample {
            rotation: self.from + (self.to - self.from) * accelerate_decelerate(t),
            finished: false,
        }
    }
}
