// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Constant-velocity fling across one item transition.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::rotation::DEGREES_PER_ITEM;

/// A running fling.
///
/// The fling moves the rotation at a constant angular velocity until it
/// reaches either end of the transition it started in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fling {
    velocity: f64,
    min: f64,
    max: f64,
    last_time: u64,
}

/// Result of advancing a [`Fling`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlingStep {
    /// New rotation, within the fling bounds.
    pub rotation: f64,
    /// `true` once a bound was reached.
    pub finished: bool,
}

impl Fling {
    /// Start a fling at `rotation` with `velocity` degrees per second.
    ///
    /// The speed is raised to at least `min_velocity`, keeping its sign. The
    /// bounds are the transition containing `rotation`. Returns `None` when
    /// `rotation` sits exactly on an item, where there is nothing to fling
    /// across.
    pub fn start(rotation: f64, velocity: f64, min_velocity: f64, now: u64) -> Option<Self> {
        if rotation % DEGREES_PER_ITEM == 0.0 || !rotation.is_finite() {
            return None;
        }
        let velocity = match velocity {
            v if v.abs() >= min_velocity => v,
            v if v < 0.0 => -min_velocity,
            _ => min_velocity,
        };
        let min = (rotation / DEGREES_PER_ITEM).floor() * DEGREES_PER_ITEM;
        Some(Self {
            velocity,
            min,
            max: min + DEGREES_PER_ITEM,
            last_time: now,
        })
    }

    /// Angular velocity in degrees per second.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Lower and upper rotation bounds.
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Advance from `rotation` to `now` (milliseconds).
    #[allow(clippy::cast_precision_loss, reason = "Frame deltas are small")]
    pub fn step(&mut self, rotation: f64, now: u64) -> FlingStep {
        let elapsed = now.saturating_sub(self.last_time);
        self.last_time = now;
        let rotation =
            (rotation + self.velocity / 1000.0 * elapsed as f64).clamp(self.min, self.max);
        FlingStep {
            rotation,
            finished: rotation <= self.min || rotation >= self.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_on_item_boundary() {
        assert_eq!(Fling::start(0.0, 700.0, 600.0, 0), None);
        assert_eq!(Fling::start(360.0, -700.0, 600.0, 0), None);
        assert!(Fling::start(360.5, -700.0, 600.0, 0).is_some());
    }

    #[test]
    fn slow_flings_are_raised_to_minimum_speed() {
        let fling = Fling::start(30.0, -100.0, 600.0, 0).unwrap();
        assert_eq!(fling.velocity(), -600.0);
        let fling = Fling::start(30.0, 900.0, 600.0, 0).unwrap();
        assert_eq!(fling.velocity(), 900.0);
    }

    #[test]
    fn integrates_until_bound() {
        let mut fling = Fling::start(30.0, 700.0, 600.0, 1000).unwrap();
        assert_eq!(fling.bounds(), (0.0, 180.0));

        let step = fling.step(30.0, 1100);
        assert!((step.rotation - 100.0).abs() < 1e-9);
        assert!(!step.finished);

        let step = fling.step(step.rotation, 1200);
        assert_eq!(step.rotation, 170.0);
        assert!(!step.finished);

        let step = fling.step(step.rotation, 1300);
        assert_eq!(step.rotation, 180.0);
        assert!(step.finished);
    }

    #[test]
    fn backward_fling_stops_at_lower_bound() {
        let mut fling = Fling::start(200.0, -650.0, 600.0, 0).unwrap();
        assert_eq!(fling.bounds(), (180.0, 360.0));
        let step = fling.step(200.0, 50);
        assert_eq!(step.rotation, 180.0);
        assert!(step.finished);
    }
}
