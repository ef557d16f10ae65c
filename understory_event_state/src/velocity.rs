// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-dimensional release velocity estimation.
//!
//! [`VelocityTracker`] keeps a short ring of `(timestamp, position)` samples and
//! estimates velocity with an impulse model: each consecutive pair of samples
//! contributes kinetic energy, and the accumulated energy is converted back to
//! a signed velocity. Only samples within [`HORIZON_MS`] of the newest one are
//! used, and a gap longer than [`ASSUME_STOPPED_MS`] between samples is treated
//! as the pointer having come to rest.
//!
//! ```
//! use understory_event_state::velocity::VelocityTracker;
//!
//! let mut tracker = VelocityTracker::new();
//! for i in 0..5_u64 {
//!     // 2px per ms downwards.
//!     tracker.add_sample(i * 10, i as f64 * 20.0);
//! }
//! let v = tracker.velocity();
//! assert!((v - 2000.0).abs() < 1.0);
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

const HISTORY: usize = 20;

/// Samples older than this (relative to the newest) are ignored.
pub const HORIZON_MS: u64 = 100;

/// A gap between samples longer than this means the pointer had stopped.
pub const ASSUME_STOPPED_MS: u64 = 40;

#[derive(Clone, Copy, Debug, Default)]
struct Sample {
    time: u64,
    value: f64,
}

/// Impulse-based 1D velocity tracker, in units per second.
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    samples: [Option<Sample>; HISTORY],
    head: usize,
}

impl VelocityTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY],
            head: 0,
        }
    }

    /// Record the pointer position at `time` (milliseconds).
    pub fn add_sample(&mut self, time: u64, value: f64) {
        self.head = (self.head + 1) % HISTORY;
        self.samples[self.head] = Some(Sample { time, value });
    }

    /// Forget all samples.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY];
        self.head = 0;
    }

    /// Estimated velocity in units per second, or `0.0` with fewer than two
    /// usable samples.
    pub fn velocity(&self) -> f64 {
        let Some(newest) = self.samples[self.head] else {
            return 0.0;
        };

        // Collected newest-first: (age relative to newest, value).
        let mut ages = [0.0_f64; HISTORY];
        let mut values = [0.0_f64; HISTORY];
        let mut count = 0;
        let mut index = self.head;
        let mut previous = newest;
        while let Some(sample) = self.samples[index] {
            let age = newest.time.saturating_sub(sample.time);
            let gap = previous.time.abs_diff(sample.time);
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            ages[count] = -(age as f64);
            values[count] = sample.value;
            previous = sample;
            count += 1;
            if count == HISTORY {
                break;
            }
            index = if index == 0 { HISTORY - 1 } else { index - 1 };
        }

        if count < 2 {
            return 0.0;
        }
        impulse_velocity(&ages[..count], &values[..count]) * 1000.0
    }

    /// Estimated velocity clamped to `[-max, max]`.
    ///
    /// Returns `0.0` if `max` is not a positive finite number.
    pub fn velocity_with_max(&self, max: f64) -> f64 {
        if !max.is_finite() || max <= 0.0 {
            return 0.0;
        }
        let v = self.velocity();
        if v.is_nan() { 0.0 } else { v.clamp(-max, max) }
    }
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Velocity per millisecond from samples ordered newest-first.
fn impulse_velocity(ages: &[f64], values: &[f64]) -> f64 {
    let oldest = ages.len() - 1;
    let mut work = 0.0;
    for i in (1..=oldest).rev() {
        let dt = ages[i - 1] - ages[i];
        if dt == 0.0 {
            continue;
        }
        let v_curr = (values[i - 1] - values[i]) / dt;
        let v_prev = energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == oldest {
            work *= 0.5;
        }
    }
    energy_to_velocity(work)
}

fn energy_to_velocity(work: f64) -> f64 {
    work.signum() * (2.0 * work.abs()).sqrt()
}
