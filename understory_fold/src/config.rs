// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine tuning.

use understory_event_state::drag::DEFAULT_SLOP;

use crate::pool::MAX_LIVE_SLOTS;

/// Default multiplier from drag distance to rotation.
pub const DEFAULT_SCROLL_FACTOR: f64 = 1.33;

/// Minimum angular speed of a fling, in degrees per second.
pub const MIN_FLING_VELOCITY: f64 = 600.0;

/// Snap animation duration for one full item transition, in milliseconds.
pub const SNAP_DURATION_PER_ITEM_MS: u64 = 600;

/// Target interval between animation frames, in milliseconds.
pub const FRAME_INTERVAL_MS: u64 = 10;

/// Default auto-scale perspective strength.
pub const DEFAULT_PERSPECTIVE_STRENGTH: f64 = 8.0 / 48.0;

/// Default pointer velocity, in pixels per second, above which a release
/// counts as a fling.
pub const DEFAULT_FLING_DETECT_VELOCITY: f64 = 50.0;

/// Default cap on tracked pointer velocity, in pixels per second.
pub const DEFAULT_MAX_FLING_VELOCITY: f64 = 8000.0;

/// Tuning for a [`FoldList`](crate::FoldList).
///
/// Fields are read when the list is created; some have setters on the list
/// for runtime changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoldConfig {
    /// Maximum simultaneously bound slots. Values below 2 are raised to 2.
    pub max_live_slots: usize,
    /// Multiplier from drag distance (as a fraction of the viewport height)
    /// to item transitions.
    pub scroll_factor: f64,
    /// Vertical travel before a press becomes a drag, in pixels.
    pub touch_slop: f64,
    /// Minimum angular fling speed, in degrees per second.
    pub min_fling_velocity: f64,
    /// Pointer speed floor for recognizing a fling, in pixels per second.
    pub fling_detect_velocity: f64,
    /// Cap on tracked pointer speed, in pixels per second.
    pub max_fling_velocity: f64,
    /// Snap animation duration per 180 degrees, in milliseconds.
    pub snap_duration_per_item_ms: u64,
    /// Delay requested between animation frames, in milliseconds.
    pub frame_interval_ms: u64,
    /// How strongly auto-scale shrinks a folding item.
    pub perspective_strength: f64,
    /// Shrink folding items so they stay inside their bounds.
    pub auto_scale: bool,
    /// Whether pointer input drives the list.
    pub gestures_enabled: bool,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            max_live_slots: MAX_LIVE_SLOTS,
            scroll_factor: DEFAULT_SCROLL_FACTOR,
            touch_slop: DEFAULT_SLOP,
            min_fling_velocity: MIN_FLING_VELOCITY,
            fling_detect_velocity: DEFAULT_FLING_DETECT_VELOCITY,
            max_fling_velocity: DEFAULT_MAX_FLING_VELOCITY,
            snap_duration_per_item_ms: SNAP_DURATION_PER_ITEM_MS,
            frame_interval_ms: FRAME_INTERVAL_MS,
            perspective_strength: DEFAULT_PERSPECTIVE_STRENGTH,
            auto_scale: false,
            gestures_enabled: true,
        }
    }
}
