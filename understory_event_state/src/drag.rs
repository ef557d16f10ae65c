// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical drag recognition for a single pointer.
//!
//! A press only becomes a drag once the pointer has travelled further than a
//! configurable slop distance along the vertical axis. Until then the press is
//! still a tap candidate, which lets a container observe pointer input without
//! stealing taps from its children.
//!
//! ## Rules
//!
//! 1. `on_down` starts a new press, discarding any previous one.
//! 2. `on_move` promotes the press to a drag once `|down.y - y| > slop`.
//!    The drag's anchor is the position at promotion time, so the first
//!    reported [`DragStep::distance`] is zero and there is no jump.
//! 3. `on_up` ends the press as [`DragEnd::Tap`] if it was never promoted, or
//!    [`DragEnd::Drag`] otherwise.
//! 4. `cancel` drops the press without reporting anything.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

/// Default slop distance in logical pixels.
pub const DEFAULT_SLOP: f64 = 8.0;

/// State of an active press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Press {
    /// Pointer position at press time.
    pub down_position: Point,
    /// Timestamp when the press occurred, in milliseconds.
    pub down_time: u64,
    /// Position at which the press was promoted to a drag, if it was.
    pub drag_anchor: Option<Point>,
}

impl Press {
    /// Returns `true` if this press has been promoted to a drag.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }
}

/// One step of an active drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragStep {
    /// Position where the drag was promoted.
    pub anchor: Point,
    /// Current pointer position.
    pub current: Point,
    /// `true` on the move event that promoted the press.
    pub started: bool,
}

impl DragStep {
    /// Vertical distance travelled since the anchor, positive when moving up.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.anchor.y - self.current.y
    }
}

/// How a press ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEnd {
    /// The press never crossed the slop.
    Tap(Press),
    /// The press had been promoted to a drag.
    Drag(Press),
    /// There was no active press.
    None,
}

/// Slop-based vertical drag recognizer.
#[derive(Clone, Debug)]
pub struct DragState {
    /// Vertical travel required before a press is promoted to a drag.
    pub slop: f64,
    press: Option<Press>,
}

impl DragState {
    /// Create a drag state with [`DEFAULT_SLOP`].
    pub fn new() -> Self {
        Self::with_slop(DEFAULT_SLOP)
    }

    /// Create a drag state with a custom slop distance.
    ///
    /// Negative values are treated as zero.
    pub fn with_slop(slop: f64) -> Self {
        Self {
            slop: slop.max(0.0),
            press: None,
        }
    }

    /// Record a pointer down.
    pub fn on_down(&mut self, position: Point, timestamp: u64) {
        self.press = Some(Press {
            down_position: position,
            down_time: timestamp,
            drag_anchor: None,
        });
    }

    /// Record a pointer move.
    ///
    /// Returns `Some` once the press is a drag (including the promoting move),
    /// `None` while it is still a tap candidate or if there is no press.
    pub fn on_move(&mut self, position: Point) -> Option<DragStep> {
        let press = self.press.as_mut()?;
        let mut started = false;
        if press.drag_anchor.is_none() {
            let travelled = press.down_position.y - position.y;
            if travelled.abs() <= self.slop {
                return None;
            }
            press.drag_anchor = Some(position);
            started = true;
        }
        press.drag_anchor.map(|anchor| DragStep {
            anchor,
            current: position,
            started,
        })
    }

    /// Record a pointer up, ending the press.
    pub fn on_up(&mut self, _position: Point, _timestamp: u64) -> DragEnd {
        match self.press.take() {
            Some(press) if press.is_dragging() => DragEnd::Drag(press),
            Some(press) => DragEnd::Tap(press),
            None => DragEnd::None,
        }
    }

    /// Drop the active press.
    ///
    /// Returns `true` if a press was active.
    pub fn cancel(&mut self) -> bool {
        self.press.take().is_some()
    }

    /// Returns `true` while a press is active.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Returns `true` while the active press is a drag.
    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|press| press.is_dragging())
    }

    /// The active press, if any.
    pub fn press(&self) -> Option<&Press> {
        self.press.as_ref()
    }
}

impl Default for DragState {
    fn default() -> Self {
        Self::new()
    }
}
