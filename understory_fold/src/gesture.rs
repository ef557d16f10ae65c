// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer events and the drag/release recognizer behind the fold gestures.

use kurbo::Point;
use tracing::trace;
use understory_event_state::drag::{DragEnd, DragState};
use understory_event_state::velocity::VelocityTracker;

/// Pointer event kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerAction {
    /// Pointer pressed.
    Down,
    /// Pointer moved while pressed.
    Move,
    /// Pointer released.
    Up,
    /// Gesture aborted by the host.
    Cancel,
}

/// A pointer event in list coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Event kind.
    pub action: PointerAction,
    /// Pointer position.
    pub position: Point,
    /// Event time in milliseconds.
    pub timestamp: u64,
}

impl PointerEvent {
    /// Create an event.
    pub fn new(action: PointerAction, position: Point, timestamp: u64) -> Self {
        Self {
            action,
            position,
            timestamp,
        }
    }

    /// A [`PointerAction::Down`] event.
    pub fn down(position: Point, timestamp: u64) -> Self {
        Self::new(PointerAction::Down, position, timestamp)
    }

    /// A [`PointerAction::Move`] event.
    pub fn moved(position: Point, timestamp: u64) -> Self {
        Self::new(PointerAction::Move, position, timestamp)
    }

    /// A [`PointerAction::Up`] event.
    pub fn up(position: Point, timestamp: u64) -> Self {
        Self::new(PointerAction::Up, position, timestamp)
    }

    /// A [`PointerAction::Cancel`] event.
    pub fn cancel(position: Point, timestamp: u64) -> Self {
        Self::new(PointerAction::Cancel, position, timestamp)
    }
}

/// What a pointer event means for the list.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Gesture {
    /// A press started.
    Press,
    /// The press has not travelled past the slop yet.
    Pending,
    /// The press is a drag; `distance` is the upward travel since the point
    /// where the drag started.
    Drag {
        /// Upward travel in pixels since the drag anchor.
        distance: f64,
        /// `true` on the event that promoted the press.
        started: bool,
    },
    /// A drag was released.
    Release {
        /// Vertical pointer velocity at release, pixels per second, positive
        /// downwards.
        velocity_y: f64,
    },
    /// A press was released without dragging.
    Tap,
    /// The host cancelled the gesture.
    Cancel {
        /// Whether the press had become a drag.
        was_dragging: bool,
    },
    /// The event did not belong to a press.
    Ignored,
}

/// Turns pointer events into [`Gesture`]s.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    drag: DragState,
    velocity: VelocityTracker,
    max_velocity: f64,
}

impl GestureTracker {
    /// Create a tracker with the given drag slop and velocity cap (pixels per
    /// second).
    pub fn new(slop: f64, max_velocity: f64) -> Self {
        Self {
            drag: DragState::with_slop(slop),
            velocity: VelocityTracker::new(),
            max_velocity,
        }
    }

    /// Returns `true` while a press is active.
    pub fn is_pressed(&self) -> bool {
        self.drag.is_pressed()
    }

    /// Returns `true` while the active press is a drag.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Drop the active press, if any.
    pub fn cancel(&mut self) {
        self.drag.cancel();
        self.velocity.reset();
    }

    /// Feed one pointer event.
    pub fn on_event(&mut self, event: PointerEvent) -> Gesture {
        let PointerEvent {
            action,
            position,
            timestamp,
        } = event;
        match action {
            PointerAction::Down => {
                self.velocity.reset();
                self.velocity.add_sample(timestamp, position.y);
                self.drag.on_down(position, timestamp);
                Gesture::Press
            }
            PointerAction::Move => {
                if !self.drag.is_pressed() {
                    return Gesture::Ignored;
                }
                self.velocity.add_sample(timestamp, position.y);
                match self.drag.on_move(position) {
                    Some(step) => {
                        trace!(distance = step.distance(), started = step.started, "drag");
                        Gesture::Drag {
                            distance: step.distance(),
                            started: step.started,
                        }
                    }
                    None => Gesture::Pending,
                }
            }
            PointerAction::Up => {
                if self.drag.is_pressed() {
                    self.velocity.add_sample(timestamp, position.y);
                }
                match self.drag.on_up(position, timestamp) {
                    DragEnd::Drag(_) => Gesture::Release {
                        velocity_y: self.velocity.velocity_with_max(self.max_velocity),
                    },
                    DragEnd::Tap(_) => Gesture::Tap,
                    DragEnd::None => Gesture::Ignored,
                }
            }
            PointerAction::Cancel => {
                let was_dragging = self.drag.is_dragging();
                if self.drag.cancel() {
                    self.velocity.reset();
                    Gesture::Cancel { was_dragging }
                } else {
                    Gesture::Ignored
                }
            }
        }
    }
}
