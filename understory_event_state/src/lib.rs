// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: small state machines for pointer interaction.
//!
//! Widgets that react to raw pointer streams tend to re-implement the same
//! bookkeeping: "has this press travelled far enough to count as a drag?",
//! "how fast was the pointer moving when it was released?", and "did the host
//! just hand me the same event twice?". This crate provides those pieces as
//! plain data structures driven by explicit positions and millisecond
//! timestamps, so they can be tested deterministically and shared across UI
//! stacks.
//!
//! - [`drag::DragState`]: promotes a press into a vertical drag once the
//!   pointer travels past a slop distance, and reports taps vs. drag ends.
//! - [`velocity::VelocityTracker`]: estimates release velocity from recent
//!   pointer samples.
//! - [`dedup::EventDedup`]: filters the same physical event delivered
//!   through more than one dispatch phase.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::drag::{DragEnd, DragState};
//!
//! let mut drag = DragState::with_slop(8.0);
//! drag.on_down(Point::new(10.0, 100.0), 1000);
//!
//! // Small jitter is not a drag yet.
//! assert!(drag.on_move(Point::new(11.0, 104.0)).is_none());
//!
//! // Crossing the slop starts the drag at the current position.
//! let step = drag.on_move(Point::new(11.0, 80.0)).unwrap();
//! assert!(step.started);
//! assert_eq!(step.distance(), 0.0);
//!
//! let step = drag.on_move(Point::new(11.0, 60.0)).unwrap();
//! assert_eq!(step.distance(), 20.0);
//!
//! assert!(matches!(drag.on_up(Point::new(11.0, 60.0), 1100), DragEnd::Drag(_)));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod dedup;
pub mod drag;
pub mod velocity;
