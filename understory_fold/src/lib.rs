// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_fold --heading-base-level=0

//! Understory Fold: a page-fold transition engine for vertical lists.
//!
//! Items are stacked vertically and hinged at their horizontal midline, so that
//! moving to the next item looks like folding a sheet of paper forward. The
//! whole list is driven by a single rotation scalar `R`; every 180 degrees is
//! one item transition.
//!
//! The core concepts are:
//!
//! - [`FoldFrame`]: decomposes `R` into the focus position, the local angle,
//!   and which of the (at most two) live items is in front.
//! - [`half_pose`] and [`half_source_rect`]: pure geometry mapping a local
//!   angle to per-half rotation, visibility, and clipping.
//! - [`SplitSurface`]: one item's raster cache, drawn as two independently
//!   rotating halves with optional [`FoldShading`].
//! - [`SlotPool`]: binds item positions to at most [`MAX_LIVE_SLOTS`]
//!   surfaces and recycles content views by [`ViewType`].
//! - [`FoldList`]: the engine. It owns the rotation, turns pointer drags into
//!   rotation changes, and runs snap and fling animations on host frames.
//!
//! This crate deliberately does **not** know about any particular UI framework.
//! Host frameworks are responsible for:
//!
//! - Supplying content through a [`FoldSource`].
//! - Providing raster buffers, redraws, and frame callbacks via [`FoldHost`].
//! - Drawing through a [`Canvas`], including the rotated blit of each half.
//! - Forwarding pointer events and calling [`FoldList::on_frame`] when a
//!   scheduled frame fires.
//!
//! ## Minimal example
//!
//! The rotation model on its own:
//!
//! ```rust
//! use understory_fold::{FoldFrame, Half, half_pose, normalize_angle};
//!
//! // Three items, a little past the middle of the first transition.
//! let frame = FoldFrame::new(120.0, 3);
//! assert_eq!(frame.focus, 0);
//! assert_eq!(frame.local, 120.0);
//!
//! // Past 90 degrees the next item is on top.
//! assert_eq!(frame.front, Some(1));
//! assert_eq!(frame.back, Some(0));
//!
//! // The focus item's bottom half has folded away; the next item's top half
//! // is rotating into view.
//! assert!(!half_pose(Half::Bottom, normalize_angle(120.0)).visible);
//! let top = half_pose(Half::Top, normalize_angle(120.0 - 180.0));
//! assert!(top.visible);
//! assert_eq!(top.rotation_x, -60.0);
//! ```
//!
//! ## Driving a list
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_fold::{
//!     FoldConfig, FoldHost, FoldList, FoldSource, FrameHandle, PointerEvent, Raster,
//!     RasterError, ViewType,
//! };
//!
//! struct Pages(usize);
//!
//! impl FoldSource for Pages {
//!     type View = usize;
//!     fn count(&self) -> usize { self.0 }
//!     fn view_type(&self, _position: usize) -> ViewType { ViewType::Kind(0) }
//!     fn view(&mut self, position: usize, _reusable: Option<usize>) -> usize { position }
//! }
//!
//! struct Buffer;
//!
//! impl Raster for Buffer {
//!     fn size(&self) -> (u32, u32) { (0, 0) }
//! }
//!
//! #[derive(Default)]
//! struct Host {
//!     frames: u64,
//! }
//!
//! impl FoldHost for Host {
//!     type Raster = Buffer;
//!     fn allocate_raster(&mut self, width: u32, height: u32) -> Result<Buffer, RasterError> {
//!         Err(RasterError::Unsupported { width, height })
//!     }
//!     fn request_redraw(&mut self) {}
//!     fn schedule_frame(&mut self, _delay_ms: u64) -> FrameHandle {
//!         self.frames += 1;
//!         FrameHandle::new(self.frames)
//!     }
//!     fn cancel_frame(&mut self, _handle: FrameHandle) {}
//! }
//!
//! let mut list = FoldList::new(Pages(10), Host::default(), FoldConfig::default());
//! list.set_viewport(Size::new(320.0, 480.0));
//!
//! // Drag upwards by 100px after crossing the touch slop.
//! list.handle_pointer(PointerEvent::down(Point::new(160.0, 400.0), 0));
//! list.handle_pointer(PointerEvent::moved(Point::new(160.0, 390.0), 500));
//! list.handle_pointer(PointerEvent::moved(Point::new(160.0, 290.0), 1000));
//! assert!(list.rotation() > 0.0);
//!
//! // A slow release snaps back to the nearest item over a few frames.
//! list.handle_pointer(PointerEvent::up(Point::new(160.0, 290.0), 1500));
//! let mut now = 1500;
//! while list.is_animating() {
//!     now += 16;
//!     list.on_frame(FrameHandle::new(list.host().frames), now);
//! }
//! assert_eq!(list.rotation(), 0.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod fling;
mod geometry;
mod gesture;
mod host;
mod list;
mod pool;
mod rotation;
mod shading;
mod source;
mod surface;
mod tween;

#[cfg(test)]
mod testing;

pub use config::{
    DEFAULT_FLING_DETECT_VELOCITY, DEFAULT_MAX_FLING_VELOCITY, DEFAULT_PERSPECTIVE_STRENGTH,
    DEFAULT_SCROLL_FACTOR, FRAME_INTERVAL_MS, FoldConfig, MIN_FLING_VELOCITY,
    SNAP_DURATION_PER_ITEM_MS,
};
pub use fling::{Fling, FlingStep};
pub use geometry::{
    DEFAULT_CLIPPING_FACTOR, Half, HalfPose, auto_scale_factor, half_pose, half_source_rect,
    normalize_angle, roll_clipping_factor,
};
pub use gesture::{Gesture, GestureTracker, PointerAction, PointerEvent};
pub use host::{Canvas, Color, FoldHost, FrameHandle, HalfTransform, Painter, Raster, RasterError};
pub use list::{FoldList, RotationListener};
pub use pool::{MAX_LIVE_SLOTS, PoolStats, Slot, SlotPool, SlotRole};
pub use rotation::{
    DEGREES_PER_ITEM, FoldFrame, clamp_rotation, max_rotation, nearest_position,
    rotation_for_position,
};
pub use shading::{FoldShading, SHADOW_MAX_ALPHA, SimpleShading};
pub use source::{FoldSource, ViewType};
pub use surface::SplitSurface;
pub use tween::{SnapTween, TweenSample, accelerate_decelerate, snap_duration};
