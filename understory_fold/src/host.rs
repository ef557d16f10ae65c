// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capabilities the engine needs from the hosting UI stack.
//!
//! The engine never draws pixels or owns a clock. A host provides:
//!
//! - off-screen raster buffers ([`FoldHost::allocate_raster`]),
//! - a redraw trigger ([`FoldHost::request_redraw`]),
//! - a frame scheduler ([`FoldHost::schedule_frame`] / [`FoldHost::cancel_frame`]);
//!   when a scheduled frame fires the host calls
//!   [`FoldList::on_frame`](crate::FoldList::on_frame) with the handle and the
//!   current time,
//! - a [`Canvas`] to draw into, implemented for the content view type it uses.

use kurbo::{Point, Rect};
use thiserror::Error;

use crate::geometry::Half;

/// Failure to allocate an off-screen raster buffer.
///
/// The engine treats every variant as "no cache this frame" and draws item
/// content directly instead.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    /// The host could not find memory for the buffer.
    #[error("out of memory allocating a {width}x{height} raster")]
    OutOfMemory {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// The host cannot create a buffer of this size (for example, it exceeds a
    /// texture limit).
    #[error("unsupported raster size {width}x{height}")]
    Unsupported {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

/// An off-screen raster buffer owned by one item.
pub trait Raster {
    /// Size of the buffer in pixels, `(width, height)`.
    fn size(&self) -> (u32, u32);
}

/// Handle of a scheduled frame callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Wrap a host-chosen identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The host-chosen identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Services provided by the host to a [`FoldList`](crate::FoldList).
pub trait FoldHost {
    /// Raster buffer type produced by this host.
    type Raster: Raster;

    /// Allocate a raster buffer of `width` by `height` pixels.
    fn allocate_raster(&mut self, width: u32, height: u32) -> Result<Self::Raster, RasterError>;

    /// Ask for the visible surface to be redrawn.
    fn request_redraw(&mut self);

    /// Schedule a frame callback roughly `delay_ms` milliseconds from now.
    fn schedule_frame(&mut self, delay_ms: u64) -> FrameHandle;

    /// Cancel a frame callback scheduled earlier. Cancelling a handle that
    /// already fired must be harmless.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// An RGBA color with 8 bits per channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, `255` is opaque.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    /// Create a color from channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// This color with its alpha replaced.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// How a half is placed on the visible surface.
///
/// The host applies, in item coordinates: a translation by `translate_y`, a
/// scale of `(scale_x, scale_y)` about `pivot`, and a perspective rotation of
/// `rotation_x` degrees about the horizontal axis through `pivot`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HalfTransform {
    /// Which half is being drawn.
    pub half: Half,
    /// Rotation about the hinge in degrees.
    pub rotation_x: f64,
    /// Point on the hinge, in item coordinates.
    pub pivot: Point,
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Vertical translation in pixels.
    pub translate_y: f64,
}

/// Minimal drawing surface used by shading.
pub trait Painter {
    /// Fill `rect` with `color`, blending by its alpha.
    fn fill_rect(&mut self, rect: Rect, color: Color);
}

/// The visible drawing surface, able to render content views of type `V`.
pub trait Canvas<V>: Painter {
    /// Raster buffer type this canvas can read from.
    type Raster: Raster;

    /// Draw `view` directly, without any fold effect.
    fn draw_content(&mut self, view: &V, bounds: Rect);

    /// Clear `raster` and draw `view` into it.
    fn cache_content(&mut self, raster: &mut Self::Raster, view: &V);

    /// Start drawing a half: subsequent draws use `transform` until
    /// [`Canvas::end_half`].
    fn begin_half(&mut self, transform: &HalfTransform);

    /// Draw the `src` region of `raster` at the same location in item
    /// coordinates, under the current half transform.
    fn draw_raster(&mut self, raster: &Self::Raster, src: Rect);

    /// Restore the state saved by [`Canvas::begin_half`].
    fn end_half(&mut self);
}
