// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The split surface: one item's content, cached to a raster and drawn as two
//! independently folding halves.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size};
use tracing::{debug, warn};

use crate::geometry::{
    DEFAULT_CLIPPING_FACTOR, Half, HalfPose, auto_scale_factor, half_pose, half_source_rect,
    normalize_angle, roll_clipping_factor,
};
use crate::host::{Canvas, FoldHost, HalfTransform, Raster};
use crate::shading::FoldShading;

#[derive(Copy, Clone, Debug)]
struct HalfState {
    half: Half,
    pose: HalfPose,
    clipping_factor: f64,
    translate_y: f64,
    src: Rect,
}

impl HalfState {
    fn new(half: Half) -> Self {
        Self {
            half,
            pose: half_pose(half, 0.0),
            clipping_factor: DEFAULT_CLIPPING_FACTOR,
            translate_y: 0.0,
            src: Rect::ZERO,
        }
    }
}

/// Renders one item as a pair of folding halves.
///
/// While the item's local angle is zero it draws its content directly. Any
/// other angle routes drawing through an off-screen raster sized to the item:
/// the content is painted into the raster, then each visible half blits its
/// share of it under its own rotation, scale, translation and clip.
///
/// Raster allocation failure is not an error: the surface draws its content
/// directly (without the fold effect) and retries once its size is confirmed
/// again through [`SplitSurface::set_size`].
#[derive(Debug)]
pub struct SplitSurface<V, R> {
    content: Option<V>,
    size: Size,
    raster: Option<R>,
    allocation_failed: bool,
    angle: f64,
    normalized_angle: f64,
    halves: [HalfState; 2],
    visible_bounds: Option<Rect>,
    auto_scale: bool,
    perspective_strength: f64,
    scale: f64,
    scale_factor: f64,
    scale_factor_y: f64,
    roll_offset: f64,
}

impl<V, R: Raster> SplitSurface<V, R> {
    /// Create an empty surface.
    ///
    /// `perspective_strength` tunes how much the item shrinks when auto-scale
    /// is enabled (see [`auto_scale_factor`]).
    pub fn new(perspective_strength: f64) -> Self {
        Self {
            content: None,
            size: Size::ZERO,
            raster: None,
            allocation_failed: false,
            angle: 0.0,
            normalized_angle: 0.0,
            halves: [HalfState::new(Half::Top), HalfState::new(Half::Bottom)],
            visible_bounds: None,
            auto_scale: false,
            perspective_strength,
            scale: 1.0,
            scale_factor: 1.0,
            scale_factor_y: 1.0,
            roll_offset: 0.0,
        }
    }

    /// The attached content view, if any.
    pub fn content(&self) -> Option<&V> {
        self.content.as_ref()
    }

    /// Attach `view`, returning the previously attached one.
    pub fn set_source_content(&mut self, view: V) -> Option<V> {
        self.content.replace(view)
    }

    /// Detach and return the content view.
    pub fn take_content(&mut self) -> Option<V> {
        self.content.take()
    }

    /// Item size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Set the item size.
    ///
    /// This also confirms the dimensions, so an allocation that failed earlier
    /// is attempted again on the next draw. An empty size releases the raster.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.allocation_failed = false;
        if size.is_zero_area() {
            self.raster = None;
        }
        self.apply_roll();
    }

    /// The local fold angle in degrees, as last set.
    pub fn local_angle(&self) -> f64 {
        self.angle
    }

    /// The local fold angle folded into `(-180, 180]`.
    pub fn normalized_angle(&self) -> f64 {
        self.normalized_angle
    }

    /// Set the local fold angle in degrees.
    pub fn set_local_rotation(&mut self, angle: f64) {
        self.angle = angle;
        self.normalized_angle = normalize_angle(angle);
        for state in &mut self.halves {
            state.pose = half_pose(state.half, self.normalized_angle);
        }
        self.scale_factor = if self.auto_scale && self.size.width > 0.0 {
            auto_scale_factor(self.size, angle, self.perspective_strength)
        } else {
            1.0
        };
        self.update_translation();
    }

    /// Returns `true` while the item is folded away from rest and drawn
    /// through its raster.
    pub fn is_in_transformation(&self) -> bool {
        self.angle != 0.0
    }

    /// Returns `true` if the item's content may receive pointer input.
    ///
    /// Content is never interactive while it is being folded.
    pub fn accepts_input(&self) -> bool {
        !self.is_in_transformation()
    }

    /// Set the roll offset: a vertical translation of both halves that keeps
    /// the split at the hinge by moving the clipping boundary with it.
    pub fn set_roll_offset(&mut self, distance: f64) {
        self.roll_offset = distance;
        self.apply_roll();
    }

    /// Current roll offset.
    pub fn roll_offset(&self) -> f64 {
        self.roll_offset
    }

    /// Restrict drawing to `bounds` (item coordinates), or lift the restriction.
    pub fn set_visible_bounds(&mut self, bounds: Option<Rect>) {
        self.visible_bounds = bounds;
        self.update_sources();
    }

    /// Enable or disable auto-scale-to-fit.
    pub fn set_auto_scale(&mut self, enabled: bool) {
        self.auto_scale = enabled;
        self.set_local_rotation(self.angle);
    }

    /// Set the perspective strength used by auto-scale.
    pub fn set_perspective_strength(&mut self, strength: f64) {
        self.perspective_strength = strength;
        self.set_local_rotation(self.angle);
    }

    /// Set an extra uniform scale applied to both halves.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.update_translation();
    }

    /// Set an extra vertical scale applied to both halves.
    pub fn set_scale_factor_y(&mut self, factor: f64) {
        self.scale_factor_y = factor;
        self.update_translation();
    }

    /// Effective horizontal scale of the halves.
    pub fn scale_x(&self) -> f64 {
        self.scale * self.scale_factor
    }

    /// Effective vertical scale of the halves.
    pub fn scale_y(&self) -> f64 {
        self.scale * self.scale_factor * self.scale_factor_y
    }

    /// Pose of `half` at the current angle.
    pub fn half_pose(&self, half: Half) -> HalfPose {
        self.state(half).pose
    }

    /// Source rectangle of `half` in the raster, [`Rect::ZERO`] without one.
    pub fn half_source(&self, half: Half) -> Rect {
        self.state(half).src
    }

    /// Placement of `half` on the visible surface.
    pub fn half_transform(&self, half: Half) -> HalfTransform {
        let state = self.state(half);
        HalfTransform {
            half,
            rotation_x: state.pose.rotation_x,
            pivot: Point::new(self.size.width / 2.0, self.size.height / 2.0),
            scale_x: self.scale_x(),
            scale_y: self.scale_y(),
            translate_y: state.translate_y,
        }
    }

    /// The raster cache, if one is allocated.
    pub fn raster(&self) -> Option<&R> {
        self.raster.as_ref()
    }

    /// Make sure a raster of the current size exists.
    ///
    /// Returns `true` if a usable raster is available afterwards.
    pub fn ensure_raster<H>(&mut self, host: &mut H) -> bool
    where
        H: FoldHost<Raster = R>,
    {
        let (width, height) = pixel_size(self.size);
        if self
            .raster
            .as_ref()
            .is_some_and(|raster| raster.size() == (width, height))
        {
            return true;
        }
        if self.raster.take().is_some() {
            debug!(width, height, "discarding raster of stale size");
        }
        if width == 0 || height == 0 || self.allocation_failed {
            self.update_sources();
            return false;
        }
        match host.allocate_raster(width, height) {
            Ok(raster) => {
                debug!(width, height, "allocated fold raster");
                self.raster = Some(raster);
            }
            Err(err) => {
                warn!(%err, "fold raster unavailable, drawing without fold effect");
                self.allocation_failed = true;
            }
        }
        self.update_sources();
        self.raster.is_some()
    }

    /// Release the raster cache, returning it to the caller.
    pub fn release_raster(&mut self) -> Option<R> {
        let raster = self.raster.take();
        self.update_sources();
        raster
    }

    /// Draw this item onto `canvas`.
    ///
    /// Call [`SplitSurface::ensure_raster`] first; without a raster a folded
    /// item is drawn flat.
    pub fn draw<C>(&mut self, canvas: &mut C, shading: Option<&dyn FoldShading>)
    where
        C: Canvas<V, Raster = R>,
    {
        let Some(view) = self.content.as_ref() else {
            return;
        };
        let bounds = Rect::from_origin_size(Point::ZERO, self.size);
        let raster = match self.raster.as_mut() {
            Some(raster) if self.angle != 0.0 => raster,
            _ => {
                canvas.draw_content(view, bounds);
                return;
            }
        };

        canvas.cache_content(raster, view);
        for half in Half::BOTH {
            let state = self.halves[half_index(half)];
            if !state.pose.visible {
                continue;
            }
            let transform = self.half_transform(half);
            canvas.begin_half(&transform);
            if let Some(shading) = shading {
                shading.on_pre_draw(canvas, state.src, self.normalized_angle, half);
            }
            if let Some(raster) = self.raster.as_ref() {
                canvas.draw_raster(raster, state.src);
            }
            if let Some(shading) = shading {
                shading.on_post_draw(canvas, state.src, self.normalized_angle, half);
            }
            canvas.end_half();
        }
    }

    fn state(&self, half: Half) -> &HalfState {
        &self.halves[half_index(half)]
    }

    fn apply_roll(&mut self) {
        let half_height = (self.size.height / 2.0).floor();
        for state in &mut self.halves {
            state.clipping_factor = roll_clipping_factor(state.half, self.roll_offset, half_height);
        }
        self.update_translation();
        self.update_sources();
    }

    /// The roll offset is applied in scaled space.
    fn update_translation(&mut self) {
        let translate_y = (self.roll_offset * self.scale_y() + 0.5).floor();
        for state in &mut self.halves {
            state.translate_y = translate_y;
        }
    }

    fn update_sources(&mut self) {
        let raster_size = self.raster.as_ref().map(|raster| {
            let (w, h) = raster.size();
            Size::new(f64::from(w), f64::from(h))
        });
        for state in &mut self.halves {
            state.src = match raster_size {
                Some(size) => {
                    half_source_rect(state.half, size, state.clipping_factor, self.visible_bounds)
                }
                None => Rect::ZERO,
            };
        }
    }
}

const fn half_index(half: Half) -> usize {
    match half {
        Half::Top => 0,
        Half::Bottom => 1,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Item sizes are non-negative pixel extents well inside u32"
)]
fn pixel_size(size: Size) -> (u32, u32) {
    (size.width.max(0.0) as u32, size.height.max(0.0) as u32)
}
