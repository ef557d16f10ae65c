// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fold list engine.

use alloc::boxed::Box;
use core::fmt;
use core::mem;

use kurbo::{Rect, Size};
use tracing::{debug, trace};
use understory_event_state::dedup::EventDedup;

use crate::config::FoldConfig;
use crate::fling::Fling;
use crate::gesture::{Gesture, GestureTracker, PointerAction, PointerEvent};
use crate::host::{Canvas, FoldHost, FrameHandle};
use crate::pool::{Slot, SlotPool};
use crate::rotation::{DEGREES_PER_ITEM, FoldFrame, nearest_position, rotation_for_position};
use crate::shading::{FoldShading, SimpleShading};
use crate::source::FoldSource;
use crate::surface::SplitSurface;
use crate::tween::{SnapTween, snap_duration};

/// Observer of rotation changes.
pub trait RotationListener {
    /// Called after every rotation change with the clamped rotation and
    /// whether it came from a user drag.
    fn on_rotation_changed(&mut self, rotation: f64, from_user: bool);

    /// Called for each live item with its new local angle.
    fn on_item_rotation(&mut self, position: usize, angle: f64) {
        let _ = (position, angle);
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Animation {
    Idle,
    Snap(SnapTween),
    Fling(Fling),
}

/// A vertically folding list of items.
///
/// `FoldList` owns the rotation, a bounded [`SlotPool`] of split surfaces, the
/// running snap or fling animation, and the gesture state. It performs no I/O:
/// pointer events come in through [`FoldList::handle_pointer`], animation
/// frames through [`FoldList::on_frame`], and drawing goes out through a
/// [`Canvas`].
pub struct FoldList<S: FoldSource, H: FoldHost> {
    source: S,
    host: H,
    config: FoldConfig,
    pool: SlotPool<S::View, H::Raster>,
    viewport: Size,
    frame: FoldFrame,
    animation: Animation,
    pending_frame: Option<FrameHandle>,
    gestures: GestureTracker,
    drag_start_rotation: f64,
    dedup: EventDedup<PointerAction>,
    shading: Option<Box<dyn FoldShading>>,
    listener: Option<Box<dyn RotationListener>>,
}

impl<S, H> fmt::Debug for FoldList<S, H>
where
    S: FoldSource + fmt::Debug,
    S::View: fmt::Debug,
    H: FoldHost + fmt::Debug,
    H::Raster: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FoldList")
            .field("source", &self.source)
            .field("host", &self.host)
            .field("config", &self.config)
            .field("pool", &self.pool)
            .field("viewport", &self.viewport)
            .field("frame", &self.frame)
            .field("animation", &self.animation)
            .field("pending_frame", &self.pending_frame)
            .field("gestures", &self.gestures)
            .field("has_shading", &self.shading.is_some())
            .field("has_listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: FoldSource, H: FoldHost> FoldList<S, H> {
    /// Create a list showing the first item, shaded with [`SimpleShading`].
    pub fn new(source: S, host: H, config: FoldConfig) -> Self {
        let mut pool = SlotPool::new(config.max_live_slots, config.perspective_strength);
        pool.set_auto_scale(config.auto_scale);
        let mut list = Self {
            source,
            host,
            config,
            pool,
            viewport: Size::ZERO,
            frame: FoldFrame::new(0.0, 0),
            animation: Animation::Idle,
            pending_frame: None,
            gestures: GestureTracker::new(config.touch_slop, config.max_fling_velocity),
            drag_start_rotation: 0.0,
            dedup: EventDedup::new(),
            shading: Some(Box::new(SimpleShading::default())),
            listener: None,
        };
        list.apply_rotation(0.0, false);
        list
    }

    /// The data source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The data source, mutably.
    ///
    /// Call [`FoldList::notify_data_changed`] after changing what it reports.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Current tuning.
    pub fn config(&self) -> &FoldConfig {
        &self.config
    }

    /// The slot pool, for inspection.
    pub fn pool(&self) -> &SlotPool<S::View, H::Raster> {
        &self.pool
    }

    /// The surface bound to `position`, if the item is live.
    pub fn surface(&self, position: usize) -> Option<&SplitSurface<S::View, H::Raster>> {
        self.pool.get(position).map(Slot::surface)
    }

    /// The surface bound to `position`, mutably.
    ///
    /// Use this to apply a roll offset or an extra scale to a live item, for
    /// example from [`RotationListener::on_item_rotation`]. The list does not
    /// observe these changes; call [`FoldHost::request_redraw`] through
    /// [`host_mut`](Self::host_mut) afterwards.
    pub fn surface_mut(
        &mut self,
        position: usize,
    ) -> Option<&mut SplitSurface<S::View, H::Raster>> {
        self.pool.get_mut(position).map(Slot::surface_mut)
    }

    /// Number of items.
    pub fn count(&self) -> usize {
        self.source.count()
    }

    /// Replace the data source, returning the previous one.
    ///
    /// All slots are released to the previous source and state is re-derived
    /// at the current rotation, clamped to the new count.
    pub fn set_source(&mut self, source: S) -> S {
        self.pool.free_all(&mut self.source);
        let previous = mem::replace(&mut self.source, source);
        debug!(count = self.source.count(), "source replaced");
        self.apply_rotation(self.frame.rotation, false);
        previous
    }

    /// Re-derive everything after the source's contents changed.
    ///
    /// Every slot is unbound; nothing is preserved across the change.
    pub fn notify_data_changed(&mut self) {
        self.pool.free_all(&mut self.source);
        debug!(count = self.source.count(), "data changed");
        self.apply_rotation(self.frame.rotation, false);
    }

    /// Current rotation.
    pub fn rotation(&self) -> f64 {
        self.frame.rotation
    }

    /// Decomposition of the current rotation.
    pub fn frame(&self) -> &FoldFrame {
        &self.frame
    }

    /// Jump to `rotation`, clamped to the valid range.
    ///
    /// Stops any running snap or fling.
    pub fn set_rotation(&mut self, rotation: f64) {
        self.stop_animation();
        self.apply_rotation(rotation, false);
    }

    /// Position nearest to the current rotation.
    pub fn position(&self) -> usize {
        nearest_position(self.frame.rotation, self.count())
    }

    /// Animate to `position`, clamped to the valid range.
    pub fn scroll_to_position(&mut self, position: usize) {
        let count = self.count();
        if count == 0 {
            return;
        }
        let target = rotation_for_position(position.min(count - 1));
        self.snap_to(target);
    }

    /// Animate to the position nearest to the current rotation.
    pub fn scroll_to_nearest(&mut self) {
        self.scroll_to_position(self.position());
    }

    /// Returns `true` while a snap or fling is running.
    pub fn is_animating(&self) -> bool {
        !matches!(self.animation, Animation::Idle)
    }

    /// Returns `true` while a fling is running.
    pub fn is_flinging(&self) -> bool {
        matches!(self.animation, Animation::Fling(_))
    }

    /// Start a fling at `velocity` degrees per second.
    ///
    /// Returns `false`, leaving state untouched, when the rotation sits
    /// exactly on an item.
    pub fn fling(&mut self, velocity: f64, now: u64) -> bool {
        let Some(fling) = Fling::start(
            self.frame.rotation,
            velocity,
            self.config.min_fling_velocity,
            now,
        ) else {
            debug!(rotation = self.frame.rotation, "fling rejected on item boundary");
            return false;
        };
        self.stop_animation();
        debug!(
            rotation = self.frame.rotation,
            velocity = fling.velocity(),
            "fling started"
        );
        self.animation = Animation::Fling(fling);
        self.schedule_frame();
        true
    }

    /// Advance the running animation.
    ///
    /// `handle` must be the handle returned by the most recent
    /// [`FoldHost::schedule_frame`] call; other handles are ignored. Returns
    /// `true` if the frame was used.
    pub fn on_frame(&mut self, handle: FrameHandle, now: u64) -> bool {
        if self.pending_frame != Some(handle) {
            trace!(handle = handle.get(), "ignoring stale frame");
            return false;
        }
        self.pending_frame = None;
        match mem::replace(&mut self.animation, Animation::Idle) {
            Animation::Idle => false,
            Animation::Snap(mut tween) => {
                let sample = tween.sample(now);
                trace!(rotation = sample.rotation, "snap frame");
                self.apply_rotation(sample.rotation, false);
                if !sample.finished {
                    self.animation = Animation::Snap(tween);
                    self.schedule_frame();
                }
                true
            }
            Animation::Fling(mut fling) => {
                let step = fling.step(self.frame.rotation, now);
                trace!(rotation = step.rotation, "fling frame");
                self.apply_rotation(step.rotation, false);
                if step.finished {
                    debug!(rotation = step.rotation, "fling finished");
                } else {
                    self.animation = Animation::Fling(fling);
                    self.schedule_frame();
                }
                true
            }
        }
    }

    /// Offer a pointer event during the host's intercept phase.
    ///
    /// Returns `true` if the list claims the gesture from the items.
    pub fn intercept_pointer(&mut self, event: PointerEvent) -> bool {
        self.dispatch_pointer(event)
    }

    /// Deliver a pointer event during normal dispatch.
    ///
    /// Returns `true` if the event was consumed. An event already seen through
    /// [`FoldList::intercept_pointer`] is not processed again.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        self.dispatch_pointer(event)
    }

    /// Forget the last processed pointer event.
    ///
    /// Duplicate delivery is recognized by `(timestamp, action)`. A host that
    /// synthesizes distinct events with identical timestamps calls this
    /// between them.
    pub fn clear_event_dedup(&mut self) {
        self.dedup.clear();
    }

    /// Enable or disable gesture handling. Disabling drops an active press.
    pub fn set_gestures_enabled(&mut self, enabled: bool) {
        self.config.gestures_enabled = enabled;
        if !enabled {
            self.gestures.cancel();
        }
    }

    /// Returns `true` if gestures drive the list.
    pub fn gestures_enabled(&self) -> bool {
        self.config.gestures_enabled
    }

    /// Enable or disable auto-scale-to-fit.
    pub fn set_auto_scale_enabled(&mut self, enabled: bool) {
        self.config.auto_scale = enabled;
        self.pool.set_auto_scale(enabled);
        self.host.request_redraw();
    }

    /// Set the auto-scale perspective strength.
    pub fn set_perspective_strength(&mut self, strength: f64) {
        self.config.perspective_strength = strength;
        self.pool.set_perspective_strength(strength);
        self.host.request_redraw();
    }

    /// Replace the shading, or draw without one.
    pub fn set_shading(&mut self, shading: Option<Box<dyn FoldShading>>) {
        self.shading = shading;
        self.host.request_redraw();
    }

    /// Restrict drawing of every item to `bounds`, or lift the restriction.
    pub fn set_visible_bounds(&mut self, bounds: Option<Rect>) {
        self.pool.set_visible_bounds(bounds);
        self.host.request_redraw();
    }

    /// Replace the rotation listener.
    pub fn set_rotation_listener(&mut self, listener: Option<Box<dyn RotationListener>>) {
        self.listener = listener;
    }

    /// Current item size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Set the item size. An empty size releases every raster buffer; others
    /// are allocated again on the next draw.
    pub fn set_viewport(&mut self, size: Size) {
        if size == self.viewport {
            return;
        }
        debug!(width = size.width, height = size.height, "viewport changed");
        self.viewport = size;
        self.pool.set_size(size);
        if size.is_zero_area() {
            self.pool.release_rasters();
        }
        self.host.request_redraw();
    }

    /// The topmost item, if any.
    pub fn front_position(&self) -> Option<usize> {
        self.frame.front
    }

    /// The item beneath the front one, if any.
    pub fn back_position(&self) -> Option<usize> {
        self.frame.back
    }

    /// Returns `true` if the list blocks pointer input to whatever lies
    /// beneath it.
    pub fn consumes_input(&self) -> bool {
        self.count() > 0
    }

    /// Returns `true` if the content of `position` may receive pointer input:
    /// it is the front item and is not being folded.
    pub fn item_accepts_input(&self, position: usize) -> bool {
        self.frame.front == Some(position)
            && self
                .pool
                .get(position)
                .is_some_and(|slot| slot.surface().accepts_input())
    }

    /// Draw the live items, back first.
    ///
    /// Folding items get a raster allocated on demand; if that fails they
    /// are drawn flat.
    pub fn draw<C>(&mut self, canvas: &mut C)
    where
        C: Canvas<S::View, Raster = H::Raster>,
    {
        let shading = self.shading.as_deref();
        for position in [self.frame.back, self.frame.front].into_iter().flatten() {
            let Some(slot) = self.pool.get_mut(position) else {
                continue;
            };
            let surface = slot.surface_mut();
            if surface.is_in_transformation() {
                surface.ensure_raster(&mut self.host);
            }
            surface.draw(canvas, shading);
        }
    }

    /// Shut the list down.
    ///
    /// The scheduled frame is cancelled and animations stopped before slots
    /// are unbound and raster buffers released. The list stays usable; the
    /// next rotation change binds fresh slots.
    pub fn teardown(&mut self) {
        self.stop_animation();
        self.gestures.cancel();
        self.dedup.clear();
        self.pool.free_all(&mut self.source);
        self.pool.clear();
        debug!("fold list torn down");
    }

    fn dispatch_pointer(&mut self, event: PointerEvent) -> bool {
        if let Some(consumed) = self.dedup.lookup(event.timestamp, event.action) {
            return consumed;
        }
        let consumed = self.process_pointer(event);
        self.dedup.record(event.timestamp, event.action, consumed);
        consumed
    }

    fn process_pointer(&mut self, event: PointerEvent) -> bool {
        if !self.config.gestures_enabled || self.count() == 0 {
            return false;
        }
        match self.gestures.on_event(event) {
            Gesture::Press => {
                self.stop_animation();
                self.drag_start_rotation = self.frame.rotation;
                false
            }
            Gesture::Drag { distance, started } => {
                if started {
                    self.drag_start_rotation = self.frame.rotation;
                }
                let height = self.viewport.height;
                if height > 0.0 {
                    let delta = DEGREES_PER_ITEM * self.config.scroll_factor * distance / height;
                    self.apply_rotation(self.drag_start_rotation + delta, true);
                }
                true
            }
            Gesture::Release { velocity_y } => {
                let height = self.viewport.height;
                let flung = velocity_y.abs() > self.config.fling_detect_velocity
                    && height > 0.0
                    && self.fling(-velocity_y / height * DEGREES_PER_ITEM, event.timestamp);
                if !flung {
                    self.scroll_to_nearest();
                }
                true
            }
            Gesture::Tap => {
                self.scroll_to_nearest();
                false
            }
            Gesture::Cancel { was_dragging } => {
                self.scroll_to_nearest();
                was_dragging
            }
            Gesture::Pending | Gesture::Ignored => false,
        }
    }

    fn snap_to(&mut self, target: f64) {
        self.stop_animation();
        let from = self.frame.rotation;
        if from == target {
            return;
        }
        let duration = snap_duration(from, target, self.config.snap_duration_per_item_ms);
        if duration == 0 {
            self.apply_rotation(target, false);
            return;
        }
        debug!(from, to = target, duration, "snap started");
        self.animation = Animation::Snap(SnapTween::new(from, target, duration));
        self.schedule_frame();
    }

    fn stop_animation(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.host.cancel_frame(handle);
        }
        if self.is_animating() {
            debug!(rotation = self.frame.rotation, "animation stopped");
            self.animation = Animation::Idle;
        }
    }

    fn schedule_frame(&mut self) {
        if self.pending_frame.is_none() {
            self.pending_frame = Some(self.host.schedule_frame(self.config.frame_interval_ms));
        }
    }

    fn apply_rotation(&mut self, rotation: f64, from_user: bool) {
        if from_user {
            self.stop_animation();
        }
        let frame = FoldFrame::new(rotation, self.source.count());
        self.frame = frame;
        for (position, angle) in frame.live_items() {
            let slot = self.pool.acquire(position, &mut self.source);
            slot.surface_mut().set_local_rotation(angle);
            if let Some(listener) = self.listener.as_mut() {
                listener.on_item_rotation(position, angle);
            }
        }
        self.pool.set_roles(frame.front, frame.back);
        if let Some(listener) = self.listener.as_mut() {
            listener.on_rotation_changed(frame.rotation, from_user);
        }
        self.host.request_redraw();
    }
}
