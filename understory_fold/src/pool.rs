// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded recycling of split surfaces and content views.
//!
//! The pool keeps two independent free lists:
//!
//! - surfaces ([`SplitSurface`]), bound to item positions through [`Slot`]s and
//!   parked in a spare queue when every slot is released at once;
//! - content views, keyed by [`ViewType`] and handed back to the data source
//!   for rebinding.
//!
//! At most `max_live` slots are bound and at most `max_live` content views are
//! pooled at any time, which bounds memory regardless of how many items or
//! view kinds the source has.

use alloc::collections::VecDeque;

use hashbrown::HashMap;
use kurbo::{Rect, Size};
use smallvec::SmallVec;
use tracing::debug;

use crate::host::Raster;
use crate::source::{FoldSource, ViewType};
use crate::surface::SplitSurface;

/// Default number of simultaneously bound slots.
pub const MAX_LIVE_SLOTS: usize = 3;

/// Drawing role of a bound slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SlotRole {
    /// Bound but not drawn.
    #[default]
    Hidden,
    /// Drawn first, underneath the front item.
    Back,
    /// Drawn last; the only item whose content may receive pointer input.
    Front,
}

/// A binding of one item position to a surface and its content view.
#[derive(Debug)]
pub struct Slot<V, R> {
    position: usize,
    view_type: ViewType,
    role: SlotRole,
    surface: SplitSurface<V, R>,
}

impl<V, R> Slot<V, R> {
    /// Item position this slot is bound to.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Content type of the bound view.
    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    /// Current drawing role.
    pub fn role(&self) -> SlotRole {
        self.role
    }

    /// The slot's surface.
    pub fn surface(&self) -> &SplitSurface<V, R> {
        &self.surface
    }

    /// The slot's surface, mutably.
    pub fn surface_mut(&mut self) -> &mut SplitSurface<V, R> {
        &mut self.surface
    }
}

/// Counters describing pool activity, useful to assert there is no churn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Positions bound to a surface.
    pub binds: usize,
    /// Slots evicted to make room.
    pub evictions: usize,
    /// Surfaces constructed.
    pub surfaces_created: usize,
    /// Binds that reused a pooled content view.
    pub views_reused: usize,
}

#[derive(Copy, Clone, Debug)]
struct SurfaceSettings {
    size: Size,
    auto_scale: bool,
    perspective_strength: f64,
    visible_bounds: Option<Rect>,
}

/// Maps item positions to a bounded set of [`SplitSurface`]s.
///
/// Views of evicted slots are kept for reuse by [`ViewType`], up to
/// `max_live` views across all kinds. Views beyond that are dropped after the
/// source has recycled them.
#[derive(Debug)]
pub struct SlotPool<V, R> {
    max_live: usize,
    slots: SmallVec<[Slot<V, R>; MAX_LIVE_SLOTS]>,
    spare: VecDeque<SplitSurface<V, R>>,
    views: HashMap<u32, VecDeque<V>>,
    settings: SurfaceSettings,
    stats: PoolStats,
}

impl<V, R: Raster> SlotPool<V, R> {
    /// Create an empty pool binding at most `max_live` slots (at least 2, the
    /// minimum for a continuous fold).
    pub fn new(max_live: usize, perspective_strength: f64) -> Self {
        Self {
            max_live: max_live.max(2),
            slots: SmallVec::new(),
            spare: VecDeque::new(),
            views: HashMap::new(),
            settings: SurfaceSettings {
                size: Size::ZERO,
                auto_scale: false,
                perspective_strength,
                visible_bounds: None,
            },
            stats: PoolStats::default(),
        }
    }

    /// Maximum number of simultaneously bound slots.
    pub fn max_live(&self) -> usize {
        self.max_live
    }

    /// Number of bound slots.
    pub fn live_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of unbound surfaces waiting for reuse.
    pub fn spare_count(&self) -> usize {
        self.spare.len()
    }

    /// Number of content views waiting for reuse.
    pub fn pooled_view_count(&self) -> usize {
        self.views.values().map(VecDeque::len).sum()
    }

    /// Activity counters.
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Bound slots, in binding order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot<V, R>> {
        self.slots.iter()
    }

    /// Positions of the bound slots, in binding order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().map(|slot| slot.position)
    }

    /// The slot bound to `position`, if any.
    pub fn get(&self, position: usize) -> Option<&Slot<V, R>> {
        self.slots.iter().find(|slot| slot.position == position)
    }

    /// The slot bound to `position`, mutably.
    pub fn get_mut(&mut self, position: usize) -> Option<&mut Slot<V, R>> {
        self.slots.iter_mut().find(|slot| slot.position == position)
    }

    /// Return the slot bound to `position`, binding one if needed.
    ///
    /// Binding first looks for the bound position farthest from `position`.
    /// It is evicted when it lies at least `max_live` positions away, or when
    /// every slot is in use. Ties go to the earliest bound slot. The surface
    /// comes from the evicted slot, else the spare queue, else is constructed.
    /// Content is requested from `source`, offering a pooled view of the same
    /// type for reuse.
    pub fn acquire<S>(&mut self, position: usize, source: &mut S) -> &mut Slot<V, R>
    where
        S: FoldSource<View = V>,
    {
        if let Some(index) = self.index_of(position) {
            return &mut self.slots[index];
        }

        let full = self.slots.len() >= self.max_live;
        let farthest = farthest_from(self.positions(), position);
        let evicted = match farthest {
            Some((index, distance)) if full || distance >= self.max_live => {
                Some(self.evict(index, source))
            }
            _ => None,
        };

        let mut surface = match evicted.or_else(|| self.spare.pop_front()) {
            Some(surface) => surface,
            None => {
                self.stats.surfaces_created += 1;
                SplitSurface::new(self.settings.perspective_strength)
            }
        };
        self.configure(&mut surface);

        let view_type = source.view_type(position);
        let reusable = match view_type {
            ViewType::Kind(kind) => self.take_view(kind),
            ViewType::Ignore => None,
        };
        if reusable.is_some() {
            self.stats.views_reused += 1;
        }
        surface.set_source_content(source.view(position, reusable));
        self.stats.binds += 1;
        debug!(position, ?view_type, live = self.slots.len() + 1, "bound slot");

        self.slots.push(Slot {
            position,
            view_type,
            role: SlotRole::Hidden,
            surface,
        });
        let last = self.slots.len() - 1;
        &mut self.slots[last]
    }

    /// Assign drawing roles; every other slot becomes [`SlotRole::Hidden`].
    pub fn set_roles(&mut self, front: Option<usize>, back: Option<usize>) {
        for slot in &mut self.slots {
            slot.role = if Some(slot.position) == front {
                SlotRole::Front
            } else if Some(slot.position) == back {
                SlotRole::Back
            } else {
                SlotRole::Hidden
            };
        }
    }

    /// Unbind every slot, parking surfaces in the spare queue and dropping all
    /// content views, pooled ones included.
    pub fn free_all<S>(&mut self, source: &mut S)
    where
        S: FoldSource<View = V>,
    {
        let freed = self.slots.len();
        for mut slot in self.slots.drain(..) {
            if let Some(mut view) = slot.surface.take_content() {
                source.recycle(&mut view);
            }
            self.spare.push_back(slot.surface);
        }
        self.views.clear();
        debug!(freed, spare = self.spare.len(), "released all slots");
    }

    /// Release every raster buffer while keeping bindings.
    pub fn release_rasters(&mut self) {
        let surfaces = self
            .slots
            .iter_mut()
            .map(|slot| &mut slot.surface)
            .chain(self.spare.iter_mut());
        for surface in surfaces {
            drop(surface.release_raster());
        }
    }

    /// Drop every slot, surface, and pooled view.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.spare.clear();
        self.views.clear();
    }

    /// Set the item size of every surface.
    pub fn set_size(&mut self, size: Size) {
        self.settings.size = size;
        self.for_each_surface(|surface| surface.set_size(size));
    }

    /// Enable or disable auto-scale on every surface.
    pub fn set_auto_scale(&mut self, enabled: bool) {
        self.settings.auto_scale = enabled;
        self.for_each_surface(|surface| surface.set_auto_scale(enabled));
    }

    /// Set the auto-scale perspective strength of every surface.
    pub fn set_perspective_strength(&mut self, strength: f64) {
        self.settings.perspective_strength = strength;
        self.for_each_surface(|surface| surface.set_perspective_strength(strength));
    }

    /// Set the visible-bounds clip of every surface.
    pub fn set_visible_bounds(&mut self, bounds: Option<Rect>) {
        self.settings.visible_bounds = bounds;
        self.for_each_surface(|surface| surface.set_visible_bounds(bounds));
    }

    fn for_each_surface(&mut self, mut f: impl FnMut(&mut SplitSurface<V, R>)) {
        for slot in &mut self.slots {
            f(&mut slot.surface);
        }
        for surface in &mut self.spare {
            f(surface);
        }
    }

    fn configure(&self, surface: &mut SplitSurface<V, R>) {
        let settings = self.settings;
        if surface.size() != settings.size {
            surface.set_size(settings.size);
        }
        surface.set_perspective_strength(settings.perspective_strength);
        surface.set_auto_scale(settings.auto_scale);
        surface.set_visible_bounds(settings.visible_bounds);
    }

    fn take_view(&mut self, kind: u32) -> Option<V> {
        let queue = self.views.get_mut(&kind)?;
        let view = queue.pop_front();
        if queue.is_empty() {
            self.views.remove(&kind);
        }
        view
    }

    fn index_of(&self, position: usize) -> Option<usize> {
        self.slots.iter().position(|slot| slot.position == position)
    }

    fn evict<S>(&mut self, index: usize, source: &mut S) -> SplitSurface<V, R>
    where
        S: FoldSource<View = V>,
    {
        let mut slot = self.slots.remove(index);
        if let Some(mut view) = slot.surface.take_content() {
            source.recycle(&mut view);
            if let ViewType::Kind(kind) = slot.view_type {
                if self.pooled_view_count() < self.max_live {
                    self.views.entry(kind).or_default().push_back(view);
                } else {
                    debug!(kind, "view pool full, dropping view");
                }
            }
        }
        self.stats.evictions += 1;
        debug!(position = slot.position, "evicted slot");
        slot.surface
    }
}

/// Index and distance of the bound position farthest from `requested`.
///
/// Ties go to the first position yielded; a distance of zero never wins.
fn farthest_from(
    positions: impl IntoIterator<Item = usize>,
    requested: usize,
) -> Option<(usize, usize)> {
    let mut farthest = None;
    let mut farthest_distance = 0;
    for (index, position) in positions.into_iter().enumerate() {
        let distance = position.abs_diff(requested);
        if distance > farthest_distance {
            farthest = Some((index, distance));
            farthest_distance = distance;
        }
    }
    farthest
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::testing::{TestRaster, TestSource, TestView};

    fn pool() -> SlotPool<TestView, TestRaster> {
        SlotPool::new(MAX_LIVE_SLOTS, crate::DEFAULT_PERSPECTIVE_STRENGTH)
    }

    fn positions(pool: &SlotPool<TestView, TestRaster>) -> Vec<usize> {
        let mut positions: Vec<usize> = pool.positions().collect();
        positions.sort_unstable();
        positions
    }

    #[test]
    fn acquire_is_idempotent() {
        let mut pool = pool();
        let mut source = TestSource::new(10);

        pool.acquire(4, &mut source);
        let before = pool.stats();
        let slot = pool.acquire(4, &mut source);
        assert_eq!(slot.position(), 4);
        assert_eq!(pool.stats(), before, "rebinding a bound position must not churn");
        assert_eq!(source.requests.len(), 1);
    }

    #[test]
    fn nearby_positions_fill_the_pool_then_farthest_is_evicted() {
        let mut pool = pool();
        let mut source = TestSource::new(10);

        for position in 0..3 {
            pool.acquire(position, &mut source);
        }
        assert_eq!(positions(&pool), [0, 1, 2]);
        assert_eq!(pool.stats().evictions, 0);

        pool.acquire(3, &mut source);
        assert_eq!(positions(&pool), [1, 2, 3]);
        assert_eq!(pool.stats().evictions, 1);
        assert_eq!(pool.stats().surfaces_created, 3);
    }

    #[test]
    fn distant_position_is_evicted_even_below_capacity() {
        let mut pool = pool();
        let mut source = TestSource::new(100);

        pool.acquire(0, &mut source);
        pool.acquire(1, &mut source);
        pool.acquire(50, &mut source);
        assert_eq!(positions(&pool), [1, 50]);
    }

    #[test]
    fn full_pool_evicts_even_when_everything_is_near() {
        let mut pool = pool();
        let mut source = TestSource::new(10);

        // Leave a gap: {2, 4, 5}.
        for position in [0, 1, 2, 4, 5] {
            pool.acquire(position, &mut source);
        }
        assert_eq!(positions(&pool), [2, 4, 5]);

        // Every bound position is within two of 3, yet the pool is full.
        pool.acquire(3, &mut source);
        assert_eq!(positions(&pool), [2, 3, 4]);
        assert!(pool.live_count() <= MAX_LIVE_SLOTS);
    }

    #[test]
    fn equally_distant_slots_evict_the_earliest_bound() {
        for _ in 0..3 {
            let mut pool = pool();
            let mut source = TestSource::new(10);

            for position in [5, 6, 7, 2] {
                pool.acquire(position, &mut source);
            }
            // 7 was farthest from 2; slots are now bound in the order 5, 6, 2.
            assert_eq!(pool.positions().collect::<Vec<_>>(), [5, 6, 2]);

            // 6 and 2 are both two away from 4; 6 was bound first.
            pool.acquire(4, &mut source);
            assert_eq!(positions(&pool), [2, 4, 5]);
            assert_eq!(pool.stats().evictions, 2);
        }
    }

    #[test]
    fn farthest_ties_go_to_the_first_position() {
        assert_eq!(farthest_from([1, 5, 2], 3), Some((0, 2)));
        assert_eq!(farthest_from([5, 1, 2], 3), Some((0, 2)));
        assert_eq!(farthest_from([2, 4], 3), Some((0, 1)));
        assert_eq!(farthest_from(core::iter::empty(), 3), None);
    }

    #[test]
    fn pooled_views_are_capped_across_kinds() {
        let mut pool = pool();
        let mut source = TestSource::new(100);
        source.distinct_kinds = true;

        // Every seek evicts, and no evicted kind is ever requested again.
        for position in (0..60).step_by(3) {
            pool.acquire(position, &mut source);
            assert!(pool.pooled_view_count() <= MAX_LIVE_SLOTS);
        }
        assert_eq!(pool.pooled_view_count(), MAX_LIVE_SLOTS);
        assert_eq!(source.recycled.len(), 19, "dropped views are still recycled");
        assert!(source.requests.iter().all(|(_, reused)| reused.is_none()));
    }

    #[test]
    fn evicted_views_are_reused_by_type() {
        let mut pool = pool();
        let mut source = TestSource::new(10);

        for position in 0..4 {
            pool.acquire(position, &mut source);
        }
        // Position 0 (kind 0, id 1) was evicted for 3 (kind 1, no match).
        assert_eq!(source.recycled, [1]);
        assert_eq!(source.requests[3], (3, None));
        assert_eq!(pool.pooled_view_count(), 1);

        // Position 1 (kind 1, id 2) is evicted for 4 (kind 0): id 1 is reused.
        pool.acquire(4, &mut source);
        assert_eq!(source.recycled, [1, 2]);
        assert_eq!(source.requests[4], (4, Some(1)));
        assert_eq!(pool.stats().views_reused, 1);
        let slot = pool.get(4).unwrap();
        assert_eq!(slot.surface().content(), Some(&TestView::new(4, 1)));
        assert_eq!(slot.view_type(), ViewType::Kind(0));
    }

    #[test]
    fn ignored_view_types_are_never_pooled() {
        let mut pool = pool();
        let mut source = TestSource::new(20);

        for position in 9..13 {
            pool.acquire(position, &mut source);
        }
        // Position 9 opts out of reuse: released, but not pooled.
        assert_eq!(source.recycled.len(), 1);
        assert_eq!(pool.pooled_view_count(), 0);
    }

    #[test]
    fn free_all_parks_surfaces_for_reuse() {
        let mut pool = pool();
        let mut source = TestSource::new(10);

        pool.acquire(0, &mut source);
        pool.acquire(1, &mut source);
        pool.free_all(&mut source);
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.spare_count(), 2);
        assert_eq!(source.recycled, [1, 2]);

        pool.acquire(7, &mut source);
        assert_eq!(pool.spare_count(), 1);
        assert_eq!(pool.stats().surfaces_created, 2);
    }

    #[test]
    fn roles_follow_assignment() {
        let mut pool = pool();
        let mut source = TestSource::new(10);
        for position in 0..3 {
            pool.acquire(position, &mut source);
        }

        pool.set_roles(Some(1), Some(2));
        assert_eq!(pool.get(0).unwrap().role(), SlotRole::Hidden);
        assert_eq!(pool.get(1).unwrap().role(), SlotRole::Front);
        assert_eq!(pool.get(2).unwrap().role(), SlotRole::Back);

        pool.set_roles(None, None);
        assert!(pool.slots().all(|slot| slot.role() == SlotRole::Hidden));
    }

    #[test]
    fn settings_reach_new_and_spare_surfaces() {
        let mut pool = pool();
        let mut source = TestSource::new(10);
        pool.set_size(Size::new(30.0, 40.0));
        pool.acquire(0, &mut source);
        assert_eq!(pool.get(0).unwrap().surface().size(), Size::new(30.0, 40.0));

        pool.free_all(&mut source);
        pool.set_size(Size::new(60.0, 80.0));
        pool.acquire(0, &mut source);
        assert_eq!(pool.get(0).unwrap().surface().size(), Size::new(60.0, 80.0));
    }
}
