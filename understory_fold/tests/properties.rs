// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the rotation model and slot recycling.

use proptest::prelude::*;
use understory_fold::{
    DEGREES_PER_ITEM, FoldConfig, FoldFrame, FoldHost, FoldList, FoldSource, FrameHandle,
    MAX_LIVE_SLOTS, Raster, RasterError, ViewType, max_rotation,
};

#[derive(Debug)]
struct Items {
    count: usize,
}

impl FoldSource for Items {
    type View = usize;

    fn count(&self) -> usize {
        self.count
    }

    fn view_type(&self, position: usize) -> ViewType {
        ViewType::Kind(u32::from(position % 3 == 0))
    }

    fn view(&mut self, position: usize, _reusable: Option<usize>) -> usize {
        position
    }
}

#[derive(Debug)]
struct NoRaster;

impl Raster for NoRaster {
    fn size(&self) -> (u32, u32) {
        (0, 0)
    }
}

#[derive(Debug, Default)]
struct Host {
    frames: u64,
}

impl FoldHost for Host {
    type Raster = NoRaster;

    fn allocate_raster(&mut self, width: u32, height: u32) -> Result<NoRaster, RasterError> {
        Err(RasterError::Unsupported { width, height })
    }

    fn request_redraw(&mut self) {}

    fn schedule_frame(&mut self, _delay_ms: u64) -> FrameHandle {
        self.frames += 1;
        FrameHandle::new(self.frames)
    }

    fn cancel_frame(&mut self, _handle: FrameHandle) {}
}

fn list(count: usize) -> FoldList<Items, Host> {
    FoldList::new(Items { count }, Host::default(), FoldConfig::default())
}

fn arb_rotation() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1.0e6..1.0e6_f64,
        // Exact item boundaries.
        (0..200_u32).prop_map(|i| f64::from(i) * DEGREES_PER_ITEM),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
    ]
}

proptest! {
    #[test]
    fn rotation_stays_clamped(count in 0_usize..50, rotations in prop::collection::vec(arb_rotation(), 1..20)) {
        let mut list = list(count);
        for rotation in rotations {
            list.set_rotation(rotation);
            let r = list.rotation();
            prop_assert!((0.0..=max_rotation(count)).contains(&r), "rotation {r} out of range");
        }
    }

    #[test]
    fn decomposition_is_consistent(count in 1_usize..50, rotation in arb_rotation()) {
        let frame = FoldFrame::new(rotation, count);
        prop_assert!((0.0..DEGREES_PER_ITEM).contains(&frame.local));
        prop_assert!(frame.focus < count);
        #[allow(clippy::cast_precision_loss, reason = "Small test counts")]
        let recomposed = frame.focus as f64 * DEGREES_PER_ITEM + frame.local;
        prop_assert!((recomposed - frame.rotation).abs() < 1e-6);

        let expected_front = if frame.focus + 1 < count && frame.local > 90.0 {
            frame.focus + 1
        } else {
            frame.focus
        };
        prop_assert_eq!(frame.front, Some(expected_front));
    }

    #[test]
    fn live_items_are_bound(count in 1_usize..200, rotation in arb_rotation()) {
        let mut list = list(count);
        list.set_rotation(rotation);
        let frame = *list.frame();
        for (position, angle) in frame.live_items() {
            let slot = list.pool().get(position);
            prop_assert!(slot.is_some(), "live item {position} is not bound");
            prop_assert_eq!(slot.map(|slot| slot.surface().local_angle()), Some(angle));
        }
    }

    #[test]
    fn random_seeks_never_exceed_slot_bound(seeks in prop::collection::vec(0_usize..10_000, 1..200)) {
        let mut list = list(10_000);
        for position in seeks {
            #[allow(clippy::cast_precision_loss, reason = "Positions are below 2^52")]
            let rotation = position as f64 * DEGREES_PER_ITEM + 45.0;
            list.set_rotation(rotation);
            prop_assert!(list.pool().live_count() <= MAX_LIVE_SLOTS);
            prop_assert!(list.pool().get(list.frame().focus).is_some());
        }
    }
}
