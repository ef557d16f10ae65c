// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic host, canvas, and source doubles shared by unit tests.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::geometry::Half;
use crate::host::{
    Canvas, Color, FoldHost, FrameHandle, HalfTransform, Painter, Raster, RasterError,
};
use crate::source::{FoldSource, ViewType};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TestView {
    pub(crate) position: usize,
    pub(crate) id: u32,
}

impl TestView {
    pub(crate) fn new(position: usize, id: u32) -> Self {
        Self { position, id }
    }
}

#[derive(Debug)]
pub(crate) struct TestRaster {
    width: u32,
    height: u32,
}

impl Raster for TestRaster {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Debug, Default)]
pub(crate) struct TestHost {
    pub(crate) fail_allocations: bool,
    pub(crate) allocations: usize,
    pub(crate) redraws: usize,
    pub(crate) next_frame: u64,
    pub(crate) scheduled: Vec<(FrameHandle, u64)>,
    pub(crate) cancelled: Vec<FrameHandle>,
    pub(crate) fired: Vec<FrameHandle>,
}

impl TestHost {
    /// The most recently scheduled frame that has neither fired nor been
    /// cancelled.
    pub(crate) fn pending_frame(&self) -> Option<FrameHandle> {
        self.scheduled
            .last()
            .map(|(handle, _)| *handle)
            .filter(|handle| !self.cancelled.contains(handle) && !self.fired.contains(handle))
    }

    /// Marks the pending frame as fired and returns it.
    pub(crate) fn fire_pending(&mut self) -> Option<FrameHandle> {
        let handle = self.pending_frame()?;
        self.fired.push(handle);
        Some(handle)
    }
}

impl FoldHost for TestHost {
    type Raster = TestRaster;

    fn allocate_raster(&mut self, width: u32, height: u32) -> Result<TestRaster, RasterError> {
        if self.fail_allocations {
            return Err(RasterError::OutOfMemory { width, height });
        }
        self.allocations += 1;
        Ok(TestRaster { width, height })
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn schedule_frame(&mut self, delay_ms: u64) -> FrameHandle {
        self.next_frame += 1;
        let handle = FrameHandle::new(self.next_frame);
        self.scheduled.push((handle, delay_ms));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled.push(handle);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawOp {
    Content { position: usize, bounds: Rect },
    Cache { position: usize },
    BeginHalf { half: Half, rotation_x: f64 },
    Raster { src: Rect },
    Fill { rect: Rect, alpha: u8 },
    EndHalf,
}

#[derive(Debug, Default)]
pub(crate) struct TestCanvas {
    pub(crate) ops: Vec<DrawOp>,
}

impl Painter for TestCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::Fill {
            rect,
            alpha: color.a,
        });
    }
}

impl Canvas<TestView> for TestCanvas {
    type Raster = TestRaster;

    fn draw_content(&mut self, view: &TestView, bounds: Rect) {
        self.ops.push(DrawOp::Content {
            position: view.position,
            bounds,
        });
    }

    fn cache_content(&mut self, _raster: &mut TestRaster, view: &TestView) {
        self.ops.push(DrawOp::Cache {
            position: view.position,
        });
    }

    fn begin_half(&mut self, transform: &HalfTransform) {
        self.ops.push(DrawOp::BeginHalf {
            half: transform.half,
            rotation_x: transform.rotation_x,
        });
    }

    fn draw_raster(&mut self, _raster: &TestRaster, src: Rect) {
        self.ops.push(DrawOp::Raster { src });
    }

    fn end_half(&mut self) {
        self.ops.push(DrawOp::EndHalf);
    }
}

/// A source whose items alternate between two view kinds, with every tenth
/// item opting out of reuse.
#[derive(Debug, Default)]
pub(crate) struct TestSource {
    pub(crate) count: usize,
    /// Give every position its own view kind instead.
    pub(crate) distinct_kinds: bool,
    pub(crate) created: u32,
    /// `(position, id of the reused view)` for every `view` call.
    pub(crate) requests: Vec<(usize, Option<u32>)>,
    /// Ids of views passed to `recycle`.
    pub(crate) recycled: Vec<u32>,
}

impl TestSource {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }
}

impl FoldSource for TestSource {
    type View = TestView;

    fn count(&self) -> usize {
        self.count
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Kinds are small test values"
    )]
    fn view_type(&self, position: usize) -> ViewType {
        if self.distinct_kinds {
            ViewType::Kind(position as u32)
        } else if position % 10 == 9 {
            ViewType::Ignore
        } else {
            ViewType::Kind((position % 2) as u32)
        }
    }

    fn view(&mut self, position: usize, reusable: Option<TestView>) -> TestView {
        self.requests
            .push((position, reusable.as_ref().map(|view| view.id)));
        match reusable {
            Some(mut view) => {
                view.position = position;
                view
            }
            None => {
                self.created += 1;
                TestView::new(position, self.created)
            }
        }
    }

    fn recycle(&mut self, view: &mut TestView) {
        self.recycled.push(view.id);
    }
}
