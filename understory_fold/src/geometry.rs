// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fold geometry: pure functions from a local fold angle to per-half poses.
//!
//! An item is hinged at its horizontal midline. Each half rotates about the
//! hinge independently:
//!
//! | normalized angle `p` | top half                | bottom half             |
//! |----------------------|-------------------------|-------------------------|
//! | `(-180, -90]`        | hidden                  | flat                    |
//! | `(-90, 0)`           | rotated by `p`          | flat                    |
//! | `0`                  | flat                    | flat                    |
//! | `(0, 90)`            | flat                    | rotated by `p`          |
//! | `[90, 180)`          | flat                    | hidden                  |
//! | `180`                | hidden                  | hidden                  |
//!
//! A half that has folded past vertical faces away from the viewer and is
//! hidden instead of drawing its back face.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Rect, Size};

/// Clipping factor used when no roll offset is applied: each half takes
/// exactly half of the source raster.
pub const DEFAULT_CLIPPING_FACTOR: f64 = 0.5;

/// One of the two independently rotating halves of an item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Half {
    /// The half above the hinge.
    Top,
    /// The half below the hinge.
    Bottom,
}

impl Half {
    /// Both halves, in draw order.
    pub const BOTH: [Self; 2] = [Self::Top, Self::Bottom];
}

/// Visibility and rotation of one half for a given angle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HalfPose {
    /// Whether the half should be drawn at all.
    pub visible: bool,
    /// Rotation about the hinge (x axis), in degrees. Zero means flat.
    pub rotation_x: f64,
}

/// Fold an arbitrary angle in degrees into `(-180, 180]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut p = angle % 360.0;
    if p < 0.0 {
        p += 360.0;
    }
    // `-tiny % 360 + 360` can round up to exactly 360.
    if p >= 360.0 {
        p -= 360.0;
    }
    if p > 180.0 { p - 360.0 } else { p }
}

/// Pose of `half` at the normalized angle `p` (see [`normalize_angle`]).
pub fn half_pose(half: Half, p: f64) -> HalfPose {
    match half {
        Half::Top => {
            if p <= -90.0 || p == 180.0 {
                HalfPose {
                    visible: false,
                    rotation_x: 0.0,
                }
            } else if p < 0.0 {
                HalfPose {
                    visible: true,
                    rotation_x: p,
                }
            } else {
                HalfPose {
                    visible: true,
                    rotation_x: 0.0,
                }
            }
        }
        Half::Bottom => {
            if p >= 90.0 {
                HalfPose {
                    visible: false,
                    rotation_x: 0.0,
                }
            } else if p > 0.0 {
                HalfPose {
                    visible: true,
                    rotation_x: p,
                }
            } else {
                HalfPose {
                    visible: true,
                    rotation_x: 0.0,
                }
            }
        }
    }
}

/// Clipping factor for `half` while the item is rolled by `distance`.
///
/// The top half's factor is `0.5 * (h - distance) / h` where `h` is the
/// half-height; the bottom half takes the complement. A zero half-height keeps
/// the default split.
pub fn roll_clipping_factor(half: Half, distance: f64, half_height: f64) -> f64 {
    let top = if half_height == 0.0 {
        DEFAULT_CLIPPING_FACTOR
    } else {
        0.5 * (half_height - distance) / half_height
    };
    match half {
        Half::Top => top,
        Half::Bottom => 1.0 - top,
    }
}

/// Source rectangle of `half` inside a raster of `raster` size.
///
/// The top half spans `[0, h * factor]`, the bottom half `[h * (1 - factor), h]`,
/// both snapped to whole pixels with a one pixel overlap at the hinge. The
/// result is intersected with `visible_bounds` when given; an empty
/// intersection yields [`Rect::ZERO`].
pub fn half_source_rect(
    half: Half,
    raster: Size,
    clipping_factor: f64,
    visible_bounds: Option<Rect>,
) -> Rect {
    let (w, h) = (raster.width, raster.height);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Edges are snapped toward zero to whole pixels, matching raster addressing"
    )]
    let (y0, y1) = match half {
        Half::Top => (0.0, (h * clipping_factor + 0.5) as i64 as f64),
        Half::Bottom => ((h * (1.0 - clipping_factor) - 0.5) as i64 as f64, h),
    };
    let bounds = Rect::new(0.0, y0, w, y1);
    match visible_bounds {
        Some(visible) => {
            let clipped = bounds.intersect(visible);
            if clipped.width() > 0.0 && clipped.height() > 0.0 {
                clipped
            } else {
                Rect::ZERO
            }
        }
        None => bounds,
    }
}

/// Scale that keeps a folding item inside its width.
///
/// As a half rotates toward the viewer its near edge grows under perspective.
/// The growth is approximated as `height * |sin(angle)| * strength`, and the
/// returned factor shrinks the item so that the widened edge fits `size.width`.
/// Returns `1.0` for an empty size.
pub fn auto_scale_factor(size: Size, angle: f64, perspective_strength: f64) -> f64 {
    if size.width <= 0.0 {
        return 1.0;
    }
    let sin = angle.to_radians().sin().abs();
    let dw = size.height * sin * perspective_strength;
    size.width / (size.width + dw)
}
