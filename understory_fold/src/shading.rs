// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shading hooks invoked around each half draw.

use kurbo::Rect;

use crate::geometry::Half;
use crate::host::{Color, Painter};

/// Maximum alpha of the default fold shadow.
pub const SHADOW_MAX_ALPHA: u8 = 192;

/// Draws extra effects around a half.
///
/// `bounds` is the half's source rectangle in item coordinates and `angle` the
/// item's normalized local angle in `(-180, 180]`. Both hooks run under the
/// half's transform.
pub trait FoldShading {
    /// Called before the half's raster region is drawn.
    fn on_pre_draw(&self, painter: &mut dyn Painter, bounds: Rect, angle: f64, half: Half);

    /// Called after the half's raster region is drawn.
    fn on_post_draw(&self, painter: &mut dyn Painter, bounds: Rect, angle: f64, half: Half);
}

/// A flat shadow that darkens a half while it rotates.
///
/// Intensity ramps linearly with `|angle| / 90` over the half's active arc
/// (`(-90, 0)` for the top half, `(0, 90)` for the bottom one) and is zero
/// elsewhere.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimpleShading {
    /// Shadow color; its alpha is replaced by the computed intensity.
    pub color: Color,
    /// Alpha at full intensity.
    pub max_alpha: u8,
}

impl SimpleShading {
    /// Shadow intensity in `[0, 1)` for `half` at `angle`.
    pub fn intensity(angle: f64, half: Half) -> f64 {
        match half {
            Half::Top if angle > -90.0 && angle < 0.0 => -angle / 90.0,
            Half::Bottom if angle > 0.0 && angle < 90.0 => angle / 90.0,
            _ => 0.0,
        }
    }

    /// Alpha for `half` at `angle`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Intensity is below 1, so the product fits in u8"
    )]
    pub fn alpha(&self, angle: f64, half: Half) -> u8 {
        (f64::from(self.max_alpha) * Self::intensity(angle, half)) as u8
    }
}

impl Default for SimpleShading {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            max_alpha: SHADOW_MAX_ALPHA,
        }
    }
}

impl FoldShading for SimpleShading {
    fn on_pre_draw(&self, _painter: &mut dyn Painter, _bounds: Rect, _angle: f64, _half: Half) {}

    fn on_post_draw(&self, painter: &mut dyn Painter, bounds: Rect, angle: f64, half: Half) {
        if Self::intensity(angle, half) > 0.0 {
            painter.fill_rect(bounds, self.color.with_alpha(self.alpha(angle, half)));
        }
    }
}
