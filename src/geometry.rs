//! Page geometry: dimensions, positions and fit calculations.
//!
//! All values are PDF points. Nothing here touches a document; the
//! embedder and the image renderer feed these results into content
//! stream transforms.

use serde::{Deserialize, Serialize};

/// Width and height of a page, image or page region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    /// Create new dimensions.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// ISO A4 portrait.
    pub const fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// US Letter portrait.
    pub const fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// Both sides multiplied by `proportion`.
    pub fn scaled_by(self, proportion: f32) -> Self {
        apply_scale(self, proportion)
    }

    /// Whether both sides are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Whether `self` fits inside `bound` on both axes, allowing for float error.
    pub fn fits_within(&self, bound: Dimensions) -> bool {
        const EPSILON: f32 = 1e-3;
        self.width <= bound.width + EPSILON && self.height <= bound.height + EPSILON
    }
}

/// Lower-left corner of a placed object.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Largest uniform scale at which `src` fits inside `bound`.
pub fn scale_to_fit(src: Dimensions, bound: Dimensions) -> f32 {
    (bound.width / src.width).min(bound.height / src.height)
}

pub fn apply_scale(d: Dimensions, scale: f32) -> Dimensions {
    Dimensions::new(d.width * scale, d.height * scale)
}

/// Position that centres `inner` inside `outer`.
pub fn center_position(inner: Dimensions, outer: Dimensions) -> Position {
    Position::new(
        (outer.width - inner.width) / 2.0,
        (outer.height - inner.height) / 2.0,
    )
}

/// Uniform scale followed by a translation. Never rotates or shears.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub position: Position,
}

impl Transform {
    /// Scale `src` to fit `bound` and centre it there.
    pub fn fit_centered(src: Dimensions, bound: Dimensions) -> Self {
        let scale = scale_to_fit(src, bound);
        let position = center_position(apply_scale(src, scale), bound);
        Self { scale, position }
    }

    /// Content stream matrix `[a b c d e f]` for the `cm` operator.
    pub fn matrix(&self) -> [f32; 6] {
        [
            self.scale,
            0.0,
            0.0,
            self.scale,
            self.position.x,
            self.position.y,
        ]
    }
}
