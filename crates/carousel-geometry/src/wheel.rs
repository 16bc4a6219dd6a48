//! Angular/linear conversions for items on a fixed-radius wheel.

use std::f32::consts::FRAC_PI_2;
use std::ops::RangeInclusive;

/// Selects which of the two step anchors straddling an angle to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeighborRule {
    /// Round to the closest integer step.
    Nearest,
    /// Round down (the anchor at or left of the angle).
    Floor,
    /// Round up (the anchor at or right of the angle).
    Ceil,
}

/// Errors from wheel geometry construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    NonPositiveRadius,
    NonPositiveAngleStep,
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::NonPositiveRadius => write!(f, "wheel radius must be positive"),
            GeometryError::NonPositiveAngleStep => write!(f, "angle step must be positive"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Immutable wheel parameters: a circle of the given radius with item
/// anchors spaced uniformly by `angle_step`.
///
/// All items move on the same circle; only the origin angle (which angle
/// currently faces the viewer) varies at runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelGeometry {
    radius: f32,
    angle_step: f32,
}

impl WheelGeometry {
    pub fn new(radius: f32, angle_step: f32) -> Result<Self, GeometryError> {
        if !(radius > 0.0) {
            return Err(GeometryError::NonPositiveRadius);
        }
        if !(angle_step > 0.0) {
            return Err(GeometryError::NonPositiveAngleStep);
        }
        Ok(Self { radius, angle_step })
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn angle_step(&self) -> f32 {
        self.angle_step
    }

    /// Horizontal displacement of item `idx` from the visual center.
    pub fn x_projection(&self, idx: usize, origin_angle: f32) -> f32 {
        let angle = self.angle_step * idx as f32 - origin_angle;
        angle.sin() * self.radius
    }

    /// Depth of item `idx` along the viewing axis. Maximal when the item
    /// faces the viewer; items past ±π/2 project behind the viewer.
    pub fn depth_projection(&self, idx: usize, origin_angle: f32) -> f32 {
        let angle = self.angle_step * idx as f32 - origin_angle;
        angle.cos() * self.radius
    }

    /// Anchor angle of item `idx`.
    pub fn angle_for_index(&self, idx: usize) -> f32 {
        self.angle_step * idx as f32
    }

    /// Linear circle offset covered by `angle` (units: angle × radius).
    pub fn circle_offset_for_angle(&self, angle: f32) -> f32 {
        angle * self.radius
    }

    /// Exact inverse of [`circle_offset_for_angle`](Self::circle_offset_for_angle).
    pub fn angle_for_circle_offset(&self, offset: f32) -> f32 {
        offset / self.radius
    }

    /// Signed index range whose anchors lie within a quarter turn of the
    /// origin angle. Indices beyond ±π/2 project behind the viewer and are
    /// never visible regardless of viewport size. The range is not clamped
    /// to any valid item interval.
    pub fn visible_index_window(&self, origin_angle: f32) -> RangeInclusive<i64> {
        let lower = ((origin_angle - FRAC_PI_2) / self.angle_step).round() as i64;
        let upper = ((origin_angle + FRAC_PI_2) / self.angle_step).round() as i64;
        lower..=upper
    }

    /// Signed step index for `angle` under the given tie rule.
    pub fn step_index(&self, angle: f32, rule: NeighborRule) -> i64 {
        let step = angle / self.angle_step;
        match rule {
            NeighborRule::Nearest => step.round() as i64,
            NeighborRule::Floor => step.floor() as i64,
            NeighborRule::Ceil => step.ceil() as i64,
        }
    }

    /// Anchor angle nearest to an arbitrary angle projection.
    pub fn nearest_angle_anchor(&self, angle: f32, rule: NeighborRule) -> f32 {
        self.step_index(angle, rule) as f32 * self.angle_step
    }

    /// Anchor circle offset nearest to an arbitrary offset projection.
    pub fn nearest_circle_offset_anchor(&self, projection: f32, rule: NeighborRule) -> f32 {
        let angle = self.angle_for_circle_offset(projection);
        self.circle_offset_for_angle(self.nearest_angle_anchor(angle, rule))
    }

    /// Circle offset of item `idx`'s rest position.
    pub fn circle_offset_anchor(&self, idx: usize) -> f32 {
        self.circle_offset_for_angle(self.angle_for_index(idx))
    }
}
