//! Cross-fade opacity for the two items straddling the visual center.

use crate::layout::WheelLayout;
use crate::wheel::NeighborRule;

/// Fraction of the maximum inter-anchor depth difference that the fade
/// window spans.
pub const CROSS_FADE_RANGE_RATIO: f32 = 0.15;

/// Damping applied to the raw fade opacity.
pub const CROSS_FADE_OPACITY_CORRECTION: f32 = 0.75;

/// Transient cross-fade between the two items straddling the wheel angle.
///
/// Recomputed every time the angle changes; absent when either straddling
/// neighbor falls outside the valid item indices (at the ends of the item
/// sequence, or while the wheel is rubber-banded past them).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossFadeState {
    /// The neighbor closer to facing the viewer, fading out underneath.
    pub fade_out_idx: usize,
    /// The neighbor fading in on top.
    pub fade_in_idx: usize,
    /// Opacity of the fade-in item, within `[0, 0.5 · correction]`.
    pub fade_in_opacity: f32,
}

impl CrossFadeState {
    pub fn compute(layout: &WheelLayout, wheel_angle: f32) -> Option<Self> {
        let left_idx = layout.nearest_step_index(wheel_angle, NeighborRule::Floor)?;
        let right_idx = layout.nearest_step_index(wheel_angle, NeighborRule::Ceil)?;

        let geometry = layout.geometry();
        let left_depth = geometry.depth_projection(left_idx, wheel_angle);
        let right_depth = geometry.depth_projection(right_idx, wheel_angle);

        let (fade_out_idx, fade_in_idx) = if left_depth > right_depth {
            (left_idx, right_idx)
        } else {
            (right_idx, left_idx)
        };

        let radius = geometry.radius();
        let max_range = radius - geometry.angle_step().cos() * radius;
        let fade_range = max_range * CROSS_FADE_RANGE_RATIO;
        let depth_diff = (left_depth - right_depth).abs();
        let fade_in_opacity =
            (1.0 - depth_diff.min(fade_range) / fade_range) / 2.0 * CROSS_FADE_OPACITY_CORRECTION;

        Some(Self {
            fade_out_idx,
            fade_in_idx,
            fade_in_opacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::ItemCount;
    use crate::geometry::{Rect, Size};
    use crate::wheel::WheelGeometry;
    use std::f32::consts::PI;

    fn layout() -> WheelLayout {
        WheelLayout::new(
            Rect::new(0.0, 0.0, 600.0, 400.0),
            WheelGeometry::new(300.0, PI / 14.0).unwrap(),
            ItemCount::new(5).unwrap(),
            Size::new(100.0, 100.0),
        )
    }

    #[test]
    fn absent_before_first_anchor() {
        let layout = layout();
        let step = layout.geometry().angle_step();
        assert_eq!(CrossFadeState::compute(&layout, -0.4 * step), None);
    }

    #[test]
    fn absent_past_last_anchor() {
        let layout = layout();
        let step = layout.geometry().angle_step();
        assert_eq!(CrossFadeState::compute(&layout, 4.5 * step), None);
    }

    #[test]
    fn midpoint_has_maximal_opacity() {
        let layout = layout();
        let step = layout.geometry().angle_step();
        let state = CrossFadeState::compute(&layout, 2.5 * step).unwrap();
        let max_opacity = 0.5 * CROSS_FADE_OPACITY_CORRECTION;
        assert!((state.fade_in_opacity - max_opacity).abs() < 1e-4);
        let mut pair = [state.fade_out_idx, state.fade_in_idx];
        pair.sort_unstable();
        assert_eq!(pair, [2, 3]);
    }

    #[test]
    fn opacity_fades_to_zero_near_anchor() {
        let layout = layout();
        let step = layout.geometry().angle_step();
        let state = CrossFadeState::compute(&layout, 2.05 * step).unwrap();
        assert!(state.fade_in_opacity.abs() < 1e-4);
        // The item just left behind faces the viewer and fades out.
        assert_eq!(state.fade_out_idx, 2);
        assert_eq!(state.fade_in_idx, 3);
    }

    #[test]
    fn opacity_stays_within_bounds() {
        let layout = layout();
        let step = layout.geometry().angle_step();
        let max_opacity = 0.5 * CROSS_FADE_OPACITY_CORRECTION;
        for i in 0..=40 {
            let angle = step * (i as f32 / 10.0);
            if let Some(state) = CrossFadeState::compute(&layout, angle) {
                assert!(state.fade_in_opacity >= 0.0);
                assert!(state.fade_in_opacity <= max_opacity + 1e-5);
            }
        }
    }
}
