//! Per-viewport wheel layout: visible windows, item placement, anchors.

use std::ops::RangeInclusive;

use crate::count::ItemCount;
use crate::geometry::{Point, Rect, Size};
use crate::wheel::{NeighborRule, WheelGeometry};
use crate::zoom::ScaleCurve;

/// Immutable layout derived from a viewport, the wheel geometry, the item
/// count, and the unscaled item size. Recomputed by the caller whenever
/// the viewport frame or item count changes.
#[derive(Clone, Debug)]
pub struct WheelLayout {
    bounds: Rect,
    geometry: WheelGeometry,
    item_count: ItemCount,
    item_size: Size,
    zoom: ScaleCurve,
}

impl WheelLayout {
    pub fn new(bounds: Rect, geometry: WheelGeometry, item_count: ItemCount, item_size: Size) -> Self {
        let zoom = ScaleCurve::new(bounds.width / 2.0);
        Self {
            bounds,
            geometry,
            item_count,
            item_size,
            zoom,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn geometry(&self) -> &WheelGeometry {
        &self.geometry
    }

    #[inline]
    pub fn item_count(&self) -> ItemCount {
        self.item_count
    }

    fn visual_center(&self) -> Point {
        self.bounds.center()
    }

    /// Inclusive index range of items whose frames intersect the viewport,
    /// or `None` when no item does. The candidate window (±π/2 around the
    /// origin angle, intersected with the valid indices) is narrowed by
    /// testing actual item frames, expanding from the first intersecting
    /// index until the frames leave the viewport.
    pub fn visible_indices(&self, origin_angle: f32) -> Option<RangeInclusive<usize>> {
        let window = self.geometry.visible_index_window(origin_angle);
        let last = self.item_count.last_index() as i64;
        let lower = (*window.start()).clamp(0, last) as usize;
        let upper = (*window.end()).clamp(0, last) as usize;

        let mut start_idx: Option<usize> = None;
        let mut end_idx: Option<usize> = None;
        for idx in lower..=upper {
            let frame = self.item_frame(idx, origin_angle);
            if frame.intersects(&self.bounds) {
                start_idx.get_or_insert(idx);
                end_idx = Some(idx);
            } else if start_idx.is_some() {
                break;
            }
        }
        Some(start_idx?..=end_idx?)
    }

    /// On-screen center of item `idx`: the visual center displaced
    /// horizontally by the wheel projection.
    pub fn offset(&self, idx: usize, origin_angle: f32) -> Point {
        let center = self.visual_center();
        Point {
            x: center.x + self.geometry.x_projection(idx, origin_angle),
            y: center.y,
        }
    }

    /// Stacking order: monotonic in depth, so nearer items draw above
    /// farther ones.
    pub fn z_index(&self, idx: usize, origin_angle: f32) -> f32 {
        self.geometry.depth_projection(idx, origin_angle) / (self.bounds.width / 2.0)
    }

    /// Zoom factor of item `idx` at the given origin angle; items past the
    /// fall-off curve's domain get the floor scale.
    pub fn zoom_factor(&self, idx: usize, origin_angle: f32) -> f32 {
        self.zoom
            .zoom_factor(self.geometry.x_projection(idx, origin_angle))
    }

    /// Frame of item `idx`: the unscaled item size shrunk by the zoom
    /// factor and centered on the item's offset.
    pub fn item_frame(&self, idx: usize, origin_angle: f32) -> Rect {
        let zoom = self.zoom_factor(idx, origin_angle);
        let center = self.offset(idx, origin_angle);
        let width = self.item_size.width * zoom;
        let height = self.item_size.height * zoom;
        Rect {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    /// The item index whose anchor is closest to the origin angle,
    /// clamped to the valid indices.
    pub fn active_index(&self, origin_angle: f32) -> usize {
        let idx = self.geometry.step_index(origin_angle, NeighborRule::Nearest);
        idx.clamp(0, self.item_count.last_index() as i64) as usize
    }

    /// The step index straddling `angle` under the given rule, or `None`
    /// when it falls outside the valid indices.
    pub fn nearest_step_index(&self, angle: f32, rule: NeighborRule) -> Option<usize> {
        let idx = self.geometry.step_index(angle, rule);
        if (0..=self.item_count.last_index() as i64).contains(&idx) {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Angular span of the whole wheel, optionally widened past the last
    /// anchor (the interaction layer stretches the drag range this way).
    pub fn full_angle_range(&self, extra_angle: f32) -> RangeInclusive<f32> {
        0.0..=(self.geometry.angle_step() * self.item_count.last_index() as f32 + extra_angle)
    }

    /// Valid circle-offset positions before elastic clamping applies.
    pub fn circle_offset_range(&self) -> RangeInclusive<f32> {
        let max = self
            .geometry
            .circle_offset_for_angle(*self.full_angle_range(0.0).end());
        0.0..=max
    }

    /// Rest offset of item `idx`, clamped into the valid offset range.
    pub fn circle_offset_anchor(&self, idx: usize) -> f32 {
        let range = self.circle_offset_range();
        self.geometry
            .circle_offset_anchor(idx)
            .clamp(*range.start(), *range.end())
    }

    /// Anchor offset nearest to a projected offset, clamped into the
    /// valid offset range.
    pub fn nearest_circle_offset_anchor(&self, projection: f32) -> f32 {
        let range = self.circle_offset_range();
        self.geometry
            .nearest_circle_offset_anchor(projection, NeighborRule::Nearest)
            .clamp(*range.start(), *range.end())
    }

    /// Hit test: the visible item whose frame contains `point`. The active
    /// item is checked first, then its neighbors walking outward, so
    /// overlapping frames resolve to the item drawn on top.
    pub fn index_at(
        &self,
        point: Point,
        active_idx: usize,
        origin_angle: f32,
    ) -> Option<usize> {
        let visible = self.visible_indices(origin_angle)?;

        if visible.contains(&active_idx) && self.item_frame(active_idx, origin_angle).contains(point)
        {
            return Some(active_idx);
        }

        for idx in (*visible.start()..active_idx.min(*visible.end() + 1)).rev() {
            if self.item_frame(idx, origin_angle).contains(point) {
                return Some(idx);
            }
        }

        for idx in (active_idx + 1).max(*visible.start())..=*visible.end() {
            if self.item_frame(idx, origin_angle).contains(point) {
                return Some(idx);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-4;

    fn layout(bounds_width: f32, count: usize) -> WheelLayout {
        WheelLayout::new(
            Rect::new(0.0, 0.0, bounds_width, 400.0),
            WheelGeometry::new(300.0, PI / 14.0).unwrap(),
            ItemCount::new(count).unwrap(),
            Size::new(100.0, 100.0),
        )
    }

    #[test]
    fn active_index_at_origin_is_zero() {
        let layout = layout(600.0, 5);
        assert_eq!(layout.active_index(0.0), 0);
    }

    #[test]
    fn active_index_clamps_to_valid_items() {
        let layout = layout(600.0, 5);
        let step = layout.geometry().angle_step();
        assert_eq!(layout.active_index(step * 3.1), 3);
        assert_eq!(layout.active_index(step * 40.0), 4);
        assert_eq!(layout.active_index(-step * 3.0), 0);
    }

    #[test]
    fn visible_indices_cover_all_items_in_wide_viewport() {
        // Half-width equals the wheel radius, so every anchor within ±π/2
        // projects inside the viewport.
        let layout = layout(600.0, 5);
        assert_eq!(layout.visible_indices(0.0), Some(0..=4));
    }

    #[test]
    fn visible_indices_window_caps_at_quarter_turn() {
        let layout = layout(600.0, 20);
        let visible = layout.visible_indices(0.0).unwrap();
        assert_eq!(*visible.start(), 0);
        // ±π/2 at step π/14 admits at most indices 0..=7.
        assert!(*visible.end() <= 7);
    }

    #[test]
    fn visible_indices_narrowed_by_viewport_frames() {
        let layout = layout(380.0, 20);
        let visible = layout.visible_indices(0.0).unwrap();
        // Items 4+ project past the right edge of the 380pt viewport.
        assert_eq!(visible, 0..=3);
    }

    #[test]
    fn visible_indices_none_when_wheel_rotated_far_away() {
        let layout = layout(380.0, 3);
        // Rotate the wheel so every item sits behind/over the left edge.
        let far_angle = layout.geometry().angle_step() * 40.0;
        assert_eq!(layout.visible_indices(far_angle), None);
    }

    #[test]
    fn offset_is_centered_for_facing_item() {
        let layout = layout(600.0, 5);
        let origin = layout.geometry().angle_for_index(2);
        let offset = layout.offset(2, origin);
        assert!((offset.x - 300.0).abs() < EPS);
        assert!((offset.y - 200.0).abs() < EPS);
    }

    #[test]
    fn z_index_orders_by_depth() {
        let layout = layout(600.0, 5);
        let origin = layout.geometry().angle_for_index(1);
        let facing = layout.z_index(1, origin);
        let near = layout.z_index(2, origin);
        let far = layout.z_index(4, origin);
        assert!(facing > near);
        assert!(near > far);
    }

    #[test]
    fn anchors_clamp_into_offset_range() {
        let layout = layout(600.0, 5);
        let range = layout.circle_offset_range();
        let max = *range.end();
        let expected_max = 300.0 * (PI / 14.0) * 4.0;
        assert!((max - expected_max).abs() < 1e-3);
        assert_eq!(layout.nearest_circle_offset_anchor(10_000.0), max);
        assert_eq!(layout.nearest_circle_offset_anchor(-10_000.0), 0.0);
        assert_eq!(layout.circle_offset_anchor(0), 0.0);
    }

    #[test]
    fn nearest_anchor_snaps_to_step_multiple() {
        let layout = layout(600.0, 5);
        let step_offset = layout
            .geometry()
            .circle_offset_for_angle(layout.geometry().angle_step());
        let projection = step_offset * 2.4;
        let snapped = layout.nearest_circle_offset_anchor(projection);
        assert!((snapped - step_offset * 2.0).abs() < EPS);
    }

    #[test]
    fn nearest_step_index_rejects_out_of_range_neighbors() {
        let layout = layout(600.0, 5);
        let step = layout.geometry().angle_step();
        assert_eq!(layout.nearest_step_index(-0.3 * step, NeighborRule::Floor), None);
        assert_eq!(layout.nearest_step_index(-0.3 * step, NeighborRule::Ceil), Some(0));
        assert_eq!(
            layout.nearest_step_index(step * 4.2, NeighborRule::Ceil),
            None
        );
        assert_eq!(
            layout.nearest_step_index(step * 4.2, NeighborRule::Floor),
            Some(4)
        );
    }

    #[test]
    fn item_frame_shrinks_away_from_center() {
        let layout = layout(600.0, 5);
        let center_frame = layout.item_frame(0, 0.0);
        let side_frame = layout.item_frame(3, 0.0);
        assert!((center_frame.width - 100.0).abs() < 1e-2);
        assert!(side_frame.width < center_frame.width);
    }

    #[test]
    fn index_at_prefers_active_item() {
        let layout = layout(600.0, 5);
        // Items overlap near the center; the active item wins the hit.
        let center = layout.offset(0, 0.0);
        assert_eq!(layout.index_at(center, 0, 0.0), Some(0));
    }

    #[test]
    fn index_at_finds_side_items_and_misses_outside() {
        let layout = layout(600.0, 5);
        let side = layout.offset(3, 0.0);
        assert_eq!(layout.index_at(side, 0, 0.0), Some(3));
        assert_eq!(layout.index_at(Point::new(1.0, 390.0), 0, 0.0), None);
    }
}
