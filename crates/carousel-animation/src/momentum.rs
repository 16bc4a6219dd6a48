//! Momentum session: settles the wheel after a gesture release or jump.

use std::ops::RangeInclusive;

use crate::spring::{Spring, SpringTiming};

/// Capabilities the momentum session needs from whoever owns the wheel
/// state. Implemented by the interaction layer; passed by reference into
/// every call, never stored.
pub trait WheelHost {
    fn circle_offset(&self) -> f32;
    fn set_circle_offset(&mut self, offset: f32);
    /// Valid offset positions; outside them the wheel bounces back.
    fn circle_offset_bounds(&self) -> RangeInclusive<f32>;
    /// Anchor offset nearest to a projected offset.
    fn nearest_anchor(&self, projection: f32) -> f32;
    /// Anchor offset of a specific item.
    fn anchor_for_item(&self, idx: usize) -> f32;
}

/// Which settle family a session runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MomentumKind {
    /// Position is outside the valid range; spring back to the nearest
    /// bound, ignoring anchor snapping.
    Bounce,
    /// Spring toward an anchor (velocity-projected, explicit item, or raw
    /// position).
    Landing,
}

/// Invoked exactly once per session: with `true` when the spring settled,
/// with `false` when the session was cancelled or dropped early.
pub type Completion = Box<dyn FnOnce(bool)>;

/// A single running settle animation. One session exists per gesture
/// release or programmatic jump; starting a new one replaces (and
/// cancels) the old; there is no blending.
///
/// The session is advanced by repeated [`on_frame`](Self::on_frame) calls
/// carrying monotonically increasing frame timestamps; it never sleeps or
/// schedules anything itself.
pub struct WheelMomentum {
    kind: MomentumKind,
    timing: SpringTiming,
    rest_offset: f32,
    start_time_nanos: Option<u64>,
    finished: bool,
    on_complete: Option<Completion>,
}

impl WheelMomentum {
    /// Settle after a gesture release with the given offset-space
    /// velocity. In range: project the free deceleration end position,
    /// snap it to the nearest anchor, and land there carrying the release
    /// velocity. Out of range: bounce back to the nearest bound.
    pub fn from_velocity(
        velocity: f32,
        host: &dyn WheelHost,
        spring: &Spring,
        threshold: f32,
        deceleration_rate: f32,
    ) -> Self {
        let offset = host.circle_offset();
        let bounds = host.circle_offset_bounds();
        if bounds.contains(&offset) {
            let projection = project(offset, velocity, deceleration_rate);
            let anchor = host.nearest_anchor(projection);
            log::trace!("momentum: landing at {anchor} (velocity {velocity})");
            Self::land(anchor, offset, velocity, spring, threshold)
        } else {
            let rest_offset = offset.clamp(*bounds.start(), *bounds.end());
            log::trace!("momentum: bouncing back to {rest_offset}");
            Self {
                kind: MomentumKind::Bounce,
                timing: SpringTiming::new(spring, offset - rest_offset, velocity, threshold),
                rest_offset,
                start_time_nanos: None,
                finished: false,
                on_complete: None,
            }
        }
    }

    /// Spring directly to an item's anchor with zero initial velocity.
    pub fn to_item(idx: usize, host: &dyn WheelHost, spring: &Spring, threshold: f32) -> Self {
        let anchor = host.anchor_for_item(idx);
        Self::land(anchor, host.circle_offset(), 0.0, spring, threshold)
    }

    /// Spring to the anchor nearest a raw position with zero initial
    /// velocity.
    pub fn to_position(
        position: f32,
        host: &dyn WheelHost,
        spring: &Spring,
        threshold: f32,
    ) -> Self {
        let anchor = host.nearest_anchor(position);
        Self::land(anchor, host.circle_offset(), 0.0, spring, threshold)
    }

    /// Attach a completion callback. It fires exactly once: on settle,
    /// cancel, or drop.
    pub fn with_completion(mut self, on_complete: impl FnOnce(bool) + 'static) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    fn land(
        anchor: f32,
        current_offset: f32,
        velocity: f32,
        spring: &Spring,
        threshold: f32,
    ) -> Self {
        Self {
            kind: MomentumKind::Landing,
            timing: SpringTiming::new(spring, current_offset - anchor, velocity, threshold),
            rest_offset: anchor,
            start_time_nanos: None,
            finished: false,
            on_complete: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> MomentumKind {
        self.kind
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The offset the session settles on.
    #[inline]
    pub fn rest_offset(&self) -> f32 {
        self.rest_offset
    }

    /// Advances the session to `frame_time_nanos` and writes the new
    /// offset through the host. The first call pins the session start
    /// time. Returns `true` once settled; the exact rest value is written
    /// on the settling frame and the completion callback fires.
    pub fn on_frame(&mut self, host: &mut dyn WheelHost, frame_time_nanos: u64) -> bool {
        if self.finished {
            return true;
        }
        let start = *self.start_time_nanos.get_or_insert(frame_time_nanos);
        let elapsed = frame_time_nanos.saturating_sub(start) as f32 / 1_000_000_000.0;
        if elapsed < self.timing.duration() {
            host.set_circle_offset(self.rest_offset + self.timing.value_at(elapsed));
            false
        } else {
            host.set_circle_offset(self.rest_offset);
            self.finished = true;
            if let Some(on_complete) = self.on_complete.take() {
                on_complete(true);
            }
            true
        }
    }

    /// Ends the session without further offset mutation. The completion
    /// callback still fires (with `false`) if it has not fired yet.
    pub fn cancel(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(false);
        }
    }
}

impl Drop for WheelMomentum {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Free-deceleration end position for a velocity under exponential
/// friction.
fn project(offset: f32, velocity: f32, deceleration_rate: f32) -> f32 {
    offset - velocity / (1000.0 * deceleration_rate.ln())
}

#[cfg(test)]
#[path = "tests/momentum_tests.rs"]
mod tests;
