//! Carousel interaction state: the wheel angle and everything that moves it.

use std::ops::RangeInclusive;

use carousel_animation::{
    MomentumKind, OneShotTimer, RubberBand, Spring, WheelHost, WheelMomentum,
};
use carousel_geometry::{
    CrossFadeState, GeometryError, ItemCount, Point, Rect, Size, WheelGeometry, WheelLayout,
    ZOOM_AMPLITUDE,
};
use web_time::Instant;

use crate::constants::{
    default_spring, settle_threshold_for_scale, DecelerationRate, TapWhileMoving,
    DEFAULT_ANGLE_STEP, DOUBLE_CLICK_WINDOW, EXTRA_DRAG_ANGLE, RUBBER_BAND_DISPLACEMENT_ANGLE,
};

/// Host notifications about the active item. All methods default to
/// no-ops so hosts implement only what they care about.
pub trait CarouselDelegate {
    fn active_changed(&mut self, new_idx: usize) {
        let _ = new_idx;
    }
    fn active_clicked(&mut self, idx: usize) {
        let _ = idx;
    }
    fn active_double_clicked(&mut self, idx: usize) {
        let _ = idx;
    }
}

/// Construction-time tunables. The settle threshold comes from the host's
/// display scale; everything else has a working default.
#[derive(Clone, Copy, Debug)]
pub struct CarouselConfig {
    pub wheel_radius: f32,
    pub angle_step: f32,
    pub item_size: Size,
    pub initial_active_idx: usize,
    pub settle_threshold: f32,
    pub deceleration_rate: DecelerationRate,
    pub tap_while_moving: TapWhileMoving,
    pub spring: Spring,
}

impl CarouselConfig {
    pub fn new(wheel_radius: f32, item_size: Size) -> Self {
        Self {
            wheel_radius,
            angle_step: DEFAULT_ANGLE_STEP,
            item_size,
            initial_active_idx: 0,
            settle_threshold: settle_threshold_for_scale(1.0),
            deceleration_rate: DecelerationRate::default(),
            tap_while_moving: TapWhileMoving::default(),
            spring: default_spring(),
        }
    }
}

/// What the carousel is currently doing. Only one thing at a time; any
/// new interaction replaces the current phase outright.
enum Phase {
    Idle,
    WheelRotating(WheelMomentum),
    SingleClick { timer: OneShotTimer, idx: usize },
    DoubleClick,
}

/// The wheel state the momentum session mutates: angle, geometry, and the
/// layout inputs. Split out so a running session can write the offset
/// while the surrounding `CarouselState` stays borrowable.
struct WheelInner {
    bounds: Rect,
    geometry: WheelGeometry,
    item_size: Size,
    item_count: usize,
    wheel_angle: f32,
}

impl WheelInner {
    /// `None` while the data source is empty; every layout query degrades
    /// through this.
    fn layout(&self) -> Option<WheelLayout> {
        let count = ItemCount::new(self.item_count)?;
        Some(WheelLayout::new(
            self.bounds,
            self.geometry,
            count,
            self.item_size,
        ))
    }

    fn circle_offset(&self) -> f32 {
        self.geometry.circle_offset_for_angle(self.wheel_angle)
    }

    fn set_circle_offset_raw(&mut self, offset: f32) {
        self.wheel_angle = self.geometry.angle_for_circle_offset(offset);
    }

    /// Drag positions may run past the last anchor by the extra drag
    /// angle before the rubber band engages.
    fn drag_offset_bounds(&self) -> RangeInclusive<f32> {
        match self.layout() {
            Some(layout) => {
                let max_angle = *layout.full_angle_range(EXTRA_DRAG_ANGLE).end();
                0.0..=self.geometry.circle_offset_for_angle(max_angle)
            }
            None => 0.0..=0.0,
        }
    }
}

impl WheelHost for WheelInner {
    fn circle_offset(&self) -> f32 {
        WheelInner::circle_offset(self)
    }

    fn set_circle_offset(&mut self, offset: f32) {
        self.set_circle_offset_raw(offset);
    }

    fn circle_offset_bounds(&self) -> RangeInclusive<f32> {
        match self.layout() {
            Some(layout) => layout.circle_offset_range(),
            None => 0.0..=0.0,
        }
    }

    fn nearest_anchor(&self, projection: f32) -> f32 {
        match self.layout() {
            Some(layout) => layout.nearest_circle_offset_anchor(projection),
            None => 0.0,
        }
    }

    fn anchor_for_item(&self, idx: usize) -> f32 {
        match self.layout() {
            Some(layout) => layout.circle_offset_anchor(idx),
            None => 0.0,
        }
    }
}

/// The carousel's single-writer interaction state.
///
/// Hosts feed it gesture events (`drag_*`, `scroll_*`, `tap_*`), frame
/// timestamps (`on_frame`) while [`needs_frames`](Self::needs_frames)
/// holds, and clock polls (`poll_timers`) while a click is provisional;
/// they read the per-item layout scalars back out. All locations are in
/// the carousel's local coordinate space.
pub struct CarouselState {
    inner: WheelInner,
    phase: Phase,
    delegate: Option<Box<dyn CarouselDelegate>>,
    spring: Spring,
    settle_threshold: f32,
    deceleration_rate: DecelerationRate,
    tap_while_moving: TapWhileMoving,
    active_idx: usize,
    cross_fade: Option<CrossFadeState>,
    start_drag_offset: Option<f32>,
    start_scroll_offset: Option<f32>,
    is_drag_holding: bool,
}

impl CarouselState {
    /// Fails fast on degenerate wheel geometry. An empty data source
    /// (`item_count == 0`) is not an error: the carousel idles with no
    /// visible items until the count changes.
    pub fn new(
        config: CarouselConfig,
        bounds: Rect,
        item_count: usize,
    ) -> Result<Self, GeometryError> {
        let geometry = WheelGeometry::new(config.wheel_radius, config.angle_step)?;
        if !(bounds.width > 0.0 && bounds.height > 0.0) {
            log::warn!(
                "Carousel: degenerate viewport ({} x {}); no item will be visible",
                bounds.width,
                bounds.height
            );
        }

        let active_idx = if item_count == 0 {
            0
        } else {
            config.initial_active_idx.min(item_count - 1)
        };
        let inner = WheelInner {
            bounds,
            geometry,
            item_size: config.item_size,
            item_count,
            wheel_angle: geometry.angle_for_index(active_idx),
        };

        let mut state = Self {
            inner,
            phase: Phase::Idle,
            delegate: None,
            spring: config.spring,
            settle_threshold: config.settle_threshold,
            deceleration_rate: config.deceleration_rate,
            tap_while_moving: config.tap_while_moving,
            active_idx,
            cross_fade: None,
            start_drag_offset: None,
            start_scroll_offset: None,
            is_drag_holding: false,
        };
        state.cross_fade = state
            .inner
            .layout()
            .and_then(|layout| CrossFadeState::compute(&layout, state.inner.wheel_angle));
        Ok(state)
    }

    pub fn set_delegate(&mut self, delegate: Box<dyn CarouselDelegate>) {
        self.delegate = Some(delegate);
    }

    // ---- Layout inputs -------------------------------------------------

    pub fn set_bounds(&mut self, bounds: Rect) {
        if !(bounds.width > 0.0 && bounds.height > 0.0) {
            log::warn!(
                "Carousel: degenerate viewport ({} x {}); no item will be visible",
                bounds.width,
                bounds.height
            );
        }
        self.inner.bounds = bounds;
        self.sync_after_angle_change();
    }

    pub fn set_item_count(&mut self, count: usize) {
        if count == self.inner.item_count {
            return;
        }
        self.inner.item_count = count;
        self.sync_after_angle_change();
    }

    // ---- Read-side queries ---------------------------------------------

    #[inline]
    pub fn wheel_angle(&self) -> f32 {
        self.inner.wheel_angle
    }

    #[inline]
    pub fn active_index(&self) -> usize {
        self.active_idx
    }

    #[inline]
    pub fn cross_fade(&self) -> Option<CrossFadeState> {
        self.cross_fade
    }

    pub fn circle_offset(&self) -> f32 {
        self.inner.circle_offset()
    }

    /// Writes the wheel position directly, refreshing the active index
    /// and cross-fade state. Gestures and momentum go through here.
    pub fn set_circle_offset(&mut self, offset: f32) {
        self.inner.set_circle_offset_raw(offset);
        self.sync_after_angle_change();
    }

    pub fn visible_indices(&self) -> Option<RangeInclusive<usize>> {
        self.inner
            .layout()?
            .visible_indices(self.inner.wheel_angle)
    }

    pub fn offset_at(&self, idx: usize) -> Option<Point> {
        Some(self.inner.layout()?.offset(idx, self.inner.wheel_angle))
    }

    pub fn zoom_factor_at(&self, idx: usize) -> f32 {
        match self.inner.layout() {
            Some(layout) => layout.zoom_factor(idx, self.inner.wheel_angle),
            None => 1.0 - ZOOM_AMPLITUDE,
        }
    }

    pub fn z_index_at(&self, idx: usize) -> Option<f32> {
        Some(self.inner.layout()?.z_index(idx, self.inner.wheel_angle))
    }

    pub fn item_frame_at(&self, idx: usize) -> Option<Rect> {
        Some(self.inner.layout()?.item_frame(idx, self.inner.wheel_angle))
    }

    // ---- Phase introspection -------------------------------------------

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// Whether a settle animation is running and `on_frame` should keep
    /// being driven.
    pub fn needs_frames(&self) -> bool {
        matches!(self.phase, Phase::WheelRotating(_))
    }

    /// Whether a provisional single click is waiting for its window to
    /// close; hosts keep calling `poll_timers` while this holds.
    pub fn has_pending_click(&self) -> bool {
        matches!(self.phase, Phase::SingleClick { .. })
    }

    pub fn momentum_kind(&self) -> Option<MomentumKind> {
        match &self.phase {
            Phase::WheelRotating(session) => Some(session.kind()),
            _ => None,
        }
    }

    // ---- Drag session --------------------------------------------------

    /// A drag delta. The first change of a sequence captures the start
    /// offset and requires the press to land on a visible item; later
    /// changes move the wheel under the rubber band.
    pub fn drag_changed(&mut self, location: Point, translation: f32) {
        self.cancel_interaction();
        if self.start_drag_offset.is_none() {
            self.start_drag_offset = Some(self.circle_offset());
            self.is_drag_holding =
                self.inner.bounds.contains(location) && self.hit_visible_item(location);
        }
        if !self.is_drag_holding {
            return;
        }
        let Some(start) = self.start_drag_offset else {
            return;
        };
        let clamped = self.rubber_band().clamp(start - translation);
        self.set_circle_offset(clamped);
    }

    /// Ends the drag with the gesture's horizontal velocity (px/s in
    /// pointer space; the wheel offset moves opposite the pointer).
    pub fn drag_ended(&mut self, velocity: f32) {
        if self.is_drag_holding {
            self.start_momentum_from_velocity(-velocity);
        }
        self.start_drag_offset = None;
        self.is_drag_holding = false;
    }

    // ---- Scroll-wheel session ------------------------------------------

    /// A scroll-wheel delta; same shape as the drag session but gated on
    /// the pointer hovering a visible item when the sequence starts.
    pub fn scroll_changed(&mut self, location: Point, translation: f32) {
        self.cancel_interaction();
        if self.start_scroll_offset.is_none() {
            let in_bounds =
                self.inner.bounds.contains(location) && self.hit_visible_item(location);
            if !in_bounds {
                return;
            }
            self.start_scroll_offset = Some(self.circle_offset());
        }
        let Some(start) = self.start_scroll_offset else {
            return;
        };
        let clamped = self.rubber_band().clamp(start - translation);
        self.set_circle_offset(clamped);
    }

    pub fn scroll_ended(&mut self, velocity: f32) {
        if self.start_scroll_offset.is_some() {
            self.start_momentum_from_velocity(-velocity);
        }
        self.start_scroll_offset = None;
    }

    // ---- Taps ----------------------------------------------------------

    /// A press. While the wheel is rotating this applies the
    /// tap-while-moving policy; during the double-click window it
    /// upgrades the provisional click to a double click.
    pub fn tap_down(&mut self, location: Point) {
        if matches!(self.phase, Phase::WheelRotating(_)) {
            match self.tap_while_moving {
                TapWhileMoving::JumpToClickLocation => {
                    if let Some(idx) = self.index_at(location) {
                        self.jump_to_item(idx);
                    }
                }
                TapWhileMoving::JumpToCenterPosition => {
                    let offset = self.circle_offset();
                    self.jump_to_offset(offset);
                }
            }
        } else if matches!(self.phase, Phase::SingleClick { .. }) {
            self.phase = Phase::DoubleClick;
            let idx = self.active_idx;
            self.notify(|delegate| delegate.active_double_clicked(idx));
        }
    }

    /// A release while the wheel is still: a tap on the active item arms
    /// the provisional single click, a tap on another visible item jumps
    /// to it.
    pub fn tap_up(&mut self, location: Point) {
        if matches!(self.phase, Phase::Idle) {
            let Some(idx) = self.index_at(location) else {
                return;
            };
            if idx == self.active_idx {
                let timer = OneShotTimer::after(DOUBLE_CLICK_WINDOW, || {
                    log::trace!("carousel: single-click window elapsed");
                });
                self.phase = Phase::SingleClick { timer, idx };
            } else {
                self.jump_to_item(idx);
            }
        } else if matches!(self.phase, Phase::DoubleClick) {
            self.phase = Phase::Idle;
        }
    }

    /// Fires the provisional single click once its window has closed.
    pub fn poll_timers(&mut self, now: Instant) {
        let fired_idx = match &mut self.phase {
            Phase::SingleClick { timer, idx } => {
                if timer.fire_if_due(now) {
                    Some(*idx)
                } else {
                    None
                }
            }
            _ => None,
        };
        if let Some(idx) = fired_idx {
            self.phase = Phase::Idle;
            self.notify(|delegate| delegate.active_clicked(idx));
        }
    }

    // ---- Programmatic jumps --------------------------------------------

    pub fn jump_to_item(&mut self, idx: usize) {
        if self.inner.item_count == 0 {
            return;
        }
        let session =
            WheelMomentum::to_item(idx, &self.inner, &self.spring, self.settle_threshold);
        self.start_momentum(session);
    }

    pub fn jump_to_offset(&mut self, offset: f32) {
        if self.inner.item_count == 0 {
            return;
        }
        let session =
            WheelMomentum::to_position(offset, &self.inner, &self.spring, self.settle_threshold);
        self.start_momentum(session);
    }

    /// Moves the active item by a signed number of steps (arrow-key
    /// navigation), saturating at the ends.
    pub fn step_active(&mut self, delta: i32) {
        if self.inner.item_count == 0 {
            return;
        }
        let last = (self.inner.item_count - 1) as i64;
        let target = (self.active_idx as i64 + delta as i64).clamp(0, last) as usize;
        self.jump_to_item(target);
    }

    // ---- Frame driving -------------------------------------------------

    /// Advances the running settle animation to `frame_time_nanos`.
    /// Returns whether more frames are needed.
    pub fn on_frame(&mut self, frame_time_nanos: u64) -> bool {
        let finished = match &mut self.phase {
            Phase::WheelRotating(session) => session.on_frame(&mut self.inner, frame_time_nanos),
            _ => return false,
        };
        self.sync_after_angle_change();
        if finished {
            self.phase = Phase::Idle;
        }
        !finished
    }

    // ---- Helpers -------------------------------------------------------

    fn start_momentum_from_velocity(&mut self, velocity: f32) {
        let session = WheelMomentum::from_velocity(
            velocity,
            &self.inner,
            &self.spring,
            self.settle_threshold,
            self.deceleration_rate.value(),
        );
        self.start_momentum(session);
    }

    fn start_momentum(&mut self, session: WheelMomentum) {
        if matches!(self.phase, Phase::WheelRotating(_)) {
            log::debug!("carousel: superseding running momentum session");
        }
        self.phase = Phase::WheelRotating(session);
    }

    fn cancel_interaction(&mut self) {
        if !matches!(self.phase, Phase::Idle) {
            self.phase = Phase::Idle;
        }
    }

    fn rubber_band(&self) -> RubberBand {
        let displacement = self
            .inner
            .geometry
            .circle_offset_for_angle(RUBBER_BAND_DISPLACEMENT_ANGLE);
        RubberBand::new(self.inner.drag_offset_bounds(), displacement)
    }

    fn hit_visible_item(&self, location: Point) -> bool {
        let Some(layout) = self.inner.layout() else {
            return false;
        };
        let Some(visible) = layout.visible_indices(self.inner.wheel_angle) else {
            return false;
        };
        for idx in visible {
            if layout
                .item_frame(idx, self.inner.wheel_angle)
                .contains(location)
            {
                return true;
            }
        }
        false
    }

    fn index_at(&self, location: Point) -> Option<usize> {
        self.inner
            .layout()?
            .index_at(location, self.active_idx, self.inner.wheel_angle)
    }

    fn sync_after_angle_change(&mut self) {
        match self.inner.layout() {
            Some(layout) => {
                let new_active = layout.active_index(self.inner.wheel_angle);
                if new_active != self.active_idx {
                    self.active_idx = new_active;
                    self.notify(|delegate| delegate.active_changed(new_active));
                }
                self.cross_fade = CrossFadeState::compute(&layout, self.inner.wheel_angle);
            }
            None => {
                self.cross_fade = None;
            }
        }
    }

    fn notify(&mut self, f: impl FnOnce(&mut dyn CarouselDelegate)) {
        if let Some(delegate) = self.delegate.as_deref_mut() {
            f(delegate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::f32::consts::PI;
    use std::rc::Rc;
    use web_time::{Duration, Instant};

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Event {
        Changed(usize),
        Clicked(usize),
        DoubleClicked(usize),
    }

    #[derive(Clone, Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<Event>>>,
    }

    impl CarouselDelegate for Recorder {
        fn active_changed(&mut self, new_idx: usize) {
            self.events.borrow_mut().push(Event::Changed(new_idx));
        }
        fn active_clicked(&mut self, idx: usize) {
            self.events.borrow_mut().push(Event::Clicked(idx));
        }
        fn active_double_clicked(&mut self, idx: usize) {
            self.events.borrow_mut().push(Event::DoubleClicked(idx));
        }
    }

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 600.0, 400.0);

    fn config() -> CarouselConfig {
        let mut config = CarouselConfig::new(300.0, Size::new(100.0, 100.0));
        config.angle_step = PI / 14.0;
        config
    }

    fn state_with_recorder(item_count: usize) -> (CarouselState, Recorder) {
        let mut state = CarouselState::new(config(), BOUNDS, item_count).unwrap();
        let recorder = Recorder::default();
        state.set_delegate(Box::new(recorder.clone()));
        (state, recorder)
    }

    /// Drives frames at ~60 FPS until the animation settles.
    fn run_animation(state: &mut CarouselState) {
        let mut t = 0u64;
        for _ in 0..1000 {
            if !state.on_frame(t) {
                return;
            }
            t += 16_666_667;
        }
        panic!("animation did not settle");
    }

    fn anchor_spacing() -> f32 {
        300.0 * (PI / 14.0)
    }

    #[test]
    fn rejects_degenerate_geometry() {
        let mut bad = config();
        bad.wheel_radius = 0.0;
        assert!(CarouselState::new(bad, BOUNDS, 5).is_err());
    }

    #[test]
    fn starts_at_the_initial_active_item() {
        let mut config = config();
        config.initial_active_idx = 2;
        let state = CarouselState::new(config, BOUNDS, 5).unwrap();
        assert_eq!(state.active_index(), 2);
        assert!((state.wheel_angle() - 2.0 * PI / 14.0).abs() < 1e-5);
        assert!(state.is_idle());
    }

    #[test]
    fn initial_active_index_clamps_to_item_count() {
        let mut config = config();
        config.initial_active_idx = 99;
        let state = CarouselState::new(config, BOUNDS, 3).unwrap();
        assert_eq!(state.active_index(), 2);
    }

    #[test]
    fn empty_data_source_has_no_layout() {
        let (mut state, _) = state_with_recorder(0);
        assert_eq!(state.visible_indices(), None);
        assert_eq!(state.offset_at(0), None);
        assert_eq!(state.item_frame_at(0), None);
        assert_eq!(state.zoom_factor_at(0), 1.0 - ZOOM_AMPLITUDE);
        // Gestures and jumps degrade to no-ops instead of panicking.
        state.drag_changed(Point::new(300.0, 200.0), 10.0);
        state.drag_ended(50.0);
        state.jump_to_item(3);
        assert!(state.is_idle());
    }

    #[test]
    fn items_appear_once_count_is_set() {
        let (mut state, _) = state_with_recorder(0);
        state.set_item_count(5);
        assert_eq!(state.visible_indices(), Some(0..=4));
    }

    #[test]
    fn drag_on_item_moves_the_wheel() {
        let (mut state, _) = state_with_recorder(5);
        let start = state.circle_offset();
        state.drag_changed(Point::new(300.0, 200.0), 0.0);
        state.drag_changed(Point::new(280.0, 200.0), -20.0);
        // Offset moves opposite the pointer; well inside the range the
        // rubber band is the identity.
        assert!((state.circle_offset() - (start + 20.0)).abs() < 1e-3);
    }

    #[test]
    fn drag_missing_items_is_ignored() {
        let (mut state, _) = state_with_recorder(5);
        let start = state.circle_offset();
        state.drag_changed(Point::new(5.0, 10.0), 0.0);
        state.drag_changed(Point::new(5.0, 10.0), -40.0);
        assert_eq!(state.circle_offset(), start);
        state.drag_ended(-100.0);
        assert!(state.is_idle());
    }

    #[test]
    fn over_drag_is_rubber_banded() {
        let (mut state, _) = state_with_recorder(5);
        state.drag_changed(Point::new(300.0, 200.0), 0.0);
        // Pulling right drags the offset below zero.
        state.drag_changed(Point::new(800.0, 200.0), 2000.0);
        let offset = state.circle_offset();
        assert!(offset < 0.0);
        let max_stretch = 300.0 * PI;
        assert!(offset > -max_stretch);
    }

    #[test]
    fn release_after_over_drag_bounces_back_to_zero() {
        let (mut state, _) = state_with_recorder(5);
        state.drag_changed(Point::new(300.0, 200.0), 0.0);
        state.drag_changed(Point::new(800.0, 200.0), 2000.0);
        state.drag_ended(0.0);
        assert_eq!(state.momentum_kind(), Some(MomentumKind::Bounce));
        run_animation(&mut state);
        assert_eq!(state.circle_offset(), 0.0);
        assert_eq!(state.active_index(), 0);
        assert!(state.is_idle());
    }

    #[test]
    fn flick_lands_exactly_on_an_anchor() {
        let (mut state, recorder) = state_with_recorder(5);
        state.drag_changed(Point::new(300.0, 200.0), 0.0);
        state.drag_changed(Point::new(290.0, 200.0), -10.0);
        state.drag_ended(-120.0);
        assert_eq!(state.momentum_kind(), Some(MomentumKind::Landing));
        run_animation(&mut state);
        let spacing = anchor_spacing();
        let landed_steps = state.circle_offset() / spacing;
        assert!(
            (landed_steps - landed_steps.round()).abs() < 1e-4,
            "must settle on an anchor, got {landed_steps} steps"
        );
        assert_eq!(state.active_index(), landed_steps.round() as usize);
        assert!(recorder
            .events
            .borrow()
            .contains(&Event::Changed(state.active_index())));
    }

    #[test]
    fn scroll_session_mirrors_drag() {
        let (mut state, _) = state_with_recorder(5);
        let start = state.circle_offset();
        state.scroll_changed(Point::new(300.0, 200.0), -15.0);
        assert!((state.circle_offset() - (start + 15.0)).abs() < 1e-3);
        state.scroll_ended(-50.0);
        assert!(state.needs_frames());
        run_animation(&mut state);
        assert!(state.is_idle());
    }

    #[test]
    fn scroll_outside_items_never_starts() {
        let (mut state, _) = state_with_recorder(5);
        let start = state.circle_offset();
        state.scroll_changed(Point::new(5.0, 390.0), -15.0);
        assert_eq!(state.circle_offset(), start);
        state.scroll_ended(-50.0);
        assert!(state.is_idle());
    }

    #[test]
    fn tap_on_side_item_jumps_to_it() {
        let (mut state, recorder) = state_with_recorder(5);
        let target = state.offset_at(2).unwrap();
        state.tap_up(target);
        assert!(state.needs_frames());
        run_animation(&mut state);
        assert_eq!(state.active_index(), 2);
        assert!((state.circle_offset() - 2.0 * anchor_spacing()).abs() < 1e-3);
        assert!(recorder.events.borrow().contains(&Event::Changed(2)));
    }

    #[test]
    fn tap_on_active_item_clicks_after_the_window() {
        let (mut state, recorder) = state_with_recorder(5);
        let center = state.offset_at(0).unwrap();
        state.tap_up(center);
        assert!(state.has_pending_click());
        assert!(recorder.events.borrow().is_empty());

        state.poll_timers(Instant::now() + DOUBLE_CLICK_WINDOW + Duration::from_millis(1));
        assert!(state.is_idle());
        assert_eq!(recorder.events.borrow().as_slice(), &[Event::Clicked(0)]);
    }

    #[test]
    fn second_press_inside_the_window_is_a_double_click() {
        let (mut state, recorder) = state_with_recorder(5);
        let center = state.offset_at(0).unwrap();
        state.tap_up(center);
        assert!(state.has_pending_click());

        state.tap_down(center);
        assert_eq!(
            recorder.events.borrow().as_slice(),
            &[Event::DoubleClicked(0)]
        );
        state.tap_up(center);
        assert!(state.is_idle());

        // The cancelled single-click timer never fires.
        state.poll_timers(Instant::now() + Duration::from_secs(2));
        assert_eq!(
            recorder.events.borrow().as_slice(),
            &[Event::DoubleClicked(0)]
        );
    }

    #[test]
    fn tap_while_rotating_jumps_to_the_clicked_item() {
        let (mut state, _) = state_with_recorder(5);
        state.jump_to_item(4);
        assert!(state.needs_frames());
        // Mid-flight, tap item 1.
        state.on_frame(0);
        state.on_frame(16_666_667);
        let target = state.offset_at(1).unwrap();
        state.tap_down(target);
        run_animation(&mut state);
        assert_eq!(state.active_index(), 1);
    }

    #[test]
    fn tap_while_rotating_can_settle_in_place() {
        let (mut state, _) = state_with_recorder(5);
        state.tap_while_moving = TapWhileMoving::JumpToCenterPosition;
        state.jump_to_item(4);
        state.on_frame(0);
        state.on_frame(100_000_000);
        let mid_offset = state.circle_offset();
        state.tap_down(Point::new(300.0, 200.0));
        run_animation(&mut state);
        let spacing = anchor_spacing();
        let expected = (mid_offset / spacing).round() * spacing;
        assert!((state.circle_offset() - expected).abs() < 1e-3);
    }

    #[test]
    fn drag_cancels_a_running_animation() {
        let (mut state, _) = state_with_recorder(5);
        state.jump_to_item(4);
        state.on_frame(0);
        state.on_frame(50_000_000);
        state.drag_changed(Point::new(300.0, 200.0), 0.0);
        assert!(!state.needs_frames());
    }

    #[test]
    fn step_active_saturates_at_the_ends() {
        let (mut state, _) = state_with_recorder(5);
        state.step_active(-1);
        run_animation(&mut state);
        assert_eq!(state.active_index(), 0);
        state.step_active(1);
        run_animation(&mut state);
        assert_eq!(state.active_index(), 1);
        state.step_active(10);
        run_animation(&mut state);
        assert_eq!(state.active_index(), 4);
    }

    #[test]
    fn cross_fade_appears_between_anchors() {
        let (mut state, _) = state_with_recorder(5);
        assert!(state.cross_fade().is_some());
        let spacing = anchor_spacing();
        state.set_circle_offset(spacing * 1.5);
        let fade = state.cross_fade().unwrap();
        let mut pair = [fade.fade_out_idx, fade.fade_in_idx];
        pair.sort_unstable();
        assert_eq!(pair, [1, 2]);
        assert!(fade.fade_in_opacity > 0.0);

        // Rubber-banded below the first anchor there is no neighbor pair.
        state.set_circle_offset(-10.0);
        assert_eq!(state.cross_fade(), None);
    }

    #[test]
    fn shrinking_item_count_reclamps_the_active_index() {
        let (mut state, recorder) = state_with_recorder(5);
        state.jump_to_item(4);
        run_animation(&mut state);
        assert_eq!(state.active_index(), 4);
        state.set_item_count(2);
        assert_eq!(state.active_index(), 1);
        assert!(recorder.events.borrow().contains(&Event::Changed(1)));
    }
}
