//! Shared interaction constants and tunables.
//!
//! These values are matched to the settle animation so dragging, flicking,
//! and tapping feel consistent: the deceleration rate used to project a
//! flick is the same one the velocity extraction assumes.

use std::f32::consts::{FRAC_PI_2, PI};

use carousel_animation::Spring;
use web_time::Duration;

/// Friction applied when projecting a flick's free-deceleration end
/// position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DecelerationRate {
    /// Long glide; the platform-default scroll feel.
    #[default]
    Normal,
    /// Short glide; stops roughly twice as fast.
    Fast,
}

impl DecelerationRate {
    pub fn value(&self) -> f32 {
        match self {
            DecelerationRate::Normal => 0.998,
            DecelerationRate::Fast => 0.99,
        }
    }
}

/// Policy for a tap that arrives while a settle animation is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TapWhileMoving {
    /// Redirect the wheel toward the item under the tap.
    #[default]
    JumpToClickLocation,
    /// Stop where the wheel is and settle on the nearest anchor.
    JumpToCenterPosition,
}

/// Default angular distance between adjacent item anchors: seven items
/// per quarter turn.
pub const DEFAULT_ANGLE_STEP: f32 = FRAC_PI_2 / 7.0;

/// Angular headroom the drag range extends past the last anchor before
/// the rubber band engages, letting the user peek past the ends.
pub const EXTRA_DRAG_ANGLE: f32 = FRAC_PI_2;

/// Angle whose arc length bounds the rubber-band stretch.
pub const RUBBER_BAND_DISPLACEMENT_ANGLE: f32 = PI;

/// How long a first click stays provisional before it is reported as a
/// single click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(250);

const SPRING_MASS: f32 = 1.0;
const SPRING_STIFFNESS: f32 = 200.0;
const SPRING_DAMPING_RATIO: f32 = 0.8;

/// The slightly bouncy spring every settle animation uses.
pub fn default_spring() -> Spring {
    Spring::new(SPRING_MASS, SPRING_STIFFNESS, SPRING_DAMPING_RATIO)
        .expect("default spring constants are valid")
}

/// Settle threshold of half a physical pixel for the given display scale.
pub fn settle_threshold_for_scale(scale: f32) -> f32 {
    0.5 / scale
}
