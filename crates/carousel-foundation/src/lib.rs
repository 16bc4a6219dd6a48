//! Interaction layer for the Carousel wheel
//!
//! Owns the one mutable piece of state, the wheel angle, and drives it
//! from gesture sessions, taps, and momentum animations. Rendering,
//! input capture, and the frame clock stay outside: hosts feed gesture
//! events and frame timestamps in, and read layout scalars back out.

mod constants;
mod state;

pub use constants::*;
pub use state::*;

pub mod prelude {
    pub use crate::constants::{DecelerationRate, TapWhileMoving};
    pub use crate::state::{CarouselConfig, CarouselDelegate, CarouselState};
    pub use carousel_animation::{MomentumKind, Spring, WheelHost};
    pub use carousel_geometry::{CrossFadeState, Point, Rect, Size};
}
