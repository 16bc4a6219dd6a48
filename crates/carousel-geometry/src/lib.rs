//! Pure math/data for the Carousel wheel
//!
//! This crate contains the geometry primitives, the angular/linear wheel
//! mappings, the piecewise Bézier scale curve, and the per-viewport layout
//! used throughout the Carousel engine. Everything here is deterministic
//! and side-effect free.

mod bezier;
mod count;
mod crossfade;
mod geometry;
mod layout;
mod wheel;
mod zoom;

pub use bezier::*;
pub use count::*;
pub use crossfade::*;
pub use geometry::*;
pub use layout::*;
pub use wheel::*;
pub use zoom::*;

pub mod prelude {
    pub use crate::bezier::BezierCurveChain;
    pub use crate::count::ItemCount;
    pub use crate::crossfade::CrossFadeState;
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::layout::WheelLayout;
    pub use crate::wheel::{NeighborRule, WheelGeometry};
    pub use crate::zoom::ScaleCurve;
}
