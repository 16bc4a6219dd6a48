//! Piecewise cubic Bézier evaluation with numeric x → y inversion.

use smallvec::SmallVec;

use crate::geometry::Point;

/// Bisection tolerance for inverting x(t).
const TOLERANCE: f32 = 1e-4;

/// Upper bound on bisection steps. Convergence within the tolerance takes
/// ~14 halvings of [0, 1]; the cap guards against floating-point
/// stagnation near segment edges.
const MAX_BISECTION_STEPS: u32 = 32;

/// Errors from curve construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// A chain needs at least one segment.
    EmptyChain,
    /// Segment end points must strictly increase in x.
    NonMonotonicSegment { index: usize },
}

impl std::fmt::Display for CurveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveError::EmptyChain => write!(f, "curve chain has no segments"),
            CurveError::NonMonotonicSegment { index } => {
                write!(f, "segment {index} does not strictly increase in x")
            }
        }
    }
}

impl std::error::Error for CurveError {}

/// A single cubic Bézier segment, usable as a function of x.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezierCurve {
    c0: Point,
    c1: Point,
    c2: Point,
    c3: Point,
}

impl CubicBezierCurve {
    /// Requires `c0.x < c3.x` so that x(t) spans a non-empty domain.
    pub fn new(c0: Point, c1: Point, c2: Point, c3: Point) -> Option<Self> {
        if c0.x < c3.x {
            Some(Self { c0, c1, c2, c3 })
        } else {
            None
        }
    }

    /// The segment's x domain.
    pub fn x_bounds(&self) -> (f32, f32) {
        (self.c0.x, self.c3.x)
    }

    fn contains_x(&self, x: f32) -> bool {
        self.c0.x <= x && x <= self.c3.x
    }

    /// Evaluates y at the given x, or `None` outside the x domain.
    ///
    /// Inverts x(t) by bisection over t ∈ [0, 1]: x(t) is monotonic on the
    /// segment domain, so each comparison of the midpoint sample against
    /// the target halves the bracket.
    pub fn y_at(&self, x: f32) -> Option<f32> {
        if !self.contains_x(x) {
            return None;
        }
        let mut t_low = 0.0f32;
        let mut t_high = 1.0f32;
        let mut t_mid = 0.5 * (t_low + t_high);
        for _ in 0..MAX_BISECTION_STEPS {
            t_mid = 0.5 * (t_low + t_high);
            let distance = self.sample(t_mid, |p| p.x) - x;
            if distance.abs() < TOLERANCE {
                break;
            }
            if distance < 0.0 {
                t_low = t_mid;
            } else {
                t_high = t_mid;
            }
        }
        Some(self.sample(t_mid, |p| p.y))
    }

    /// Bernstein-basis cubic polynomial over one coordinate.
    fn sample(&self, t: f32, coord: impl Fn(&Point) -> f32) -> f32 {
        let (p0, p1, p2, p3) = (
            coord(&self.c0),
            coord(&self.c1),
            coord(&self.c2),
            coord(&self.c3),
        );
        (((-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t + (3.0 * p0 - 6.0 * p1 + 3.0 * p2)) * t
            + (-3.0 * p0 + 3.0 * p1))
            * t
            + p0
    }
}

/// A sequence of connected cubic Bézier segments forming one monotonic
/// x → y function.
#[derive(Clone, Debug, PartialEq)]
pub struct BezierCurveChain {
    curves: SmallVec<[CubicBezierCurve; 2]>,
}

impl BezierCurveChain {
    /// Builds a chain starting at `start`; each continuation supplies the
    /// two control handles and the next segment end point.
    pub fn new(
        start: Point,
        continuations: &[(Point, Point, Point)],
    ) -> Result<Self, CurveError> {
        if continuations.is_empty() {
            return Err(CurveError::EmptyChain);
        }
        let mut curves = SmallVec::new();
        let mut from = start;
        for (index, &(handle1, handle2, to)) in continuations.iter().enumerate() {
            let curve = CubicBezierCurve::new(from, handle1, handle2, to)
                .ok_or(CurveError::NonMonotonicSegment { index })?;
            curves.push(curve);
            from = to;
        }
        Ok(Self { curves })
    }

    /// Evaluates the chain at x, or `None` when x falls outside every
    /// segment's domain. Segment count is small and fixed, so a linear
    /// scan locates the segment.
    pub fn y_at(&self, x: f32) -> Option<f32> {
        self.curves.iter().find_map(|curve| curve.y_at(x))
    }
}
