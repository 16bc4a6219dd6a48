//! Closed-form damped harmonic oscillator timing.

use std::f32::consts::E;

/// Errors from spring configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpringError {
    NonPositiveMass,
    NonPositiveStiffness,
    /// Only under-damped and critically damped springs have the closed
    /// forms used here; the ratio must lie in (0, 1].
    DampingRatioOutOfRange,
}

impl std::fmt::Display for SpringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpringError::NonPositiveMass => write!(f, "spring mass must be positive"),
            SpringError::NonPositiveStiffness => write!(f, "spring stiffness must be positive"),
            SpringError::DampingRatioOutOfRange => {
                write!(f, "damping ratio must lie in (0, 1]")
            }
        }
    }
}

impl std::error::Error for SpringError {}

/// Spring tunables. Validated once; every derived quantity is then total.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    mass: f32,
    stiffness: f32,
    damping_ratio: f32,
}

impl Spring {
    pub fn new(mass: f32, stiffness: f32, damping_ratio: f32) -> Result<Self, SpringError> {
        if !(mass > 0.0) {
            return Err(SpringError::NonPositiveMass);
        }
        if !(stiffness > 0.0) {
            return Err(SpringError::NonPositiveStiffness);
        }
        if !(damping_ratio > 0.0 && damping_ratio <= 1.0) {
            return Err(SpringError::DampingRatioOutOfRange);
        }
        Ok(Self {
            mass,
            stiffness,
            damping_ratio,
        })
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    #[inline]
    pub fn damping_ratio(&self) -> f32 {
        self.damping_ratio
    }

    pub fn damping(&self) -> f32 {
        2.0 * self.damping_ratio * (self.mass * self.stiffness).sqrt()
    }

    /// Exponential decay rate of the motion envelope.
    pub fn beta(&self) -> f32 {
        self.damping() / (2.0 * self.mass)
    }

    pub fn damped_natural_frequency(&self) -> f32 {
        (self.stiffness / self.mass).sqrt() * (1.0 - self.damping_ratio * self.damping_ratio).sqrt()
    }
}

/// One of the two closed-form solution families, chosen once per session
/// by the damping ratio.
#[derive(Clone, Copy, Debug)]
enum TimingCurve {
    Underdamped {
        beta: f32,
        frequency: f32,
        c1: f32,
        c2: f32,
    },
    CriticallyDamped {
        beta: f32,
        c1: f32,
        c2: f32,
    },
}

/// Value-over-time of a spring released with a given displacement and
/// velocity, plus the analytic time at which the motion decays below the
/// visual settle threshold.
///
/// `value_at` is relative to the rest position: it starts at
/// `displacement` and decays toward zero.
#[derive(Clone, Copy, Debug)]
pub struct SpringTiming {
    curve: TimingCurve,
    duration: f32,
}

impl SpringTiming {
    /// `threshold` is the device-pixel-scale epsilon below which motion is
    /// considered settled; it must be positive for the duration to be
    /// finite.
    pub fn new(spring: &Spring, displacement: f32, initial_velocity: f32, threshold: f32) -> Self {
        let beta = spring.beta();
        let still = displacement == 0.0 && initial_velocity == 0.0;

        let (curve, duration) = if spring.damping_ratio() < 1.0 {
            let frequency = spring.damped_natural_frequency();
            let c1 = displacement;
            let c2 = (initial_velocity + beta * c1) / frequency;
            let duration = if still {
                0.0
            } else {
                (((c1.abs() + c2.abs()) / threshold).ln() / beta).max(0.0)
            };
            (
                TimingCurve::Underdamped {
                    beta,
                    frequency,
                    c1,
                    c2,
                },
                duration,
            )
        } else {
            let c1 = displacement;
            let c2 = initial_velocity + beta * c1;
            let duration = if still {
                0.0
            } else {
                let t1 = (2.0 * c1.abs() / threshold).ln() / beta;
                let t2 = 2.0 * (4.0 * c2.abs() / (E * beta * threshold)).ln() / beta;
                t1.max(t2).max(0.0)
            };
            (TimingCurve::CriticallyDamped { beta, c1, c2 }, duration)
        };

        Self { curve, duration }
    }

    /// Time until the motion envelope decays below the threshold, in
    /// seconds. Zero when the spring starts at rest.
    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Displacement from the rest position at `time` seconds.
    pub fn value_at(&self, time: f32) -> f32 {
        match self.curve {
            TimingCurve::Underdamped {
                beta,
                frequency,
                c1,
                c2,
            } => {
                (-beta * time).exp()
                    * (c1 * (frequency * time).cos() + c2 * (frequency * time).sin())
            }
            TimingCurve::CriticallyDamped { beta, c1, c2 } => {
                (-beta * time).exp() * (c1 + c2 * time)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/spring_tests.rs"]
mod tests;
