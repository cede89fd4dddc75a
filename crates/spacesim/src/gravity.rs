//! Softened Newtonian gravity and the parameters of the Barnes-Hut force
//! evaluation.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// Gravitational constant in SI units (m³ kg⁻¹ s⁻²)
pub const G: f64 = 6.67408e-11;

/// Softening length (m) added in quadrature to the separation
pub const SOFTENING: f64 = 3.0e4;

/// Default opening angle for the Barnes-Hut criterion `s / d < θ`
///
/// This is far coarser than the usual 0.5 to 1.0: most subtrees are treated
/// as point masses. Lower it when accuracy matters more than speed.
pub const DEFAULT_THETA: f64 = 5.0;

/// Parameters of the gravitational force law.
///
/// # Opening Angle (θ)
///
/// An internal tree node of side `s` at distance `d` from the querying
/// particle is replaced by its aggregate when `s / d < θ`:
/// - θ = 0.0: never approximates (exact pairwise summation)
/// - θ = 0.5: textbook accuracy
/// - θ = 5.0: the default, very aggressive
///
/// # Examples
///
/// ```
/// use spacesim::gravity::Gravity;
///
/// let exact = Gravity::with_theta(0.0);
/// assert_eq!(exact.theta, 0.0);
/// assert_eq!(exact.softening, Gravity::default().softening);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gravity {
    pub gravitational_constant: f64,
    /// Softening length ε in meters
    pub softening: f64,
    pub theta: f64,
}

impl Gravity {
    pub fn new() -> Self {
        Self {
            gravitational_constant: G,
            softening: SOFTENING,
            theta: DEFAULT_THETA,
        }
    }

    /// Default force law with a custom opening angle
    pub fn with_theta(theta: f64) -> Self {
        Self {
            theta,
            ..Self::new()
        }
    }

    /// Default force law with a custom opening angle and softening length
    pub fn with_softening(theta: f64, softening: f64) -> Self {
        Self {
            theta,
            softening,
            ..Self::new()
        }
    }

    /// Force exerted on `on` by `from`.
    ///
    /// `F = G·m1·m2 / (d² + ε²)`, directed along the unit vector toward
    /// `from`. Coincident particles have no defined direction and exert no
    /// force on each other.
    pub fn pairwise_force(&self, on: &Particle, from: &Particle) -> Vector2<f64> {
        let diff = from.position - on.position;
        let dist = diff.magnitude();
        if dist == 0.0 {
            return Vector2::zeros();
        }

        let eps2 = self.softening * self.softening;
        let magnitude =
            self.gravitational_constant * on.mass * from.mass / (dist * dist + eps2);

        diff * (magnitude / dist)
    }

    /// Exact O(N²) force on `on` from every other particle in `particles`.
    ///
    /// Used as the reference the tree approximation is measured against.
    pub fn direct_force(&self, on: &Particle, particles: &[Particle]) -> Vector2<f64> {
        particles
            .iter()
            .filter(|other| !on.is_same(other))
            .map(|other| self.pairwise_force(on, other))
            .fold(Vector2::zeros(), |acc, f| acc + f)
    }

    /// Softened potential energy of the whole set, each pair counted once (J).
    pub fn potential_energy(&self, particles: &[Particle]) -> f64 {
        let eps2 = self.softening * self.softening;

        particles
            .iter()
            .enumerate()
            .flat_map(|(i, a)| {
                particles[i + 1..].iter().map(move |b| {
                    let r = ((a.position - b.position).magnitude_squared() + eps2).sqrt();
                    -self.gravitational_constant * a.mass * b.mass / r
                })
            })
            .sum()
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::new()
    }
}
