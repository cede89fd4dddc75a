use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::gravity::Gravity;
use crate::tree::SpatialTree;

/// Opaque handle identifying a particle owned by a [`Simulation`].
///
/// Identity drives the force computation: a particle never attracts itself,
/// even though another particle may carry exactly the same physical state.
///
/// [`Simulation`]: crate::simulation::Simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticleId(pub u32);

impl ParticleId {
    /// Identity carried by particles that are not tracked: freshly constructed
    /// particles not yet inserted anywhere, and synthesized tree aggregates.
    pub const VIRTUAL: ParticleId = ParticleId(u32::MAX);

    pub fn is_virtual(self) -> bool {
        self == Self::VIRTUAL
    }
}

/// A point mass in the simulation plane.
///
/// All quantities are SI-equivalent base units: kilograms, meters, meters per
/// second and newtons. The force accumulator is cleared at the start of every
/// tick and filled from the quadtree before integration.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub id: ParticleId,
    pub mass: f64,              // kg
    pub position: Point2<f64>,  // m
    pub velocity: Vector2<f64>, // m/s
    pub force: Vector2<f64>,    // N
}

impl Particle {
    /// Creates an untracked particle with a zero force accumulator.
    ///
    /// The particle receives a real [`ParticleId`] when it is inserted into a
    /// simulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::{Point2, Vector2};
    /// use spacesim::particle::Particle;
    ///
    /// let sun = Particle::new(1.989e30, Point2::origin(), Vector2::zeros());
    /// assert!(sun.id.is_virtual());
    /// assert_eq!(sun.force, Vector2::zeros());
    /// ```
    pub fn new(mass: f64, position: Point2<f64>, velocity: Vector2<f64>) -> Self {
        Particle {
            id: ParticleId::VIRTUAL,
            mass,
            position,
            velocity,
            force: Vector2::zeros(),
        }
    }

    /// Convenience constructor taking plain `[x, y]` arrays.
    pub fn from_arrays(mass: f64, position: [f64; 2], velocity: [f64; 2]) -> Self {
        Self::new(
            mass,
            Point2::new(position[0], position[1]),
            Vector2::new(velocity[0], velocity[1]),
        )
    }

    /// Returns this particle tagged with the given identity.
    pub fn with_id(mut self, id: ParticleId) -> Self {
        self.id = id;
        self
    }

    /// Identity comparison. Virtual particles are never the same as anything.
    pub fn is_same(&self, other: &Particle) -> bool {
        !self.id.is_virtual() && self.id == other.id
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass
    }

    /// Sets the velocity so that the particle carries the given momentum.
    pub fn set_momentum(&mut self, momentum: Vector2<f64>) {
        self.velocity = momentum / self.mass;
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    pub fn distance_to(&self, other: &Particle) -> f64 {
        (self.position - other.position).magnitude()
    }

    /// Radius of a unit-density sphere with this particle's mass.
    ///
    /// Used by renderers for sizing only; it plays no part in the physics.
    pub fn nominal_radius(&self) -> f64 {
        (self.mass / (4.0 * std::f64::consts::PI / 3.0)).cbrt()
    }

    /// Clears the force accumulator.
    pub fn reset_force(&mut self) {
        self.force = Vector2::zeros();
    }

    /// Accumulates the softened gravitational pull of `other`.
    ///
    /// Callers are responsible for skipping `other` when it is this particle.
    pub fn add_force(&mut self, other: &Particle, gravity: &Gravity) {
        self.force += gravity.pairwise_force(self, other);
    }

    /// Accumulates the Barnes-Hut approximated force of everything in `tree`.
    pub fn update_force(&mut self, tree: &SpatialTree, gravity: &Gravity) {
        self.force += tree.force_on(self, gravity);
    }

    /// Semi-implicit Euler step.
    ///
    /// The velocity is advanced from the accumulated force first and the
    /// position then moves with the updated velocity.
    pub fn update(&mut self, dt: f64) {
        self.velocity += self.force / self.mass * dt;
        self.position += self.velocity * dt;
    }

    /// Combines two particles into a virtual aggregate.
    ///
    /// The aggregate mass is the sum of both masses; position and velocity are
    /// the mass-weighted averages. Neither input is modified.
    pub fn merge(&self, other: &Particle) -> Particle {
        let mass = self.mass + other.mass;
        let position = Point2::from(
            (self.position.coords * self.mass + other.position.coords * other.mass) / mass,
        );
        let velocity = (self.velocity * self.mass + other.velocity * other.mass) / mass;

        Particle::new(mass, position, velocity)
    }
}
