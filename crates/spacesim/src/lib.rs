//! Two-dimensional gravitational N-body simulation.
//!
//! Particles are advanced with semi-implicit Euler steps under softened
//! Newtonian gravity. Forces come from a Barnes-Hut quadtree that is rebuilt
//! from scratch every tick.

pub mod config;
pub mod error;
pub mod export;
pub mod gravity;
pub mod particle;
pub mod presets;
pub mod quadrant;
pub mod simulation;
pub mod tree;

#[cfg(test)]
mod particle_test;
#[cfg(test)]
mod simulation_test;

pub use config::SimulationConfig;
pub use error::{ConfigError, Error, Result};
pub use gravity::Gravity;
pub use particle::{Particle, ParticleId};
pub use quadrant::Quadrant;
pub use simulation::Simulation;
pub use tree::SpatialTree;
