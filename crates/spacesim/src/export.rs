//! Plain-scalar views of the simulation for external consumers.
//!
//! A renderer or messaging layer running elsewhere only needs the mass,
//! position and velocity of every particle in list order. These types carry
//! exactly that, in a form any serde format can encode.

use serde::{Deserialize, Serialize};

use crate::particle::{Particle, ParticleId};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleState {
    pub id: ParticleId,
    pub mass: f64,
    pub position: [f64; 2],
    pub velocity: [f64; 2],
}

impl From<&Particle> for ParticleState {
    fn from(particle: &Particle) -> Self {
        ParticleState {
            id: particle.id,
            mass: particle.mass,
            position: [particle.position.x, particle.position.y],
            velocity: [particle.velocity.x, particle.velocity.y],
        }
    }
}

impl From<ParticleState> for Particle {
    fn from(state: ParticleState) -> Self {
        Particle::from_arrays(state.mass, state.position, state.velocity).with_id(state.id)
    }
}

/// Everything a live view needs to mirror one moment of a simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationFrame {
    /// Elapsed simulated time in seconds
    pub time: f64,
    pub tick_duration: f64,
    /// List-order index of the anchor particle, if one is designated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_index: Option<usize>,
    pub particles: Vec<ParticleState>,
}
