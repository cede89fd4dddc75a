//! Two equal suns on a circular orbit
//!
//! Compares the stock opening angle against a tight one on the same binary
//! and reports how far each drifts from the starting separation.
//!
//! Run with: cargo run --package spacesim --example binary_orbit

use spacesim::gravity::{Gravity, G};
use spacesim::presets::{HOUR, SOLAR_MASS};
use spacesim::{Particle, Simulation, SimulationConfig};

fn run(theta: f64, separation: f64, n_steps: usize) -> Option<(f64, f64)> {
    let speed = (G * SOLAR_MASS / (2.0 * separation)).sqrt();
    let config = SimulationConfig {
        tick_duration: 4.0 * HOUR,
        gravity: Gravity::with_theta(theta),
    };
    let mut sim = Simulation::new(config).ok()?;

    let a = sim.insert(Particle::from_arrays(SOLAR_MASS, [-separation / 2.0, 0.0], [0.0, -speed]));
    let b = sim.insert(Particle::from_arrays(SOLAR_MASS, [separation / 2.0, 0.0], [0.0, speed]));
    let initial_energy = sim.total_energy();

    let mut worst = 0.0_f64;
    for _ in 0..n_steps {
        sim.step();
        let distance = sim.get(a)?.distance_to(sim.get(b)?);
        worst = worst.max((distance / separation - 1.0).abs());
    }

    let energy_error = ((sim.total_energy() - initial_energy) / initial_energy).abs();
    Some((worst, energy_error))
}

fn main() {
    env_logger::init();

    let separation = 2.0e11;
    let n_steps = 3_000;

    println!("Binary orbit, separation {:.2e} m, {} steps\n", separation, n_steps);
    println!("{:>8} {:>14} {:>14}", "theta", "max Δr/r", "ΔE/E");

    for theta in [5.0, 1.0, 0.5, 0.0] {
        match run(theta, separation, n_steps) {
            Some((drift, energy_error)) => {
                println!("{:>8.2} {:>14.3e} {:>14.3e}", theta, drift, energy_error)
            }
            None => println!("{:>8.2} {:>14}", theta, "failed"),
        }
    }
}
