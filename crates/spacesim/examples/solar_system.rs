//! Solar System from the built-in presets
//!
//! Runs one year at ten simulated days per second of playback and prints
//! each body's distance from the Sun once per simulated month, plus the
//! energy and momentum drift at the end.
//!
//! Run with: RUST_LOG=debug cargo run --package spacesim --example solar_system

use spacesim::presets::{BodyKind, AU, DAY, YEAR};
use spacesim::{Simulation, SimulationConfig};

fn main() {
    env_logger::init();

    println!("Barnes-Hut Solar System\n");
    println!("{}", "=".repeat(60));

    let config = SimulationConfig::with_time_scale(10.0 * DAY);
    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("invalid configuration: {}", err);
            return;
        }
    };

    let sun = sim.insert(BodyKind::Sun.particle());
    let mut earth = None;
    for kind in &BodyKind::ALL[1..] {
        let id = match kind {
            BodyKind::Moon => continue,
            _ => sim.insert(kind.particle()),
        };
        if *kind == BodyKind::Earth {
            earth = Some(id);
        }
    }
    if let Some(parent) = earth.and_then(|id| sim.get(id).copied()) {
        sim.insert(BodyKind::Moon.particle_around(&parent));
    }

    if let Err(err) = sim.anchor_to(sun) {
        eprintln!("could not anchor the Sun: {}", err);
        return;
    }

    println!("Bodies: {}", sim.len());
    println!("Tick: {:.2} hours", sim.tick_duration() / 3_600.0);
    println!("Theta: {}", sim.gravity().theta);

    let initial_energy = sim.total_energy();

    let ticks_per_month = (YEAR / 12.0 / sim.tick_duration()).round() as usize;
    for month in 1..=12 {
        sim.integrate(ticks_per_month);

        let Some(origin) = sim.get(sun).map(|p| p.position) else {
            break;
        };
        let distances: Vec<String> = sim
            .particles()
            .iter()
            .skip(1)
            .map(|p| format!("{:.2}", (p.position - origin).magnitude() / AU))
            .collect();
        println!("Month {:2}: r = [{}] AU", month, distances.join(", "));
    }

    let energy_error = ((sim.total_energy() - initial_energy) / initial_energy).abs();
    let momentum = sim.total_momentum();

    println!("\n{}", "=".repeat(60));
    println!("Elapsed: {:.2} years", sim.time() / YEAR);
    println!("Energy error: {:.2e}", energy_error);
    println!("Net momentum: ({:.3e}, {:.3e}) kg·m/s", momentum.x, momentum.y);
}
