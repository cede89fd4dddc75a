use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::config::SimulationConfig;
use crate::error::{ConfigError, Error};
use crate::gravity::Gravity;
use crate::particle::{Particle, ParticleId};
use crate::presets::{BodyKind, DAY};
use crate::quadrant::Quadrant;
use crate::simulation::{advance, root_quadrant, Simulation, MIN_ROOT_SIDE};

fn sun_and_earth() -> (Simulation, ParticleId, ParticleId) {
    let config = SimulationConfig {
        tick_duration: DAY,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(config).unwrap();
    let sun = sim.insert(BodyKind::Sun.particle());
    let earth = sim.insert(BodyKind::Earth.particle());
    (sim, sun, earth)
}

#[test]
fn test_insert_assigns_sequential_ids() {
    let mut sim = Simulation::default();
    let a = sim.insert(Particle::from_arrays(1.0, [0.0, 0.0], [0.0, 0.0]));
    let b = sim.insert(Particle::from_arrays(2.0, [1.0, 0.0], [0.0, 0.0]));

    assert_eq!(a, ParticleId(0));
    assert_eq!(b, ParticleId(1));
    assert_eq!(sim.len(), 2);
    assert_eq!(sim.index_of(b), Some(1));
    assert_eq!(sim.get(b).map(|p| p.mass), Some(2.0));
    assert!(sim.get(ParticleId(7)).is_none());
}

#[test]
fn test_new_rejects_invalid_config() {
    let config = SimulationConfig {
        tick_duration: -1.0,
        ..SimulationConfig::default()
    };

    assert!(matches!(
        Simulation::new(config),
        Err(Error::Config(ConfigError::NonPositiveTickDuration(_)))
    ));
}

#[test]
fn test_anchor_to_unknown_particle() {
    let mut sim = Simulation::default();

    assert!(matches!(
        sim.anchor_to(ParticleId(3)),
        Err(Error::UnknownParticle(ParticleId(3)))
    ));
    assert_eq!(sim.anchor(), None);
}

#[test]
fn test_anchor_is_fixed_once_running() {
    let (mut sim, sun, earth) = sun_and_earth();
    sim.anchor_to(sun).unwrap();
    sim.step();

    assert!(matches!(sim.anchor_to(earth), Err(Error::AlreadyRunning)));
    assert_eq!(sim.anchor(), Some(sun));
}

#[test]
fn test_anchor_absorbs_net_momentum() {
    let (mut sim, sun, earth) = sun_and_earth();
    let earth_momentum = sim.get(earth).unwrap().momentum();
    sim.anchor_to(sun).unwrap();

    sim.step();

    // The snapshot is the corrected pre-step state
    let snapshot = sim.snapshot().unwrap();
    let total = snapshot
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + p.momentum());
    assert!(total.magnitude() <= 1e-12 * earth_momentum.magnitude());

    let sun_state = snapshot[sim.index_of(sun).unwrap()];
    assert_relative_eq!(sun_state.momentum().y, -earth_momentum.y, max_relative = 1e-12);
    assert_eq!(sun_state.position, Point2::origin());
}

#[test]
fn test_no_anchor_means_no_correction() {
    let (mut sim, sun, _) = sun_and_earth();
    sim.step();

    let snapshot = sim.snapshot().unwrap();
    assert_eq!(snapshot[sim.index_of(sun).unwrap()].velocity, Vector2::zeros());
}

#[test]
fn test_step_advances_time() {
    let (mut sim, _, _) = sun_and_earth();
    assert!(!sim.is_running());

    let report = sim.step();
    assert_eq!(sim.time(), DAY);
    assert!(sim.is_running());
    assert_eq!(report.inserted, 2);
    assert_eq!(report.excluded, 0);
    assert_eq!(report.dropped, 0);
    assert_eq!(report.node_count, 5);

    let elapsed = sim.integrate(9);
    assert_relative_eq!(elapsed, 10.0 * DAY, max_relative = 1e-12);
}

#[test]
fn test_reset_restores_snapshot() {
    let (mut sim, sun, _) = sun_and_earth();
    sim.anchor_to(sun).unwrap();

    sim.integrate(5);
    let after_five = sim.export();
    let snapshot = sim.snapshot().unwrap().to_vec();

    sim.reset();
    assert_eq!(sim.time(), 0.0);
    assert!(!sim.is_running());
    let restored = sim.export();
    for (state, initial) in restored.iter().zip(&snapshot) {
        assert_eq!(state.position, [initial.position.x, initial.position.y]);
        assert_eq!(state.velocity, [initial.velocity.x, initial.velocity.y]);
    }

    // No second correction, so the replay is identical
    sim.integrate(5);
    assert_eq!(sim.export(), after_five);
}

#[test]
fn test_reset_before_first_step_leaves_particles() {
    let (mut sim, _, earth) = sun_and_earth();
    sim.get_mut(earth).unwrap().velocity = Vector2::new(0.0, 10.0);

    sim.reset();

    assert!(sim.snapshot().is_none());
    assert_eq!(sim.time(), 0.0);
    assert_eq!(sim.get(earth).unwrap().velocity, Vector2::new(0.0, 10.0));
}

#[test]
fn test_tick_duration_setters() {
    let mut sim = Simulation::default();

    sim.set_tick_duration(DAY).unwrap();
    assert_eq!(sim.tick_duration(), DAY);

    sim.set_time_scale(60.0 * 2.0 * DAY).unwrap();
    assert_eq!(sim.tick_duration(), 2.0 * DAY);

    assert!(matches!(
        sim.set_tick_duration(0.0),
        Err(ConfigError::NonPositiveTickDuration(_))
    ));
    assert_eq!(sim.tick_duration(), 2.0 * DAY);
}

#[test]
fn test_root_quadrant_spans_largest_coordinate() {
    let particles = vec![
        Particle::from_arrays(1.0, [3.0, -1.0], [0.0, 0.0]),
        Particle::from_arrays(1.0, [-2.0, -7.5], [0.0, 0.0]),
    ];
    let quadrant = root_quadrant(&particles);

    assert_eq!(quadrant.center(), Point2::origin());
    assert_eq!(quadrant.side(), 15.0);
    assert!(particles.iter().all(|p| quadrant.contains(&p.position)));
}

#[test]
fn test_root_quadrant_has_a_floor() {
    let at_origin = vec![Particle::from_arrays(1.0, [0.0, 0.0], [0.0, 0.0])];

    assert_eq!(root_quadrant(&at_origin).side(), MIN_ROOT_SIDE);
    assert_eq!(root_quadrant(&[]).side(), MIN_ROOT_SIDE);
}

#[test]
fn test_excluded_particle_coasts_without_force() {
    let gravity = Gravity::with_theta(0.0);
    let mut particles = vec![
        Particle::from_arrays(1.0e20, [-1.0, 0.0], [0.0, 0.0]).with_id(ParticleId(0)),
        Particle::from_arrays(1.0e20, [1.0, 0.0], [0.0, 0.0]).with_id(ParticleId(1)),
        Particle::from_arrays(1.0e30, [50.0, 0.0], [2.0, -3.0]).with_id(ParticleId(2)),
    ];
    let bounds = Quadrant::centered_at_origin(4.0);

    let report = advance(&mut particles, bounds, 0.5, &gravity);

    assert_eq!(report.inserted, 2);
    assert_eq!(report.excluded, 1);

    let outsider = &particles[2];
    assert_eq!(outsider.force, Vector2::zeros());
    assert_eq!(outsider.velocity, Vector2::new(2.0, -3.0));
    assert_eq!(outsider.position, Point2::new(51.0, -1.5));

    // The heavy outsider is invisible to the pair inside
    assert!(particles[0].force.x > 0.0);
    assert_relative_eq!(particles[0].force.x, -particles[1].force.x, max_relative = 1e-12);
}

#[test]
fn test_energy_diagnostics() {
    let (sim, _, _) = sun_and_earth();

    assert_eq!(sim.total_mass(), BodyKind::Sun.preset().mass + BodyKind::Earth.preset().mass);
    assert!(sim.kinetic_energy() > 0.0);
    assert!(sim.potential_energy() < 0.0);
    assert_eq!(sim.total_energy(), sim.kinetic_energy() + sim.potential_energy());
}

#[test]
fn test_frame_reports_anchor_index() {
    let (mut sim, sun, earth) = sun_and_earth();

    assert_eq!(sim.frame().anchor_index, None);

    sim.anchor_to(earth).unwrap();
    let frame = sim.frame();
    assert_eq!(frame.anchor_index, Some(1));
    assert_eq!(frame.time, 0.0);
    assert_eq!(frame.tick_duration, DAY);
    assert_eq!(frame.particles.len(), 2);
    assert_eq!(frame.particles[0].id, sun);
    assert_eq!(frame.particles[1].position, [147.09e9, 0.0]);
}

#[test]
fn test_export_preserves_list_order() {
    let (mut sim, _, _) = sun_and_earth();
    sim.insert(BodyKind::Mars.particle());
    sim.integrate(3);

    let ids: Vec<ParticleId> = sim.export().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![ParticleId(0), ParticleId(1), ParticleId(2)]);
}
