use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::gravity::{Gravity, G, SOFTENING};
use crate::particle::{Particle, ParticleId};

#[test]
fn test_new_particle_is_virtual_with_zero_force() {
    let p = Particle::new(2.0, Point2::new(1.0, 2.0), Vector2::new(3.0, 4.0));

    assert!(p.id.is_virtual());
    assert_eq!(p.mass, 2.0);
    assert_eq!(p.position, Point2::new(1.0, 2.0));
    assert_eq!(p.velocity, Vector2::new(3.0, 4.0));
    assert_eq!(p.force, Vector2::zeros());
}

#[test]
fn test_from_arrays() {
    let p = Particle::from_arrays(5.0, [1.0, -1.0], [0.5, 0.25]);

    assert_eq!(p.position, Point2::new(1.0, -1.0));
    assert_eq!(p.velocity, Vector2::new(0.5, 0.25));
}

#[test]
fn test_identity_is_not_value_equality() {
    let a = Particle::from_arrays(1.0, [0.0, 0.0], [0.0, 0.0]).with_id(ParticleId(0));
    let b = Particle::from_arrays(1.0, [0.0, 0.0], [0.0, 0.0]).with_id(ParticleId(1));
    let a_copy = a;

    assert!(a.is_same(&a_copy));
    assert!(!a.is_same(&b));
}

#[test]
fn test_virtual_particles_are_never_the_same() {
    let a = Particle::from_arrays(1.0, [0.0, 0.0], [0.0, 0.0]);
    assert!(!a.is_same(&a));
}

#[test]
fn test_momentum_round_trip() {
    let mut p = Particle::from_arrays(2.0, [0.0, 0.0], [3.0, 4.0]);
    assert_eq!(p.momentum(), Vector2::new(6.0, 8.0));

    p.set_momentum(Vector2::new(-10.0, 1.0));
    assert_eq!(p.velocity, Vector2::new(-5.0, 0.5));
}

#[test]
fn test_kinetic_energy() {
    let p = Particle::from_arrays(2.0, [0.0, 0.0], [3.0, 4.0]);

    // KE = 0.5 * 2 * 25
    assert_eq!(p.kinetic_energy(), 25.0);
}

#[test]
fn test_distance_to() {
    let a = Particle::from_arrays(1.0, [0.0, 0.0], [0.0, 0.0]);
    let b = Particle::from_arrays(1.0, [3.0, 4.0], [0.0, 0.0]);

    assert_eq!(a.distance_to(&b), 5.0);
    assert_eq!(b.distance_to(&a), 5.0);
}

#[test]
fn test_nominal_radius_is_unit_density_sphere() {
    let p = Particle::from_arrays(4.0 * std::f64::consts::PI / 3.0 * 8.0, [0.0, 0.0], [0.0, 0.0]);
    assert_relative_eq!(p.nominal_radius(), 2.0, epsilon = 1e-12);
}

#[test]
fn test_add_force_points_toward_other() {
    let gravity = Gravity::new();
    let mut a = Particle::from_arrays(1.0e20, [0.0, 0.0], [0.0, 0.0]);
    let b = Particle::from_arrays(2.0e20, [1.0e6, 0.0], [0.0, 0.0]);

    a.add_force(&b, &gravity);

    let expected = G * 1.0e20 * 2.0e20 / (1.0e12 + SOFTENING * SOFTENING);
    assert_relative_eq!(a.force.x, expected, max_relative = 1e-12);
    assert_eq!(a.force.y, 0.0);
}

#[test]
fn test_add_force_accumulates() {
    let gravity = Gravity::new();
    let mut a = Particle::from_arrays(1.0e20, [0.0, 0.0], [0.0, 0.0]);
    let left = Particle::from_arrays(1.0e20, [-1.0e6, 0.0], [0.0, 0.0]);
    let up = Particle::from_arrays(1.0e20, [0.0, 1.0e6], [0.0, 0.0]);

    a.add_force(&left, &gravity);
    a.add_force(&up, &gravity);

    assert!(a.force.x < 0.0);
    assert!(a.force.y > 0.0);
    assert_relative_eq!(a.force.x, -a.force.y, max_relative = 1e-12);
}

#[test]
fn test_softening_bounds_close_encounters() {
    let gravity = Gravity::new();
    let mut a = Particle::from_arrays(1.0, [0.0, 0.0], [0.0, 0.0]);
    let b = Particle::from_arrays(1.0, [1.0e-9, 0.0], [0.0, 0.0]);

    a.add_force(&b, &gravity);

    assert!(a.force.x.is_finite());
    assert!(a.force.x <= G / (SOFTENING * SOFTENING) * (1.0 + 1e-12));
}

#[test]
fn test_reset_force() {
    let mut p = Particle::from_arrays(1.0, [0.0, 0.0], [0.0, 0.0]);
    p.force = Vector2::new(3.0, -2.0);

    p.reset_force();
    assert_eq!(p.force, Vector2::zeros());
}

#[test]
fn test_update_is_semi_implicit() {
    let mut p = Particle::from_arrays(2.0, [1.0, 1.0], [1.0, 0.0]);
    p.force = Vector2::new(4.0, 2.0);

    p.update(0.5);

    // v' = v + F/m·dt = (1 + 2·0.5, 0 + 1·0.5)
    assert_eq!(p.velocity, Vector2::new(2.0, 0.5));
    // x' = x + v'·dt, using the already-updated velocity
    assert_eq!(p.position, Point2::new(2.0, 1.25));
}

#[test]
fn test_merge_weights_by_mass() {
    let a = Particle::from_arrays(1.0, [0.0, 0.0], [4.0, 0.0]).with_id(ParticleId(0));
    let b = Particle::from_arrays(3.0, [4.0, 8.0], [0.0, -4.0]).with_id(ParticleId(1));

    let merged = a.merge(&b);

    assert_eq!(merged.mass, 4.0);
    assert_eq!(merged.position, Point2::new(3.0, 6.0));
    assert_eq!(merged.velocity, Vector2::new(1.0, -3.0));
    assert!(merged.id.is_virtual());
    assert_eq!(merged.force, Vector2::zeros());
}

#[test]
fn test_merge_leaves_inputs_untouched() {
    let a = Particle::from_arrays(1.0, [0.0, 0.0], [1.0, 0.0]).with_id(ParticleId(7));
    let b = Particle::from_arrays(1.0, [2.0, 0.0], [0.0, 1.0]).with_id(ParticleId(8));

    let _ = a.merge(&b);

    assert_eq!(a.position, Point2::new(0.0, 0.0));
    assert_eq!(b.velocity, Vector2::new(0.0, 1.0));
    assert_eq!(a.id, ParticleId(7));
}
