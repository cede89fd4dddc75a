//! Solar System presets and SI unit constants.
//!
//! Presets are a flat table keyed by [`BodyKind`]. The physics core only ever
//! sees the [`Particle`] built from a preset; body kind, radius and spin are
//! bookkeeping for whoever draws the scene.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// Seconds per hour
pub const HOUR: f64 = 3_600.0;
/// Seconds per day
pub const DAY: f64 = 86_400.0;
/// Seconds per Julian year (365.25 days)
pub const YEAR: f64 = 31_557_600.0;

/// Meters per astronomical unit
pub const AU: f64 = 149_597_871_000.0;
/// Solar mass in kg
pub const SOLAR_MASS: f64 = 1.989e30;
/// Solar radius in meters
pub const SOLAR_RADIUS: f64 = 695_700_000.0;
/// Earth radius in meters
pub const EARTH_RADIUS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Clockwise,
    Counterclockwise,
}

impl Rotation {
    /// Sign applied to the spin angle (counterclockwise is positive).
    pub fn sign(self) -> f64 {
        match self {
            Rotation::Clockwise => -1.0,
            Rotation::Counterclockwise => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

/// Physical and visual parameters of a named body (SI units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPreset {
    pub mass: f64,           // kg
    pub radius: f64,         // m
    pub orbit_distance: f64, // m, from the body it orbits
    pub orbit_speed: f64,    // m/s
    pub rotation_period: f64, // s
    pub rotation: Rotation,
}

const fn preset(
    mass: f64,
    radius: f64,
    orbit_distance: f64,
    orbit_speed: f64,
    rotation_period: f64,
    rotation: Rotation,
) -> BodyPreset {
    BodyPreset {
        mass,
        radius,
        orbit_distance,
        orbit_speed,
        rotation_period,
        rotation,
    }
}

use Rotation::{Clockwise, Counterclockwise};

const PRESETS: [(BodyKind, BodyPreset); 11] = [
    (BodyKind::Sun, preset(SOLAR_MASS, SOLAR_RADIUS, 0.0, 0.0, 24.47 * DAY, Counterclockwise)),
    (BodyKind::Mercury, preset(0.33011e24, 2_439_700.0, 46.0e9, 58_980.0, 1407.6 * HOUR, Counterclockwise)),
    (BodyKind::Venus, preset(4.8675e24, 6051.8e3, 107.48e9, 35_260.0, 2802.0 * HOUR, Counterclockwise)),
    (BodyKind::Earth, preset(5.97249e24, EARTH_RADIUS, 147.09e9, 30_290.0, DAY, Counterclockwise)),
    (BodyKind::Moon, preset(7.346e22, 1_737_400.0, 0.3633e9, 1_082.0, 27.3217 * DAY, Clockwise)),
    (BodyKind::Mars, preset(0.64171e24, 3396.2e3, 206.62e9, 26_500.0, 24.6229 * HOUR, Counterclockwise)),
    (BodyKind::Jupiter, preset(1898.19e24, 66_854e3, 740.52e9, 13_720.0, 9.9259 * HOUR, Counterclockwise)),
    (BodyKind::Saturn, preset(568.34e24, 54_364e3, 1_352.55e9, 10_180.0, 10.656 * HOUR, Counterclockwise)),
    (BodyKind::Uranus, preset(86.813e24, 24_973e3, 2_741.30e9, 7_110.0, 17.24 * HOUR, Clockwise)),
    (BodyKind::Neptune, preset(102.413e24, 24_764e3, 4_444.45e9, 5_500.0, 16.11 * HOUR, Counterclockwise)),
    (BodyKind::Pluto, preset(0.01303e24, 1187e3, 7375.93e9, 3_710.0, 153.282 * HOUR, Counterclockwise)),
];

impl BodyKind {
    pub const ALL: [BodyKind; 11] = [
        BodyKind::Sun,
        BodyKind::Mercury,
        BodyKind::Venus,
        BodyKind::Earth,
        BodyKind::Moon,
        BodyKind::Mars,
        BodyKind::Jupiter,
        BodyKind::Saturn,
        BodyKind::Uranus,
        BodyKind::Neptune,
        BodyKind::Pluto,
    ];

    pub fn preset(self) -> &'static BodyPreset {
        // The table is ordered like `ALL`, which mirrors the enum declaration.
        &PRESETS[self as usize].1
    }

    /// A particle at the preset orbit distance on the +x axis, moving
    /// counterclockwise along +y at the preset orbit speed.
    ///
    /// # Examples
    ///
    /// ```
    /// use spacesim::presets::BodyKind;
    ///
    /// let earth = BodyKind::Earth.particle();
    /// assert_eq!(earth.position.x, 147.09e9);
    /// assert_eq!(earth.velocity.y, 30_290.0);
    /// ```
    pub fn particle(self) -> Particle {
        let preset = self.preset();
        Particle::new(
            preset.mass,
            Point2::new(preset.orbit_distance, 0.0),
            Vector2::new(0.0, preset.orbit_speed),
        )
    }

    /// Like [`BodyKind::particle`], offset into the frame of `parent`.
    ///
    /// Places a moon relative to its planet rather than to the origin.
    pub fn particle_around(self, parent: &Particle) -> Particle {
        let mut particle = self.particle();
        particle.position += parent.position.coords;
        particle.velocity += parent.velocity;
        particle
    }
}
