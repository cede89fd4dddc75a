//! Simulation settings loadable from TOML.
//!
//! Every field has a default, so a partial document only overrides what it
//! names:
//!
//! ```toml
//! tick_duration = 14400.0     # seconds per step
//!
//! [gravity]
//! theta = 0.5                 # opening angle
//! softening = 3.0e4           # meters
//! gravitational_constant = 6.67408e-11
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gravity::Gravity;
use crate::presets::YEAR;

/// Rendered frames per wall-clock second.
///
/// A playback speed expressed in simulated seconds per real second maps to a
/// tick of `speed / TICKS_PER_SECOND`.
pub const TICKS_PER_SECOND: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulated seconds advanced by each step
    pub tick_duration: f64,
    pub gravity: Gravity,
}

impl SimulationConfig {
    /// Default force law with a tick derived from a playback speed.
    ///
    /// # Examples
    ///
    /// ```
    /// use spacesim::config::SimulationConfig;
    ///
    /// // Ten days of simulated time per second of playback
    /// let config = SimulationConfig::with_time_scale(864_000.0);
    /// assert_eq!(config.tick_duration, 14_400.0);
    /// ```
    pub fn with_time_scale(simulated_seconds_per_second: f64) -> Self {
        Self {
            tick_duration: simulated_seconds_per_second / TICKS_PER_SECOND,
            ..Self::default()
        }
    }

    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks the invariants the integrator and force law rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_duration.is_finite() && self.tick_duration > 0.0) {
            return Err(ConfigError::NonPositiveTickDuration(self.tick_duration));
        }

        let gravity = &self.gravity;
        if !(gravity.theta.is_finite() && gravity.theta >= 0.0) {
            return Err(ConfigError::NegativeTheta(gravity.theta));
        }
        if !(gravity.softening.is_finite() && gravity.softening > 0.0) {
            return Err(ConfigError::NonPositiveSoftening(gravity.softening));
        }
        if !(gravity.gravitational_constant.is_finite() && gravity.gravitational_constant > 0.0) {
            return Err(ConfigError::NonPositiveGravitationalConstant(
                gravity.gravitational_constant,
            ));
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    /// One simulated year per second of playback with the default force law.
    fn default() -> Self {
        Self {
            tick_duration: YEAR / TICKS_PER_SECOND,
            gravity: Gravity::default(),
        }
    }
}
