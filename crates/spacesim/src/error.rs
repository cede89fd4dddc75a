use thiserror::Error;

use crate::particle::ParticleId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Invalid or unreadable simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tick duration must be a positive number of seconds, got {0}")]
    NonPositiveTickDuration(f64),

    #[error("opening angle theta must be non-negative, got {0}")]
    NegativeTheta(f64),

    #[error("softening length must be positive, got {0}")]
    NonPositiveSoftening(f64),

    #[error("gravitational constant must be positive, got {0}")]
    NonPositiveGravitationalConstant(f64),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no particle with id {0:?} in this simulation")]
    UnknownParticle(ParticleId),

    #[error("the anchor can only be chosen before the first step")]
    AlreadyRunning,
}
