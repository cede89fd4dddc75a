//! The simulation context: particle list, per-tick tree construction and
//! integration, anchor correction and reset.

use log::{debug, trace, warn};
use nalgebra::Vector2;

use crate::config::{SimulationConfig, TICKS_PER_SECOND};
use crate::error::{ConfigError, Error, Result};
use crate::export::{ParticleState, SimulationFrame};
use crate::gravity::Gravity;
use crate::particle::{Particle, ParticleId};
use crate::quadrant::Quadrant;
use crate::tree::SpatialTree;

/// Smallest side length (m) of the per-tick root quadrant.
///
/// Keeps the root from collapsing to a point when every particle sits at the
/// origin.
pub const MIN_ROOT_SIDE: f64 = 1.0;

/// What happened while advancing one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Particles placed in the tree
    pub inserted: usize,
    /// Particles outside the root quadrant, integrated with zero force
    pub excluded: usize,
    /// Particles lost on a sub-quadrant edge during insertion
    pub dropped: usize,
    pub node_count: usize,
}

/// Root quadrant for a tick: centered at the origin with a side of twice the
/// largest absolute coordinate over all particles.
pub fn root_quadrant(particles: &[Particle]) -> Quadrant {
    let extent = particles
        .iter()
        .map(|p| p.position.x.abs().max(p.position.y.abs()))
        .fold(0.0, f64::max);

    Quadrant::centered_at_origin((2.0 * extent).max(MIN_ROOT_SIDE))
}

/// Advances `particles` by one tick of length `dt` against a tree built over
/// `bounds`.
///
/// Particles outside `bounds` are left out of the tree: they neither attract
/// nor get attracted this tick, but still coast on their current velocity.
/// Under [`root_quadrant`] every particle is inside, so this only bites with a
/// hand-picked bound. A body escaping faster than the bound grows would be
/// affected the same way.
///
/// Every particle queries the same start-of-tick tree, in list order: reset
/// force, accumulate force, integrate.
pub fn advance(
    particles: &mut [Particle],
    bounds: Quadrant,
    dt: f64,
    gravity: &Gravity,
) -> TickReport {
    let mut report = TickReport::default();
    let mut tree = SpatialTree::new(bounds);

    let inside: Vec<bool> = particles
        .iter()
        .map(|p| bounds.contains(&p.position))
        .collect();

    for (particle, &included) in particles.iter().zip(&inside) {
        if !included {
            report.excluded += 1;
        } else if tree.insert(*particle) {
            report.inserted += 1;
        } else {
            report.dropped += 1;
        }
    }
    report.node_count = tree.node_count();

    if report.excluded > 0 {
        warn!(
            "{} particle(s) outside the root quadrant (side {:e} m) skipped this tick",
            report.excluded,
            bounds.side()
        );
    }

    for (particle, &included) in particles.iter_mut().zip(&inside) {
        particle.reset_force();
        if included {
            particle.update_force(&tree, gravity);
        }
        particle.update(dt);
    }

    report
}

/// A 2D N-body system advanced with a Barnes-Hut tree.
///
/// The particle list keeps insertion order, so list indices are stable
/// handles for renderers. The first call to [`step`](Self::step) applies the
/// anchor correction and records a snapshot that [`reset`](Self::reset)
/// returns to.
///
/// # Examples
///
/// ```
/// use spacesim::presets::BodyKind;
/// use spacesim::simulation::Simulation;
///
/// let mut sim = Simulation::default();
/// let sun = sim.insert(BodyKind::Sun.particle());
/// sim.insert(BodyKind::Earth.particle());
/// sim.anchor_to(sun).unwrap();
///
/// sim.step();
/// assert!(sim.is_running());
///
/// sim.reset();
/// assert_eq!(sim.time(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    particles: Vec<Particle>,
    snapshot: Option<Vec<Particle>>,
    anchor: Option<ParticleId>,
    /// Elapsed simulated time in seconds
    time: f64,
    next_id: u32,
}

impl Simulation {
    /// Creates an empty simulation after validating `config`.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: SimulationConfig) -> Self {
        Self {
            config,
            particles: Vec::new(),
            snapshot: None,
            anchor: None,
            time: 0.0,
            next_id: 0,
        }
    }

    /// Appends a particle and returns its handle.
    pub fn insert(&mut self, particle: Particle) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        self.particles.push(particle.with_id(id));
        id
    }

    /// Designates the particle whose momentum absorbs the net momentum of the
    /// rest of the system on the first step.
    pub fn anchor_to(&mut self, id: ParticleId) -> Result<()> {
        if self.snapshot.is_some() {
            return Err(Error::AlreadyRunning);
        }
        if self.index_of(id).is_none() {
            return Err(Error::UnknownParticle(id));
        }
        self.anchor = Some(id);
        Ok(())
    }

    pub fn anchor(&self) -> Option<ParticleId> {
        self.anchor
    }

    /// Advances the system by one tick.
    pub fn step(&mut self) -> TickReport {
        if self.snapshot.is_none() {
            self.correct_anchor_momentum();
            self.snapshot = Some(self.particles.clone());
            debug!("captured initial state of {} particles", self.particles.len());
        }

        self.time += self.config.tick_duration;

        let bounds = root_quadrant(&self.particles);
        let report = advance(
            &mut self.particles,
            bounds,
            self.config.tick_duration,
            &self.config.gravity,
        );

        trace!(
            "t = {:e} s: {} inserted, {} excluded, {} dropped, {} nodes",
            self.time,
            report.inserted,
            report.excluded,
            report.dropped,
            report.node_count
        );
        report
    }

    /// Runs `n_steps` ticks and returns the elapsed time.
    pub fn integrate(&mut self, n_steps: usize) -> f64 {
        for _ in 0..n_steps {
            self.step();
        }
        self.time
    }

    /// Gives the anchor the negated momentum of all other particles so that
    /// the system's total momentum is zero.
    fn correct_anchor_momentum(&mut self) {
        let Some(anchor) = self.anchor else {
            return;
        };
        let Some(index) = self.index_of(anchor) else {
            return;
        };

        let others = self
            .particles
            .iter()
            .filter(|p| p.id != anchor)
            .map(|p| p.momentum())
            .fold(Vector2::zeros(), |acc, m| acc + m);

        self.particles[index].set_momentum(-others);
        debug!(
            "anchor {:?} absorbed momentum ({:e}, {:e}) kg·m/s",
            anchor, -others.x, -others.y
        );
    }

    /// Restores the particle list captured on the first step and rewinds the
    /// clock to zero.
    ///
    /// The anchor correction is not repeated by later steps. Before the first
    /// step there is nothing to restore and the particles are left alone.
    pub fn reset(&mut self) {
        self.time = 0.0;
        if let Some(snapshot) = &self.snapshot {
            self.particles = snapshot.clone();
            debug!("reset to initial state of {} particles", snapshot.len());
        }
    }

    /// Whether at least one step has run since creation or the last reset.
    pub fn is_running(&self) -> bool {
        self.time > 0.0
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn tick_duration(&self) -> f64 {
        self.config.tick_duration
    }

    pub fn set_tick_duration(&mut self, tick_duration: f64) -> Result<(), ConfigError> {
        let config = SimulationConfig {
            tick_duration,
            ..self.config
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Sets the tick from a playback speed in simulated seconds per second.
    pub fn set_time_scale(&mut self, simulated_seconds_per_second: f64) -> Result<(), ConfigError> {
        self.set_tick_duration(simulated_seconds_per_second / TICKS_PER_SECOND)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn gravity(&self) -> &Gravity {
        &self.config.gravity
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for editing initial conditions.
    ///
    /// Ids are not meant to be changed through this slice.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// State recorded on the first step, if it has run.
    pub fn snapshot(&self) -> Option<&[Particle]> {
        self.snapshot.as_deref()
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.iter_mut().find(|p| p.id == id)
    }

    /// Position of the particle in the list, stable across steps and resets.
    pub fn index_of(&self, id: ParticleId) -> Option<usize> {
        self.particles.iter().position(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Root quadrant the next step will build its tree over.
    pub fn bounding_quadrant(&self) -> Quadrant {
        root_quadrant(&self.particles)
    }

    pub fn total_mass(&self) -> f64 {
        self.particles.iter().map(|p| p.mass).sum()
    }

    /// Σ m·v over all particles (kg·m/s)
    pub fn total_momentum(&self) -> Vector2<f64> {
        self.particles
            .iter()
            .map(|p| p.momentum())
            .fold(Vector2::zeros(), |acc, m| acc + m)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Exact softened potential energy (O(N²)).
    pub fn potential_energy(&self) -> f64 {
        self.config.gravity.potential_energy(&self.particles)
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy() + self.potential_energy()
    }

    /// Mass, position and velocity of every particle in list order.
    pub fn export(&self) -> Vec<ParticleState> {
        self.particles.iter().map(ParticleState::from).collect()
    }

    pub fn frame(&self) -> SimulationFrame {
        SimulationFrame {
            time: self.time,
            tick_duration: self.config.tick_duration,
            anchor_index: self.anchor.and_then(|id| self.index_of(id)),
            particles: self.export(),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::with_valid_config(SimulationConfig::default())
    }
}
