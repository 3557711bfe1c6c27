//! The particle avatar: a free-floating swarm that can morph into a shape,
//! spin up a golden-angle core and orbit around its silhouette.
//!
//! All motion is polled from [`ParticleField::update`], which the host calls
//! once per displayed frame. Timed morphs store their start time and duration
//! and derive progress from the injected [`Clock`], so tests can drive the
//! whole engine with a [`crate::clock::ManualClock`].

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::buffer::ParticleBuffer;
use crate::clock::Clock;
use crate::config::AvatarConfig;
use crate::error::{Error, Result};
use crate::material::{holographic_opacity, Material};
use crate::math::REFERENCE_FRAME_MS;
use crate::model_morph::TimedMorph;
use crate::shape::{
    center_count, center_sphere, generate_avatar_shape, golden_sphere_point, OrbitParams,
};

pub const PULSE_STEP: f32 = 0.02;
pub const FLICKER_STEP: f32 = 0.05;

/// The behavior that owns the position buffer during the next update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldMode {
    FreeFloat,
    Forming,
    FormingCenter,
    Orbiting,
    Holding,
    Disposed,
}

pub struct ParticleField<C: Clock> {
    pub(crate) config: AvatarConfig,
    clock: C,
    pub(crate) buffer: ParticleBuffer,
    pub(crate) center_count: usize,
    pub(crate) target_positions: Vec<[f32; 3]>,
    pub(crate) center_target_positions: Vec<[f32; 3]>,
    pub(crate) orbit: OrbitParams,
    pub(crate) morph: Option<TimedMorph>,
    pub(crate) morph_progress: f32,
    pub(crate) center_morph: Option<TimedMorph>,
    pub(crate) center_morph_progress: f32,
    pub(crate) is_orbiting: bool,
    pub(crate) is_transitioning_to_orbit: bool,
    pub(crate) orbit_transition_progress: f32,
    orbit_started_ms: Option<f64>,
    pub(crate) holding_shape: bool,
    pub(crate) pulse_time: f32,
    flicker_offset: f32,
    last_update_ms: Option<f64>,
    disposed: bool,
}

impl<C: Clock> ParticleField<C> {
    /// Builds a field from `config.seed`, or from OS entropy when unseeded.
    pub fn new(config: AvatarConfig, clock: C) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self::with_rng(config, clock, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(
        mut config: AvatarConfig,
        clock: C,
        rng: &mut R,
    ) -> Result<Self> {
        config.sanitize();
        config.validate()?;

        let count = config.count;
        let buffer = ParticleBuffer::new(count, rng);
        let orbit = OrbitParams::sample(count, rng);
        let target_positions = generate_avatar_shape(count, rng);
        let centers = center_count(count);
        let center_target_positions = center_sphere(centers, config.center_radius);

        log::debug!("Created particle avatar with {count} particles ({centers} in the core)");

        Ok(Self {
            config,
            clock,
            buffer,
            center_count: centers,
            target_positions,
            center_target_positions,
            orbit,
            morph: None,
            morph_progress: 0.0,
            center_morph: None,
            center_morph_progress: 0.0,
            is_orbiting: false,
            is_transitioning_to_orbit: false,
            orbit_transition_progress: 0.0,
            orbit_started_ms: None,
            holding_shape: false,
            pulse_time: 0.0,
            flicker_offset: 0.0,
            last_update_ms: None,
            disposed: false,
        })
    }

    /// Advances one displayed frame.
    pub fn update(&mut self) {
        if self.disposed {
            log::trace!("Ignoring update on a disposed particle avatar");
            return;
        }

        let now = self.clock.now_ms();
        let dt_ms = self
            .last_update_ms
            .map_or(REFERENCE_FRAME_MS, |last| (now - last).max(0.0));
        self.last_update_ms = Some(now);

        self.pulse_time += PULSE_STEP;
        self.flicker_offset += FLICKER_STEP;
        self.buffer.material.opacity = holographic_opacity(self.pulse_time, self.flicker_offset);

        if self.is_orbiting {
            self.orbit.advance();
        }

        self.poll_morph(now);
        let center_progress = self.poll_center_morph(now);

        if self.morph.is_some() {
            self.step_forming(dt_ms);
        } else if let Some(progress) = center_progress {
            self.step_forming_center(progress);
        } else if self.is_orbiting {
            self.step_orbit();
        } else if !self.holding_shape {
            self.buffer.step_free_float();
        }

        if center_progress.is_some_and(|progress| progress >= 1.0) {
            self.center_morph = None;
            log::debug!("Avatar core sphere formed");
        }

        self.buffer.mark_dirty();
        self.debug_validate_state();
    }

    /// Replaces the shape targets and eases every particle toward them over
    /// `duration_ms`, snapping exactly onto them once the time has elapsed.
    pub fn animate_morph(&mut self, targets: &[[f32; 3]], duration_ms: u32) -> Result<()> {
        if self.disposed {
            log::warn!("Morph requested on a disposed particle avatar");
            return Err(Error::Disposed);
        }
        if targets.len() != self.buffer.count() {
            return Err(Error::InvalidArgument {
                expected: self.buffer.count(),
                actual: targets.len(),
            });
        }
        if let Some(index) = targets
            .iter()
            .position(|point| !point.iter().all(|c| c.is_finite()))
        {
            return Err(Error::NonFiniteTarget { index });
        }

        self.target_positions.copy_from_slice(targets);
        self.begin_morph(duration_ms);
        Ok(())
    }

    /// Morphs back into the current target shape.
    pub fn form_avatar(&mut self, duration_ms: u32) {
        if self.disposed {
            log::warn!("Form requested on a disposed particle avatar");
            return;
        }
        self.begin_morph(duration_ms);
    }

    /// Stops any shape morph so the swarm drifts freely again.
    pub fn disperse_particles(&mut self) {
        if self.disposed {
            log::warn!("Disperse requested on a disposed particle avatar");
            return;
        }
        self.morph = None;
        self.morph_progress = 0.0;
        self.holding_shape = false;
        log::debug!("Avatar dispersed");
    }

    pub fn start_orbiting(&mut self) {
        if self.disposed {
            log::warn!("Orbit requested on a disposed particle avatar");
            return;
        }

        let now = self.clock.now_ms();
        self.is_orbiting = true;
        self.holding_shape = true;
        if !self.is_transitioning_to_orbit && self.orbit_transition_progress < 1.0 {
            self.is_transitioning_to_orbit = true;
            self.orbit_transition_progress = 0.0;
        }
        self.orbit_started_ms = Some(now);

        let n = self.center_count;
        for (i, target) in self.center_target_positions.iter_mut().enumerate() {
            *target = golden_sphere_point(i, n, self.config.center_radius);
        }
        self.center_morph = Some(TimedMorph::start(now, self.config.center_morph_ms));
        self.center_morph_progress = 0.0;

        log::debug!("Avatar started orbiting");
    }

    /// Leaves particles wherever the orbit last placed them.
    pub fn stop_orbiting(&mut self) {
        if !self.is_orbiting {
            return;
        }
        self.is_orbiting = false;
        self.is_transitioning_to_orbit = false;
        self.orbit_transition_progress = 0.0;
        log::debug!("Avatar stopped orbiting");
    }

    /// Releases every buffer. Later updates are ignored and morphs fail.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.buffer.release();
        self.orbit.release();
        self.target_positions = Vec::new();
        self.center_target_positions = Vec::new();
        self.morph = None;
        self.center_morph = None;
        self.is_orbiting = false;
        self.is_transitioning_to_orbit = false;
        self.orbit_started_ms = None;
        self.disposed = true;
        log::debug!("Disposed particle avatar");
    }

    pub fn mode(&self) -> FieldMode {
        if self.disposed {
            FieldMode::Disposed
        } else if self.morph.is_some() {
            FieldMode::Forming
        } else if self.center_morph.is_some() {
            FieldMode::FormingCenter
        } else if self.is_orbiting {
            FieldMode::Orbiting
        } else if self.holding_shape {
            FieldMode::Holding
        } else {
            FieldMode::FreeFloat
        }
    }

    pub fn count(&self) -> usize {
        self.buffer.count()
    }

    pub fn center_count(&self) -> usize {
        self.center_count
    }

    pub fn is_center(&self, index: usize) -> bool {
        index < self.center_count
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        self.buffer.positions()
    }

    pub fn positions_flat(&self) -> &[f32] {
        self.buffer.positions_flat()
    }

    pub fn target_positions(&self) -> &[[f32; 3]] {
        &self.target_positions
    }

    pub fn center_target_positions(&self) -> &[[f32; 3]] {
        &self.center_target_positions
    }

    pub fn orbit_angles(&self) -> &[f32] {
        &self.orbit.angles
    }

    pub fn orbit_speeds(&self) -> &[f32] {
        &self.orbit.speeds
    }

    pub fn is_forming(&self) -> bool {
        self.morph.is_some()
    }

    pub fn is_forming_center(&self) -> bool {
        self.center_morph.is_some()
    }

    pub fn is_orbiting(&self) -> bool {
        self.is_orbiting
    }

    pub fn is_transitioning_to_orbit(&self) -> bool {
        self.is_transitioning_to_orbit
    }

    pub fn orbit_transition_progress(&self) -> f32 {
        self.orbit_transition_progress
    }

    pub fn morph_progress(&self) -> f32 {
        self.morph_progress
    }

    pub fn center_morph_progress(&self) -> f32 {
        self.center_morph_progress
    }

    pub fn pulse_time(&self) -> f32 {
        self.pulse_time
    }

    pub fn flicker_offset(&self) -> f32 {
        self.flicker_offset
    }

    pub fn material(&self) -> &Material {
        self.buffer.material()
    }

    pub fn opacity(&self) -> f32 {
        self.buffer.material().opacity
    }

    /// Milliseconds since the last `start_orbiting`, if it was ever called.
    pub fn orbit_elapsed_ms(&self) -> Option<f64> {
        self.orbit_started_ms
            .map(|started| (self.clock.now_ms() - started).max(0.0))
    }

    pub fn take_needs_update(&mut self) -> bool {
        self.buffer.take_needs_update()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn config(&self) -> &AvatarConfig {
        &self.config
    }

    fn begin_morph(&mut self, duration_ms: u32) {
        let now = self.clock.now_ms();
        self.morph = Some(TimedMorph::start(now, f64::from(duration_ms)));
        self.morph_progress = 0.0;
        log::debug!("Avatar morph started ({duration_ms} ms)");
    }

    fn debug_validate_state(&self) {
        let count = self.buffer.count();
        debug_assert_eq!(self.buffer.positions().len(), count);
        debug_assert_eq!(self.target_positions.len(), count);
        debug_assert_eq!(self.orbit.angles.len(), count);
        debug_assert_eq!(self.center_target_positions.len(), self.center_count);
        debug_assert!(self
            .buffer
            .positions()
            .iter()
            .flatten()
            .all(|c| c.is_finite()));
    }
}
