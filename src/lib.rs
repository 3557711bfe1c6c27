use wasm_bindgen::prelude::*;

mod background;
mod buffer;
mod clock;
mod config;
mod error;
mod field;
mod material;
mod math;
mod model_morph;
mod model_orbit;
mod shape;

pub use background::ParticleBackground;
pub use buffer::{ParticleBuffer, BOX_HALF_EXTENT, MAX_INITIAL_SPEED};
#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use clock::{Clock, ManualClock};
pub use config::{
    AvatarConfig, BackgroundConfig, AVATAR_DEFAULT_COUNT, AVATAR_MIN_COUNT,
    BACKGROUND_DEFAULT_COUNT, DEFAULT_MORPH_MS,
};
pub use error::{Error, Result};
pub use field::{FieldMode, ParticleField, FLICKER_STEP, PULSE_STEP};
pub use material::{holographic_opacity, Material};
pub use math::{EaseMode, REFERENCE_FRAME_MS};
pub use shape::{center_count, golden_sphere_point};

fn seed_from_host(seed: u32) -> Option<u64> {
    (seed != 0).then_some(u64::from(seed))
}

fn points_from_flat(flat: &[f32]) -> Result<Vec<[f32; 3]>> {
    if flat.len() % 3 != 0 {
        return Err(Error::InvalidArgument {
            expected: flat.len() / 3 * 3,
            actual: flat.len(),
        });
    }
    Ok(flat
        .chunks_exact(3)
        .map(|xyz| [xyz[0], xyz[1], xyz[2]])
        .collect())
}

/// Browser handle for the shape/orbit particle avatar.
///
/// The host calls `update(timestamp)` from its animation frame callback and
/// reads `positions` (or the zero-copy pointer) afterwards.
#[wasm_bindgen]
pub struct Avatar {
    clock: ManualClock,
    field: ParticleField<ManualClock>,
}

#[wasm_bindgen]
impl Avatar {
    /// `seed == 0` draws a fresh shape from OS entropy.
    #[wasm_bindgen(constructor)]
    pub fn new(count: usize, seed: u32, ease_mode: u32) -> std::result::Result<Avatar, JsError> {
        let clock = ManualClock::default();
        let config = AvatarConfig {
            count,
            seed: seed_from_host(seed),
            ease_mode: EaseMode::from_u32(ease_mode),
            ..AvatarConfig::default()
        };
        let field = ParticleField::new(config, clock.clone())?;
        Ok(Avatar { clock, field })
    }

    pub fn update(&mut self, now_ms: f64) {
        self.clock.set(now_ms);
        self.field.update();
    }

    /// Sets the host time used by the next morph or orbit request.
    ///
    /// `update` already does this every frame. Call it before the first
    /// `update` when a morph or orbit starts at page load, otherwise the
    /// request is timed from zero.
    pub fn set_time(&mut self, now_ms: f64) {
        self.clock.set(now_ms);
    }

    /// `targets` is a flat xyz buffer with one point per particle.
    pub fn animate_morph(
        &mut self,
        targets: &[f32],
        duration_ms: u32,
    ) -> std::result::Result<(), JsError> {
        let points = points_from_flat(targets)?;
        self.field.animate_morph(&points, duration_ms)?;
        Ok(())
    }

    pub fn form_avatar(&mut self, duration_ms: u32) {
        self.field.form_avatar(duration_ms);
    }

    pub fn disperse_particles(&mut self) {
        self.field.disperse_particles();
    }

    pub fn start_orbiting(&mut self) {
        self.field.start_orbiting();
    }

    pub fn stop_orbiting(&mut self) {
        self.field.stop_orbiting();
    }

    pub fn dispose(&mut self) {
        self.field.dispose();
    }

    pub fn positions(&self) -> Vec<f32> {
        self.field.positions_flat().to_vec()
    }

    pub fn positions_ptr(&self) -> *const f32 {
        self.field.positions_flat().as_ptr()
    }

    pub fn positions_len(&self) -> usize {
        self.field.positions_flat().len()
    }

    pub fn needs_update(&mut self) -> bool {
        self.field.take_needs_update()
    }

    pub fn opacity(&self) -> f32 {
        self.field.opacity()
    }

    pub fn color(&self) -> u32 {
        self.field.material().color
    }

    pub fn size(&self) -> f32 {
        self.field.material().size
    }

    pub fn count(&self) -> usize {
        self.field.count()
    }

    pub fn center_count(&self) -> usize {
        self.field.center_count()
    }

    pub fn is_forming(&self) -> bool {
        self.field.is_forming()
    }

    pub fn is_orbiting(&self) -> bool {
        self.field.is_orbiting()
    }
}

/// Browser handle for the plain drifting page background.
#[wasm_bindgen]
pub struct Background {
    inner: ParticleBackground,
}

#[wasm_bindgen]
impl Background {
    #[wasm_bindgen(constructor)]
    pub fn new(count: usize, seed: u32) -> std::result::Result<Background, JsError> {
        let inner = ParticleBackground::new(BackgroundConfig {
            count,
            seed: seed_from_host(seed),
            ..BackgroundConfig::default()
        })?;
        Ok(Background { inner })
    }

    pub fn update(&mut self) {
        self.inner.update();
    }

    pub fn set_color(&mut self, color: u32) {
        self.inner.set_color(color);
    }

    pub fn set_size(&mut self, size: f32) {
        self.inner.set_size(size);
    }

    pub fn color(&self) -> u32 {
        self.inner.material().color
    }

    pub fn size(&self) -> f32 {
        self.inner.material().size
    }

    pub fn opacity(&self) -> f32 {
        self.inner.material().opacity
    }

    pub fn positions(&self) -> Vec<f32> {
        self.inner.positions_flat().to_vec()
    }

    pub fn positions_ptr(&self) -> *const f32 {
        self.inner.positions_flat().as_ptr()
    }

    pub fn positions_len(&self) -> usize {
        self.inner.positions_flat().len()
    }

    pub fn needs_update(&mut self) -> bool {
        self.inner.take_needs_update()
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    pub fn dispose(&mut self) {
        self.inner.dispose();
    }
}
