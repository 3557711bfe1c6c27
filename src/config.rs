use crate::error::{Error, Result};
use crate::math::EaseMode;

pub const AVATAR_DEFAULT_COUNT: usize = 2_000;
pub const BACKGROUND_DEFAULT_COUNT: usize = 1_000;
/// Smallest avatar that still yields two center particles for the sphere shell.
pub const AVATAR_MIN_COUNT: usize = 8;
pub const MAX_PARTICLE_COUNT: usize = 200_000;

pub const DEFAULT_CENTER_RADIUS: f32 = 0.8;
pub const MIN_CENTER_RADIUS: f32 = 0.01;
pub const MAX_CENTER_RADIUS: f32 = 10.0;
pub const DEFAULT_EASE_RATE: f32 = 0.1;
pub const DEFAULT_CENTER_MORPH_MS: f64 = 500.0;
pub const MAX_CENTER_MORPH_MS: f64 = 10_000.0;
pub const DEFAULT_ORBIT_TRANSITION_STEP: f32 = 0.02;
pub const DEFAULT_MORPH_MS: u32 = 2_000;

pub const DEFAULT_COLOR: u32 = 0x00BF_FF;
pub const DEFAULT_POINT_SIZE: f32 = 0.08;
pub const MAX_POINT_SIZE: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarConfig {
    pub count: usize,
    /// `None` draws a fresh shape from OS entropy.
    pub seed: Option<u64>,
    pub center_radius: f32,
    pub ease_rate: f32,
    pub ease_mode: EaseMode,
    pub center_morph_ms: f64,
    pub orbit_transition_step: f32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            count: AVATAR_DEFAULT_COUNT,
            seed: None,
            center_radius: DEFAULT_CENTER_RADIUS,
            ease_rate: DEFAULT_EASE_RATE,
            ease_mode: EaseMode::PerFrame,
            center_morph_ms: DEFAULT_CENTER_MORPH_MS,
            orbit_transition_step: DEFAULT_ORBIT_TRANSITION_STEP,
        }
    }
}

impl AvatarConfig {
    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn sanitize(&mut self) {
        self.center_radius = clamp_finite(
            self.center_radius,
            MIN_CENTER_RADIUS,
            MAX_CENTER_RADIUS,
            DEFAULT_CENTER_RADIUS,
        );
        self.ease_rate = clamp_finite(self.ease_rate, 0.001, 1.0, DEFAULT_EASE_RATE);
        self.center_morph_ms = if self.center_morph_ms.is_finite() {
            self.center_morph_ms.clamp(0.0, MAX_CENTER_MORPH_MS)
        } else {
            DEFAULT_CENTER_MORPH_MS
        };
        self.orbit_transition_step = clamp_finite(
            self.orbit_transition_step,
            0.001,
            1.0,
            DEFAULT_ORBIT_TRANSITION_STEP,
        );
    }

    pub fn validate(&self) -> Result<()> {
        if self.count < AVATAR_MIN_COUNT {
            return Err(Error::InvalidConfiguration(format!(
                "avatar needs at least {AVATAR_MIN_COUNT} particles, got {}",
                self.count
            )));
        }
        if self.count > MAX_PARTICLE_COUNT {
            return Err(Error::InvalidConfiguration(format!(
                "avatar supports at most {MAX_PARTICLE_COUNT} particles, got {}",
                self.count
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundConfig {
    pub count: usize,
    pub seed: Option<u64>,
    pub color: u32,
    pub size: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            count: BACKGROUND_DEFAULT_COUNT,
            seed: None,
            color: DEFAULT_COLOR,
            size: DEFAULT_POINT_SIZE,
        }
    }
}

impl BackgroundConfig {
    pub fn sanitize(&mut self) {
        self.color &= 0x00FF_FFFF;
        self.size = clamp_finite(self.size, 0.0, MAX_POINT_SIZE, DEFAULT_POINT_SIZE);
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 || self.count > MAX_PARTICLE_COUNT {
            return Err(Error::InvalidConfiguration(format!(
                "background particle count must be within 1..={MAX_PARTICLE_COUNT}, got {}",
                self.count
            )));
        }
        Ok(())
    }
}

pub(crate) fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if !value.is_finite() {
        return fallback;
    }
    value.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_non_finite_values() {
        let mut config = AvatarConfig {
            center_radius: f32::NAN,
            ease_rate: f32::INFINITY,
            center_morph_ms: f64::NAN,
            orbit_transition_step: -3.0,
            ..AvatarConfig::default()
        };
        config.sanitize();

        assert_eq!(config.center_radius, DEFAULT_CENTER_RADIUS);
        assert_eq!(config.ease_rate, DEFAULT_EASE_RATE);
        assert_eq!(config.center_morph_ms, DEFAULT_CENTER_MORPH_MS);
        assert_eq!(config.orbit_transition_step, 0.001);
    }

    #[test]
    fn tiny_avatar_is_rejected() {
        let err = AvatarConfig::with_count(7).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert!(AvatarConfig::with_count(AVATAR_MIN_COUNT).validate().is_ok());
    }

    #[test]
    fn background_masks_color_to_rgb() {
        let mut config = BackgroundConfig {
            color: 0xFF12_3456,
            size: f32::NAN,
            ..BackgroundConfig::default()
        };
        config.sanitize();
        assert_eq!(config.color, 0x12_3456);
        assert_eq!(config.size, DEFAULT_POINT_SIZE);
        assert!(BackgroundConfig { count: 0, ..config }.validate().is_err());
    }
}
