use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::buffer::ParticleBuffer;
use crate::config::BackgroundConfig;
use crate::error::Result;
use crate::material::Material;

/// Decorative drifting particles with no shape or orbit behavior.
pub struct ParticleBackground {
    buffer: ParticleBuffer,
    disposed: bool,
}

impl ParticleBackground {
    pub fn new(config: BackgroundConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self::with_rng(config, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(mut config: BackgroundConfig, rng: &mut R) -> Result<Self> {
        config.sanitize();
        config.validate()?;

        let mut buffer = ParticleBuffer::new(config.count, rng);
        let material = buffer.material_mut();
        material.set_color(config.color);
        material.set_size(config.size);

        log::debug!("Created particle background with {} particles", config.count);
        Ok(Self {
            buffer,
            disposed: false,
        })
    }

    pub fn update(&mut self) {
        if self.disposed {
            return;
        }
        self.buffer.step_free_float();
        self.buffer.mark_dirty();
    }

    pub fn set_color(&mut self, color: u32) {
        self.buffer.material_mut().set_color(color);
    }

    pub fn set_size(&mut self, size: f32) {
        self.buffer.material_mut().set_size(size);
    }

    pub fn material(&self) -> &Material {
        self.buffer.material()
    }

    pub fn count(&self) -> usize {
        self.buffer.count()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        self.buffer.positions()
    }

    pub fn positions_flat(&self) -> &[f32] {
        self.buffer.positions_flat()
    }

    pub fn take_needs_update(&mut self) -> bool {
        self.buffer.take_needs_update()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.buffer.release();
        self.disposed = true;
        log::debug!("Disposed particle background");
    }
}

#[cfg(test)]
mod tests {
    use super::ParticleBackground;
    use crate::config::BackgroundConfig;

    fn background() -> ParticleBackground {
        ParticleBackground::new(BackgroundConfig {
            count: 100,
            seed: Some(8),
            ..BackgroundConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn drifts_inside_the_box() {
        let mut bg = background();
        for _ in 0..5_000 {
            bg.update();
        }
        for p in bg.positions() {
            assert!(p.iter().all(|c| c.abs() <= 10.0 + 0.01 + 1.0e-5));
        }
        assert_eq!(bg.positions().len(), 100);
    }

    #[test]
    fn cosmetic_setters_update_material() {
        let mut bg = background();
        assert_eq!(bg.material().color, 0x00BF_FF);
        bg.set_color(0xFF_00FF);
        bg.set_size(0.2);
        assert_eq!(bg.material().color, 0xFF_00FF);
        assert_eq!(bg.material().size, 0.2);
    }

    #[test]
    fn disposed_background_ignores_updates() {
        let mut bg = background();
        bg.dispose();
        bg.update();
        assert!(bg.is_disposed());
        assert!(bg.positions().is_empty());
        assert!(!bg.take_needs_update());
    }
}
