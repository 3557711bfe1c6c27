use crate::config::{clamp_finite, DEFAULT_COLOR, DEFAULT_POINT_SIZE, MAX_POINT_SIZE};

pub const DEFAULT_OPACITY: f32 = 0.9;
pub const MIN_HOLOGRAM_OPACITY: f32 = 0.3;

/// Point-sprite appearance the renderer applies to the whole particle set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: u32,
    pub size: f32,
    pub opacity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            size: DEFAULT_POINT_SIZE,
            opacity: DEFAULT_OPACITY,
        }
    }
}

impl Material {
    pub fn set_color(&mut self, color: u32) {
        self.color = color & 0x00FF_FFFF;
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = clamp_finite(size, 0.0, MAX_POINT_SIZE, self.size);
    }
}

/// Pulsing, flickering opacity of the holographic avatar.
pub fn holographic_opacity(pulse_time: f32, flicker_offset: f32) -> f32 {
    let pulse = 0.8 + 0.2 * pulse_time.sin();
    let flicker = 0.1 * (7.0 * flicker_offset).sin() + 0.05 * (13.0 * flicker_offset).sin();
    (pulse + flicker).max(MIN_HOLOGRAM_OPACITY)
}

#[cfg(test)]
mod tests {
    use super::{holographic_opacity, Material, MIN_HOLOGRAM_OPACITY};

    #[test]
    fn opacity_never_drops_below_floor() {
        let mut t = 0.0f32;
        for _ in 0..5_000 {
            let opacity = holographic_opacity(t * 0.4, t);
            assert!(opacity >= MIN_HOLOGRAM_OPACITY);
            assert!(opacity <= 1.15 + 1.0e-6);
            t += 0.05;
        }
    }

    #[test]
    fn opacity_at_rest_is_base_pulse() {
        assert!((holographic_opacity(0.0, 0.0) - 0.8).abs() < 1.0e-6);
    }

    #[test]
    fn invalid_size_keeps_previous_value() {
        let mut material = Material::default();
        material.set_size(0.5);
        material.set_size(f32::NAN);
        assert_eq!(material.size, 0.5);
        material.set_color(0xAB00_FF00);
        assert_eq!(material.color, 0x00_FF00);
    }
}
