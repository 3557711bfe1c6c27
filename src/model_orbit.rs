use crate::clock::Clock;
use crate::field::ParticleField;
use crate::math::smoothstep;
use crate::shape::{
    golden_sphere_coords, harmonic_radius, ORBIT_HARMONICS, ORBIT_HARMONIC_PHASE,
};

pub const CORE_SPIN_RATE: f32 = 0.1;
pub const CORE_BREATH_AMPLITUDE: f32 = 0.05;
pub const ORBIT_ECCENTRICITY: f32 = 0.3;
pub const ORBIT_VERTICAL_AMPLITUDE: f32 = 0.5;

impl<C: Clock> ParticleField<C> {
    /// Core particles trace a slowly spinning, breathing golden-angle shell.
    /// Every other particle circles its settled shape position on its own
    /// perturbed ellipse, spiralling out over the orbit transition.
    pub(super) fn step_orbit(&mut self) {
        if self.is_transitioning_to_orbit {
            self.orbit_transition_progress =
                (self.orbit_transition_progress + self.config.orbit_transition_step).min(1.0);
            if self.orbit_transition_progress >= 1.0 {
                self.is_transitioning_to_orbit = false;
            }
        }

        let transition = if self.is_transitioning_to_orbit {
            self.orbit_transition_progress
        } else {
            1.0
        };
        let eased = smoothstep(transition);

        let pulse = self.pulse_time;
        let shell_radius =
            self.config.center_radius * (1.0 + CORE_BREATH_AMPLITUDE * (2.0 * pulse).sin());
        let spin = pulse * CORE_SPIN_RATE;
        let phases = ORBIT_HARMONIC_PHASE.map(|rate| rate * pulse);
        let n = self.center_count;

        for i in 0..n {
            let (y, radius_at_y, theta) = golden_sphere_coords(i, n);
            let theta = theta + spin;
            self.buffer.positions[i] = [
                radius_at_y * theta.cos() * shell_radius,
                y * shell_radius,
                radius_at_y * theta.sin() * shell_radius,
            ];
        }

        for i in n..self.buffer.count() {
            let angle = self.orbit.angles[i];
            let eccentricity = (i as f32 * 0.1).sin() * ORBIT_ECCENTRICITY;
            let radius = harmonic_radius(
                self.orbit.radii[i],
                eccentricity,
                angle,
                ORBIT_HARMONICS,
                phases,
            );
            let base = [
                angle.cos() * radius,
                angle.sin() * radius,
                (2.0 * angle + i as f32 * 0.05).sin() * ORBIT_VERTICAL_AMPLITUDE,
            ];
            let offset = self.orbit.offsets[i];
            let target = self.target_positions[i];

            self.buffer.positions[i] = [
                target[0] + (base[0] + offset[0]) * eased,
                target[1] + (base[1] + offset[1]) * eased,
                target[2] + (base[2] + offset[2]) * eased,
            ];
        }
    }
}
