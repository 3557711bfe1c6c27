//! Free-floating particle storage shared by the avatar and the background.
//!
//! Positions start uniformly inside a cube of half-extent [`BOX_HALF_EXTENT`]
//! and drift with a constant per-particle velocity, reflecting off the cube
//! walls. This is the behavior of the plain page background and the default
//! behavior of the avatar when no shape or orbit is engaged.

use rand::Rng;

use crate::material::Material;
use crate::math::centered_unit;

pub const BOX_HALF_EXTENT: f32 = 10.0;
pub const MAX_INITIAL_SPEED: f32 = 0.01;

pub struct ParticleBuffer {
    count: usize,
    pub(crate) positions: Vec<[f32; 3]>,
    pub(crate) velocities: Vec<[f32; 3]>,
    pub(crate) material: Material,
    needs_update: bool,
}

impl ParticleBuffer {
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);
        for _ in 0..count {
            positions.push(random_vector(rng, BOX_HALF_EXTENT));
            velocities.push(random_vector(rng, MAX_INITIAL_SPEED));
        }

        Self {
            count,
            positions,
            velocities,
            material: Material::default(),
            needs_update: true,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn positions_flat(&self) -> &[f32] {
        self.positions.as_flattened()
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    pub fn step_free_float(&mut self) {
        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            for axis in 0..3 {
                let (p, v) = reflect_axis(position[axis], velocity[axis]);
                position[axis] = p;
                velocity[axis] = v;
            }
        }
    }

    pub fn mark_dirty(&mut self) {
        self.needs_update = true;
    }

    /// Returns whether positions changed since the last call, clearing the flag.
    pub fn take_needs_update(&mut self) -> bool {
        std::mem::replace(&mut self.needs_update, false)
    }

    pub(crate) fn release(&mut self) {
        self.positions = Vec::new();
        self.velocities = Vec::new();
        self.needs_update = false;
    }
}

fn random_vector<R: Rng + ?Sized>(rng: &mut R, half_extent: f32) -> [f32; 3] {
    [
        centered_unit(rng.random::<f32>(), half_extent),
        centered_unit(rng.random::<f32>(), half_extent),
        centered_unit(rng.random::<f32>(), half_extent),
    ]
}

// Step first, then point the velocity of any axis that is outside the box
// back toward the origin. The particle may overshoot by one step, and a
// particle released far outside walks back in at its own speed.
fn reflect_axis(position: f32, velocity: f32) -> (f32, f32) {
    let next = position + velocity;
    if next.abs() > BOX_HALF_EXTENT {
        (next, -velocity.abs() * next.signum())
    } else {
        (next, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn initial_draws_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let buffer = ParticleBuffer::new(500, &mut rng);

        assert_eq!(buffer.positions().len(), 500);
        assert_eq!(buffer.positions_flat().len(), 1_500);
        for p in buffer.positions() {
            assert!(p.iter().all(|c| c.abs() <= BOX_HALF_EXTENT));
        }
        for v in &buffer.velocities {
            assert!(v.iter().all(|c| c.abs() <= MAX_INITIAL_SPEED));
        }
    }

    #[test]
    fn velocity_flips_past_the_wall() {
        assert_eq!(reflect_axis(9.995, 0.01), (9.995 + 0.01, -0.01));
        assert_eq!(reflect_axis(0.0, -0.01), (-0.01, -0.01));
    }

    #[test]
    fn outside_particle_always_heads_inward() {
        assert_eq!(reflect_axis(15.0, -0.01), (15.0 - 0.01, -0.01));
        assert_eq!(reflect_axis(15.0, 0.01), (15.0 + 0.01, -0.01));
        assert_eq!(reflect_axis(-15.0, -0.01), (-15.0 - 0.01, 0.01));
    }

    #[test]
    fn far_outside_particle_walks_back_into_the_box() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut buffer = ParticleBuffer::new(1, &mut rng);
        buffer.positions[0] = [18.5, -14.0, 0.0];
        buffer.velocities[0] = [0.01, 0.01, 0.0];

        for _ in 0..1_000 {
            buffer.step_free_float();
        }
        let limit = BOX_HALF_EXTENT + MAX_INITIAL_SPEED + 1.0e-5;
        assert!(buffer.positions()[0].iter().all(|c| c.abs() <= limit));
    }

    #[test]
    fn drifting_particle_returns_from_wall() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut buffer = ParticleBuffer::new(1, &mut rng);
        buffer.positions[0] = [9.999, 0.0, -9.999];
        buffer.velocities[0] = [0.01, 0.0, -0.01];

        buffer.step_free_float();
        assert!(buffer.velocities[0][0] < 0.0);
        assert!(buffer.velocities[0][2] > 0.0);

        buffer.step_free_float();
        assert!(buffer.positions()[0][0] < 10.01);
        assert!(buffer.positions()[0][2] > -10.01);
    }

    #[test]
    fn dirty_flag_is_consumed() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut buffer = ParticleBuffer::new(4, &mut rng);
        assert!(buffer.take_needs_update());
        assert!(!buffer.take_needs_update());
        buffer.mark_dirty();
        assert!(buffer.take_needs_update());
    }

    #[test]
    fn release_frees_storage_but_keeps_count() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut buffer = ParticleBuffer::new(4, &mut rng);
        buffer.release();
        assert!(buffer.positions().is_empty());
        assert_eq!(buffer.count(), 4);
    }
}
