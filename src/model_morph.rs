use crate::clock::Clock;
use crate::field::ParticleField;
use crate::math::{ease_factor, lerp3};

/// A wall-clock morph window polled from the frame loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedMorph {
    started_ms: f64,
    duration_ms: f64,
}

impl TimedMorph {
    pub fn start(now_ms: f64, duration_ms: f64) -> Self {
        Self {
            started_ms: now_ms,
            duration_ms: duration_ms.max(0.0),
        }
    }

    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }
}

impl<C: Clock> ParticleField<C> {
    /// Finishes the shape morph once its duration has elapsed, snapping every
    /// particle exactly onto its target.
    pub(super) fn poll_morph(&mut self, now_ms: f64) {
        let Some(morph) = self.morph else {
            return;
        };

        self.morph_progress = morph.progress(now_ms);
        if self.morph_progress < 1.0 {
            return;
        }

        self.morph = None;
        self.buffer.positions.copy_from_slice(&self.target_positions);
        self.holding_shape = true;
        log::debug!("Avatar morph complete");
    }

    pub(super) fn poll_center_morph(&mut self, now_ms: f64) -> Option<f32> {
        let progress = self.center_morph?.progress(now_ms);
        self.center_morph_progress = progress;
        Some(progress)
    }

    // Exponential approach: closes a fixed fraction of the gap and never
    // overshoots. Exact arrival comes from the snap in `poll_morph`.
    pub(super) fn step_forming(&mut self, dt_ms: f64) {
        let factor = ease_factor(self.config.ease_mode, self.config.ease_rate, dt_ms);
        for (position, target) in self
            .buffer
            .positions
            .iter_mut()
            .zip(&self.target_positions)
        {
            for axis in 0..3 {
                position[axis] += (target[axis] - position[axis]) * factor;
            }
        }
    }

    pub(super) fn step_forming_center(&mut self, progress: f32) {
        for (position, target) in self
            .buffer
            .positions
            .iter_mut()
            .zip(&self.center_target_positions)
        {
            *position = lerp3(*position, *target, progress);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TimedMorph;
    use crate::clock::ManualClock;
    use crate::config::AvatarConfig;
    use crate::field::ParticleField;
    use crate::math::EaseMode;

    #[test]
    fn progress_is_clamped_to_window() {
        let morph = TimedMorph::start(100.0, 200.0);
        assert_eq!(morph.progress(50.0), 0.0);
        assert_eq!(morph.progress(200.0), 0.5);
        assert_eq!(morph.progress(10_000.0), 1.0);
        assert_eq!(TimedMorph::start(0.0, 0.0).progress(0.0), 1.0);
    }

    #[test]
    fn forming_eases_a_tenth_per_frame() {
        let clock = ManualClock::new(0.0);
        let mut field =
            ParticleField::new(AvatarConfig::with_count(16).seeded(9), clock.clone()).unwrap();
        let start = field.positions()[10];
        let target = field.target_positions()[10];

        field.form_avatar(10_000);
        clock.advance(16.0);
        field.update();

        let moved = field.positions()[10];
        for axis in 0..3 {
            let expected = start[axis] + (target[axis] - start[axis]) * 0.1;
            assert!((moved[axis] - expected).abs() < 1.0e-5);
        }
    }

    #[test]
    fn time_scaled_ease_depends_on_elapsed_time() {
        let clock = ManualClock::new(0.0);
        let config = AvatarConfig {
            ease_mode: EaseMode::TimeScaled,
            ..AvatarConfig::with_count(16).seeded(9)
        };
        let mut field = ParticleField::new(config, clock.clone()).unwrap();
        field.update();

        let start = field.positions()[12];
        let target = field.target_positions()[12];
        field.form_avatar(10_000);
        clock.advance(2.0 * crate::math::REFERENCE_FRAME_MS);
        field.update();

        let moved = field.positions()[12];
        for axis in 0..3 {
            let expected = start[axis] + (target[axis] - start[axis]) * 0.19;
            assert!((moved[axis] - expected).abs() < 1.0e-4);
        }
    }

    #[test]
    fn forming_never_overshoots() {
        let clock = ManualClock::new(0.0);
        let mut field =
            ParticleField::new(AvatarConfig::with_count(40).seeded(2), clock.clone()).unwrap();
        field.form_avatar(60_000);

        let mut last_gap: Vec<f32> = gaps(&field);
        for _ in 0..120 {
            clock.advance(16.0);
            field.update();
            let gap = gaps(&field);
            for (now, before) in gap.iter().zip(&last_gap) {
                assert!(*now <= *before + 1.0e-5);
            }
            last_gap = gap;
        }
    }

    fn gaps(field: &ParticleField<ManualClock>) -> Vec<f32> {
        field
            .positions()
            .iter()
            .zip(field.target_positions())
            .map(|(p, t)| {
                let d = [t[0] - p[0], t[1] - p[1], t[2] - p[2]];
                (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
            })
            .collect()
    }
}
