/// Display refresh the per-frame ease rate was tuned against.
pub const REFERENCE_FRAME_MS: f64 = 1_000.0 / 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EaseMode {
    /// Fixed fraction of the remaining distance per update call.
    PerFrame,
    /// Same decay expressed per reference frame of elapsed wall-clock time.
    TimeScaled,
}

impl EaseMode {
    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => Self::TimeScaled,
            _ => Self::PerFrame,
        }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            Self::PerFrame => 0,
            Self::TimeScaled => 1,
        }
    }
}

/// Fraction of the remaining distance to cover this update.
pub fn ease_factor(mode: EaseMode, rate: f32, dt_ms: f64) -> f32 {
    match mode {
        EaseMode::PerFrame => rate,
        EaseMode::TimeScaled => {
            let frames = (dt_ms / REFERENCE_FRAME_MS).max(0.0);
            let remaining = f64::from(1.0 - rate).powf(frames);
            (1.0 - remaining).clamp(0.0, 1.0) as f32
        }
    }
}

pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn lerp3(from: [f32; 3], to: [f32; 3], t: f32) -> [f32; 3] {
    [
        from[0] * (1.0 - t) + to[0] * t,
        from[1] * (1.0 - t) + to[1] * t,
        from[2] * (1.0 - t) + to[2] * t,
    ]
}

/// Uniform draw in `[-half_extent, half_extent)`, written as
/// `(random - 0.5) * 2 * half_extent`.
pub fn centered_unit(random: f32, half_extent: f32) -> f32 {
    (random - 0.5) * 2.0 * half_extent
}
