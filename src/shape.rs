use std::f32::consts::{FRAC_PI_2, PI, TAU};

use rand::Rng;

use crate::math::centered_unit;

pub const CENTER_FRACTION: f32 = 0.25;
pub const SHAPE_MIN_RADIUS: f32 = 2.0;
pub const SHAPE_MAX_RADIUS: f32 = 6.0;
pub const SHAPE_MAX_ECCENTRICITY: f32 = 0.8;
pub const ORBIT_MAX_SPEED: f32 = 0.02;
pub const ORBIT_OFFSET_XY: f32 = 1.0;
pub const ORBIT_OFFSET_Z: f32 = 0.5;

/// Harmonic amplitudes of the settled silhouette (3-, 5-, 7-lobe).
pub const SHAPE_HARMONICS: [f32; 3] = [0.3, 0.2, 0.1];
/// Harmonic amplitudes of the live orbit.
pub const ORBIT_HARMONICS: [f32; 3] = [0.2, 0.15, 0.1];
/// Phase rate of each orbit harmonic relative to the pulse clock.
pub const ORBIT_HARMONIC_PHASE: [f32; 3] = [1.0, 1.5, 2.0];

pub fn center_count(count: usize) -> usize {
    (count as f32 * CENTER_FRACTION).floor() as usize
}

/// Classical orbital elements drawn per shape particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitalElements {
    pub base_radius: f32,
    pub eccentricity: f32,
    pub inclination: f32,
    pub longitude_of_ascending_node: f32,
    pub argument_of_periapsis: f32,
    pub angle: f32,
}

impl OrbitalElements {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            base_radius: SHAPE_MIN_RADIUS
                + rng.random::<f32>() * (SHAPE_MAX_RADIUS - SHAPE_MIN_RADIUS),
            eccentricity: rng.random::<f32>() * SHAPE_MAX_ECCENTRICITY,
            inclination: centered_unit(rng.random::<f32>(), FRAC_PI_2),
            longitude_of_ascending_node: rng.random::<f32>() * TAU,
            argument_of_periapsis: rng.random::<f32>() * TAU,
            angle: rng.random::<f32>() * TAU,
        }
    }

    pub fn position(&self) -> [f32; 3] {
        let radius = harmonic_radius(
            self.base_radius,
            self.eccentricity,
            self.angle,
            SHAPE_HARMONICS,
            [0.0; 3],
        );
        rotate_from_orbital_plane(
            radius * self.angle.cos(),
            radius * self.angle.sin(),
            self.argument_of_periapsis,
            self.inclination,
            self.longitude_of_ascending_node,
        )
    }
}

/// Ellipse radius perturbed by odd harmonics so no orbit is a smooth ring.
pub fn harmonic_radius(
    base_radius: f32,
    eccentricity: f32,
    angle: f32,
    amplitudes: [f32; 3],
    phases: [f32; 3],
) -> f32 {
    base_radius
        * (1.0 + eccentricity * angle.cos())
        * (1.0 + amplitudes[0] * (3.0 * angle + phases[0]).sin())
        * (1.0 + amplitudes[1] * (5.0 * angle + phases[1]).sin())
        * (1.0 + amplitudes[2] * (7.0 * angle + phases[2]).sin())
}

/// Rotates an in-plane point by periapsis, then inclination, then ascending node.
pub fn rotate_from_orbital_plane(
    x: f32,
    y: f32,
    argument_of_periapsis: f32,
    inclination: f32,
    longitude_of_ascending_node: f32,
) -> [f32; 3] {
    let (sin_aop, cos_aop) = argument_of_periapsis.sin_cos();
    let (sin_inc, cos_inc) = inclination.sin_cos();
    let (sin_lan, cos_lan) = longitude_of_ascending_node.sin_cos();

    [
        x * (cos_aop * cos_lan - sin_aop * sin_lan * cos_inc)
            - y * (sin_aop * cos_lan + cos_aop * sin_lan * cos_inc),
        x * (cos_aop * sin_lan + sin_aop * cos_lan * cos_inc)
            + y * (cos_aop * cos_lan * cos_inc - sin_aop * sin_lan),
        x * (sin_aop * sin_inc) + y * (cos_aop * sin_inc),
    ]
}

/// Target silhouette: center particles rest at the origin, the rest sit on
/// randomly oriented perturbed ellipses.
pub fn generate_avatar_shape<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<[f32; 3]> {
    let centers = center_count(count);
    let mut targets = vec![[0.0; 3]; count];
    for target in targets.iter_mut().skip(centers) {
        *target = OrbitalElements::sample(rng).position();
    }
    targets
}

pub fn golden_angle() -> f32 {
    PI * (3.0 - 5.0f32.sqrt())
}

/// Unit-sphere latitude, ring radius and azimuth of point `i` of `n` in the
/// equal-area golden-angle distribution.
pub fn golden_sphere_coords(i: usize, n: usize) -> (f32, f32, f32) {
    debug_assert!(n >= 2, "golden sphere needs at least two points");
    let y = 1.0 - (i as f32 / (n - 1) as f32) * 2.0;
    let radius_at_y = (1.0 - y * y).max(0.0).sqrt();
    let theta = golden_angle() * i as f32;
    (y, radius_at_y, theta)
}

pub fn golden_sphere_point(i: usize, n: usize, radius: f32) -> [f32; 3] {
    let (y, radius_at_y, theta) = golden_sphere_coords(i, n);
    [
        radius_at_y * theta.cos() * radius,
        y * radius,
        radius_at_y * theta.sin() * radius,
    ]
}

pub fn center_sphere(n: usize, radius: f32) -> Vec<[f32; 3]> {
    (0..n).map(|i| golden_sphere_point(i, n, radius)).collect()
}

/// Per-particle orbit parameters, drawn once and never regenerated.
pub struct OrbitParams {
    pub angles: Vec<f32>,
    pub speeds: Vec<f32>,
    pub radii: Vec<f32>,
    pub offsets: Vec<[f32; 3]>,
}

impl OrbitParams {
    pub fn sample<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut params = Self {
            angles: Vec::with_capacity(count),
            speeds: Vec::with_capacity(count),
            radii: Vec::with_capacity(count),
            offsets: Vec::with_capacity(count),
        };
        for _ in 0..count {
            params.angles.push(rng.random::<f32>() * TAU);
            params
                .speeds
                .push(centered_unit(rng.random::<f32>(), ORBIT_MAX_SPEED));
            params.radii.push(
                SHAPE_MIN_RADIUS + rng.random::<f32>() * (SHAPE_MAX_RADIUS - SHAPE_MIN_RADIUS),
            );
            params.offsets.push([
                centered_unit(rng.random::<f32>(), ORBIT_OFFSET_XY),
                centered_unit(rng.random::<f32>(), ORBIT_OFFSET_XY),
                centered_unit(rng.random::<f32>(), ORBIT_OFFSET_Z),
            ]);
        }
        params
    }

    pub fn advance(&mut self) {
        for (angle, speed) in self.angles.iter_mut().zip(&self.speeds) {
            *angle += *speed;
        }
    }

    pub(crate) fn release(&mut self) {
        self.angles = Vec::new();
        self.speeds = Vec::new();
        self.radii = Vec::new();
        self.offsets = Vec::new();
    }
}
