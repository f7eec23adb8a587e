//! Fast math: interpolation, easing and sampling for the orbital scene.
//!
//! ## Interpolation
//! `lerp(a, b, t) = a + t * (b - a)`, folded into a single FMA.
//! The per-frame camera blend and the hover scale both go through it.
//!
//! ## Easing
//! Cubic ease-out drives the intro flight; ease-in-out and elastic are kept
//! for tweens that want a softer or springier feel.
//!
//! ## Sampling
//! Random helpers take the generator explicitly so tests can seed it.

use std::f32::consts::{PI, TAU};

use rand::Rng;

/// A point or direction in world space `[x, y, z]`.
pub type Vec3 = [f32; 3];

/// Pre-computed reciprocals for the divisors the scene math uses.
pub struct Reciprocals {
    pub inv_255: f32,
    pub inv_3: f32,
}

pub const RECIPROCALS: Reciprocals = Reciprocals {
    inv_255: 1.0 / 255.0,
    inv_3: 1.0 / 3.0,
};

/// Fused Multiply-Add: a * b + c
#[inline(always)]
pub fn fma(a: f32, b: f32, c: f32) -> f32 {
    a.mul_add(b, c)
}

/// Linear interpolation using FMA for precision.
/// lerp(a, b, t) = a + t * (b - a) = fma(t, b-a, a)
#[inline(always)]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    fma(t, b - a, a)
}

/// Component-wise lerp of two points.
#[inline]
pub fn lerp3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

#[inline]
pub fn add3(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub3(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale3(a: Vec3, s: f32) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot3(a: Vec3, b: Vec3) -> f32 {
    fma(a[0], b[0], fma(a[1], b[1], a[2] * b[2]))
}

#[inline]
pub fn cross3(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn length3(a: Vec3) -> f32 {
    dot3(a, a).sqrt()
}

/// Normalize; vectors shorter than 1e-6 come back unchanged.
#[inline]
pub fn normalize3(a: Vec3) -> Vec3 {
    let len = length3(a);
    if len < 1e-6 {
        return a;
    }
    scale3(a, 1.0 / len)
}

/// Euclidean distance between two points.
#[inline]
pub fn distance3(a: Vec3, b: Vec3) -> f32 {
    length3(sub3(a, b))
}

// ── Easing ──

/// Cubic ease-out: fast start, gentle landing.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Cubic ease-in-out.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
    }
}

/// Elastic ease-out; overshoots and settles at 1.
pub fn ease_out_elastic(t: f32) -> f32 {
    const C4: f32 = TAU * RECIPROCALS.inv_3;
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * C4).sin() + 1.0
}

// ── Sampling ──

/// Uniform value in `[min, max)`. Returns `min` for an empty range.
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen::<f32>() * (max - min) + min
}

/// `1.0` or `-1.0` with equal probability.
pub fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.gen::<f32>() > 0.5 {
        1.0
    } else {
        -1.0
    }
}

/// Uniformly distributed point inside a sphere of `radius` centered at the origin.
///
/// Cube-root radius keeps the density uniform in volume rather than
/// clustering toward the center.
pub fn random_point_in_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = rng.gen::<f32>() * 2.0 * PI;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let r = rng.gen::<f32>().cbrt() * radius;

    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    [
        r * sin_phi * cos_theta,
        r * sin_phi * sin_theta,
        r * cos_phi,
    ]
}
