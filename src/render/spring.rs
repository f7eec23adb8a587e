//! Damped harmonic oscillator used to ease scalars and points toward a target.
//!
//! Integration is semi-implicit Euler:
//! ```text
//! a = (-tension * (x - target) - friction * v) / mass
//! v += a * dt
//! x += v * dt
//! ```

use crate::fast_math::{fma, Vec3};

/// Values a [`Spring`] can animate.
pub trait SpringValue: Copy {
    fn zero() -> Self;
    /// `self + other * k`
    fn add_scaled(self, other: Self, k: f32) -> Self;
    fn sub(self, other: Self) -> Self;
    /// Largest absolute component.
    fn magnitude(self) -> f32;
}

impl SpringValue for f32 {
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn add_scaled(self, other: Self, k: f32) -> Self {
        fma(other, k, self)
    }

    fn sub(self, other: Self) -> Self {
        self - other
    }

    fn magnitude(self) -> f32 {
        self.abs()
    }
}

impl SpringValue for Vec3 {
    fn zero() -> Self {
        [0.0; 3]
    }

    #[inline]
    fn add_scaled(self, other: Self, k: f32) -> Self {
        [
            fma(other[0], k, self[0]),
            fma(other[1], k, self[1]),
            fma(other[2], k, self[2]),
        ]
    }

    fn sub(self, other: Self) -> Self {
        [self[0] - other[0], self[1] - other[1], self[2] - other[2]]
    }

    fn magnitude(self) -> f32 {
        self[0].abs().max(self[1].abs()).max(self[2].abs())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub tension: f32,
    pub friction: f32,
    pub mass: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            tension: 100.0,
            friction: 10.0,
            mass: 1.0,
        }
    }
}

/// Threshold under which both velocity and displacement count as settled.
pub const REST_THRESHOLD: f32 = 0.001;

#[derive(Debug, Clone, Copy)]
pub struct Spring<T: SpringValue> {
    pub value: T,
    pub velocity: T,
    pub target: T,
    pub config: SpringConfig,
}

impl<T: SpringValue> Spring<T> {
    /// A spring resting at `value`.
    pub fn new(value: T) -> Self {
        Self::with_config(value, SpringConfig::default())
    }

    pub fn with_config(value: T, config: SpringConfig) -> Self {
        Self {
            value,
            velocity: T::zero(),
            target: value,
            config,
        }
    }

    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    /// Advance by `dt` seconds and return the new value.
    pub fn update(&mut self, dt: f32) -> T {
        let SpringConfig { tension, friction, mass } = self.config;
        let displacement = self.value.sub(self.target);
        let accel = T::zero()
            .add_scaled(displacement, -tension / mass)
            .add_scaled(self.velocity, -friction / mass);
        self.velocity = self.velocity.add_scaled(accel, dt);
        self.value = self.value.add_scaled(self.velocity, dt);
        self.value
    }

    pub fn is_at_rest(&self) -> bool {
        self.is_at_rest_within(REST_THRESHOLD)
    }

    pub fn is_at_rest_within(&self, threshold: f32) -> bool {
        self.velocity.magnitude() < threshold
            && self.value.sub(self.target).magnitude() < threshold
    }

    /// Jump to the target and stop.
    pub fn snap(&mut self) {
        self.value = self.target;
        self.velocity = T::zero();
    }
}
