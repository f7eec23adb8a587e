//! Orbital placement and the secondary motions of the workspace scene.
//!
//! Transforms identities and elapsed time into world-space positions.
//! - Orbit: employee cards revolve on a ring around the origin
//! - Task layout: sticky notes fan out on a ring around the focused card
//! - Floating / spawn / sway / hover: small per-frame offsets and scales
//! - Progress tier: card accent color from an employee's completion ratio

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::color::{palette, Rgba};
use crate::fast_math::{add3, lerp, Vec3};

/// Radius of the employee ring.
pub const ORBIT_RADIUS: f32 = 6.0;
/// Angular speed of the ring in radians per second.
pub const ORBIT_SPEED: f32 = 0.2;
/// Radius of the sticky-note ring around a focused employee.
pub const TASK_RING_RADIUS: f32 = 3.0;
/// Scale a hovered card or note grows toward.
pub const HOVER_SCALE: f32 = 1.1;
const HOVER_BLEND: f32 = 0.1;

/// Position of employee `id` on the orbit ring at `elapsed` seconds.
///
/// Employees are spaced a quarter turn apart by id, so ids 0 and 4 share a slot.
pub fn orbital_position(id: u32, elapsed: f32) -> Vec3 {
    let angle = elapsed * ORBIT_SPEED + id as f32 * FRAC_PI_2;
    [ORBIT_RADIUS * angle.cos(), 0.0, ORBIT_RADIUS * angle.sin()]
}

/// Position of the `index`-th of `count` task notes around `center`.
pub fn task_note_position(center: Vec3, index: usize, count: usize) -> Vec3 {
    if count == 0 {
        return center;
    }
    let angle = index as f32 / count as f32 * TAU;
    add3(
        center,
        [
            TASK_RING_RADIUS * angle.cos(),
            (index as f32 * 0.5).sin() * 0.5,
            TASK_RING_RADIUS * angle.sin(),
        ],
    )
}

/// Vertical bob of a note, phase-shifted by index.
pub fn note_float_offset(index: usize, t: f32) -> f32 {
    (t + index as f32).sin() * 0.1
}

/// Pop-in scale of a note, staggered 0.1 s per index.
pub fn note_spawn_scale(index: usize, t: f32) -> f32 {
    ((t - index as f32 * 0.1) * 2.0).clamp(0.0, 1.0)
}

/// Slow yaw sway of an employee card, in radians.
pub fn card_sway(t: f32) -> f32 {
    (t * 0.3).sin() * 0.05
}

/// One frame of the hover scale blend.
pub fn hover_scale_step(current: f32, hovered: bool) -> f32 {
    let target = if hovered { HOVER_SCALE } else { 1.0 };
    lerp(current, target, HOVER_BLEND)
}

/// Sine-wave vertical drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingAnimation {
    pub amplitude: f32,
    pub frequency: f32,
}

impl Default for FloatingAnimation {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            frequency: 1.0,
        }
    }
}

impl FloatingAnimation {
    pub fn offset(&self, t: f32) -> f32 {
        (t * self.frequency).sin() * self.amplitude
    }

    pub fn apply(&self, base: Vec3, t: f32) -> Vec3 {
        [base[0], base[1] + self.offset(t), base[2]]
    }
}

/// Pulsing glow intensity in `[0, intensity]`.
pub fn glow_pulse(intensity: f32, frequency: f32, t: f32) -> f32 {
    intensity * (0.5 + 0.5 * (t * frequency).sin())
}

/// Completion band of an employee, shown as the card's progress color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTier {
    High,
    Medium,
    Low,
}

impl ProgressTier {
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio >= 0.8 {
            Self::High
        } else if ratio >= 0.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn color(self) -> Rgba {
        match self {
            Self::High => palette::COMPLETED,
            Self::Medium => palette::PENDING,
            Self::Low => palette::LAGGING,
        }
    }
}
