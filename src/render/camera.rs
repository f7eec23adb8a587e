//! Camera rig for the workspace view.
//!
//! Owns the eye position and look-at target between frames:
//! - one-shot intro flight from high above down to the resting view
//! - per-frame blend toward the store's camera fields while an employee is selected
//! - blend back to the default view once the selection clears
//! - orbit / dolly / pan controls and idle auto-rotation
//!
//! The rig never writes to the store; the viewer feeds it the selection each frame.

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::fast_math::{
    add3, cross3, distance3, dot3, ease_out_cubic, length3, lerp3, normalize3, scale3, sub3, Vec3,
};
use crate::store::{DEFAULT_CAMERA_POSITION, DEFAULT_CAMERA_TARGET};

pub const INTRO_START: Vec3 = [0.0, 20.0, 20.0];
pub const INTRO_DURATION: f32 = 3.0;

/// Per-frame blend factor toward a selected employee.
pub const SELECTION_BLEND: f32 = 0.05;
/// Per-frame blend factor back to the default view.
pub const RETURN_BLEND: f32 = 0.1;

pub const MIN_DISTANCE: f32 = 3.0;
pub const MAX_DISTANCE: f32 = 50.0;
const MIN_POLAR: f32 = 0.01;
const MAX_POLAR: f32 = FRAC_PI_2;

/// Idle rotation, 0.5 "speed units" of 2π/60 rad/s each.
pub const AUTO_ROTATE_SPEED: f32 = TAU / 60.0 * 0.5;

/// Vertical field of view in degrees.
pub const FOV_Y_DEG: f32 = 50.0;
const NEAR: f32 = 0.1;
const SETTLE_EPSILON: f32 = 1e-3;

// ── Intro flight ──

/// One-shot descent from [`INTRO_START`] to the default view.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntroFlight {
    elapsed: f32,
}

impl IntroFlight {
    pub fn progress(&self) -> f32 {
        (self.elapsed / INTRO_DURATION).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Camera position at the current progress.
    pub fn position(&self) -> Vec3 {
        lerp3(INTRO_START, DEFAULT_CAMERA_POSITION, ease_out_cubic(self.progress()))
    }

    /// Advance by `dt`; returns true once the flight has landed.
    pub fn step(&mut self, dt: f32) -> bool {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(INTRO_DURATION);
        self.is_complete()
    }
}

// ── Rig ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Intro,
    Following,
    Returning,
    Idle,
}

#[derive(Debug, Clone)]
pub struct CameraRig {
    pub position: Vec3,
    pub target: Vec3,
    intro: IntroFlight,
    phase: Phase,
    pub auto_rotate: bool,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            position: INTRO_START,
            target: DEFAULT_CAMERA_TARGET,
            intro: IntroFlight::default(),
            phase: Phase::Intro,
            auto_rotate: true,
        }
    }

    /// A rig that skips the intro and rests at the default view.
    pub fn settled() -> Self {
        let mut rig = Self::new();
        rig.intro.step(INTRO_DURATION);
        rig.position = DEFAULT_CAMERA_POSITION;
        rig.phase = Phase::Idle;
        rig
    }

    pub fn intro(&self) -> &IntroFlight {
        &self.intro
    }

    /// User controls are locked during the intro flight.
    pub fn controls_enabled(&self) -> bool {
        self.phase != Phase::Intro
    }

    pub fn is_returning(&self) -> bool {
        self.phase == Phase::Returning
    }

    /// Advance one frame.
    ///
    /// `focus` is the store's `(camera_target, camera_position)` while an
    /// employee is selected, `None` otherwise.
    pub fn update(&mut self, dt: f32, focus: Option<(Vec3, Vec3)>) {
        if self.phase == Phase::Intro {
            let landed = self.intro.step(dt);
            self.position = self.intro.position();
            self.target = DEFAULT_CAMERA_TARGET;
            if landed {
                log::debug!("Intro flight complete");
                self.phase = Phase::Idle;
            }
            return;
        }

        match focus {
            Some((target, position)) => {
                self.position = lerp3(self.position, position, SELECTION_BLEND);
                self.target = lerp3(self.target, target, SELECTION_BLEND);
                self.phase = Phase::Following;
            }
            None => {
                if self.phase == Phase::Following {
                    self.phase = Phase::Returning;
                }
                if self.phase == Phase::Returning {
                    self.position = lerp3(self.position, DEFAULT_CAMERA_POSITION, RETURN_BLEND);
                    self.target = lerp3(self.target, DEFAULT_CAMERA_TARGET, RETURN_BLEND);
                    if distance3(self.position, DEFAULT_CAMERA_POSITION) < SETTLE_EPSILON
                        && distance3(self.target, DEFAULT_CAMERA_TARGET) < SETTLE_EPSILON
                    {
                        self.position = DEFAULT_CAMERA_POSITION;
                        self.target = DEFAULT_CAMERA_TARGET;
                        self.phase = Phase::Idle;
                    }
                } else if self.auto_rotate {
                    self.rotate(AUTO_ROTATE_SPEED * dt, 0.0);
                }
            }
        }
    }

    /// Distance from eye to look-at point.
    pub fn distance(&self) -> f32 {
        distance3(self.position, self.target)
    }

    /// Drag rotation. Returns false while controls are locked.
    pub fn orbit(&mut self, d_azimuth: f32, d_polar: f32) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        self.interrupt_return();
        self.rotate(d_azimuth, d_polar);
        true
    }

    /// Scroll zoom: scales the eye distance by `factor`, clamped to [3, 50].
    pub fn dolly(&mut self, factor: f32) -> bool {
        if !self.controls_enabled() || factor <= 0.0 {
            return false;
        }
        self.interrupt_return();
        let offset = sub3(self.position, self.target);
        let dist = length3(offset);
        if dist < 1e-6 {
            return false;
        }
        let new_dist = (dist * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.position = add3(self.target, scale3(offset, new_dist / dist));
        true
    }

    /// Screen-space pan; moves eye and target together in world units.
    pub fn pan(&mut self, right: f32, up: f32) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        self.interrupt_return();
        let basis = ViewBasis::look_at(self.position, self.target, FOV_Y_DEG);
        let shift = add3(scale3(basis.right, right), scale3(basis.up, up));
        self.position = add3(self.position, shift);
        self.target = add3(self.target, shift);
        true
    }

    fn interrupt_return(&mut self) {
        if self.phase == Phase::Returning {
            self.phase = Phase::Idle;
        }
    }

    fn rotate(&mut self, d_azimuth: f32, d_polar: f32) {
        let offset = sub3(self.position, self.target);
        let radius = length3(offset);
        if radius < 1e-6 {
            return;
        }
        let polar = (offset[1] / radius).clamp(-1.0, 1.0).acos();
        let azimuth = offset[0].atan2(offset[2]);

        let polar = (polar + d_polar).clamp(MIN_POLAR, MAX_POLAR);
        let azimuth = azimuth + d_azimuth;
        let ring = radius * polar.sin();
        self.position = add3(
            self.target,
            [ring * azimuth.sin(), radius * polar.cos(), ring * azimuth.cos()],
        );
    }

    pub fn view(&self, aspect: f32) -> ViewBasis {
        ViewBasis::look_at(self.position, self.target, FOV_Y_DEG).with_aspect(aspect)
    }
}

// ── Projection ──

/// Orthonormal camera frame plus perspective parameters.
#[derive(Debug, Clone, Copy)]
pub struct ViewBasis {
    pub origin: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    fov_factor: f32,
    aspect: f32,
}

/// A world point mapped to normalized viewport coordinates.
///
/// `x`, `y` are in [-1, 1] inside the view (y up). `scale` converts world
/// units at that depth to the same normalized units, vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
    pub scale: f32,
}

impl ViewBasis {
    pub fn look_at(eye: Vec3, target: Vec3, fov_deg: f32) -> Self {
        let forward = normalize3(sub3(target, eye));
        let mut right = normalize3(cross3(forward, [0.0, 1.0, 0.0]));
        if length3(right) < 1e-6 {
            right = [1.0, 0.0, 0.0];
        }
        let up = cross3(right, forward);
        Self {
            origin: eye,
            forward,
            right,
            up,
            fov_factor: (fov_deg.to_radians() * 0.5).tan(),
            aspect: 1.0,
        }
    }

    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect.max(1e-3);
        self
    }

    /// `None` for points behind (or too close to) the eye.
    pub fn project(&self, p: Vec3) -> Option<Projected> {
        let d = sub3(p, self.origin);
        let depth = dot3(d, self.forward);
        if depth < NEAR {
            return None;
        }
        let half_h = depth * self.fov_factor;
        Some(Projected {
            x: dot3(d, self.right) / (half_h * self.aspect),
            y: dot3(d, self.up) / half_h,
            depth,
            scale: 1.0 / half_h,
        })
    }
}
