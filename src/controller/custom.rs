//! Provides [`FreeCamera`], the camera as the top-down editing UI thinks of it.

use core::f32::consts::FRAC_PI_2;

use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

use super::limits::CameraLimits;
use crate::math::{sphere::SphereDirection, ToGround};

/// A camera with a position, a pitch, and a target point on the ground plane.
///
/// Along with position and orientation this tracks a target somewhere along the line of sight, so
/// dragging either the camera or the target in the top-down view has an obvious meaning. There is
/// no notion of legality here; [`reconcile`](super::reconcile::reconcile) maps this onto the
/// nearest legal [`ConstrainedCamera`](super::builtin::ConstrainedCamera).
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct FreeCamera {
    camera: Vec3,
    target_xz: Vec2,
    pitch: f32,
    target_min: Vec2,
    target_max: Vec2,
}

impl Default for FreeCamera {
    fn default() -> Self {
        Self::new(&CameraLimits::default())
    }
}

impl FreeCamera {
    /// A camera at the origin with its target soft-limited to the
    /// [target envelope](CameraLimits::target_envelope).
    pub fn new(limits: &CameraLimits) -> Self {
        let envelope = limits.target_envelope();
        Self {
            camera: Vec3::ZERO,
            target_xz: Vec2::ZERO,
            pitch: 0.0,
            target_min: envelope.min,
            target_max: envelope.max,
        }
    }

    /// Camera position.
    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    /// Camera position on the ground plane.
    pub fn camera_xz(&self) -> Vec2 {
        self.camera.to_xz()
    }

    /// Target position on the ground plane.
    pub fn target_xz(&self) -> Vec2 {
        self.target_xz
    }

    /// Camera pitch in radians, positive looking up.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Ground-plane distance between camera and target.
    pub fn distance_xz(&self) -> f32 {
        self.camera_xz().distance(self.target_xz)
    }

    /// Bearing of the camera *from* the target, as a portrait longitude.
    pub fn yaw(&self) -> f32 {
        let d = self.target_xz - self.camera_xz();
        -d.y.atan2(d.x) - FRAC_PI_2
    }

    /// The target's height, found by following the line of sight forward at the current pitch.
    pub fn target_y(&self) -> f32 {
        self.camera.y + self.distance_xz() * self.pitch.tan()
    }

    /// The target in 3D.
    pub fn target(&self) -> Vec3 {
        Vec3::new(self.target_xz.x, self.target_y(), self.target_xz.y)
    }

    /// Direction from the target back to the camera.
    pub fn direction(&self) -> SphereDirection {
        SphereDirection::from_radians(self.pitch, self.yaw())
    }

    /// Move the camera. Unconstrained.
    pub fn set_camera(&mut self, camera: Vec3) {
        self.camera = camera;
    }

    /// Set the pitch. Unconstrained.
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
    }

    /// Move the target, clamped to the envelope. Non-finite input is ignored.
    pub fn set_target_xz(&mut self, target_xz: Vec2) {
        if !target_xz.is_finite() {
            warn_once!("Ignoring non-finite camera target {target_xz:?}");
            return;
        }
        self.target_xz = target_xz.clamp(self.target_min, self.target_max);
    }

    /// Place the target `distance_xz` in front of the camera, facing along the antipode of `yaw`.
    pub fn place_target(&mut self, yaw: f32, distance_xz: f32) {
        // Yaw 0 puts the camera on +Z of its target, so the target lies towards -Z.
        let (s, c) = (-yaw - FRAC_PI_2).sin_cos();
        self.set_target_xz(self.camera_xz() + distance_xz * Vec2::new(c, s));
    }

    /// Turn the target around the camera to face along `yaw`, keeping its ground-plane distance.
    pub fn set_target_via_yaw(&mut self, yaw: f32) {
        self.place_target(yaw, self.distance_xz());
    }

    /// Move the camera by `delta` and the target by its ground-plane part.
    pub fn translate(&mut self, delta: Vec3) {
        self.camera += delta;
        self.set_target_xz(self.target_xz + delta.to_xz());
    }
}
