//! Provides [`PortraitCamCommand`], the event the UI sends to edit the camera.

use bevy_ecs::prelude::*;
use bevy_math::prelude::*;

use super::component::CameraController;

/// An edit to apply to a camera. Positions are in working units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    /// See [`CameraController::set_camera_position_xz`].
    SetCameraXZ {
        /// New camera position on the ground plane.
        position: Vec2,
        /// Orbit the target instead of changing the camera's distance from it.
        preserve_distance: bool,
    },
    /// See [`CameraController::set_target_position_xz`].
    SetTargetXZ {
        /// New target position on the ground plane.
        position: Vec2,
        /// Swing the target around the camera instead of changing its distance.
        preserve_distance: bool,
    },
    /// See [`CameraController::set_pivot_position_xz`].
    SetPivotXZ(Vec2),
    /// See [`CameraController::set_pivot_position_y`].
    SetPivotY(f32),
    /// See [`CameraController::set_camera_pitch`].
    SetPitch(f32),
    /// See [`CameraController::translate`].
    Translate(Vec3),
    /// See [`CameraController::rotate_everything`].
    Rotate(f32),
    /// See [`CameraController::orbit`].
    Orbit(Vec2),
    /// See [`CameraController::pan_view`].
    Pan(Vec2),
    /// See [`CameraController::adjust_camera_distance`].
    AdjustDistance(f32),
    /// See [`CameraController::set_zoom`].
    SetZoom(u8),
    /// See [`CameraController::set_focal_length`].
    SetFocalLength {
        /// Full-frame focal length in millimetres.
        focal_length: f32,
        /// Move the camera to keep the framing.
        compensate: bool,
    },
    /// See [`CameraController::set_subject_position`].
    SetSubject(Vec3),
    /// See [`CameraController::face_subject`].
    FaceSubject,
}

/// Send this event to edit a camera. Commands are applied in the order they were sent, the next
/// time the camera is synced with its host.
#[derive(Debug, Clone, Copy, Event)]
pub struct PortraitCamCommand {
    /// The camera to edit.
    pub camera: Entity,
    /// The edit.
    pub command: CameraCommand,
}

impl PortraitCamCommand {
    /// Address `command` to `camera`.
    pub fn new(camera: Entity, command: CameraCommand) -> Self {
        Self { camera, command }
    }
}

impl CameraController {
    /// Apply a single command, returning whether the built-in camera visibly changed.
    pub fn apply(&mut self, command: CameraCommand) -> bool {
        match command {
            CameraCommand::SetCameraXZ {
                position,
                preserve_distance,
            } => self.set_camera_position_xz(position, preserve_distance),
            CameraCommand::SetTargetXZ {
                position,
                preserve_distance,
            } => self.set_target_position_xz(position, preserve_distance),
            CameraCommand::SetPivotXZ(xz) => self.set_pivot_position_xz(xz),
            CameraCommand::SetPivotY(y) => self.set_pivot_position_y(y),
            CameraCommand::SetPitch(pitch) => self.set_camera_pitch(pitch),
            CameraCommand::Translate(delta) => self.translate(delta),
            CameraCommand::Rotate(angle) => self.rotate_everything(angle),
            CameraCommand::Orbit(delta) => self.orbit(delta),
            CameraCommand::Pan(delta) => self.pan_view(delta),
            CameraCommand::AdjustDistance(delta) => self.adjust_camera_distance(delta),
            CameraCommand::SetZoom(zoom) => self.set_zoom(zoom),
            CameraCommand::SetFocalLength {
                focal_length,
                compensate,
            } => self.set_focal_length(focal_length, compensate),
            CameraCommand::SetSubject(subject) => {
                self.set_subject_position(subject);
                false
            }
            CameraCommand::FaceSubject => self.face_subject(),
        }
    }
}
