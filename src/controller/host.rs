//! The boundary with the portrait editor that owns the live camera pose.

use bevy_ecs::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

/// Working units per editor unit. The controller and [`CameraLimits`](super::limits::CameraLimits)
/// work in editor units multiplied by this.
pub const SCALE: f32 = 100.0;

/// The portrait camera as the editor stores it, in editor units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct PortraitPose {
    /// Camera position. Derived by the editor; written back for its benefit only.
    pub camera_position: Vec3,
    /// The pivot the camera faces.
    pub camera_target: Vec3,
    /// Latitude of the camera around the pivot, in radians.
    pub pitch: f32,
    /// Longitude of the camera around the pivot, in radians.
    pub yaw: f32,
    /// Distance from the pivot to the camera.
    pub distance: f32,
    /// Zoom slider value.
    pub zoom: u8,
}

impl PortraitPose {
    /// All fields are finite.
    pub fn is_finite(&self) -> bool {
        self.camera_position.is_finite()
            && self.camera_target.is_finite()
            && self.pitch.is_finite()
            && self.yaw.is_finite()
            && self.distance.is_finite()
    }
}

/// Read and write access to the editor's live camera pose.
///
/// Implemented by whatever owns the editor; the controller never touches its memory directly.
pub trait PortraitHost: Send + Sync + 'static {
    /// The current pose, or `None` if the editor is not open or not ready to be edited. The
    /// controller skips the frame in that case.
    fn read_pose(&self) -> Option<PortraitPose>;

    /// Apply a new pose to the editor.
    fn write_pose(&mut self, pose: &PortraitPose);

    /// Where the character being framed is, in editor units, if known.
    fn subject_position(&self) -> Option<Vec3> {
        None
    }
}

/// Connects a [`CameraController`](super::component::CameraController) to the editor it drives.
#[derive(Component)]
pub struct PortraitLink {
    host: Box<dyn PortraitHost>,
}

impl PortraitLink {
    /// Link to `host`.
    pub fn new(host: impl PortraitHost) -> Self {
        Self {
            host: Box::new(host),
        }
    }

    /// The linked host.
    pub fn host(&self) -> &dyn PortraitHost {
        self.host.as_ref()
    }

    /// The linked host, mutably.
    pub fn host_mut(&mut self) -> &mut dyn PortraitHost {
        self.host.as_mut()
    }
}

impl std::fmt::Debug for PortraitLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortraitLink")
            .field("host", &"<host>")
            .finish()
    }
}
