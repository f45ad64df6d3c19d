//! The portrait camera controller: the legal built-in camera, the free camera the UI edits, and the
//! reconciliation between the two.

use bevy_app::prelude::*;
use bevy_window::RequestRedraw;

pub mod builtin;
pub mod commands;
pub mod component;
pub mod custom;
pub mod host;
pub mod limits;
pub mod reconcile;
pub mod zoom;

/// Adds [`CameraController`](component::CameraController) syncing and the
/// [`PortraitCamCommand`](commands::PortraitCamCommand) event.
pub struct PortraitCamPlugin;

impl Plugin for PortraitCamPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<commands::PortraitCamCommand>()
            .add_event::<RequestRedraw>()
            .add_systems(Update, component::CameraController::sync_with_host)
            .register_type::<component::CameraController>()
            .register_type::<limits::CameraLimits>()
            .register_type::<host::PortraitPose>();
    }
}
