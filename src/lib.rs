#![warn(missing_docs)]

//! A constrained camera controller for a portrait editor.
//!
//! The editor's camera orbits a pivot that has to stay inside a box, at a bounded distance and
//! pitch. That is awkward to edit directly, so this crate lets a top-down UI move a free camera and
//! its target around, and maps every edit back onto the nearest camera the editor will accept.
//!
//! Add [`DefaultPortraitCamPlugins`], spawn a [`CameraController`](prelude::CameraController)
//! with a [`PortraitLink`](prelude::PortraitLink) to the editor, and send
//! [`PortraitCamCommand`](prelude::PortraitCamCommand)s.

use bevy_app::{PluginGroup, PluginGroupBuilder};

pub mod controller;
pub mod extensions;
pub mod math;

/// Common imports.
pub mod prelude {
    pub use crate::{
        controller::{
            builtin::ConstrainedCamera,
            commands::{CameraCommand, PortraitCamCommand},
            component::CameraController,
            custom::FreeCamera,
            host::{PortraitHost, PortraitLink, PortraitPose, SCALE},
            limits::{CameraLimits, UiConst},
            reconcile::Infeasible,
            PortraitCamPlugin,
        },
        math::sphere::SphereDirection,
        DefaultPortraitCamPlugins,
    };

    #[cfg(feature = "extension_track_subject")]
    pub use crate::extensions::track_subject::{TrackSubject, TrackSubjectPlugin};
}

/// Adds the camera controller and all enabled extensions.
pub struct DefaultPortraitCamPlugins;

impl PluginGroup for DefaultPortraitCamPlugins {
    fn build(self) -> PluginGroupBuilder {
        #[allow(unused_mut)]
        let mut group =
            PluginGroupBuilder::start::<Self>().add(controller::PortraitCamPlugin);

        #[cfg(feature = "extension_track_subject")]
        {
            group = group.add(extensions::track_subject::TrackSubjectPlugin);
        }

        group
    }
}
