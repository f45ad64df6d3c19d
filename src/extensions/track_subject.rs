//! A `bevy_portrait_cam` extension that keeps the controller's subject on the character being
//! framed, and optionally keeps the camera facing it while it moves.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

use crate::prelude::*;

/// Subject movements smaller than this, in editor units, are ignored.
const SUBJECT_EPSILON: f32 = 1e-4;

/// See the [module](self) docs.
pub struct TrackSubjectPlugin;

impl Plugin for TrackSubjectPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PortraitCamCommand>()
            .add_systems(PreUpdate, TrackSubject::update)
            .register_type::<TrackSubject>();
    }
}

/// Optional. Reads the subject position from a camera's [`PortraitHost`] and forwards it to its
/// [`CameraController`].
///
/// The host's subject tends to jump around for a few frames after it loads or swaps animations, so
/// nothing is sent until `settle_frames` frames have passed.
#[derive(Debug, Clone, Component, Reflect)]
pub struct TrackSubject {
    /// Keep the camera facing the subject. Applied every frame once settled, so a target dragged
    /// away from the subject snaps back.
    pub follow: bool,
    /// Frames to wait before trusting the subject position.
    pub settle_frames: u32,
    countdown: u32,
    last: Option<Vec3>,
}

impl Default for TrackSubject {
    fn default() -> Self {
        Self::new(false, 4)
    }
}

impl TrackSubject {
    /// Track the subject after `settle_frames` frames, facing it if `follow` is set.
    pub fn new(follow: bool, settle_frames: u32) -> Self {
        Self {
            follow,
            settle_frames,
            countdown: settle_frames,
            last: None,
        }
    }

    /// Wait another `settle_frames` frames before trusting the subject position again.
    pub fn unsettle(&mut self) {
        self.countdown = self.settle_frames;
        self.last = None;
    }

    /// Whether the settle countdown has run out.
    pub fn is_settled(&self) -> bool {
        self.countdown == 0
    }

    /// Whether a subject position has been forwarded since the last settle.
    pub fn is_tracking(&self) -> bool {
        self.is_settled() && self.last.is_some()
    }

    /// Returns the subject position to forward this frame, if any.
    fn observe(&mut self, position: Vec3) -> Option<Vec3> {
        if self.countdown > 0 {
            self.countdown -= 1;
            return None;
        }
        if self
            .last
            .is_some_and(|last| last.abs_diff_eq(position, SUBJECT_EPSILON))
        {
            return None;
        }
        self.last = Some(position);
        Some(position)
    }

    fn update(
        mut cameras: Query<(Entity, &mut TrackSubject, &PortraitLink), With<CameraController>>,
        mut commands: EventWriter<PortraitCamCommand>,
    ) {
        for (entity, mut tracking, link) in &mut cameras {
            let Some(position) = link.host().subject_position() else {
                continue;
            };
            if !position.is_finite() {
                warn_once!("Ignoring non-finite subject position {position}");
                continue;
            }
            if let Some(position) = tracking.observe(position) {
                debug!("Subject of {entity:?} moved to {position}");
                commands.send(PortraitCamCommand::new(
                    entity,
                    CameraCommand::SetSubject(position * SCALE),
                ));
            }
            if tracking.follow && tracking.is_tracking() {
                commands.send(PortraitCamCommand::new(entity, CameraCommand::FaceSubject));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_for_settle() {
        let mut tracking = TrackSubject::new(false, 2);
        let p = Vec3::new(0.1, 0.2, 0.3);

        assert_eq!(tracking.observe(p), None);
        assert_eq!(tracking.observe(p), None);
        assert!(tracking.is_settled());
        assert!(!tracking.is_tracking());
        assert_eq!(tracking.observe(p), Some(p));
        assert!(tracking.is_tracking());
    }

    #[test]
    fn only_forwards_movement() {
        let mut tracking = TrackSubject::new(true, 0);
        let p = Vec3::new(0.1, 0.2, 0.3);

        assert_eq!(tracking.observe(p), Some(p));
        assert_eq!(tracking.observe(p), None);
        assert_eq!(tracking.observe(p + Vec3::splat(1e-6)), None);
        assert_eq!(tracking.observe(p + Vec3::X), Some(p + Vec3::X));
    }

    #[test]
    fn unsettle_restarts_countdown() {
        let mut tracking = TrackSubject::new(false, 1);
        let p = Vec3::ONE;
        tracking.observe(p);
        assert_eq!(tracking.observe(p), Some(p));

        tracking.unsettle();
        assert!(!tracking.is_settled());
        assert_eq!(tracking.observe(p), None);
        assert_eq!(tracking.observe(p), Some(p));
    }
}
