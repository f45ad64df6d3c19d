//! The primary [`Component`] of the controller, [`CameraController`].

use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_window::RequestRedraw;

use super::{
    builtin::ConstrainedCamera,
    commands::PortraitCamCommand,
    custom::FreeCamera,
    host::{PortraitLink, PortraitPose, SCALE},
    limits::CameraLimits,
    reconcile::{self, PivotSolution},
    zoom,
};
use crate::math::{collision::Circle, sphere::SphereDirection, InsertY, ToGround};

/// Below this, the free camera's target is considered to be on top of the camera.
const MIN_TARGET_DISTANCE: f32 = 1e-3;

/// Lets the portrait camera be edited freely while keeping everything legal and in bounds.
///
/// The editor's own camera works with two points. It orbits a *pivot* when turned, always faces
/// it, and moves towards or away from it when zoomed with the mouse wheel. The limits on this are:
///
/// - a minimum and maximum distance between camera and pivot,
/// - a box the pivot must stay inside,
/// - a minimum and maximum pitch of the camera around the pivot.
///
/// So the camera position is only limited *indirectly*: it is reachable whenever some in-bounds
/// pivot sits at a legal distance from it, in the direction it faces.
///
/// The controller keeps two views of the same camera:
///
/// - a [`ConstrainedCamera`], which is exactly what the editor stores and is always legal,
/// - a [`FreeCamera`], a camera and a target that the top-down UI can drag around freely.
///
/// Edits go to the free camera and are then [reconciled](Self::reconcile_constrained_from_free)
/// back into the nearest legal constrained camera, which is the source of truth. The free camera
/// is re-derived afterwards, so whatever the edit could not achieve is forgotten.
///
/// There is also a *subject*, usually the character, which is used to pick between equally good
/// pivots. It doesn't exist at all in the editor.
///
/// # Syncing with the editor
///
/// Add a [`PortraitLink`] next to the controller and send [`PortraitCamCommand`]s. Once per frame,
/// [`CameraController::sync_with_host`] loads the live pose, applies the commands, and writes the
/// pose back if anything changed.
#[derive(Debug, Clone, Reflect, Component)]
pub struct CameraController {
    limits: CameraLimits,
    builtin: ConstrainedCamera,
    custom: FreeCamera,
    subject: Vec3,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraLimits::default())
    }
}

impl CameraController {
    /// Create a controller held to `limits`, in the default built-in state.
    pub fn new(limits: CameraLimits) -> Self {
        let mut controller = Self {
            limits,
            builtin: ConstrainedCamera::new(limits),
            custom: FreeCamera::new(&limits),
            subject: Vec3::ZERO,
        };
        controller.derive_free_from_constrained();
        controller
    }

    /// The bounds this controller enforces.
    pub fn limits(&self) -> &CameraLimits {
        &self.limits
    }

    /// The legal camera, as the editor sees it.
    pub fn builtin(&self) -> &ConstrainedCamera {
        &self.builtin
    }

    /// The free camera the UI edits.
    pub fn custom(&self) -> &FreeCamera {
        &self.custom
    }

    /// The point of interest used to break ties between pivots.
    pub fn subject(&self) -> Vec3 {
        self.subject
    }

    /// Camera position. Not saved in portraits, but it's what people think in terms of.
    pub fn camera(&self) -> Vec3 {
        self.builtin.camera()
    }

    /// The pivot: always directly in front of the camera, and saved in the portrait.
    pub fn pivot(&self) -> Vec3 {
        self.builtin.pivot()
    }

    /// Where the UI shows the target, on the ground plane.
    pub fn target_xz(&self) -> Vec2 {
        self.custom.target_xz()
    }

    /// The UI target in 3D.
    pub fn target(&self) -> Vec3 {
        self.custom.target()
    }

    /// Direction from the pivot to the camera. Pitch is bounded, yaw is not.
    pub fn direction(&self) -> SphereDirection {
        self.builtin.direction()
    }

    /// Distance from the pivot to the camera.
    pub fn distance(&self) -> f32 {
        self.builtin.distance()
    }

    /// Zoom slider value.
    pub fn zoom(&self) -> u8 {
        self.builtin.zoom()
    }

    /// Field of view in radians.
    pub fn fov(&self) -> f32 {
        self.builtin.fov()
    }

    /// The zoom as a full-frame focal length, in millimetres.
    pub fn focal_length(&self) -> f32 {
        zoom::focal_length_from_zoom(self.zoom())
    }

    /// Load the editor's pose. Returns `false`, leaving the controller untouched, if the pose has
    /// non-finite values.
    pub fn load_pose(&mut self, pose: &PortraitPose) -> bool {
        if !pose.is_finite() {
            warn!("Ignoring non-finite portrait pose {pose:?}");
            return false;
        }

        self.builtin
            .set_direction(SphereDirection::from_radians(pose.pitch, pose.yaw));
        self.builtin.set_pivot(pose.camera_target * SCALE);
        self.builtin.set_zoom(pose.zoom);
        self.builtin.set_distance(pose.distance * SCALE);

        self.derive_free_from_constrained();
        true
    }

    /// The pose to write back to the editor.
    pub fn to_pose(&self) -> PortraitPose {
        let direction = self.direction();
        PortraitPose {
            camera_position: self.camera() / SCALE,
            camera_target: self.pivot() / SCALE,
            pitch: direction.latitude(),
            yaw: direction.longitude(),
            distance: self.distance() / SCALE,
            zoom: self.zoom(),
        }
    }

    /// Return to the default camera and move the subject back to the origin.
    pub fn reset(&mut self) {
        *self = Self::new(self.limits);
    }

    /// Recompute the free camera from the built-in one.
    ///
    /// The camera position and direction are copied over. The target keeps its ground distance
    /// from the camera, or is put on the pivot if it has none.
    pub fn derive_free_from_constrained(&mut self) {
        let direction = self.builtin.direction();

        self.custom.set_camera(self.builtin.camera());
        self.custom.set_pitch(direction.latitude());

        let mut distance_xz = self.custom.distance_xz();
        if distance_xz < MIN_TARGET_DISTANCE {
            distance_xz = self.builtin.distance() * direction.latitude().cos();
        }
        if distance_xz < MIN_TARGET_DISTANCE {
            distance_xz = self.limits.distance_min;
        }
        self.custom.place_target(direction.longitude(), distance_xz);
    }

    /// Move the built-in camera to the legal state nearest the free camera.
    ///
    /// With `allow_camera_movement` false, fails unless the free camera's exact position and
    /// direction are reachable. With it true, the camera may be pushed or pulled along its line of
    /// sight to bring the pivot back in range. Returns whether the built-in camera was updated; on
    /// failure it is left as it was.
    pub fn reconcile_constrained_from_free(&mut self, allow_camera_movement: bool) -> bool {
        match reconcile::reconcile(
            &self.custom,
            self.subject,
            &self.limits,
            allow_camera_movement,
        ) {
            Ok(solution) => {
                self.apply_solution(&solution);
                true
            }
            Err(reason) => {
                debug!("No legal pivot for camera {}: {reason}", self.custom.camera());
                false
            }
        }
    }

    fn apply_solution(&mut self, solution: &PivotSolution) {
        if solution.moves_camera {
            trace!(
                "Camera moved to reach pivot {} at distance {}",
                solution.pivot,
                solution.distance
            );
        }
        // The setters clamp again, which also absorbs float error at the box faces.
        self.builtin.set_pivot(solution.pivot);
        self.builtin.set_direction(solution.direction);
        self.builtin.set_distance(solution.distance);
    }

    /// Set the zoom slider.
    pub fn set_zoom(&mut self, zoom: u8) -> bool {
        let before = self.zoom();
        self.builtin.set_zoom(zoom);
        self.zoom() != before
    }

    /// Zoom to a full-frame focal length.
    ///
    /// With `compensate_distance`, the camera moves towards or away from the target so that the
    /// target area stays the same size in frame.
    pub fn set_focal_length(&mut self, focal_length: f32, compensate_distance: bool) -> bool {
        if !(focal_length.is_finite() && focal_length > 0.0) {
            warn!("Ignoring invalid focal length {focal_length}");
            return false;
        }
        let before = self.builtin;
        let new_zoom = zoom::zoom_from_focal_length(focal_length);

        if compensate_distance {
            // The zoom ends up quantized, so compensate for the quantized value or the error
            // accumulates over repeated adjustments.
            let new_fov = zoom::zoom_to_fov(new_zoom);
            let old_fov = self.fov();
            let factor = (old_fov * 0.5).tan() / (new_fov * 0.5).tan();

            let target = self.custom.target();
            self.custom
                .set_camera(target + (self.custom.camera() - target) * factor);
            self.reconcile_constrained_from_free(true);
            self.derive_free_from_constrained();
        }

        self.builtin.set_zoom(new_zoom);
        self.builtin != before
    }

    /// Move the camera towards (negative) or away from (positive) the pivot.
    ///
    /// Follows the editor's own mouse wheel curve: the step is scaled by the width of the view, so
    /// it feels the same at every zoom.
    pub fn adjust_camera_distance(&mut self, delta: f32) -> bool {
        let before = self.builtin;
        let increment = self.limits.distance_increment / 1000.0;
        let zoom_factor = 2.0 * (self.fov() / 2.0).tan();
        let rate = zoom_factor * increment;

        self.builtin
            .set_distance(self.builtin.distance() * (1.0 + delta * rate));
        self.derive_free_from_constrained();
        self.builtin != before
    }

    /// Slide the whole rig by `delta`, as far as the pivot box allows.
    pub fn translate(&mut self, delta: Vec3) -> bool {
        let displacement = self.builtin.translate(delta);
        self.custom.translate(displacement);
        displacement != Vec3::ZERO
    }

    /// Move the camera on the ground plane, keeping the target where it is.
    ///
    /// The camera height follows the pitch so the target stays at the same height. With
    /// `preserve_distance`, the camera only orbits the target, getting as close to `camera_xz` as
    /// it can at its current distance.
    pub fn set_camera_position_xz(&mut self, camera_xz: Vec2, preserve_distance: bool) -> bool {
        if !camera_xz.is_finite() {
            return false;
        }
        let before = self.builtin;
        let target_xz = self.custom.target_xz();
        let old_distance = self.custom.distance_xz();

        let camera_xz = if preserve_distance {
            Circle::new(target_xz, old_distance).closest(camera_xz)
        } else {
            camera_xz
        };

        let new_distance = camera_xz.distance(target_xz);
        let delta_y = self.custom.pitch().tan() * (old_distance - new_distance);
        let start_y = self.custom.camera().y;

        // Following the pitch up or down can carry the line of sight out of the pivot box. In
        // that case, settle for the starting height.
        self.custom.set_camera(camera_xz.insert_y(start_y + delta_y));
        if !self.reconcile_constrained_from_free(true) {
            self.custom.set_camera(camera_xz.insert_y(start_y));
            self.reconcile_constrained_from_free(true);
        }

        self.derive_free_from_constrained();
        self.builtin != before
    }

    /// Move the target on the ground plane, keeping the camera where it is.
    ///
    /// With `preserve_distance`, the target swings around the camera at its current distance
    /// instead. Refused if no legal pivot exists without moving the camera.
    pub fn set_target_position_xz(&mut self, target_xz: Vec2, preserve_distance: bool) -> bool {
        let before = self.builtin;
        let target_xz = if preserve_distance {
            Circle::new(self.custom.camera_xz(), self.custom.distance_xz()).closest(target_xz)
        } else {
            target_xz
        };

        self.custom.set_target_xz(target_xz);
        self.reconcile_constrained_from_free(false);
        self.derive_free_from_constrained();
        self.builtin != before
    }

    /// Set the subject position.
    pub fn set_subject_position(&mut self, subject: Vec3) {
        if subject.is_finite() {
            self.subject = subject;
        }
    }

    /// Move the target onto the subject and recompute the pivot, pushing the camera back if it
    /// ends up too close.
    pub fn face_subject(&mut self) -> bool {
        let before = self.builtin;
        self.custom.set_target_xz(self.subject.to_xz());
        self.reconcile_constrained_from_free(true);
        self.derive_free_from_constrained();
        self.builtin != before
    }

    /// Rotate the pivot, camera and target around the subject by `angle` radians on the ground
    /// plane.
    ///
    /// All or nothing: if the rotated pivot would leave the pivot box, nothing moves.
    pub fn rotate_everything(&mut self, angle: f32) -> bool {
        if !angle.is_finite() {
            return false;
        }
        let before = self.builtin;
        let center = self.subject.to_xz();
        let rotation = Vec2::from_angle(angle);
        let rotate = |p: Vec2| center + rotation.rotate(p - center);

        let pivot = self.pivot();
        let new_pivot = rotate(pivot.to_xz()).insert_y(pivot.y);
        if !self
            .limits
            .pivot_box()
            .inflate(reconcile::BOX_TOLERANCE)
            .contains(new_pivot)
        {
            debug!("Rotation by {angle} would move the pivot out of bounds to {new_pivot}");
            return false;
        }

        let camera = self.custom.camera();
        let target_xz = self.custom.target_xz();
        self.custom
            .set_camera(rotate(camera.to_xz()).insert_y(camera.y));
        self.custom.set_target_xz(rotate(target_xz));

        self.reconcile_constrained_from_free(false);
        self.derive_free_from_constrained();
        self.builtin != before
    }

    /// Move the pivot on the ground plane, keeping its height. The camera follows.
    pub fn set_pivot_position_xz(&mut self, pivot_xz: Vec2) -> bool {
        let before = self.builtin;
        self.builtin.set_pivot(pivot_xz.insert_y(self.pivot().y));
        self.derive_free_from_constrained();
        self.builtin != before
    }

    /// Set the pivot height. The camera follows.
    pub fn set_pivot_position_y(&mut self, pivot_y: f32) -> bool {
        let before = self.builtin;
        let pivot = self.pivot();
        self.builtin.set_pivot(Vec3::new(pivot.x, pivot_y, pivot.z));
        self.derive_free_from_constrained();
        self.builtin != before
    }

    /// Set the camera pitch around the pivot, in radians.
    pub fn set_camera_pitch(&mut self, pitch: f32) -> bool {
        let before = self.builtin;
        let direction = SphereDirection::from_radians(pitch, self.direction().longitude());
        self.builtin.set_direction(direction);
        self.derive_free_from_constrained();
        self.builtin != before
    }

    /// Orbit the camera around the pivot, as the editor's left-drag does. `delta.x` turns it,
    /// `delta.y` lowers it (and so tilts the view up).
    pub fn orbit(&mut self, delta: Vec2) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let before = self.builtin;
        let rate = self.limits.angle_increment / 1000.0;
        let direction = self.direction();
        self.builtin.set_direction(SphereDirection::from_radians(
            direction.latitude() + delta.y * rate,
            direction.longitude() + delta.x * rate,
        ));
        self.derive_free_from_constrained();
        self.builtin != before
    }

    /// Slide the pivot across the view, as the editor's right-drag does. `delta.x` moves it right,
    /// `delta.y` up. The step scales with the visible width at the pivot.
    pub fn pan_view(&mut self, delta: Vec2) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let rate = self.limits.orbit_increment / 1000.0
            * 2.0
            * (self.fov() / 2.0).tan()
            * self.distance();

        let forward = -self.direction().to_vector();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        self.translate((right * delta.x + up * delta.y) * rate)
    }

    /// Sync every linked controller with its host. Called once per frame.
    ///
    /// For each camera: read the live pose, apply the pending commands for it in order, and write
    /// the pose back if anything changed. Cameras whose host is not editable this frame are
    /// skipped, and their commands dropped.
    pub fn sync_with_host(
        mut cameras: Query<(Entity, &mut CameraController, &mut PortraitLink)>,
        mut commands: EventReader<PortraitCamCommand>,
        mut redraw: EventWriter<RequestRedraw>,
    ) {
        let pending: Vec<PortraitCamCommand> = commands.read().copied().collect();

        for (entity, mut controller, mut link) in &mut cameras {
            let mut queued = pending.iter().filter(|c| c.camera == entity).peekable();

            let Some(pose) = link.host().read_pose() else {
                if queued.peek().is_some() {
                    debug!("Host of {entity:?} is not editable, dropping camera commands");
                }
                continue;
            };
            if !controller.load_pose(&pose) {
                continue;
            }

            let mut changed = false;
            for command in queued {
                changed |= controller.apply(command.command);
            }

            if changed {
                let pose = controller.to_pose();
                link.host_mut().write_pose(&pose);
                redraw.send(RequestRedraw);
            }
        }
    }
}
