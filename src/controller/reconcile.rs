//! Maps a [`FreeCamera`] onto the nearest legal pivot of the built-in camera.
//!
//! The UI works in terms of a camera and a target and ignores the pivot entirely. To use it as the
//! source of truth we want data to flow one way: come up with a pivot from the free camera alone,
//! without consulting the built-in camera's current state.
//!
//! Any pivot on the line of sight gives the same view, as long as it is inside the pivot box and
//! at a legal distance from the camera. Among those we pick the one nearest the subject on the
//! ground plane. When no such pivot exists the camera either stays put (and the edit is refused),
//! or the pivot is pushed to the edge of the box and the camera is dragged along with it.

use bevy_math::prelude::*;

use super::{custom::FreeCamera, limits::CameraLimits};
use crate::math::{collision::Line, sphere::SphereDirection, ToGround};

/// Camera and target closer than this on the ground plane have no usable line of sight.
const MIN_GROUND_SEPARATION: f32 = 1e-3;

/// Slack around the pivot box, in working units. Legal pivots routinely sit on a face of the box,
/// and the line of sight rebuilt from them can pass a few ulps outside it.
pub const BOX_TOLERANCE: f32 = 1e-3;

/// A legal pivot for a free camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotSolution {
    /// The new pivot, inside the pivot box.
    pub pivot: Vec3,
    /// Distance from the free camera to the pivot. May be outside the legal range if the camera
    /// had to move; the built-in camera's setter takes care of that.
    pub distance: f32,
    /// The free camera's direction.
    pub direction: SphereDirection,
    /// Where the pivot sits on the camera-to-target line, `0` at the camera and `1` at the target.
    pub t: f32,
    /// Whether the camera had to move to make this pivot legal.
    pub moves_camera: bool,
}

/// Why no pivot could be found.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Infeasible {
    /// Camera and target coincide on the ground plane, so there is no line of sight.
    #[error("camera and target coincide on the ground plane")]
    Degenerate,
    /// The line of sight never passes through the pivot box.
    #[error("line of sight never enters the pivot box")]
    MissesPivotBox,
    /// The pivot box only starts past the maximum distance, and the camera may not move.
    #[error("pivot box starts at t = {near}, past the maximum distance at t = {max}")]
    BeyondMaxDistance {
        /// Where the line enters the box.
        near: f32,
        /// Where the line leaves the legal distance range.
        max: f32,
    },
    /// The pivot box ends inside the minimum distance, and the camera may not move.
    #[error("pivot box ends at t = {far}, inside the minimum distance at t = {min}")]
    WithinMinDistance {
        /// Where the line leaves the box.
        far: f32,
        /// Where the line enters the legal distance range.
        min: f32,
    },
}

/// Find the pivot for `free` that is inside the pivot box, at a legal distance, and nearest
/// `subject` on the ground plane, in that order of priority.
///
/// With `allow_camera_movement`, a line of sight that passes through the box but never at a legal
/// distance still succeeds: the pivot goes to the nearest point of the box on the line, and the
/// camera will be pulled or pushed to a legal distance from it.
pub fn reconcile(
    free: &FreeCamera,
    subject: Vec3,
    limits: &CameraLimits,
    allow_camera_movement: bool,
) -> Result<PivotSolution, Infeasible> {
    let camera = free.camera();
    let target = free.target();

    if camera.to_xz().distance(target.to_xz()) < MIN_GROUND_SEPARATION {
        return Err(Infeasible::Degenerate);
    }

    // The pivot has to be legal in 3D, so clip the full line of sight, pitch included.
    let line = Line::new(camera, target);
    let length = camera.distance(target);
    let (near, far) = line
        .intersects(&limits.pivot_box().inflate(BOX_TOLERANCE))
        .ok_or(Infeasible::MissesPivotBox)?;

    // But "best" only means close to the subject on the ground plane. The ground projection shares
    // the line's parametrization.
    let (_, preferred) = Line::new(camera.to_xz(), target.to_xz())
        .closest(subject.to_xz())
        .ok_or(Infeasible::Degenerate)?;

    let min = limits.distance_min / length;
    let max = limits.distance_max / length;
    let slack = BOX_TOLERANCE / length;

    let (lo, hi, moves_camera) = if near > max + slack {
        if !allow_camera_movement {
            return Err(Infeasible::BeyondMaxDistance { near, max });
        }
        (near, near, true)
    } else if far < min - slack {
        if !allow_camera_movement {
            return Err(Infeasible::WithinMinDistance { far, min });
        }
        (far, far, true)
    } else {
        let lo = near.max(min);
        (lo, far.min(max).max(lo), false)
    };

    let t = preferred.clamp(lo, hi);
    let pivot = line.at(t);

    Ok(PivotSolution {
        pivot,
        distance: pivot.distance(camera),
        direction: free.direction(),
        t,
        moves_camera,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::math::InsertY;

    fn free(camera: Vec3, target_xz: Vec2, pitch: f32) -> FreeCamera {
        let mut free = FreeCamera::default();
        free.set_camera(camera);
        free.set_target_xz(target_xz);
        free.set_pitch(pitch);
        free
    }

    #[test]
    fn pivot_prefers_subject() {
        let limits = CameraLimits::default();
        let free = free(Vec3::new(0.0, 0.0, -150.0), Vec2::ZERO, 0.0);

        let solution = reconcile(&free, Vec3::new(40.0, 20.0, -20.0), &limits, false).unwrap();
        assert!(solution.pivot.abs_diff_eq(Vec3::new(0.0, 0.0, -20.0), 1e-3));
        assert_relative_eq!(solution.distance, 130.0, epsilon = 1e-3);
        assert!(!solution.moves_camera);
    }

    #[test]
    fn subject_too_close_clamps_to_min_distance() {
        let limits = CameraLimits::default();
        let free = free(Vec3::new(0.0, 0.0, -80.0), Vec2::ZERO, 0.0);

        // The subject is 10 units in front of the camera, the pivot may be no nearer than 50.
        let solution = reconcile(&free, Vec3::new(0.0, 0.0, -70.0), &limits, false).unwrap();
        assert!(solution.pivot.abs_diff_eq(Vec3::new(0.0, 0.0, -30.0), 1e-3));
        assert_relative_eq!(solution.distance, 50.0, epsilon = 1e-3);
    }

    #[test]
    fn far_camera_needs_permission_to_move() {
        let limits = CameraLimits::default();
        let free = free(Vec3::new(0.0, 0.0, -300.0), Vec2::ZERO, 0.0);

        let refused = reconcile(&free, Vec3::ZERO, &limits, false);
        assert!(matches!(refused, Err(Infeasible::BeyondMaxDistance { .. })));

        let solution = reconcile(&free, Vec3::ZERO, &limits, true).unwrap();
        assert!(solution.pivot.abs_diff_eq(Vec3::new(0.0, 0.0, -50.0), 1e-3));
        assert_relative_eq!(solution.distance, 250.0, epsilon = 1e-3);
        assert!(solution.moves_camera);
    }

    #[test]
    fn close_camera_behind_box_needs_permission_to_move() {
        let limits = CameraLimits::default();
        // Looking away from the box along +Z, starting just past its far face.
        let free = free(Vec3::new(0.0, 0.0, 60.0), Vec2::new(0.0, 100.0), 0.0);

        let refused = reconcile(&free, Vec3::ZERO, &limits, false);
        assert!(matches!(refused, Err(Infeasible::WithinMinDistance { .. })));

        let solution = reconcile(&free, Vec3::ZERO, &limits, true).unwrap();
        assert!(solution.pivot.abs_diff_eq(Vec3::new(0.0, 0.0, 50.0), 1e-3));
    }

    #[test]
    fn degenerate_and_missing_lines_fail() {
        let limits = CameraLimits::default();

        let vertical = free(Vec3::new(0.0, 100.0, 0.0), Vec2::ZERO, 0.0);
        assert_eq!(
            reconcile(&vertical, Vec3::ZERO, &limits, true),
            Err(Infeasible::Degenerate)
        );

        // Far above the box, looking level.
        let above = free(Vec3::new(0.0, 500.0, -300.0), Vec2::ZERO, 0.0);
        assert_eq!(
            reconcile(&above, Vec3::ZERO, &limits, true),
            Err(Infeasible::MissesPivotBox)
        );
    }

    #[test]
    fn pitch_counts_towards_distance() {
        let limits = CameraLimits::default();
        // Looking down at 45°, so every ground unit is sqrt(2) units of distance.
        let camera = Vec3::new(0.0, 40.0, -40.0);
        let free = free(camera, Vec2::ZERO, -core::f32::consts::FRAC_PI_4);

        let solution = reconcile(&free, Vec3::new(0.0, 0.0, -30.0), &limits, false).unwrap();
        assert_relative_eq!(solution.distance, 50.0, epsilon = 1e-3);
        assert_relative_eq!(solution.pivot.z, -40.0 + 50.0 / 2f32.sqrt(), epsilon = 1e-3);
    }

    /// Either bound, or somewhere in between, so faces, edges and corners all come up.
    fn on_or_between(rng: &mut StdRng, min: f32, max: f32) -> f32 {
        match rng.gen_range(0..3) {
            0 => min,
            1 => max,
            _ => rng.gen_range(min..max),
        }
    }

    #[test]
    fn pivot_on_box_corner_reconciles_with_itself() {
        let limits = CameraLimits::default();
        let pivot = Vec3::new(160.0, -100.0, -50.0);
        let direction = SphereDirection::from_degrees(13.8, -108.1);
        let camera = pivot + 200.0 * direction.to_vector();

        let mut free = free(camera, Vec2::ZERO, direction.latitude());
        free.place_target(direction.longitude(), camera.to_xz().distance(pivot.to_xz()));

        let solution = reconcile(&free, pivot, &limits, false).unwrap();
        assert!(solution.pivot.abs_diff_eq(pivot, 1e-2));
        assert_relative_eq!(solution.distance, 200.0, epsilon = 1e-2);
        assert!(!solution.moves_camera);
    }

    #[test]
    fn reachable_views_always_reconcile() {
        let limits = CameraLimits::default();
        let pivot_box = limits.pivot_box();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..5000 {
            let pivot = Vec3::new(
                on_or_between(&mut rng, limits.pivot_min.x, limits.pivot_max.x),
                on_or_between(&mut rng, limits.pivot_min.y, limits.pivot_max.y),
                on_or_between(&mut rng, limits.pivot_min.z, limits.pivot_max.z),
            );
            let distance = on_or_between(&mut rng, limits.distance_min, limits.distance_max);
            let direction = SphereDirection::from_degrees(
                rng.gen_range(-80.0..25.0),
                rng.gen_range(-180.0..180.0),
            );
            let camera = pivot + distance * direction.to_vector();

            // A target somewhere along the line of sight.
            let mut free = free(camera, Vec2::ZERO, direction.latitude());
            free.place_target(direction.longitude(), rng.gen_range(5.0..150.0));

            let subject = Vec2::new(rng.gen_range(-200.0..200.0), rng.gen_range(-100.0..100.0))
                .insert_y(0.0);
            let solution = reconcile(&free, subject, &limits, false)
                .unwrap_or_else(|e| panic!("{e} for pivot {pivot}, camera {camera}"));

            assert!(pivot_box.inflate(1e-2).contains(solution.pivot));
            assert!(solution.distance >= limits.distance_min - 1e-2);
            assert!(solution.distance <= limits.distance_max + 1e-2);
            assert!(!solution.moves_camera);
        }
    }
}
