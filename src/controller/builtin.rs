//! Provides [`ConstrainedCamera`], the camera exactly as the portrait editor understands it.

use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_transform::prelude::*;

use super::{
    limits::CameraLimits,
    zoom::{self, ZOOM_MAX, ZOOM_MIN},
};
use crate::math::sphere::SphereDirection;

/// The built-in portrait camera, which can only represent legal states.
///
/// The camera orbits a *pivot*, always facing it, from a given *direction* and *distance*. Each of
/// these, and the zoom, is bounded by [`CameraLimits`]. The bounds are independent of one another,
/// so setters can be called in any order and the result is the same.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ConstrainedCamera {
    limits: CameraLimits,
    zoom: u8,
    pivot: Vec3,
    distance: f32,
    direction: SphereDirection,
}

impl Default for ConstrainedCamera {
    fn default() -> Self {
        Self::new(CameraLimits::default())
    }
}

impl ConstrainedCamera {
    /// The widest legal camera, at the shortest distance, looking along +Z at the in-bounds point
    /// nearest the origin.
    pub fn new(limits: CameraLimits) -> Self {
        Self {
            limits,
            zoom: ZOOM_MIN,
            pivot: limits.pivot_box().closest(Vec3::ZERO),
            distance: limits.distance_min,
            direction: SphereDirection::default(),
        }
    }

    /// The bounds this camera is held to.
    pub fn limits(&self) -> &CameraLimits {
        &self.limits
    }

    /// The zoom slider value.
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// The point the camera orbits and faces.
    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    /// Distance from the pivot to the camera.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Direction from the pivot to the camera.
    pub fn direction(&self) -> SphereDirection {
        self.direction
    }

    /// Field of view in radians.
    pub fn fov(&self) -> f32 {
        zoom::zoom_to_fov(self.zoom)
    }

    /// The camera position. Not stored by the editor; always derived from the other fields.
    pub fn camera(&self) -> Vec3 {
        self.pivot + self.distance * self.direction.to_vector()
    }

    /// A transform at the camera position looking at the pivot, Y up.
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.camera()).looking_at(self.pivot, Vec3::Y)
    }

    /// Set the zoom, clamped to the slider range.
    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Set the distance, clamped to the legal range. Non-finite values are ignored.
    pub fn set_distance(&mut self, distance: f32) {
        if !distance.is_finite() {
            warn!("Ignoring non-finite camera distance {distance}");
            return;
        }
        self.distance = distance.clamp(self.limits.distance_min, self.limits.distance_max);
    }

    /// Set the direction, clamping its latitude to the legal pitch range. Non-finite values are
    /// ignored.
    pub fn set_direction(&mut self, direction: SphereDirection) {
        if !direction.is_finite() {
            warn!("Ignoring non-finite camera direction {direction:?}");
            return;
        }
        let pitch = direction
            .latitude()
            .clamp(self.limits.pitch_min(), self.limits.pitch_max());
        self.direction = SphereDirection::from_radians(pitch, direction.longitude());
    }

    /// Set the pivot, clamped into the pivot box. Non-finite values are ignored.
    pub fn set_pivot(&mut self, pivot: Vec3) {
        if !pivot.is_finite() {
            warn!("Ignoring non-finite camera pivot {pivot}");
            return;
        }
        self.pivot = self.limits.pivot_box().closest(pivot);
    }

    /// Move the pivot by `delta`, as far as the pivot box allows, and return the displacement that
    /// was actually applied.
    pub fn translate(&mut self, delta: Vec3) -> Vec3 {
        if !delta.is_finite() {
            warn!("Ignoring non-finite pivot translation");
            return Vec3::ZERO;
        }
        let pivot = self.limits.pivot_box().closest(self.pivot + delta);
        let displacement = pivot - self.pivot;
        self.pivot = pivot;
        displacement
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    #[test]
    fn setters_clamp_independently() {
        let mut camera = ConstrainedCamera::default();
        camera.set_zoom(250);
        camera.set_distance(1000.0);
        camera.set_direction(SphereDirection::from_degrees(80.0, 45.0));
        camera.set_pivot(Vec3::new(500.0, -500.0, 10.0));

        assert_eq!(camera.zoom(), ZOOM_MAX);
        assert_eq!(camera.distance(), 200.0);
        assert_relative_eq!(camera.direction().latitude_degrees(), 30.0, epsilon = 1e-4);
        assert_relative_eq!(camera.direction().longitude_degrees(), 45.0, epsilon = 1e-4);
        assert_eq!(camera.pivot(), Vec3::new(160.0, -100.0, 10.0));

        // Same calls, different order, same result.
        let mut other = ConstrainedCamera::default();
        other.set_pivot(Vec3::new(500.0, -500.0, 10.0));
        other.set_direction(SphereDirection::from_degrees(80.0, 45.0));
        other.set_distance(1000.0);
        other.set_zoom(250);
        assert_eq!(camera, other);
    }

    #[test]
    fn non_finite_input_keeps_last_state() {
        let mut camera = ConstrainedCamera::default();
        let before = camera;
        camera.set_distance(f32::NAN);
        camera.set_distance(f32::INFINITY);
        camera.set_pivot(Vec3::new(f32::NAN, 0.0, 0.0));
        camera.set_pivot(Vec3::new(0.0, f32::NEG_INFINITY, 0.0));
        camera.set_direction(SphereDirection::from_radians(f32::INFINITY, 0.0));
        assert_eq!(camera.translate(Vec3::NAN), Vec3::ZERO);
        assert_eq!(camera, before);
    }

    #[test]
    fn camera_sits_behind_pivot() {
        let mut camera = ConstrainedCamera::default();
        camera.set_pivot(Vec3::new(10.0, 0.0, 0.0));
        camera.set_distance(100.0);
        camera.set_direction(SphereDirection::from_degrees(0.0, 90.0));
        assert!(camera.camera().abs_diff_eq(Vec3::new(110.0, 0.0, 0.0), 1e-4));

        let forward = *camera.transform().forward();
        assert!(forward.abs_diff_eq(Vec3::NEG_X, 1e-5));
    }

    #[test]
    fn translate_reports_applied_displacement() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut camera = ConstrainedCamera::default();
        let pivot_box = camera.limits().pivot_box();

        for _ in 0..500 {
            let before = camera.pivot();
            let delta = Vec3::new(
                rng.gen_range(-150.0..150.0),
                rng.gen_range(-150.0..150.0),
                rng.gen_range(-150.0..150.0),
            );
            let applied = camera.translate(delta);

            assert!(pivot_box.contains(camera.pivot()));
            assert!((before + applied).abs_diff_eq(camera.pivot(), 1e-4));

            // Whatever was not applied was cut off at a face, axis by axis.
            let lost = delta - applied;
            for axis in 0..3 {
                if lost[axis].abs() > 1e-3 {
                    let at_face = if lost[axis] > 0.0 {
                        camera.pivot()[axis] == pivot_box.max[axis]
                    } else {
                        camera.pivot()[axis] == pivot_box.min[axis]
                    };
                    assert!(at_face, "axis {axis} lost {} without hitting a face", lost[axis]);
                }
            }
        }
    }
}
