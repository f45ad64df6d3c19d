//! Conversions between angle of view and the focal length of a real-world lens.
//!
//! `angle = 2 * atan(sensor / (2 * focal_length))`

/// Width of a full-frame sensor, in millimetres.
pub const FULL_FRAME_X: f32 = 36.0;

/// Height of a full-frame sensor, in millimetres.
pub const FULL_FRAME_Y: f32 = 24.0;

/// The angle of view, in radians, of a lens with `focal_length` on a sensor of `sensor_size`.
pub fn angle_of_view(focal_length: f32, sensor_size: f32) -> f32 {
    2.0 * (sensor_size / (2.0 * focal_length)).atan()
}

/// The focal length giving an angle of view of `angle` radians on a sensor of `sensor_size`.
/// The inverse of [`angle_of_view`].
pub fn focal_length(angle: f32, sensor_size: f32) -> f32 {
    sensor_size / (2.0 * (angle / 2.0).tan())
}

#[cfg(test)]
mod tests {
    use core::f32::consts::PI;

    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    #[test]
    fn normal_lens() {
        // A 50mm lens on full frame is the classic ~39.6° horizontal view.
        let angle = angle_of_view(50.0, FULL_FRAME_X);
        assert_relative_eq!(angle.to_degrees(), 39.5978, epsilon = 1e-3);
        assert_relative_eq!(focal_length(angle, FULL_FRAME_X), 50.0, epsilon = 1e-3);
    }

    #[test]
    fn conversions_are_inverse() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let angle = rng.gen_range(0.01..PI - 0.01);
            let sensor = rng.gen_range(1.0..100.0);
            let back = angle_of_view(focal_length(angle, sensor), sensor);
            assert_relative_eq!(back, angle, max_relative = 1e-5);
        }
        assert_relative_eq!(
            angle_of_view(focal_length(1.0, FULL_FRAME_Y), FULL_FRAME_Y),
            1.0,
            max_relative = 1e-6
        );
    }
}
