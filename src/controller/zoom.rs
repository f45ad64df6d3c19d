//! Conversions between the editor's zoom slider, field of view, and focal length.
//!
//! The editor stores zoom as a byte in `[ZOOM_MIN, ZOOM_MAX]` and maps it linearly onto a field of
//! view in radians. Focal lengths are given for a full-frame sensor, which is what people expect
//! a "lens" slider to mean.

use crate::math::photography::{self, FULL_FRAME_X};

/// The minimum value of the zoom slider. The widest field of view.
pub const ZOOM_MIN: u8 = 0;

/// The maximum value of the zoom slider. The narrowest field of view.
pub const ZOOM_MAX: u8 = 200;

/// Field of view, in radians, at zero zoom.
const FOV_AT_ZOOM_MIN: f32 = 1.28;

/// Zoom units per radian of field of view.
const ZOOM_PER_RADIAN: f32 = 200.0;

/// The field of view, in radians, for a zoom value. Values past [`ZOOM_MAX`] are clamped.
pub fn zoom_to_fov(zoom: u8) -> f32 {
    FOV_AT_ZOOM_MIN - f32::from(zoom.min(ZOOM_MAX)) / ZOOM_PER_RADIAN
}

/// The zoom value nearest a field of view, clamped to the slider range.
///
/// Rounds rather than truncates, so `fov_to_zoom(zoom_to_fov(z)) == z` for every legal `z`
/// despite float error in the subtraction.
pub fn fov_to_zoom(fov: f32) -> u8 {
    let zoom = ((FOV_AT_ZOOM_MIN - fov) * ZOOM_PER_RADIAN).round();
    if zoom.is_nan() {
        return ZOOM_MIN;
    }
    zoom.clamp(f32::from(ZOOM_MIN), f32::from(ZOOM_MAX)) as u8
}

/// The full-frame focal length, in millimetres, for a zoom value.
pub fn focal_length_from_zoom(zoom: u8) -> f32 {
    photography::focal_length(zoom_to_fov(zoom), FULL_FRAME_X)
}

/// The zoom value nearest a full-frame focal length in millimetres.
pub fn zoom_from_focal_length(focal_length: f32) -> u8 {
    fov_to_zoom(photography::angle_of_view(focal_length, FULL_FRAME_X))
}

/// The shortest focal length the slider can reach.
pub fn focal_length_min() -> f32 {
    focal_length_from_zoom(ZOOM_MIN)
}

/// The longest focal length the slider can reach.
pub fn focal_length_max() -> f32 {
    focal_length_from_zoom(ZOOM_MAX)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn every_zoom_survives_the_round_trip() {
        for zoom in ZOOM_MIN..=ZOOM_MAX {
            assert_eq!(fov_to_zoom(zoom_to_fov(zoom)), zoom, "zoom {zoom}");
            assert_eq!(zoom_from_focal_length(focal_length_from_zoom(zoom)), zoom);
        }
    }

    #[test]
    fn out_of_range_fov_clamps() {
        assert_eq!(fov_to_zoom(3.0), ZOOM_MIN);
        assert_eq!(fov_to_zoom(-1.0), ZOOM_MAX);
        assert_eq!(fov_to_zoom(f32::NAN), ZOOM_MIN);
        assert_relative_eq!(zoom_to_fov(255), zoom_to_fov(ZOOM_MAX));
    }

    #[test]
    fn focal_range_is_ordered() {
        let (min, max) = (focal_length_min(), focal_length_max());
        assert!(min < max);
        // Roughly a 24mm to 128mm zoom lens.
        assert_relative_eq!(min, 24.1, epsilon = 0.5);
        assert_relative_eq!(max, 127.6, epsilon = 0.5);
    }
}
