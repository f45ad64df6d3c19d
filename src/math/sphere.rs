//! Provides [`SphereDirection`], a latitude/longitude direction.

use core::{
    f32::consts::TAU,
    fmt::{self, Display},
};

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

/// A direction on the unit sphere, stored as latitude and longitude in radians.
///
/// Latitude is positive *below* the horizon: a positive latitude points the vector down, which is
/// how the portrait editor stores camera pitch. Longitude is measured from +Z towards +X.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct SphereDirection {
    latitude: f32,
    longitude: f32,
}

impl SphereDirection {
    /// Create a direction from latitude and longitude in radians.
    pub const fn from_radians(latitude: f32, longitude: f32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a direction from latitude and longitude in degrees.
    pub fn from_degrees(latitude: f32, longitude: f32) -> Self {
        Self::from_radians(latitude.to_radians(), longitude.to_radians())
    }

    /// The direction of a non-zero vector. Returns `None` for zero-length or non-finite input.
    pub fn from_vector(vector: Vec3) -> Option<Self> {
        let v = vector.try_normalize()?;
        Some(Self::from_radians(-v.y.asin(), v.x.atan2(v.z)))
    }

    /// Latitude in radians.
    pub fn latitude(&self) -> f32 {
        self.latitude
    }

    /// Longitude in radians.
    pub fn longitude(&self) -> f32 {
        self.longitude
    }

    /// Latitude in degrees.
    pub fn latitude_degrees(&self) -> f32 {
        360.0 * self.latitude / TAU
    }

    /// Longitude in degrees.
    pub fn longitude_degrees(&self) -> f32 {
        360.0 * self.longitude / TAU
    }

    /// The Cartesian unit vector for this direction.
    pub fn to_vector(&self) -> Vec3 {
        let (sin_lat, cos_lat) = self.latitude.sin_cos();
        let (sin_lon, cos_lon) = self.longitude.sin_cos();
        Vec3::new(cos_lat * sin_lon, -sin_lat, cos_lat * cos_lon)
    }

    /// Fold a latitude that has gone past a pole back into `[-90°, 90°]`, moving the longitude
    /// to the antipode so the vector is unchanged.
    ///
    /// Only handles latitudes within one half turn of the equator, which is all the portrait
    /// editor ever produces.
    pub fn normalized(&self) -> Self {
        let lat = self.latitude_degrees();
        let antipodal = self.longitude_degrees().rem_euclid(360.0) - 180.0;

        if lat < -90.0 {
            Self::from_degrees(-180.0 - lat, antipodal)
        } else if lat > 90.0 {
            Self::from_degrees(180.0 - lat, antipodal)
        } else {
            *self
        }
    }

    /// Both components are finite.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl Display for SphereDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SphereDirection(lat: {:.1}°, lon: {:.1}°)",
            self.latitude_degrees(),
            self.longitude_degrees()
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn cardinal_vectors() {
        let forward = SphereDirection::from_degrees(0.0, 0.0).to_vector();
        assert!(forward.abs_diff_eq(Vec3::Z, 1e-6));

        let right = SphereDirection::from_degrees(0.0, 90.0).to_vector();
        assert!(right.abs_diff_eq(Vec3::X, 1e-6));

        // Positive latitude points down.
        let down = SphereDirection::from_degrees(90.0, 0.0).to_vector();
        assert!(down.abs_diff_eq(Vec3::NEG_Y, 1e-6));
    }

    #[test]
    fn vector_round_trip() {
        let d = SphereDirection::from_degrees(-30.0, 135.0);
        let back = SphereDirection::from_vector(d.to_vector() * 42.0).unwrap();
        assert_relative_eq!(back.latitude(), d.latitude(), epsilon = 1e-5);
        assert_relative_eq!(back.longitude(), d.longitude(), epsilon = 1e-5);

        assert!(SphereDirection::from_vector(Vec3::ZERO).is_none());
    }

    #[test]
    fn normalization_folds_past_the_pole() {
        let past = SphereDirection::from_degrees(120.0, 10.0);
        let folded = past.normalized();
        assert_relative_eq!(folded.latitude_degrees(), 60.0, epsilon = 1e-3);
        assert_relative_eq!(folded.longitude_degrees(), -170.0, epsilon = 1e-3);
        assert!(folded.to_vector().abs_diff_eq(past.to_vector(), 1e-5));

        let under = SphereDirection::from_degrees(-100.0, -20.0).normalized();
        assert_relative_eq!(under.latitude_degrees(), -80.0, epsilon = 1e-3);
        assert_relative_eq!(under.longitude_degrees(), 160.0, epsilon = 1e-3);

        let ok = SphereDirection::from_degrees(45.0, 200.0);
        assert_eq!(ok.normalized(), ok);
    }

    #[test]
    fn displays_degrees() {
        let d = SphereDirection::from_degrees(-30.0, 90.0);
        assert_eq!(d.to_string(), "SphereDirection(lat: -30.0°, lon: 90.0°)");
    }
}
