//! Provides [`CameraLimits`] settings.

use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

use crate::math::collision::Aabb;

/// The legal range of the built-in portrait camera, and the rates it moves at.
///
/// Every value is in working units (editor units multiplied by
/// [`SCALE`](super::host::SCALE)), except the pitch limits, which are in degrees. The editor only
/// ever bounds the *pivot*; the camera position itself is legal whenever some in-bounds pivot
/// sits at a legal distance from it.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CameraLimits {
    /// Minimum corner of the box the pivot must stay in.
    pub pivot_min: Vec3,
    /// Maximum corner of the box the pivot must stay in.
    pub pivot_max: Vec3,
    /// Lowest camera pitch in degrees. Negative values put the camera above the pivot.
    pub pitch_min_degrees: f32,
    /// Highest camera pitch in degrees.
    pub pitch_max_degrees: f32,
    /// Shortest allowed distance from the camera to the pivot.
    pub distance_min: f32,
    /// Longest allowed distance from the camera to the pivot.
    pub distance_max: f32,
    /// Yaw and pitch change per unit of orbit input, in thousandths of a radian.
    pub angle_increment: f32,
    /// Pivot movement per unit of pan input, in thousandths of the visible frame.
    pub orbit_increment: f32,
    /// Relative distance change per unit of zoom input, in thousandths, before the field of view
    /// is accounted for.
    pub distance_increment: f32,
}

impl Default for CameraLimits {
    /// The values shipped with the portrait editor.
    fn default() -> Self {
        Self {
            pivot_min: Vec3::new(-160.0, -100.0, -50.0),
            pivot_max: Vec3::new(160.0, 50.0, 50.0),
            pitch_min_degrees: -89.0,
            pitch_max_degrees: 30.0,
            distance_min: 50.0,
            distance_max: 200.0,
            angle_increment: 5.0,
            orbit_increment: 1.0,
            distance_increment: 50.0,
        }
    }
}

impl CameraLimits {
    /// Build limits from the host's table of numbered UI constants.
    ///
    /// Returns `None` if any row is missing or the resulting limits are inconsistent.
    pub fn from_lookup(mut lookup: impl FnMut(UiConst) -> Option<f32>) -> Option<Self> {
        let mut get = |id: UiConst| {
            let value = lookup(id);
            if value.is_none() {
                warn!("Missing camera constant {id:?} (row {})", id.row());
            }
            value
        };

        let limits = Self {
            pivot_min: Vec3::new(
                get(UiConst::PivotXMin)?,
                get(UiConst::PivotYMin)?,
                get(UiConst::PivotZMin)?,
            ),
            pivot_max: Vec3::new(
                get(UiConst::PivotXMax)?,
                get(UiConst::PivotYMax)?,
                get(UiConst::PivotZMax)?,
            ),
            pitch_min_degrees: get(UiConst::PitchMin)?,
            pitch_max_degrees: get(UiConst::PitchMax)?,
            distance_min: get(UiConst::DistanceMin)?,
            distance_max: get(UiConst::DistanceMax)?,
            angle_increment: get(UiConst::AngleIncrement)?,
            orbit_increment: get(UiConst::OrbitIncrement)?,
            distance_increment: get(UiConst::DistanceIncrement)?,
        };

        if !limits.is_valid() {
            warn!("Rejecting inconsistent camera limits: {limits:?}");
            return None;
        }
        Some(limits)
    }

    /// Every range is finite and non-empty, and the minimum distance is positive.
    pub fn is_valid(&self) -> bool {
        let finite = self.pivot_min.is_finite()
            && self.pivot_max.is_finite()
            && [
                self.pitch_min_degrees,
                self.pitch_max_degrees,
                self.distance_min,
                self.distance_max,
                self.angle_increment,
                self.orbit_increment,
                self.distance_increment,
            ]
            .iter()
            .all(|v| v.is_finite());

        finite
            && self.pivot_min.cmple(self.pivot_max).all()
            && self.pitch_min_degrees <= self.pitch_max_degrees
            && self.distance_min > 0.0
            && self.distance_min <= self.distance_max
    }

    /// The box the pivot must stay in.
    pub fn pivot_box(&self) -> Aabb<Vec3> {
        Aabb::new(self.pivot_min, self.pivot_max)
    }

    /// Lowest camera pitch, in radians.
    pub fn pitch_min(&self) -> f32 {
        self.pitch_min_degrees.to_radians()
    }

    /// Highest camera pitch, in radians.
    pub fn pitch_max(&self) -> f32 {
        self.pitch_max_degrees.to_radians()
    }

    /// The area the free camera's target may roam on the XZ plane: the pivot footprint grown by
    /// the longest camera distance. Generous on purpose; it only stops runaway values.
    pub fn target_envelope(&self) -> Aabb<Vec2> {
        self.pivot_box().to_xz().inflate(self.distance_max)
    }
}

/// Row ids of the camera constants in the host's UI constant table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum UiConst {
    /// [`CameraLimits::orbit_increment`]
    OrbitIncrement = 2,
    /// [`CameraLimits::angle_increment`]
    AngleIncrement = 3,
    /// [`CameraLimits::distance_increment`]
    DistanceIncrement = 4,
    /// [`CameraLimits::distance_min`]
    DistanceMin = 8,
    /// [`CameraLimits::distance_max`]
    DistanceMax = 9,
    /// [`CameraLimits::pitch_min_degrees`]
    PitchMin = 10,
    /// [`CameraLimits::pitch_max_degrees`]
    PitchMax = 11,
    /// X of [`CameraLimits::pivot_min`]
    PivotXMin = 12,
    /// Y of [`CameraLimits::pivot_min`]
    PivotYMin = 13,
    /// Z of [`CameraLimits::pivot_min`]
    PivotZMin = 14,
    /// X of [`CameraLimits::pivot_max`]
    PivotXMax = 15,
    /// Y of [`CameraLimits::pivot_max`]
    PivotYMax = 16,
    /// Z of [`CameraLimits::pivot_max`]
    PivotZMax = 17,
}

impl UiConst {
    /// Every camera constant.
    pub const ALL: [UiConst; 13] = [
        UiConst::OrbitIncrement,
        UiConst::AngleIncrement,
        UiConst::DistanceIncrement,
        UiConst::DistanceMin,
        UiConst::DistanceMax,
        UiConst::PitchMin,
        UiConst::PitchMax,
        UiConst::PivotXMin,
        UiConst::PivotYMin,
        UiConst::PivotZMin,
        UiConst::PivotXMax,
        UiConst::PivotYMax,
        UiConst::PivotZMax,
    ];

    /// The row id in the host's table.
    pub fn row(self) -> u32 {
        self as u32
    }
}
