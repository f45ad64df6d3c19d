use bevy_math::prelude::*;

/// Projects a point onto the XZ (ground) plane.
pub trait ToGround {
    /// Drop the Y coordinate, giving a point on the XZ plane as `(x, z)`.
    fn to_xz(self) -> Vec2;
}

impl ToGround for Vec3 {
    #[inline]
    fn to_xz(self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }
}

/// Lifts a point on the XZ (ground) plane back into 3D.
pub trait InsertY {
    /// Treat `self` as `(x, z)` and add a Y coordinate.
    fn insert_y(self, y: f32) -> Vec3;
}

impl InsertY for Vec2 {
    #[inline]
    fn insert_y(self, y: f32) -> Vec3 {
        Vec3::new(self.x, y, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_round_trip_keeps_height() {
        let p = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(p.to_xz(), Vec2::new(1.0, 3.0));
        assert_eq!(p.to_xz().insert_y(p.y), p);
    }
}
