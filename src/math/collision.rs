//! Analytic nearest-point and intersection queries on lines, circles and axis-aligned boxes.
//!
//! The primitives are generic over [`Point`], which is implemented for [`Vec2`] and [`Vec3`], so
//! the same line/box clipping serves both the top-down (XZ) view and the full 3D camera rig.

use core::{
    fmt::Debug,
    ops::{Add, Index, Mul, Sub},
};

use bevy_math::prelude::*;

/// Below this, lengths and slopes are treated as zero.
const EPSILON: f32 = 1e-6;

/// A point (or vector) with a fixed number of `f32` axes.
pub trait Point:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + Index<usize, Output = f32>
{
    /// Number of axes, and so the number of slab pairs a box has.
    const AXES: usize;

    /// A point with every axis set to `value`.
    fn splat(value: f32) -> Self;

    /// Dot product.
    fn dot(self, other: Self) -> f32;

    /// Euclidean length.
    fn length(self) -> f32;

    /// Component-wise clamp.
    fn clamp(self, min: Self, max: Self) -> Self;
}

impl Point for Vec2 {
    const AXES: usize = 2;

    fn splat(value: f32) -> Self {
        Vec2::splat(value)
    }

    fn dot(self, other: Self) -> f32 {
        Vec2::dot(self, other)
    }

    fn length(self) -> f32 {
        Vec2::length(self)
    }

    fn clamp(self, min: Self, max: Self) -> Self {
        Vec2::clamp(self, min, max)
    }
}

impl Point for Vec3 {
    const AXES: usize = 3;

    fn splat(value: f32) -> Self {
        Vec3::splat(value)
    }

    fn dot(self, other: Self) -> f32 {
        Vec3::dot(self, other)
    }

    fn length(self) -> f32 {
        Vec3::length(self)
    }

    fn clamp(self, min: Self, max: Self) -> Self {
        Vec3::clamp(self, min, max)
    }
}

/// Clip the parametrized line `origin + t * d` against every slab of `aabb`, starting from the
/// interval `[t0, t1]`. This is the Liang-Barsky algorithm: each face is an oriented half-space,
/// and we cut away the part of the interval that lies on its outer side.
fn clip<P: Point>(origin: P, d: P, aabb: &Aabb<P>, mut t0: f32, mut t1: f32) -> Option<(f32, f32)> {
    for axis in 0..P::AXES {
        let faces = [
            (-d[axis], origin[axis] - aabb.min[axis]),
            (d[axis], aabb.max[axis] - origin[axis]),
        ];
        for (p, q) in faces {
            if p.abs() < EPSILON {
                // Parallel to this face: either entirely inside the slab or entirely outside.
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    (t0 <= t1).then_some((t0, t1))
}

/// An infinite line through two points, parametrized as `a + t * (b - a)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line<P> {
    /// The point at `t = 0`.
    pub a: P,
    /// The point at `t = 1`.
    pub b: P,
}

impl<P: Point> Line<P> {
    /// Create a line through `a` and `b`.
    pub fn new(a: P, b: P) -> Self {
        Self { a, b }
    }

    /// The point at parameter `t`.
    pub fn at(&self, t: f32) -> P {
        self.a + (self.b - self.a) * t
    }

    /// The orthogonal projection of `point` onto the line, and its parameter.
    ///
    /// Returns `None` if the two defining points coincide.
    pub fn closest(&self, point: P) -> Option<(P, f32)> {
        let ab = self.b - self.a;
        let len_sq = ab.dot(ab);
        if len_sq < EPSILON {
            return None;
        }
        let t = (point - self.a).dot(ab) / len_sq;
        Some((self.at(t), t))
    }

    /// The parameter interval `(t_near, t_far)` of the part of the line inside `aabb`, or `None`
    /// if the line never enters it.
    pub fn intersects(&self, aabb: &Aabb<P>) -> Option<(f32, f32)> {
        clip(
            self.a,
            self.b - self.a,
            aabb,
            f32::NEG_INFINITY,
            f32::INFINITY,
        )
    }
}

/// A line segment between two endpoints, parametrized over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<P> {
    /// Start of the segment, `t = 0`.
    pub a: P,
    /// End of the segment, `t = 1`.
    pub b: P,
}

impl<P: Point> Segment<P> {
    /// Create a segment from `a` to `b`.
    pub fn new(a: P, b: P) -> Self {
        Self { a, b }
    }

    /// The point at parameter `t`. Values outside `[0, 1]` extrapolate.
    pub fn at(&self, t: f32) -> P {
        self.a + (self.b - self.a) * t
    }

    /// The point on the segment nearest `point`, and its parameter in `[0, 1]`.
    ///
    /// A zero-length segment returns its start point.
    pub fn closest(&self, point: P) -> (P, f32) {
        let ab = self.b - self.a;
        let len_sq = ab.dot(ab);
        if len_sq < EPSILON {
            return (self.a, 0.0);
        }
        let t = ((point - self.a).dot(ab) / len_sq).clamp(0.0, 1.0);
        (self.at(t), t)
    }

    /// Length of the segment.
    pub fn length(&self) -> f32 {
        (self.b - self.a).length()
    }

    /// The sub-segment between parameters `t` and `s`.
    pub fn restrict(&self, t: f32, s: f32) -> Self {
        Self::new(self.at(t), self.at(s))
    }

    /// The parameter interval within `[0, 1]` of the part of the segment inside `aabb`.
    pub fn intersects(&self, aabb: &Aabb<P>) -> Option<(f32, f32)> {
        clip(self.a, self.b - self.a, aabb, 0.0, 1.0)
    }
}

/// The boundary of a circle on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Centre of the circle.
    pub center: Vec2,
    /// Radius of the circle.
    pub radius: f32,
}

impl Circle {
    /// Create a circle.
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// The point on the circle at `angle` radians, measured from +Y towards +X.
    pub fn at(&self, angle: f32) -> Vec2 {
        let (s, c) = angle.sin_cos();
        self.center + self.radius * Vec2::new(s, c)
    }

    /// The point on the circle nearest `point`.
    ///
    /// Every point on the circle is equally close to the centre, so a point at the centre maps to
    /// `center + radius * X`.
    pub fn closest(&self, point: Vec2) -> Vec2 {
        let direction = point - self.center;
        let distance = direction.length();
        if distance < EPSILON {
            return self.center + self.radius * Vec2::X;
        }
        self.center + direction * (self.radius / distance)
    }
}

/// An axis-aligned box given by two opposite corners.
///
/// `min` is expected to be component-wise less than or equal to `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<P> {
    /// Minimum corner.
    pub min: P,
    /// Maximum corner.
    pub max: P,
}

impl<P: Point> Aabb<P> {
    /// Create a box from its minimum and maximum corners.
    pub fn new(min: P, max: P) -> Self {
        Self { min, max }
    }

    /// Is `point` inside the box, faces included?
    pub fn contains(&self, point: P) -> bool {
        (0..P::AXES).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }

    /// The point in the box nearest `point`.
    pub fn closest(&self, point: P) -> P {
        point.clamp(self.min, self.max)
    }

    /// Grow the box by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(self.min - P::splat(margin), self.max + P::splat(margin))
    }
}

impl Aabb<Vec3> {
    /// The footprint of the box on the XZ plane.
    pub fn to_xz(&self) -> Aabb<Vec2> {
        Aabb::new(
            Vec2::new(self.min.x, self.min.z),
            Vec2::new(self.max.x, self.max.z),
        )
    }
}
