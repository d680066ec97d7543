use crate::{Interval, Vec3};

/// A ray in 3D space with origin, direction, and a valid parameter range.
///
/// The direction is not required to be normalized. `t.max` is lowered as
/// closer intersections are found, so a single pass over a list of
/// primitives leaves the ray clipped to the nearest one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub t: Interval,
}

impl Ray {
    /// Create a new ray valid over `[t_min, t_max)`.
    pub fn new(origin: Vec3, direction: Vec3, t_min: f32, t_max: f32) -> Self {
        Self {
            origin,
            direction,
            t: Interval::new(t_min, t_max),
        }
    }

    /// Create a ray valid for every non-negative parameter.
    pub fn forward(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            t: Interval::FORWARD,
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn t_min(&self) -> f32 {
        self.t.min
    }

    #[inline]
    pub fn t_max(&self) -> f32 {
        self.t.max
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether an intersection at `t` would be accepted.
    ///
    /// The lower bound is inclusive, the upper bound exclusive: once the
    /// ray has been clipped to a hit, only strictly closer hits pass.
    #[inline]
    pub fn admits(&self, t: f32) -> bool {
        self.t.admits(t)
    }

    /// Shrink the valid range so that nothing at or beyond `t` is accepted.
    #[inline]
    pub fn clip(&mut self, t: f32) {
        self.t.shrink_to(t);
    }
}
