//! Hittable trait and HitRecord for ray-object intersection.

use crate::Color;
use lumen_math::{Ray, Vec3};

/// Record of a ray-object intersection.
///
/// One record is reused across a whole closest-hit pass; every successful
/// `hit` overwrites it, so after the pass it describes the nearest surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal, always facing the incoming ray
    pub normal: Vec3,
    /// Diffuse albedo of the surface
    pub albedo: Color,
    /// Parameter t where the intersection occurs
    pub t: f32,
}

impl HitRecord {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// `outward_normal` must be unit length. The stored normal always
    /// points against the ray, whichever side of the surface was hit.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        let front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the ray's valid range.
    ///
    /// On a hit the ray is clipped to the hit parameter and the record is
    /// filled in. Misses leave both untouched.
    fn hit(&self, ray: &mut Ray, rec: &mut HitRecord) -> bool;
}
