//! Triangle primitive for ray tracing.
//!
//! Intersection solves the ray/plane system with Cramer's rule, which is
//! equivalent to Möller-Trumbore but keeps the unnormalized face normal
//! as the shared determinant term.

use crate::{
    hittable::{HitRecord, Hittable},
    Color,
};
use lumen_math::{Ray, Vec3};

/// A triangle primitive.
///
/// Degenerate (zero-area) triangles are not supported: the intersection
/// divides by `direction · normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Reference vertex
    pub(crate) p0: Vec3,
    /// `p0 - p1`
    pub(crate) e1: Vec3,
    /// `p2 - p0`
    pub(crate) e2: Vec3,
    /// `e1 × e2`, not normalized
    pub(crate) normal: Vec3,
    albedo: Color,
}

/// Parameter and barycentric coordinates of a ray/triangle intersection.
///
/// `u` weights the second vertex and `v` the third.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, albedo: Color) -> Self {
        let e1 = p0 - p1;
        let e2 = p2 - p0;

        Self {
            p0,
            e1,
            e2,
            normal: e1.cross(e2),
            albedo,
        }
    }

    /// The three vertices in construction order.
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.p0, self.p0 - self.e1, self.p0 + self.e2]
    }

    /// Unnormalized face normal.
    pub fn face_normal(&self) -> Vec3 {
        self.normal
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    /// Intersect without touching the ray or a record.
    ///
    /// A ray parallel to the plane produces a non-finite determinant; every
    /// comparison below then fails and the ray is reported as a miss.
    pub fn barycentric(&self, ray: &Ray) -> Option<TriangleHit> {
        let c = self.p0 - ray.origin();
        let r = ray.direction().cross(c);
        let inv_det = 1.0 / ray.direction().dot(self.normal);

        let u = inv_det * self.e2.dot(r);
        let v = inv_det * self.e1.dot(r);

        if u >= 0.0 && v >= 0.0 && (u + v) <= 1.0 {
            let t = inv_det * c.dot(self.normal);
            if ray.admits(t) {
                return Some(TriangleHit { t, u, v });
            }
        }

        None
    }

    /// Surface data for a hit at parameter `t` along `ray`.
    pub fn record(&self, ray: &Ray, t: f32) -> HitRecord {
        let mut rec = HitRecord {
            point: ray.at(t),
            albedo: self.albedo,
            t,
            ..Default::default()
        };
        rec.set_face_normal(ray, self.normal.normalize());
        rec
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &mut Ray, rec: &mut HitRecord) -> bool {
        let Some(TriangleHit { t, .. }) = self.barycentric(ray) else {
            return false;
        };

        ray.clip(t);
        *rec = self.record(ray, t);

        true
    }
}
