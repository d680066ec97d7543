//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    Color,
};
use lumen_math::{Ray, Vec3};
use serde::{Deserialize, Serialize};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub albedo: Color,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, albedo: Color) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            albedo,
        }
    }

    /// Solve for the nearest admitted root along `ray`.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray.admits(root) {
            root = (h + sqrtd) / a;
            if !ray.admits(root) {
                return None;
            }
        }

        Some(root)
    }

    /// Surface data for a hit at parameter `t` along `ray`.
    pub fn record(&self, ray: &Ray, t: f32) -> HitRecord {
        let mut rec = HitRecord {
            point: ray.at(t),
            albedo: self.albedo,
            t,
            ..Default::default()
        };
        let outward_normal = (rec.point - self.center).normalize();
        rec.set_face_normal(ray, outward_normal);
        rec
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &mut Ray, rec: &mut HitRecord) -> bool {
        let Some(t) = self.intersect(ray) else {
            return false;
        };

        ray.clip(t);
        *rec = self.record(ray, t);

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey_sphere() -> Sphere {
        Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Color::splat(0.5))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = grey_sphere();
        let mut ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.001, f32::MAX);
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&mut ray, &mut rec));
        assert!((rec.t - 0.5).abs() < 0.001); // Should hit at t=0.5
        assert_eq!(rec.albedo, Color::splat(0.5));
    }

    #[test]
    fn test_sphere_axis_hit_normal() {
        let sphere = grey_sphere();
        let mut ray = Ray::forward(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&mut ray, &mut rec));

        // Near root on the axis, normal parallel to (point - center)
        assert!((rec.point - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-5);
        let radial = (rec.point - sphere.center).normalize();
        assert!(rec.normal.cross(radial).length() < 1e-5);
        assert!((rec.normal.length() - 1.0).abs() < 1e-5);
        assert!(rec.normal.dot(ray.direction()) < 0.0);
    }

    #[test]
    fn test_sphere_hit_clips_ray() {
        let sphere = grey_sphere();
        let mut ray = Ray::forward(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&mut ray, &mut rec));
        assert_eq!(ray.t_max(), rec.t);

        // Same sphere cannot be reported again at the same distance
        assert!(!sphere.hit(&mut ray, &mut rec));
    }

    #[test]
    fn test_sphere_inside_hit_faces_ray() {
        let sphere = grey_sphere();
        // Start at the center, the only admitted root is the far one
        let mut ray = Ray::forward(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&mut ray, &mut rec));
        assert!((rec.t - 0.5).abs() < 1e-5);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = grey_sphere();

        // Ray pointing away from sphere
        let mut ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.001, f32::MAX);
        let mut rec = HitRecord::default();

        assert!(!sphere.hit(&mut ray, &mut rec));
        assert_eq!(ray.t_max(), f32::MAX);
        assert_eq!(rec, HitRecord::default());
    }

    #[test]
    fn test_sphere_rejects_out_of_range() {
        let sphere = grey_sphere();
        let mut ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0, 0.25);
        let mut rec = HitRecord::default();

        assert!(!sphere.hit(&mut ray, &mut rec));
    }
}
