//! Camera for ray generation.

use lumen_math::{Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Pinhole camera mapping normalized image coordinates to world rays.
///
/// The basis and image plane are computed once in [`Camera::new`]; the
/// camera is immutable afterwards and can be shared between threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Create a camera.
    ///
    /// `vfov` is the vertical field of view in degrees. `vup` must not be
    /// parallel to the viewing direction.
    pub fn new(look_from: Vec3, look_at: Vec3, vup: Vec3, vfov: f32, aspect: f32) -> Self {
        let theta = vfov.to_radians();
        let viewport_height = 2.0 * (theta / 2.0).tan();
        let viewport_width = viewport_height * aspect;

        // Camera basis: w points backwards, v is vup with its w component removed
        let w = (look_from - look_at).normalize();
        let v = (vup - vup.dot(w) * w).normalize();
        let u = v.cross(w);

        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left_corner = look_from - horizontal / 2.0 - vertical / 2.0 - w;

        Self {
            origin: look_from,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
        }
    }

    /// Ray from the eye through image-plane point `(s, t)`.
    ///
    /// `(0, 0)` is the lower-left corner and `(1, 1)` the upper-right.
    pub fn get_ray(&self, s: f32, t: f32) -> Ray {
        Ray::forward(
            self.origin,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin,
        )
    }

    /// Orthonormal basis `(u, v, w)`: right, up, backwards.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }
}

/// Serializable camera parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraDesc {
    pub look_from: Vec3,
    pub look_at: Vec3,
    #[serde(default = "CameraDesc::default_vup")]
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
}

impl CameraDesc {
    fn default_vup() -> Vec3 {
        Vec3::Y
    }

    /// Build a camera for an image of the given aspect ratio.
    pub fn build(&self, aspect: f32) -> Camera {
        Camera::new(self.look_from, self.look_at, self.vup, self.vfov, aspect)
    }
}

impl Default for CameraDesc {
    /// Framing of the reference box.
    fn default() -> Self {
        Self {
            look_from: Vec3::new(0.5, 0.5, 1.0),
            look_at: Vec3::new(0.5, 0.5, 0.0),
            vup: Vec3::Y,
            vfov: 55.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_basis_orthonormal() {
        let camera = Camera::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-2.0, 0.5, 0.0),
            Vec3::new(0.2, 1.0, 0.1),
            40.0,
            1.5,
        );
        let (u, v, w) = camera.basis();

        for axis in [u, v, w] {
            assert!((axis.length() - 1.0).abs() < 1e-5);
        }
        assert!(u.dot(v).abs() < 1e-5);
        assert!(v.dot(w).abs() < 1e-5);
        assert!(u.dot(w).abs() < 1e-5);
    }

    #[test]
    fn test_camera_center_ray() {
        let camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y, 90.0, 1.0);

        let ray = camera.get_ray(0.5, 0.5);
        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((ray.direction() + Vec3::Z).length() < 1e-6);
        assert_eq!(ray.t_min(), 0.0);
        assert_eq!(ray.t_max(), f32::MAX);
    }

    #[test]
    fn test_camera_corners() {
        // 90 degree fov: the image plane at distance 1 spans [-1, 1]
        let camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y, 90.0, 2.0);

        let lower_left = camera.get_ray(0.0, 0.0).direction();
        assert!((lower_left - Vec3::new(-2.0, -1.0, -1.0)).length() < 1e-5);

        let upper_right = camera.get_ray(1.0, 1.0).direction();
        assert!((upper_right - Vec3::new(2.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_camera_desc_build() {
        let camera = CameraDesc::default().build(1.0);
        let ray = camera.get_ray(0.5, 0.5);

        assert_eq!(ray.origin(), Vec3::new(0.5, 0.5, 1.0));
        assert!((ray.direction().normalize() + Vec3::Z).length() < 1e-5);
    }
}
