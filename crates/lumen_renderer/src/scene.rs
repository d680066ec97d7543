//! Flat scene aggregate with brute-force closest-hit and occlusion queries.
//!
//! Primitives live in plain vectors and are addressed by [`PrimitiveId`].
//! There is no spatial index: every query scans every primitive.

use crate::{Color, HitRecord, Hittable, Sphere, Triangle};
use lumen_math::{Ray, Vec3};
use serde::{Deserialize, Serialize};

/// A point light with inverse-square falloff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: Color,
}

impl PointLight {
    pub fn new(position: Vec3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

/// Handle to a primitive stored in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveId {
    Sphere(usize),
    Triangle(usize),
}

/// Borrowed view of a primitive resolved from a [`PrimitiveId`].
#[derive(Debug, Clone, Copy)]
pub enum Primitive<'a> {
    Sphere(&'a Sphere),
    Triangle(&'a Triangle),
}

/// Spheres, triangles and point lights. Read-only while rendering.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub triangles: Vec<Triangle>,
    pub lights: Vec<PointLight>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sphere(&mut self, sphere: Sphere) -> PrimitiveId {
        self.spheres.push(sphere);
        PrimitiveId::Sphere(self.spheres.len() - 1)
    }

    pub fn add_triangle(&mut self, triangle: Triangle) -> PrimitiveId {
        self.triangles.push(triangle);
        PrimitiveId::Triangle(self.triangles.len() - 1)
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Add a planar quad as the two triangles `(a, b, c)` and `(a, c, d)`.
    ///
    /// Corners must be given in winding order around the quad.
    pub fn add_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, albedo: Color) {
        self.add_triangle(Triangle::new(a, b, c, albedo));
        self.add_triangle(Triangle::new(a, c, d, albedo));
    }

    /// Number of spheres and triangles.
    pub fn primitive_count(&self) -> usize {
        self.spheres.len() + self.triangles.len()
    }

    /// True when there is nothing a ray could hit.
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }

    /// Resolve a handle, or `None` if it does not belong to this scene.
    pub fn get(&self, id: PrimitiveId) -> Option<Primitive<'_>> {
        match id {
            PrimitiveId::Sphere(i) => self.spheres.get(i).map(Primitive::Sphere),
            PrimitiveId::Triangle(i) => self.triangles.get(i).map(Primitive::Triangle),
        }
    }

    /// Surface data of primitive `id` hit at parameter `t` along `ray`.
    pub fn record(&self, id: PrimitiveId, ray: &Ray, t: f32) -> Option<HitRecord> {
        match self.get(id)? {
            Primitive::Sphere(sphere) => Some(sphere.record(ray, t)),
            Primitive::Triangle(triangle) => Some(triangle.record(ray, t)),
        }
    }

    /// Find the nearest primitive along `ray`.
    ///
    /// Spheres are scanned before triangles. Every accepted hit clips the
    /// ray, so a later primitive only replaces the record when it is
    /// strictly closer and one pass yields the global closest hit.
    pub fn closest_hit(&self, ray: &mut Ray, rec: &mut HitRecord) -> Option<PrimitiveId> {
        let mut hit = None;

        for (i, sphere) in self.spheres.iter().enumerate() {
            if sphere.hit(ray, rec) {
                hit = Some(PrimitiveId::Sphere(i));
            }
        }
        for (i, triangle) in self.triangles.iter().enumerate() {
            if triangle.hit(ray, rec) {
                hit = Some(PrimitiveId::Triangle(i));
            }
        }

        hit
    }

    /// Any-hit test for shadow rays, ignoring the surface the ray leaves.
    pub fn occluded(&self, ray: &mut Ray, exclude: PrimitiveId) -> bool {
        let mut rec = HitRecord::default();

        let spheres = self
            .spheres
            .iter()
            .enumerate()
            .filter(|(i, _)| exclude != PrimitiveId::Sphere(*i));
        for (_, sphere) in spheres {
            if sphere.hit(ray, &mut rec) {
                return true;
            }
        }

        let triangles = self
            .triangles
            .iter()
            .enumerate()
            .filter(|(i, _)| exclude != PrimitiveId::Triangle(*i));
        for (_, triangle) in triangles {
            if triangle.hit(ray, &mut rec) {
                return true;
            }
        }

        false
    }

    /// The reference box: a unit cube open towards +z with red and green
    /// side walls, white back, floor and ceiling, one sphere and one light.
    pub fn cornell_box() -> Self {
        let red = Color::new(0.65, 0.05, 0.05);
        let green = Color::new(0.12, 0.45, 0.15);
        let white = Color::new(0.73, 0.73, 0.73);
        let brown = Color::new(0.62, 0.57, 0.54);

        let mut scene = Scene::new();
        scene.add_sphere(Sphere::new(Vec3::new(0.5, 0.2, -0.25), 0.2, brown));

        // left
        scene.add_quad(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, -1.0),
            Vec3::new(0.0, 0.0, -1.0),
            red,
        );
        // back
        scene.add_quad(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            white,
        );
        // right
        scene.add_quad(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            green,
        );
        // ceiling
        scene.add_quad(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, 0.0),
            white,
        );
        // floor
        scene.add_quad(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 0.0),
            white,
        );

        scene.add_light(PointLight::new(
            Vec3::new(0.95, 0.95, 0.3),
            Color::splat(0.9),
        ));

        log::debug!(
            "Built reference box: {} spheres, {} triangles, {} lights",
            scene.spheres.len(),
            scene.triangles.len(),
            scene.lights.len()
        );

        scene
    }
}
