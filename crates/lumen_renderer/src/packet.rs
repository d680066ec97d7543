//! Eight-wide ray packets.
//!
//! Rays are stored structure-of-arrays in `ultraviolet` wide vectors and move
//! through intersection and shading in lockstep. A lane that has left the
//! computation (missed, fully shaded, or never filled) carries an empty
//! parameter range, so every intersection test rejects it without a
//! separate mask.

use crate::integrator::{bounce_ray, point_light_irradiance};
use crate::{
    Camera, Color, HitRecord, Primitive, PrimitiveId, Reflectance, RenderConfig, Scene,
};
use lumen_math::{Interval, Ray, Vec3};
use rand::rngs::StdRng;
use ultraviolet::{f32x8, Vec3x8};

/// Number of rays traced together.
pub const LANES: usize = 8;

#[inline]
fn wide(v: Vec3) -> ultraviolet::Vec3 {
    ultraviolet::Vec3::new(v.x, v.y, v.z)
}

/// Decode a comparison mask into one flag per lane.
#[inline]
fn lanes(mask: f32x8) -> [bool; LANES] {
    let bits: [f32; LANES] = mask.into();
    bits.map(|m| m.to_bits() != 0)
}

/// A packet of up to [`LANES`] rays.
#[derive(Debug, Clone, Copy)]
pub struct RayPacket {
    origin: Vec3x8,
    direction: Vec3x8,
    t_min: f32x8,
    t_max: f32x8,
}

impl RayPacket {
    /// Pack rays; `None` lanes are inactive.
    pub fn new(rays: &[Option<Ray>; LANES]) -> Self {
        let mut origin = [ultraviolet::Vec3::zero(); LANES];
        let mut direction = [ultraviolet::Vec3::zero(); LANES];
        let mut t_min = [0.0; LANES];
        let mut t_max = [0.0; LANES];

        for (lane, ray) in rays.iter().enumerate() {
            let (o, d, t) = match ray {
                Some(ray) => (ray.origin, ray.direction, ray.t),
                None => (Vec3::ZERO, Vec3::Z, Interval::EMPTY),
            };
            origin[lane] = wide(o);
            direction[lane] = wide(d);
            t_min[lane] = t.min;
            t_max[lane] = t.max;
        }

        Self {
            origin: Vec3x8::from(origin),
            direction: Vec3x8::from(direction),
            t_min: f32x8::from(t_min),
            t_max: f32x8::from(t_max),
        }
    }

    /// Per-lane `t_min <= t < t_max`.
    #[inline]
    fn admits(&self, t: f32x8) -> f32x8 {
        self.t_min.cmp_le(t) & t.cmp_lt(self.t_max)
    }

    /// Nearest admitted root of a sphere in every lane, as `(t, hit mask)`.
    fn intersect_sphere(&self, center: Vec3, radius: f32) -> (f32x8, f32x8) {
        let oc = Vec3x8::splat(wide(center)) - self.origin;
        let a = self.direction.mag_sq();
        let h = self.direction.dot(oc);
        let c = oc.mag_sq() - f32x8::splat(radius * radius);

        // A negative discriminant gives NaN roots, which no lane admits
        let discriminant = h * h - a * c;
        let sqrtd = discriminant.sqrt();
        let near = (h - sqrtd) / a;
        let far = (h + sqrtd) / a;

        let near_ok = self.admits(near);
        let far_ok = self.admits(far);
        (near_ok.blend(near, far), near_ok | far_ok)
    }

    /// Triangle test in every lane, as `(t, hit mask)`.
    fn intersect_triangle(&self, p0: Vec3, e1: Vec3, e2: Vec3, normal: Vec3) -> (f32x8, f32x8) {
        let n = Vec3x8::splat(wide(normal));
        let c = Vec3x8::splat(wide(p0)) - self.origin;
        let r = self.direction.cross(c);
        let inv_det = f32x8::ONE / self.direction.dot(n);

        let u = inv_det * Vec3x8::splat(wide(e2)).dot(r);
        let v = inv_det * Vec3x8::splat(wide(e1)).dot(r);
        let t = inv_det * c.dot(n);

        let inside = f32x8::ZERO.cmp_le(u) & f32x8::ZERO.cmp_le(v) & (u + v).cmp_le(f32x8::ONE);
        (t, inside & self.admits(t))
    }

    /// Closest hit per lane. Lanes keep their `t_max` clipped to the hit.
    pub fn closest_hit(&mut self, scene: &Scene) -> [Option<(PrimitiveId, f32)>; LANES] {
        let mut hits = [None; LANES];

        for (i, sphere) in scene.spheres.iter().enumerate() {
            let (t, mask) = self.intersect_sphere(sphere.center, sphere.radius);
            self.record_hits(&mut hits, PrimitiveId::Sphere(i), t, mask);
        }
        for (i, tri) in scene.triangles.iter().enumerate() {
            let (t, mask) = self.intersect_triangle(tri.p0, tri.e1, tri.e2, tri.normal);
            self.record_hits(&mut hits, PrimitiveId::Triangle(i), t, mask);
        }

        hits
    }

    fn record_hits(
        &mut self,
        hits: &mut [Option<(PrimitiveId, f32)>; LANES],
        id: PrimitiveId,
        t: f32x8,
        mask: f32x8,
    ) {
        self.t_max = mask.blend(t, self.t_max);
        let ts: [f32; LANES] = t.into();
        for (lane, hit) in lanes(mask).iter().enumerate() {
            if *hit {
                hits[lane] = Some((id, ts[lane]));
            }
        }
    }

    /// Any-hit test per lane, skipping each lane's own excluded primitive.
    ///
    /// Lanes drop out as soon as they are blocked; the scan stops once
    /// every lane is blocked or inactive. The packet itself is left as is.
    pub fn occluded(
        &self,
        scene: &Scene,
        exclude: &[Option<PrimitiveId>; LANES],
    ) -> [bool; LANES] {
        let mut blocked = [false; LANES];
        let inactive: [f32; LANES] = self.t_max.into();
        let mut done: [bool; LANES] = inactive.map(|t| t == f32::NEG_INFINITY);

        let ids = (0..scene.spheres.len())
            .map(PrimitiveId::Sphere)
            .chain((0..scene.triangles.len()).map(PrimitiveId::Triangle));

        for id in ids {
            if done.iter().all(|d| *d) {
                break;
            }
            let mask = match scene.get(id) {
                Some(Primitive::Sphere(s)) => self.intersect_sphere(s.center, s.radius).1,
                Some(Primitive::Triangle(tri)) => {
                    self.intersect_triangle(tri.p0, tri.e1, tri.e2, tri.normal).1
                }
                None => continue,
            };
            for (lane, hit) in lanes(mask).iter().enumerate() {
                if *hit && !done[lane] && exclude[lane] != Some(id) {
                    blocked[lane] = true;
                    done[lane] = true;
                }
            }
        }

        blocked
    }
}

/// Trace up to [`LANES`] paths in lockstep.
///
/// Produces, per lane, the same estimator as
/// [`trace_path`](crate::trace_path); inactive lanes return black. Each
/// lane draws from its own RNG.
pub fn trace_packet(
    scene: &Scene,
    rays: [Option<Ray>; LANES],
    config: &RenderConfig,
    rngs: &mut [StdRng; LANES],
) -> [Color; LANES] {
    let mut color = [Color::ZERO; LANES];
    let mut throughput = [Color::ONE; LANES];
    let mut current = rays;

    for _ in 0..config.max_depth {
        if current.iter().all(Option::is_none) {
            break;
        }

        let mut packet = RayPacket::new(&current);
        let hits = packet.closest_hit(scene);

        // Resolve surfaces; lanes that missed end here
        let mut surfaces: [Option<(PrimitiveId, HitRecord)>; LANES] = [None; LANES];
        for lane in 0..LANES {
            surfaces[lane] = match (current[lane], hits[lane]) {
                (Some(ray), Some((id, t))) => scene.record(id, &ray, t).map(|rec| (id, rec)),
                _ => None,
            };
            if surfaces[lane].is_none() {
                current[lane] = None;
            }
        }

        direct_light_packet(
            scene,
            &current,
            &surfaces,
            config.epsilon,
            &throughput,
            &mut color,
        );

        for lane in 0..LANES {
            let Some((_, rec)) = surfaces[lane] else {
                continue;
            };
            current[lane] = Some(bounce_ray(&rec, config.epsilon, &mut rngs[lane]));
            throughput[lane] *= match config.reflectance {
                Reflectance::Fixed(multiplier) => multiplier,
                Reflectance::Albedo => rec.albedo,
            };
        }
    }

    color
}

/// Shadow-ray all lanes against each light in turn.
///
/// A lane leaves the light loop at the first light behind its surface,
/// matching the scalar integrator.
fn direct_light_packet(
    scene: &Scene,
    incoming: &[Option<Ray>; LANES],
    surfaces: &[Option<(PrimitiveId, HitRecord)>; LANES],
    epsilon: f32,
    throughput: &[Color; LANES],
    color: &mut [Color; LANES],
) {
    let mut in_loop: [bool; LANES] = std::array::from_fn(|lane| surfaces[lane].is_some());
    let exclude: [Option<PrimitiveId>; LANES] =
        std::array::from_fn(|lane| surfaces[lane].map(|(id, _)| id));

    for light in &scene.lights {
        let mut shadow_rays: [Option<Ray>; LANES] = [None; LANES];

        for lane in 0..LANES {
            if !in_loop[lane] {
                continue;
            }
            let (Some(ray), Some((_, rec))) = (incoming[lane], surfaces[lane]) else {
                continue;
            };

            let dir = light.position - rec.point;
            if ray.direction().dot(rec.normal) * dir.dot(rec.normal) >= 0.0 {
                in_loop[lane] = false;
                continue;
            }
            shadow_rays[lane] = Some(Ray::new(rec.point, dir, epsilon, 1.0));
        }

        if shadow_rays.iter().all(Option::is_none) {
            break;
        }

        let blocked = RayPacket::new(&shadow_rays).occluded(scene, &exclude);

        for lane in 0..LANES {
            let (Some(_), Some((_, rec))) = (shadow_rays[lane], surfaces[lane]) else {
                continue;
            };
            if blocked[lane] {
                continue;
            }
            let irradiance =
                point_light_irradiance(light.position, light.intensity, rec.point, rec.normal);
            color[lane] += throughput[lane] * irradiance;
        }
    }
}

/// Average `config.samples_per_pixel` samples of image point `(s, t)`,
/// tracing them [`LANES`] at a time.
pub fn render_pixel_packet(
    camera: &Camera,
    scene: &Scene,
    s: f32,
    t: f32,
    config: &RenderConfig,
    rngs: &mut [StdRng; LANES],
) -> Color {
    let camera_ray = camera.get_ray(s, t);
    let samples = config.samples_per_pixel as usize;
    let mut pixel_color = Color::ZERO;

    for chunk_start in (0..samples).step_by(LANES) {
        let active = (samples - chunk_start).min(LANES);
        let rays: [Option<Ray>; LANES] =
            std::array::from_fn(|lane| (lane < active).then_some(camera_ray));

        let colors = trace_packet(scene, rays, config, rngs);
        pixel_color += colors.iter().take(active).copied().sum::<Color>();
    }

    pixel_color / config.samples_per_pixel as f32
}
