//! Path integrator.
//!
//! Each sample follows one path: at every vertex the point lights are
//! sampled with shadow rays, then a diffuse bounce picks the next segment.
//! Paths end on a miss or after `max_depth` segments; there is no
//! Russian roulette.

use crate::sampling::uniform_sample_sphere;
use crate::{Color, HitRecord, PrimitiveId, Reflectance, RenderConfig, Scene};
use lumen_math::{Ray, Vec3};
use rand::RngCore;

/// Estimate the radiance arriving along `ray`.
///
/// The scene is only read; all state lives on this call's stack, so any
/// number of paths can be traced concurrently against one scene.
pub fn trace_path(
    scene: &Scene,
    mut ray: Ray,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut color = Color::ZERO;
    let mut throughput = Color::ONE;

    for _ in 0..config.max_depth {
        let mut rec = HitRecord::default();
        let Some(hit_id) = scene.closest_hit(&mut ray, &mut rec) else {
            // Background contributes nothing
            break;
        };

        color += throughput * direct_light(scene, &ray, &rec, hit_id, config.epsilon);

        ray = bounce_ray(&rec, config.epsilon, rng);
        throughput *= match config.reflectance {
            Reflectance::Fixed(multiplier) => multiplier,
            Reflectance::Albedo => rec.albedo,
        };
    }

    color
}

/// Unattenuated light arriving at a hit point from the scene's point lights.
///
/// The light loop stops at the first light that lies on the far side of the
/// surface. Lights after it are not evaluated for this vertex, even when
/// they would be visible.
pub fn direct_light(
    scene: &Scene,
    incoming: &Ray,
    rec: &HitRecord,
    hit_id: PrimitiveId,
    epsilon: f32,
) -> Color {
    let mut radiance = Color::ZERO;
    let facing = incoming.direction().dot(rec.normal);

    for light in &scene.lights {
        let to_light = light.position - rec.point;

        // Light and viewer must be on the same side of the surface
        if facing * to_light.dot(rec.normal) >= 0.0 {
            break;
        }

        // Parameter 1 lands on the light itself
        let mut shadow_ray = Ray::new(rec.point, to_light, epsilon, 1.0);
        if !scene.occluded(&mut shadow_ray, hit_id) {
            radiance +=
                point_light_irradiance(light.position, light.intensity, rec.point, rec.normal);
        }
    }

    radiance
}

/// Diffuse continuation: the normal plus a uniform point on the unit sphere.
///
/// The sum is used as is. A sample landing on `-normal` gives a zero
/// direction, and the following closest-hit test misses.
pub fn bounce_ray(rec: &HitRecord, epsilon: f32, rng: &mut dyn RngCore) -> Ray {
    let direction = rec.normal + uniform_sample_sphere(rng);
    Ray::new(rec.point, direction, epsilon, f32::MAX)
}

/// Radiance a single unoccluded light delivers to a surface point, without
/// any throughput: `I / d^2` scaled by `cos / d` against the unnormalized
/// offset.
pub(crate) fn point_light_irradiance(
    light_position: Vec3,
    intensity: Color,
    point: Vec3,
    normal: Vec3,
) -> Color {
    let to_light = light_position - point;
    let dist2 = to_light.length_squared();
    intensity / dist2 * to_light.dot(normal) / dist2.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PointLight, Sphere, Triangle};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn floor_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_quad(
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(-10.0, 0.0, 10.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(10.0, 0.0, -10.0),
            Color::splat(0.8),
        );
        scene
    }

    #[test]
    fn test_empty_scene_is_black() {
        let scene = Scene::new();
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        for dir in [Vec3::X, Vec3::Y, -Vec3::Z, Vec3::new(1.0, -2.0, 0.5)] {
            let ray = Ray::forward(Vec3::ZERO, dir);
            assert_eq!(trace_path(&scene, ray, &config, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_no_lights_is_black() {
        let scene = floor_scene();
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(2);

        let ray = Ray::forward(Vec3::new(0.3, 1.0, 0.1), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(trace_path(&scene, ray, &config, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_single_bounce_matches_analytic_direct_light() {
        let mut scene = floor_scene();
        let light = PointLight::new(Vec3::new(0.0, 2.0, 0.0), Color::splat(4.0));
        scene.add_light(light);

        // Floor only: every bounce leaves the floor and escapes
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let ray = Ray::forward(Vec3::new(0.3, 1.0, 0.1), Vec3::new(0.0, -1.0, 0.0));

        let color = trace_path(&scene, ray, &config, &mut rng);
        let expected = point_light_irradiance(
            light.position,
            light.intensity,
            Vec3::new(0.3, 0.0, 0.1),
            Vec3::Y,
        );

        assert!(
            (color - expected).length() < 1e-4,
            "{color:?} vs {expected:?}"
        );
        // Inverse square with cosine: never more than I / d^2
        let dist2 = (light.position - Vec3::new(0.3, 0.0, 0.1)).length_squared();
        assert!(color.x < 4.0 / dist2);
    }

    #[test]
    fn test_light_below_surface_contributes_nothing() {
        let mut scene = floor_scene();
        let below = PointLight::new(Vec3::new(0.0, -2.0, 0.0), Color::splat(4.0));
        scene.add_light(below);

        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let ray = Ray::forward(Vec3::new(0.3, 1.0, 0.1), Vec3::new(0.0, -1.0, 0.0));

        assert_eq!(trace_path(&scene, ray, &config, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_light_loop_stops_at_first_back_facing_light() {
        let above = PointLight::new(Vec3::new(0.0, 2.0, 0.0), Color::splat(4.0));
        let below = PointLight::new(Vec3::new(0.0, -2.0, 0.0), Color::splat(4.0));

        let mut rec = HitRecord::default();
        let mut ray = Ray::forward(Vec3::new(0.3, 1.0, 0.1), Vec3::new(0.0, -1.0, 0.0));
        let mut visible_first = floor_scene();
        let hit_id = visible_first.closest_hit(&mut ray, &mut rec).unwrap();
        visible_first.add_light(above);
        visible_first.add_light(below);

        let mut hidden_first = floor_scene();
        hidden_first.add_light(below);
        hidden_first.add_light(above);

        let incoming = Ray::forward(Vec3::new(0.3, 1.0, 0.1), Vec3::new(0.0, -1.0, 0.0));
        let lit = direct_light(&visible_first, &incoming, &rec, hit_id, 1e-4);
        let dark = direct_light(&hidden_first, &incoming, &rec, hit_id, 1e-4);

        assert!(lit.x > 0.0);
        assert_eq!(dark, Color::ZERO);
    }

    #[test]
    fn test_occluded_light_contributes_nothing() {
        let mut scene = floor_scene();
        scene.add_light(PointLight::new(Vec3::new(0.0, 2.0, 0.0), Color::splat(4.0)));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 0.3, Color::ONE));

        let mut ray = Ray::forward(Vec3::new(0.2, 0.5, 0.9), Vec3::new(0.0, -0.5, -1.0));
        let mut rec = HitRecord::default();
        let hit_id = scene.closest_hit(&mut ray, &mut rec).unwrap();
        assert!(matches!(hit_id, PrimitiveId::Triangle(_)));

        let incoming = Ray::forward(Vec3::new(0.2, 0.5, 0.9), Vec3::new(0.0, -0.5, -1.0));
        let radiance = direct_light(&scene, &incoming, &rec, hit_id, 1e-4);
        assert_eq!(radiance, Color::ZERO);
    }

    #[test]
    fn test_bounce_ray_leaves_surface() {
        let rec = HitRecord {
            point: Vec3::new(1.0, 2.0, 3.0),
            normal: Vec3::Y,
            albedo: Color::ONE,
            t: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..256 {
            let ray = bounce_ray(&rec, 1e-3, &mut rng);
            assert_eq!(ray.origin(), rec.point);
            assert!(ray.direction().dot(Vec3::Y) >= 0.0);
            assert_eq!(ray.t_min(), 1e-3);
            assert_eq!(ray.t_max(), f32::MAX);
        }
    }

    #[test]
    fn test_bounce_direction_is_normal_plus_sphere_sample() {
        let rec = HitRecord {
            point: Vec3::new(0.5, 0.0, 0.5),
            normal: Vec3::Y,
            albedo: Color::ONE,
            t: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(9);
        let mut replay = rng.clone();

        for _ in 0..64 {
            let ray = bounce_ray(&rec, 1e-4, &mut rng);
            let expected = Vec3::Y + uniform_sample_sphere(&mut replay);
            assert_eq!(ray.direction(), expected);
        }
    }

    #[test]
    fn test_zero_bounce_direction_hits_nothing() {
        // What `bounce_ray` yields when the sample lands on -normal
        let scene = Scene::cornell_box();
        let mut ray = Ray::new(Vec3::new(0.5, 0.5, -0.5), Vec3::ZERO, 1e-4, f32::MAX);
        let mut rec = HitRecord::default();

        assert_eq!(scene.closest_hit(&mut ray, &mut rec), None);
    }

    #[test]
    fn test_max_depth_bounds_path() {
        let mut scene = Scene::cornell_box();
        // Cap in front of the box so more paths find a second surface
        scene.add_triangle(Triangle::new(
            Vec3::new(-1.0, -1.0, 0.5),
            Vec3::new(3.0, -1.0, 0.5),
            Vec3::new(-1.0, 3.0, 0.5),
            Color::ONE,
        ));

        let ray = Ray::forward(Vec3::new(0.4, 0.6, 0.2), Vec3::new(0.0, 0.0, -1.0));
        let shallow = RenderConfig {
            max_depth: 1,
            ..Default::default()
        };
        let deep = RenderConfig {
            max_depth: 6,
            ..Default::default()
        };

        let n = 256;
        let mut rng = StdRng::seed_from_u64(6);
        let one: Color = (0..n)
            .map(|_| trace_path(&scene, ray, &shallow, &mut rng))
            .sum::<Color>()
            / n as f32;
        let many: Color = (0..n)
            .map(|_| trace_path(&scene, ray, &deep, &mut rng))
            .sum::<Color>()
            / n as f32;

        // Extra bounces only ever add light
        assert!(one.x > 0.0);
        assert!(many.x > one.x);
    }

    #[test]
    fn test_albedo_reflectance_uses_surface_color() {
        let mut scene = Scene::cornell_box();
        scene.add_triangle(Triangle::new(
            Vec3::new(-1.0, -1.0, 0.5),
            Vec3::new(3.0, -1.0, 0.5),
            Vec3::new(-1.0, 3.0, 0.5),
            Color::ONE,
        ));

        let ray = Ray::forward(Vec3::new(0.4, 0.6, 0.2), Vec3::new(0.0, 0.0, -1.0));
        let black = RenderConfig {
            reflectance: Reflectance::Fixed(Color::ZERO),
            ..Default::default()
        };
        let albedo = RenderConfig {
            reflectance: Reflectance::Albedo,
            ..Default::default()
        };

        let mut rng = StdRng::seed_from_u64(8);
        let direct_only = trace_path(&scene, ray, &black, &mut rng);
        let n = 128;
        let with_bounces = (0..n)
            .map(|_| trace_path(&scene, ray, &albedo, &mut rng))
            .sum::<Color>()
            / n as f32;

        assert!(direct_only.x > 0.0);
        assert!(with_bounces.x > direct_only.x);
    }
}
