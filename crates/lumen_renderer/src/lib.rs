//! Lumen - CPU Path Tracing
//!
//! A Monte Carlo path tracer over spheres and triangles lit by point
//! lights. Rendering is driven per pixel, either one ray at a time or in
//! eight-wide packets, and parallelized over image buckets with rayon.

mod bucket;
mod camera;
mod config;
mod error;
mod hittable;
mod integrator;
pub mod packet;
mod renderer;
pub mod sampling;
mod scene;
mod scene_file;
mod sphere;
mod triangle;

/// Linear RGB radiance.
pub type Color = Vec3;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult};
pub use camera::{Camera, CameraDesc};
pub use config::{Execution, Reflectance, RenderConfig};
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable};
pub use integrator::{bounce_ray, direct_light, trace_path};
pub use renderer::{
    color_to_rgba, linear_to_gamma, pixel_coords, render, render_pixel, shade_pixel, ImageBuffer,
};
pub use scene::{PointLight, Primitive, PrimitiveId, Scene};
pub use scene_file::{QuadDesc, SceneFile, TriangleDesc};
pub use sphere::Sphere;
pub use triangle::{Triangle, TriangleHit};

/// Re-export Vec3 and the ray types from lumen_math
pub use lumen_math::{Interval, Ray, Vec3};
