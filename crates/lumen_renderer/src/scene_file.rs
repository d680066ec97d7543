//! JSON scene description.
//!
//! ```json
//! {
//!   "width": 320,
//!   "height": 240,
//!   "camera": { "look_from": [0.5, 0.5, 1.0], "look_at": [0.5, 0.5, 0.0], "vfov": 55.0 },
//!   "spheres": [{ "center": [0.5, 0.2, -0.25], "radius": 0.2, "albedo": [0.6, 0.6, 0.5] }],
//!   "quads": [{ "corners": [[0,0,0], [0,1,0], [0,1,-1], [0,0,-1]], "albedo": [0.6, 0.1, 0.1] }],
//!   "lights": [{ "position": [0.95, 0.95, 0.3], "intensity": [0.9, 0.9, 0.9] }],
//!   "config": { "samples_per_pixel": 16 }
//! }
//! ```

use crate::{
    Camera, CameraDesc, Color, PointLight, RenderConfig, RenderError, RenderResult, Scene,
    Sphere, Triangle,
};
use log::{debug, warn};
use lumen_math::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A triangle given by its three vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleDesc {
    pub vertices: [Vec3; 3],
    pub albedo: Color,
}

/// A planar quad given by its corners in winding order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadDesc {
    pub corners: [Vec3; 4],
    pub albedo: Color,
}

fn default_width() -> u32 {
    256
}

fn default_height() -> u32 {
    256
}

/// Everything needed to render one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub camera: CameraDesc,
    #[serde(default)]
    pub spheres: Vec<Sphere>,
    #[serde(default)]
    pub triangles: Vec<TriangleDesc>,
    #[serde(default)]
    pub quads: Vec<QuadDesc>,
    #[serde(default)]
    pub lights: Vec<PointLight>,
    /// Render settings stored alongside the scene
    #[serde(default)]
    pub config: Option<RenderConfig>,
}

impl SceneFile {
    /// Read and parse a scene file.
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let file = Self::from_json(&text)?;
        debug!("Loaded scene file {}", path.display());
        Ok(file)
    }

    pub fn from_json(text: &str) -> RenderResult<Self> {
        let file: Self = serde_json::from_str(text)?;

        if file.width == 0 || file.height == 0 {
            return Err(RenderError::EmptyImage);
        }
        let bad_sphere = file
            .spheres
            .iter()
            .find(|s| s.radius.is_nan() || s.radius <= 0.0);
        if let Some(sphere) = bad_sphere {
            return Err(RenderError::InvalidConfig(format!(
                "sphere at {} has non-positive radius {}",
                sphere.center, sphere.radius
            )));
        }

        Ok(file)
    }

    /// Image aspect ratio, width over height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Assemble the scene and a camera matching the image aspect.
    pub fn build(&self) -> (Scene, Camera) {
        let mut scene = Scene::new();

        for sphere in &self.spheres {
            scene.add_sphere(*sphere);
        }
        for tri in &self.triangles {
            let [a, b, c] = tri.vertices;
            scene.add_triangle(Triangle::new(a, b, c, tri.albedo));
        }
        for quad in &self.quads {
            let [a, b, c, d] = quad.corners;
            scene.add_quad(a, b, c, d, quad.albedo);
        }
        for light in &self.lights {
            scene.add_light(*light);
        }

        if scene.lights.is_empty() {
            warn!("Scene has no lights, the image will be black");
        }
        debug!(
            "Built scene: {} spheres, {} triangles, {} lights",
            scene.spheres.len(),
            scene.triangles.len(),
            scene.lights.len()
        );

        (scene, self.camera.build(self.aspect()))
    }
}
