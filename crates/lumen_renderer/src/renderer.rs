//! Pixel sampling and the reference single-threaded driver.
//!
//! Implements:
//! - Per-pixel sample averaging with a fresh camera ray per sample
//! - Scalar and packet execution behind one entry point
//! - Gamma correction and image output

use crate::packet::{render_pixel_packet, LANES};
use crate::sampling::stream_rng;
use crate::{trace_path, Camera, Color, Execution, RenderConfig, RenderError, RenderResult, Scene};
use log::{info, warn};
use rand::RngCore;
use std::io::Write;
use std::path::Path;

/// Average `config.samples_per_pixel` path samples of image point `(s, t)`.
///
/// Every sample starts from an unmodified camera ray, so the estimate does
/// not depend on the order in which samples are traced.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    s: f32,
    t: f32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let camera_ray = camera.get_ray(s, t);
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        pixel_color += trace_path(scene, camera_ray, config, rng);
    }

    pixel_color / config.samples_per_pixel as f32
}

/// Map pixel `(x, y)` to image coordinates.
///
/// `s` runs left to right and `t` top to bottom from 1 to 0, both hitting
/// the image edges exactly. A one-pixel axis samples its center.
pub fn pixel_coords(x: u32, y: u32, width: u32, height: u32) -> (f32, f32) {
    let s = if width > 1 {
        x as f32 / (width - 1) as f32
    } else {
        0.5
    };
    let t = if height > 1 {
        1.0 - y as f32 / (height - 1) as f32
    } else {
        0.5
    };
    (s, t)
}

/// Shade pixel `(x, y)` with the execution model selected in `config`.
///
/// Random streams are derived from the pixel index, so the result does not
/// depend on which thread renders the pixel or in which order.
pub fn shade_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    config: &RenderConfig,
) -> Color {
    let (s, t) = pixel_coords(x, y, width, height);
    let pixel_index = y as u64 * width as u64 + x as u64;

    match config.execution {
        Execution::Scalar => {
            let mut rng = stream_rng(config.seed, pixel_index);
            render_pixel(camera, scene, s, t, config, &mut rng)
        }
        Execution::Packet => {
            let mut rngs = std::array::from_fn(|lane| {
                stream_rng(config.seed, pixel_index * LANES as u64 + lane as u64)
            });
            render_pixel_packet(camera, scene, s, t, config, &mut rngs)
        }
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// Linear radiance per pixel, row-major from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgba(*c)).collect()
    }

    /// Write a plain-text (P3) PPM.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> RenderResult<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for color in &self.pixels {
            let [r, g, b, _] = color_to_rgba(*color);
            writeln!(writer, "{r} {g} {b}")?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Save to disk. `.ppm` is written as P3 text, anything else goes
    /// through the `image` crate and is encoded by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyImage);
        }

        let is_ppm = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            let file = std::fs::File::create(path)?;
            self.write_ppm(std::io::BufWriter::new(file))?;
        } else {
            let rgba = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba())
                .ok_or(RenderError::EmptyImage)?;
            rgba.save(path)?;
        }

        info!(
            "Wrote {}x{} image to {}",
            self.width,
            self.height,
            path.display()
        );
        Ok(())
    }
}

/// Render the entire scene to an image buffer.
///
/// This is a simple single-threaded renderer, used as the reference the
/// bucket driver is checked against.
pub fn render(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    width: u32,
    height: u32,
) -> RenderResult<ImageBuffer> {
    config.validate()?;
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage);
    }
    if scene.is_empty() {
        warn!("Rendering an empty scene, the image will be black");
    }

    info!(
        "Rendering {}x{} at {} spp, depth {} ({:?})",
        width, height, config.samples_per_pixel, config.max_depth, config.execution
    );

    let mut image = ImageBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let color = shade_pixel(camera, scene, x, y, width, height, config);
            image.set(x, y, color);
        }
    }

    info!("Render complete");
    Ok(image)
}
