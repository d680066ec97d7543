//! Render configuration.
//!
//! Every tuning constant of the kernel lives here and is passed explicitly
//! to the integrator and drivers, so renders with different settings can
//! run side by side in one process.

use crate::{Color, RenderError, RenderResult};
use serde::{Deserialize, Serialize};

/// How throughput is attenuated at each bounce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reflectance {
    /// The same multiplier for every surface.
    Fixed(Color),
    /// The albedo of the surface that was hit.
    Albedo,
}

impl Default for Reflectance {
    fn default() -> Self {
        Reflectance::Fixed(Color::splat(0.7))
    }
}

/// Which execution model traces the samples of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    /// One ray at a time.
    #[default]
    Scalar,
    /// Eight rays in lockstep with per-lane masking.
    Packet,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel. More samples means less noise, at linear cost.
    pub samples_per_pixel: u32,
    /// Maximum number of path segments traced per sample. Higher values
    /// reduce the bias of truncating long paths.
    pub max_depth: u32,
    /// Lower bound of the parameter range of shadow and bounce rays,
    /// keeping them from re-hitting the surface they leave.
    pub epsilon: f32,
    /// Throughput attenuation applied per bounce
    pub reflectance: Reflectance,
    /// Base seed for the per-pixel random streams
    pub seed: u64,
    /// Edge length of the square tiles handed to worker threads
    pub bucket_size: u32,
    pub execution: Execution,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 64,
            max_depth: 8,
            epsilon: 1e-4,
            reflectance: Reflectance::default(),
            seed: 0,
            bucket_size: 32,
            execution: Execution::Scalar,
        }
    }
}

impl RenderConfig {
    /// Check the configuration before starting a render.
    pub fn validate(&self) -> RenderResult<()> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".into(),
            ));
        }
        if self.max_depth == 0 {
            return Err(RenderError::InvalidConfig(
                "max_depth must be at least 1".into(),
            ));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "epsilon must be a positive finite number, got {}",
                self.epsilon
            )));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidConfig(
                "bucket_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
