//! Error types for the renderer's I/O and configuration boundaries.
//!
//! The tracing kernel itself never fails: degenerate geometry is a
//! construction precondition and a ray that escapes the scene is a normal
//! end of path.

use thiserror::Error;

/// Errors that can occur while configuring a render or writing its output.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Scene file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Image has zero width or height")]
    EmptyImage,
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
