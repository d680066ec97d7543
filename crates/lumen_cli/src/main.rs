use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use lumen_renderer::{render_parallel, CameraDesc, Execution, RenderConfig, Scene, SceneFile};
use std::path::Path;

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;

/// Image size of the reference box when no scene file is given.
const DEFAULT_SIZE: u32 = 256;

fn load_config(path: &Path) -> Result<RenderConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

/// Layer the command line over the config file over the scene file.
fn resolve_config(args: &Args, scene_config: Option<RenderConfig>) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => scene_config.unwrap_or_default(),
    };

    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(depth) = args.depth {
        config.max_depth = depth;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.packet {
        config.execution = Execution::Packet;
    }

    config.validate().context("Invalid render configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    info!("Lumen {}", env!("CARGO_PKG_VERSION"));

    let (scene, camera_desc, width, height, scene_config) = match &args.scene {
        Some(path) => {
            let file = SceneFile::load(path)
                .with_context(|| format!("Failed to load scene {}", path.display()))?;
            let (scene, _) = file.build();
            (scene, file.camera, file.width, file.height, file.config)
        }
        None => {
            info!("No scene given, rendering the reference box");
            (
                Scene::cornell_box(),
                CameraDesc::default(),
                DEFAULT_SIZE,
                DEFAULT_SIZE,
                None,
            )
        }
    };

    let width = args.width.unwrap_or(width);
    let height = args.height.unwrap_or(height);
    let config = resolve_config(&args, scene_config)?;
    let camera = camera_desc.build(width as f32 / height.max(1) as f32);

    info!(
        "Scene: {} spheres, {} triangles, {} lights",
        scene.spheres.len(),
        scene.triangles.len(),
        scene.lights.len()
    );

    let image = render_parallel(&camera, &scene, &config, width, height)
        .context("Render failed")?;
    image
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from(["lumen", "--samples", "5", "--depth", "2", "--packet"]);
        let scene_config = RenderConfig {
            samples_per_pixel: 99,
            seed: 3,
            ..Default::default()
        };

        let config = resolve_config(&args, Some(scene_config)).unwrap();
        assert_eq!(config.samples_per_pixel, 5);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.seed, 3);
        assert_eq!(config.execution, Execution::Packet);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = Args::parse_from(["lumen", "--samples", "0"]);
        assert!(resolve_config(&args, None).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = Args::parse_from(["lumen", "--config", "/nonexistent/lumen.json"]);
        assert!(resolve_config(&args, None).is_err());
    }
}
