//! Entry point: disco teapot.
//! Logging, CLI config, asset load, then hand over to the platform loop.

mod config;

use anyhow::{Context, Result};
use asset::TextureData;
use corelib::{AnimationState, Stopwatch};

use crate::config::Config;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let clock = Stopwatch::start();

    let config = Config::from_env();
    log::info!(
        "Starting disco teapot. mesh={:?}, texture={:?}, window_size={}x{}, disco={}, spin={}",
        config.mesh,
        config.texture,
        config.width,
        config.height,
        config.disco,
        config.spin
    );

    let mesh = asset::binary::load_mesh_from_path(&config.mesh)
        .with_context(|| format!("Failed to load mesh {:?}", config.mesh))?;
    let texture = TextureData::load(&config.texture)
        .with_context(|| format!("Failed to load texture {:?}", config.texture))?;

    let scene = platform::Scene {
        mesh,
        texture,
        animation: AnimationState::with_disco(config.disco),
        spin: config.spin,
        clock,
    };
    platform::run(scene, config.width, config.height)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
