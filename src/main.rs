#[macro_use]
extern crate log;

use cubecapture::{
    config::CaptureConfig,
    cubemap::{has_texture, CubeMap, TextureType},
    scene::{ColorBox, DrawFlags, DrawableScene},
    wgpu_utils::request_headless_device,
};
use std::{error::Error, path::PathBuf};

const DEFAULT_OUTPUT_PREFIX: &str = "cubecapture";

fn run(config: &CaptureConfig) -> Result<(), Box<dyn Error>> {
    let (device, queue) = futures::executor::block_on(request_headless_device())?;

    let mut cubemap = CubeMap::new(&device, config.image_size, config.flags());

    let mut scene = DrawableScene::new();
    scene.add_group(Box::new(ColorBox::new(
        &device,
        &config.scene,
        cubemap.color_format(),
        Some(cubemap.depth_format()),
    )));

    let mut camera = config.camera();
    camera.attach_to(&scene);

    cubemap.render_to_texture(&device, &queue, &camera, &mut scene, DrawFlags::empty());

    for texture_type in [TextureType::Color, TextureType::Depth].iter().copied() {
        if has_texture(cubemap.flags(), texture_type) {
            cubemap.save_texture(&device, &queue, texture_type, &config.output_prefix)?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match CaptureConfig::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                error!("Failed to read capture config {:?}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => {
            info!("No capture config given, using defaults.");
            CaptureConfig::with_output_prefix(DEFAULT_OUTPUT_PREFIX)
        }
    };

    if let Err(err) = run(&config) {
        error!("Cube capture failed: {}", err);
        std::process::exit(1);
    }
}
