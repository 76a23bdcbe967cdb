// src/main.rs
//! Headless desk renderer: advances the scene for a number of frames and
//! writes the last one to a PNG.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use deskscene::gfx::animation::AnimationPreset;
use deskscene::gfx::camera::OrbitCamera;
use deskscene::gfx::frame::DeskScene;
use deskscene::gfx::input::InputSnapshot;
use deskscene::gfx::rendering::{GpuContext, GpuRenderer, SoftwareRenderer};

#[derive(Parser, Debug)]
#[command(name = "deskscene")]
#[command(about = "Render the procedural desk scene (table, monitor, mouse) to a PNG")]
struct Cli {
    /// JSON input snapshot; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames to advance before writing the image
    #[arg(long, default_value_t = 1)]
    frames: u32,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Enable animation with this preset
    #[arg(long)]
    preset: Option<AnimationPreset>,

    #[arg(long)]
    wireframe: bool,

    /// Press the left mouse button on the first frame
    #[arg(long)]
    press_left: bool,

    /// Press the right mouse button on the first frame
    #[arg(long)]
    press_right: bool,

    /// Spin the mouse wheel on the first frame
    #[arg(long)]
    scroll: bool,

    /// Image shown on the monitor screen
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Orbit the camera this many degrees around its target
    #[arg(long)]
    orbit: Option<f32>,

    /// Render with wgpu instead of the software rasterizer
    #[arg(long)]
    gpu: bool,

    /// Report the GPU adapter and exit
    #[arg(long)]
    gpu_probe: bool,

    #[arg(long, short, default_value = "desk.png")]
    output: PathBuf,
}

fn load_input(cli: &Cli) -> Result<InputSnapshot> {
    let mut input = match &cli.config {
        Some(path) => InputSnapshot::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => InputSnapshot::default(),
    };

    if let Some(preset) = cli.preset {
        input.animation.enabled = true;
        input.animation.preset = preset;
    }
    input.wireframe |= cli.wireframe;

    if let Some(degrees) = cli.orbit {
        let mut orbit = OrbitCamera::from_params(&input.camera);
        orbit.add_yaw(degrees.to_radians());
        input.camera = orbit.params();
    }
    Ok(input)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.gpu_probe {
        let context = GpuContext::request_headless_blocking().context("GPU probe failed")?;
        let adapter = &context.adapter_info;
        println!(
            "{} ({:?}, {:?}, driver {})",
            adapter.name, adapter.backend, adapter.device_type, adapter.driver
        );
        return Ok(());
    }

    let mut input = load_input(&cli)?;
    let mut scene = DeskScene::new();
    if let Some(path) = &cli.texture {
        scene
            .texture_mut()
            .load(path)
            .with_context(|| format!("failed to load texture {}", path.display()))?;
    }

    input.triggers.press_left = cli.press_left;
    input.triggers.press_right = cli.press_right;
    input.triggers.scroll = cli.scroll;

    let mut frame = scene.render_frame(&input);
    input.triggers = Default::default();
    for _ in 1..cli.frames.max(1) {
        frame = scene.render_frame(&input);
    }
    info!(
        "Advanced {} frames, animation time {:.3}s",
        scene.frame_count(),
        frame.animated.time
    );

    if cli.gpu {
        let context = GpuContext::request_headless_blocking()?;
        let mut renderer = GpuRenderer::new(context, &scene, cli.width, cli.height)?;
        let image = renderer.render(&frame, scene.texture())?;
        image
            .save(&cli.output)
            .with_context(|| format!("failed to write {}", cli.output.display()))?;
    } else {
        let mut renderer = SoftwareRenderer::new(cli.width, cli.height);
        let stats = renderer.render(&frame, scene.geometry(), scene.texture());
        info!(
            "Rasterized {} triangles and {} lines in {} draws",
            stats.triangles, stats.lines, stats.draw_calls
        );
        renderer
            .save_png(&cli.output)
            .with_context(|| format!("failed to write {}", cli.output.display()))?;
    }

    println!("Wrote {}", cli.output.display());
    Ok(())
}
