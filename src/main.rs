use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    dpi::PhysicalSize,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};
use scooter_viewer::{
    config::{ScooterVariant, ViewerConfig},
    graphics::Recorder,
    input::KeyState,
    renderer::Renderer,
    Viewer,
};

#[derive(Parser)]
#[command(author, version, about = "Animated motor scooter viewer", long_about = None)]
struct Args {
    /// Which scooter tree to build
    #[arg(long, value_enum, default_value_t = ScooterVariant::Textured)]
    variant: ScooterVariant,

    /// Angular subdivisions of cylinders and wheels
    #[arg(long, default_value_t = 32)]
    slices: u32,

    /// Image for the deck and bars; a checkerboard is generated when absent
    #[arg(long)]
    metal_texture: Option<PathBuf>,

    /// Image for the tires; a checkerboard is generated when absent
    #[arg(long)]
    wheel_texture: Option<PathBuf>,

    /// Draw the axis marker at the origin
    #[arg(long)]
    axes: bool,

    #[arg(long, default_value_t = 960)]
    width: u32,

    #[arg(long, default_value_t = 640)]
    height: u32,

    /// Run this many frames against the command recorder instead of opening a
    /// window; the summary is logged at info level (RUST_LOG=info)
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,
}

impl Args {
    fn config(&self) -> ViewerConfig {
        ViewerConfig {
            variant: self.variant,
            slices: self.slices,
            show_axes: self.axes,
            metal_texture: self.metal_texture.clone(),
            wheel_texture: self.wheel_texture.clone(),
            width: self.width,
            height: self.height,
            ..ViewerConfig::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.config();

    match args.headless {
        Some(frames) => run_headless(&config, frames),
        None => run_windowed(config),
    }
}

fn run_headless(config: &ViewerConfig, frames: u32) -> Result<()> {
    let mut viewer = Viewer::new(Recorder::new(), config)?;
    let keys = KeyState::from_keys([KeyCode::ArrowRight, KeyCode::KeyF, KeyCode::KeyA]);

    for _ in 0..frames {
        viewer.frame(&keys)?;
    }
    log::info!("{}", viewer.summary());
    Ok(())
}

fn run_windowed(mut config: ViewerConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;

    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Scooter")
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .build(&event_loop)
            .context("failed to create window")?,
    );
    let size = window.inner_size();
    config.width = size.width.max(1);
    config.height = size.height.max(1);

    let renderer = Renderer::new(window.clone())?;
    let mut viewer = Viewer::new(renderer, &config)?;
    let mut keys = KeyState::new();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(key_code),
                            state: key_state,
                            ..
                        },
                    ..
                } => {
                    let pressed = key_state == ElementState::Pressed;
                    if key_code == KeyCode::Escape && pressed {
                        window_target.exit();
                    } else {
                        keys.set(key_code, pressed);
                    }
                }
                WindowEvent::Focused(false) => keys.clear(),
                WindowEvent::CloseRequested => window_target.exit(),
                WindowEvent::Resized(new_size) => viewer.resize(new_size.width, new_size.height),
                WindowEvent::RedrawRequested => {
                    if let Err(error) = viewer.frame(&keys) {
                        log::error!("{:#}", error);
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => window.request_redraw(),
            _ => {}
        })
        .context("event loop terminated with an error")
}
