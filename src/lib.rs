#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Space
//!
//! A voxel-space terrain renderer built with Rust and WGPU.
//!
//! Terrain is a pair of images: a grayscale heightmap and a colormap of the
//! same size. Each frame the renderer marches depth rings outward from the
//! camera, projects every ring sample to a screen row, and paints vertical
//! spans front to back so nearer terrain hides what lies behind it.
//!
//! ## Key Modules
//!
//! * `application_state` - Window, graphics initialization and input handling
//! * `engine_state` - Camera, terrain, the CPU voxel renderer and frame presentation
//! * `config` - Settings file loading and validation
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_space::run();
//! }
//! ```
//!
//! Frames can also be produced without a window:
//!
//! ```
//! use image::Rgb;
//! use voxel_space::{Scene, Settings, TerrainField};
//!
//! let settings = Settings {
//!     screen_width: 160,
//!     screen_height: 120,
//!     initial_position: [32.0, 32.0],
//!     ..Settings::default()
//! };
//! let terrain = TerrainField::from_fn(64, 64, |_, _| (0.0, Rgb([40, 120, 40])));
//!
//! let mut scene = Scene::new(&settings, terrain);
//! let frame = scene.advance_frame();
//! assert_eq!(frame.width(), 160);
//! ```

use std::process;

use application_state::{
    graphics_resources_builder::{GraphicsBuilder, MaybeGraphics},
    ApplicationState,
};
use log::{error, info, LevelFilter};
use winit::{dpi::PhysicalSize, event_loop::EventLoop};

mod application_state;
pub mod config;
mod engine_state;

pub use config::{QualitySettings, Settings, SettingsError};
pub use engine_state::{
    camera_state::{
        camera::{CameraController, CameraPose, MovementIntent},
        CameraState,
    },
    scene::Scene,
    terrain::{TerrainColor, TerrainField, TerrainLoadError},
    voxel_renderer::{
        ColumnProjector, DepthRing, Framebuffer, OcclusionBuffer, PaintedSpan, QualityLevel,
        QualityParameters, QualityPolicy, VoxelRenderer, MAX_VIEW_DISTANCE,
    },
    PlayerAction,
};

/// Loads settings and terrain, opens the window and runs until it closes.
///
/// Settings come from the path in the first argument, then the
/// `VOXEL_SPACE_CONFIG` environment variable, then built-in defaults.
/// Missing or invalid settings or terrain images end the process with
/// exit code 1.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .filter_level(LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            error!("Invalid settings: {}", err);
            process::exit(1);
        }
    };

    let terrain = match TerrainField::load(&settings.height_map_path, &settings.color_map_path) {
        Ok(terrain) => terrain,
        Err(err) => {
            error!("Failed to load terrain: {}", err);
            process::exit(1);
        }
    };

    let event_loop = match EventLoop::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            error!("Failed to create event loop: {}", err);
            process::exit(1);
        }
    };

    let window_size = PhysicalSize::new(settings.screen_width, settings.screen_height);
    let mut state = ApplicationState::new(
        MaybeGraphics::Builder(GraphicsBuilder::new(event_loop.create_proxy(), window_size)),
        settings,
        terrain,
    );

    if let Err(err) = event_loop.run_app(&mut state) {
        error!("Event loop terminated with an error: {}", err);
        process::exit(1);
    }
}
