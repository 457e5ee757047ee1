//! # Engine State Module
//!
//! The core engine module that turns player input into rendered frames.
//!
//! ## Key Components
//!
//! * `EngineState` - The per-window coordinator: input, scene, presentation
//! * `camera_state` - Camera pose and movement
//! * `terrain` - Heightmap and colormap access
//! * `voxel_renderer` - The column ray marcher and its level-of-detail policy
//! * `rendering` - Presentation of CPU frames through WebGPU
//! * `scene` - The window-independent frame driver
//!
//! ## Frame Order
//!
//! Each frame runs to completion in three steps on the event-loop thread:
//! 1. the intent captured from the latest input snapshot moves the camera
//! 2. the voxel renderer produces a full framebuffer from the updated pose
//! 3. the framebuffer is uploaded and presented

use std::path::PathBuf;

use log::{error, info};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::keyboard::KeyCode;

use crate::{application_state::input_state::ProcessedInputState, config::Settings};

use camera_state::camera::MovementIntent;
use rendering::FramePresenter;
use scene::Scene;
use terrain::TerrainField;

pub mod camera_state;
pub mod rendering;
pub mod scene;
pub mod terrain;
pub mod voxel_renderer;

/// The main state container for a running window.
///
/// # Examples
///
/// ```ignore
/// let mut engine_state = EngineState::new(surface, surface_config, device, queue, &settings, terrain);
///
/// // Main loop
/// loop {
///     engine_state.set_input_commands(input_manager.get_and_reset_processed_input());
///     engine_state.render();
/// }
/// ```
pub struct EngineState {
    /// Camera, quality, terrain and CPU renderer
    pub scene: Scene,
    /// GPU presentation of finished frames
    presenter: FramePresenter,
    /// A screenshot is saved after the next rendered frame
    screenshot_requested: bool,
    /// Destination of screenshots
    screenshot_path: PathBuf,
}

impl EngineState {
    /// Creates a new engine state.
    ///
    /// # Arguments
    ///
    /// * `surface` - The rendering surface
    /// * `surface_config` - Configuration for the rendering surface
    /// * `device` - The GPU device
    /// * `queue` - The GPU command queue
    /// * `settings` - Renderer and camera tunables
    /// * `terrain` - The loaded terrain field
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        settings: &Settings,
        terrain: TerrainField,
    ) -> Self {
        let presenter = FramePresenter::new(
            surface,
            surface_config,
            device,
            queue,
            settings.screen_width,
            settings.screen_height,
        );

        Self {
            scene: Scene::new(settings, terrain),
            presenter,
            screenshot_requested: false,
            screenshot_path: settings.screenshot_path.clone(),
        }
    }

    /// Resizes the rendering surface when the window size changes
    ///
    /// # Arguments
    ///
    /// * `size` - The new physical size of the window
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.presenter.resize_surface(size);
    }

    /// Sets the input commands for the next frame.
    ///
    /// A later snapshot replaces the movement intent, but a screenshot request
    /// stays pending until a frame has been rendered.
    ///
    /// # Arguments
    /// * `input` - The processed input state to translate
    pub fn set_input_commands(&mut self, input: ProcessedInputState) {
        let actions = translate_processed_input(&input);
        self.screenshot_requested |= actions.take_screenshot;
        self.scene.apply_actions(&actions);
    }

    /// Runs one frame: camera update, voxel render, presentation.
    pub fn render(&mut self) {
        let framebuffer = self.scene.advance_frame();

        if self.screenshot_requested {
            match framebuffer.save_png(&self.screenshot_path) {
                Ok(()) => info!("Saved screenshot to {}", self.screenshot_path.display()),
                Err(err) => error!(
                    "Failed to save screenshot to {}: {}",
                    self.screenshot_path.display(),
                    err
                ),
            }
            self.screenshot_requested = false;
        }

        self.presenter.present(framebuffer);
    }
}

/// Translates the processed input state into player actions.
///
/// Movement keys count while pressed or held; the quality toggle and the
/// screenshot only fire on the frame their key goes down.
///
/// # Arguments
/// * `input` - The processed input state to translate
pub fn translate_processed_input(input: &ProcessedInputState) -> PlayerAction {
    let active = |key| input.get_key_state(key).is_active();

    PlayerAction {
        intent: MovementIntent {
            move_forward: active(KeyCode::KeyW),
            move_backward: active(KeyCode::KeyS),
            strafe_left: active(KeyCode::KeyA),
            strafe_right: active(KeyCode::KeyD),
            yaw_left: active(KeyCode::KeyQ),
            yaw_right: active(KeyCode::KeyE),
            rise_up: active(KeyCode::Space),
            rise_down: active(KeyCode::ShiftLeft),
        },
        toggle_quality: input.get_key_state(KeyCode::KeyL).is_just_pressed(),
        take_screenshot: input.get_key_state(KeyCode::KeyP).is_just_pressed(),
    }
}

/// Represents player actions derived from input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerAction {
    /// Movement flags for the camera
    pub intent: MovementIntent,
    /// Switch between the quality levels
    pub toggle_quality: bool,
    /// Save the next rendered frame to disk
    pub take_screenshot: bool,
}
