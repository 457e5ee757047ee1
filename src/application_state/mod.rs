//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Window and graphics initialization
//! - Input handling
//! - Application lifecycle events
//! - Frame timing

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use graphics_resources_builder::{Graphics, MaybeGraphics};
use input_manager::InputManager;
use log::debug;
use web_time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{config::Settings, engine_state::terrain::TerrainField, engine_state::EngineState};

/// Number of frames averaged per frame-time log line.
const FRAME_TIME_WINDOW: u32 = 120;

/// The main application state container that manages the application's lifecycle.
///
/// It implements `ApplicationHandler` to handle window events and the
/// graphics initialization user event.
pub struct ApplicationState {
    /// The current graphics state, which may be uninitialized or ready
    pub graphics: MaybeGraphics,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,

    /// Settings and terrain waiting for the window to exist
    pub startup: Option<(Settings, TerrainField)>,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// Scene, CPU renderer and presentation
    pub engine_state: EngineState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Rolling frame-time statistics
    pub frame_timer: FrameTimer,
}

/// Averages frame durations and logs them periodically.
pub struct FrameTimer {
    last_frame: Instant,
    accumulated: Duration,
    frames: u32,
}

impl FrameTimer {
    /// Starts timing from now.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            accumulated: Duration::ZERO,
            frames: 0,
        }
    }

    /// Records the end of a frame.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.record(now - self.last_frame);
        self.last_frame = now;
    }

    /// Adds one frame duration; returns the average once a full window has elapsed.
    fn record(&mut self, frame_time: Duration) -> Option<Duration> {
        self.accumulated += frame_time;
        self.frames += 1;

        if self.frames < FRAME_TIME_WINDOW {
            return None;
        }

        let average = self.accumulated / self.frames;
        debug!(
            "Average frame time over {} frames: {:.2} ms",
            self.frames,
            average.as_secs_f64() * 1000.0
        );
        self.accumulated = Duration::ZERO;
        self.frames = 0;
        Some(average)
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationState {
    /// Creates the application state for a window that has not been built yet.
    pub fn new(graphics: MaybeGraphics, settings: Settings, terrain: TerrainField) -> Self {
        Self {
            graphics,
            state: None,
            startup: Some((settings, terrain)),
        }
    }

    /// Initializes the application state with the required graphics resources.
    ///
    /// This method transitions the application from the initialization phase to the running state
    /// by setting up the engine state with the provided graphics resources.
    fn initialize_application_state(&mut self, gfx: Graphics) {
        let Some((settings, terrain)) = self.startup.take() else {
            return;
        };

        let engine_state = EngineState::new(
            gfx.surface,
            gfx.surface_config,
            gfx.device,
            gfx.queue,
            &settings,
            terrain,
        );

        self.state = Some(InitializedApplicationState {
            engine_state,
            window: gfx.window,
            input_manager: InputManager::new(),
            frame_timer: FrameTimer::new(),
        });
        self.graphics = MaybeGraphics::Moved;
    }
}

impl ApplicationHandler<Graphics> for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `_window_id` - ID of the window that generated the event
    /// * `event` - The window event to process
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let is_exit_request = matches!(
            event,
            WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event: KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                    ..
                }
        );
        if is_exit_request {
            event_loop.exit();
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        state.input_manager.intake_input(&event);

        match event {
            WindowEvent::Resized(size) => {
                state.engine_state.resize_surface(size);
            }
            WindowEvent::Focused(is_focused) => {
                if !is_focused {
                    state.input_manager.reset_inputs();
                }
            }
            WindowEvent::RedrawRequested => {
                state.engine_state.render();
                state.frame_timer.tick();
            }
            _ => (),
        }
    }

    /// Called when the application is resumed.
    ///
    /// Builds the window and graphics if that has not happened yet.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Receives the initialized graphics and starts the engine.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    /// * `graphics` - The initialized graphics resources
    fn user_event(&mut self, _event_loop: &ActiveEventLoop, graphics: Graphics) {
        self.initialize_application_state(graphics);
    }

    /// Called before the event loop goes to sleep.
    ///
    /// Hands the frame's input snapshot to the engine and requests the next frame.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            let processed_input = state.input_manager.get_and_reset_processed_input();
            state.engine_state.set_input_commands(processed_input);
            state.window.request_redraw();
        }
    }
}
