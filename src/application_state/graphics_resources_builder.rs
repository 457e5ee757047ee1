//! # Graphics Resources Builder
//!
//! This module handles the creation of the window and the WebGPU resources
//! the frame presenter needs.
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources
//! - `GraphicsBuilder`: Helper for initialization that reports back through the event loop
//! - `MaybeGraphics`: Represents the various states of graphics initialization

use std::future::Future;
use std::sync::Arc;

use log::info;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{
    dpi::PhysicalSize,
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

/// Title of the application window.
const WINDOW_TITLE: &str = "Voxel Space";

/// Contains all graphics-related resources required by the application.
pub struct Graphics {
    /// The application window
    pub window: Arc<Window>,
    /// Surface bound to `window`, already configured
    pub surface: Surface<'static>,
    /// Configuration the surface was configured with
    pub surface_config: SurfaceConfiguration,
    /// The WebGPU device
    pub device: Device,
    /// The WebGPU command queue
    pub queue: Queue,
}

/// Creates the window and initializes the WebGPU context for it.
///
/// # Arguments
/// * `event_loop` - The active event loop used to create the window and surface
/// * `size` - Initial inner size of the window
///
/// # Returns
/// A `Future` that resolves to the initialized `Graphics` when complete
///
/// # Panics
/// Panics if the window, surface, adapter or device cannot be created.
fn create_graphics(
    event_loop: &ActiveEventLoop,
    size: PhysicalSize<u32>,
) -> impl Future<Output = Graphics> + 'static {
    let window_attrs = Window::default_attributes()
        .with_title(WINDOW_TITLE)
        .with_inner_size(size);

    let window = Arc::new(
        event_loop
            .create_window(window_attrs)
            .expect("Failed to create window"),
    );

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance
        .create_surface(window.clone())
        .expect("Failed to create surface");

    async move {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("No compatible graphics adapter found");

        info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .expect("Failed to create device");

        let size = window.inner_size();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        info!("Surface format {:?}", surface_format);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);

        Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
        }
    }
}

/// Helper struct for managing the initialization of graphics resources.
///
/// The finished `Graphics` are delivered to the application as a user event.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<Graphics>>,
    window_size: PhysicalSize<u32>,
}

/// Represents the possible states of the graphics initialization process.
pub enum MaybeGraphics {
    /// State before the window exists
    Builder(GraphicsBuilder),

    /// State after graphics resources have been handed to the engine
    Moved,
}

impl GraphicsBuilder {
    /// Creates a new GraphicsBuilder with the specified event loop proxy.
    ///
    /// # Arguments
    /// * `event_loop_proxy` - Used to send the initialized graphics resources back to the main thread
    /// * `window_size` - Initial inner size of the window
    pub fn new(event_loop_proxy: EventLoopProxy<Graphics>, window_size: PhysicalSize<u32>) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
            window_size,
        }
    }

    /// Creates the graphics resources and sends them back through the event loop.
    ///
    /// # Arguments
    /// * `event_loop` - The active event loop used to create the graphics context
    ///
    /// # Panics
    /// Panics if sending fails
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            // event_loop_proxy is already spent - we already constructed Graphics
            return;
        };

        let gfx = pollster::block_on(create_graphics(event_loop, self.window_size));
        assert!(event_loop_proxy.send_event(gfx).is_ok());
    }
}
