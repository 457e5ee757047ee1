//! Presentation of CPU-rendered frames.
//!
//! The voxel renderer produces its image on the CPU. This module owns the
//! WebGPU side of the window: it uploads each finished framebuffer into a
//! texture and draws it as a letterboxed quad onto the surface.

use log::{error, warn};
use wgpu::{util::DeviceExt, Device, Queue, RenderPipeline, Surface, SurfaceConfiguration};

use super::voxel_renderer::Framebuffer;

mod texture;

/// WGSL source of the presentation shader.
const PRESENT_SHADER: &str = include_str!("../../../assets/shaders/present.wgsl");

/// Debug label shared by the frame texture and its sampler.
const FRAME_TEXTURE_LABEL: &str = "Frame Texture";

/// Number of vertices in the presentation quad (two triangles).
const QUAD_VERTEX_COUNT: u32 = 6;

/// GPU-friendly quad scale used to letterbox the framebuffer.
///
/// The padding keeps the struct at the 16-byte size WGSL expects for uniforms.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewportUniform {
    scale: [f32; 2],
    _padding: [f32; 2],
}

impl ViewportUniform {
    /// Computes the quad scale fitting a `frame` sized image inside `surface`.
    ///
    /// The image keeps its aspect ratio; the axis with spare room shrinks.
    pub fn letterbox(surface: (u32, u32), frame: (u32, u32)) -> Self {
        let surface_aspect = surface.0.max(1) as f32 / surface.1.max(1) as f32;
        let frame_aspect = frame.0.max(1) as f32 / frame.1.max(1) as f32;

        let scale = if surface_aspect > frame_aspect {
            [frame_aspect / surface_aspect, 1.0]
        } else {
            [1.0, surface_aspect / frame_aspect]
        };

        Self {
            scale,
            _padding: [0.0; 2],
        }
    }

    /// Quad scale along x and y in clip space.
    #[cfg(test)]
    fn scale(&self) -> [f32; 2] {
        self.scale
    }
}

/// Owns the window surface and everything needed to show a framebuffer on it.
pub struct FramePresenter {
    /// The WebGPU surface being presented to
    surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    surface_config: SurfaceConfiguration,
    /// The WebGPU device used for creating GPU resources
    device: Device,
    /// The WebGPU queue for uploads and command submission
    queue: Queue,
    /// Full-screen quad pipeline
    pipeline: RenderPipeline,
    /// Texture receiving the framebuffer bytes
    frame_texture: texture::Texture,
    /// Bind group for texture, sampler and viewport uniform
    bind_group: wgpu::BindGroup,
    /// Uniform buffer holding the letterbox scale
    viewport_buffer: wgpu::Buffer,
}

impl FramePresenter {
    /// Creates the presentation resources for frames of `frame_width` x `frame_height`.
    ///
    /// # Arguments
    /// * `surface` - The configured window surface
    /// * `surface_config` - Configuration the surface was configured with
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue
    /// * `frame_width` - Framebuffer width in pixels
    /// * `frame_height` - Framebuffer height in pixels
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        let frame_texture = texture::Texture::create_frame_texture(
            &device,
            frame_width,
            frame_height,
            FRAME_TEXTURE_LABEL,
        );

        let viewport = ViewportUniform::letterbox(
            (surface_config.width, surface_config.height),
            (frame_width, frame_height),
        );
        let viewport_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Viewport Buffer"),
            contents: bytemuck::cast_slice(&[viewport]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Present Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Present Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&frame_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&frame_texture.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: viewport_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline =
            Self::create_render_pipeline(&device, &bind_group_layout, surface_config.format);

        Self {
            surface,
            surface_config,
            device,
            queue,
            pipeline,
            frame_texture,
            bind_group,
            viewport_buffer,
        }
    }

    /// Creates the pipeline drawing the framebuffer quad.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `bind_group_layout` - Layout of the texture/sampler/viewport bind group
    /// * `format` - The surface texture format
    fn create_render_pipeline(
        device: &Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Present Shader"),
            source: wgpu::ShaderSource::Wgsl(PRESENT_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Present Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Present Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Handles window resize events.
    ///
    /// Reconfigures the surface and updates the letterbox scale. The
    /// framebuffer itself keeps its configured size. Zero-sized windows
    /// (minimised) are ignored.
    ///
    /// # Arguments
    /// * `size` - The new window size in physical pixels
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device, &self.surface_config);

        let viewport = ViewportUniform::letterbox(
            (size.width, size.height),
            (self.frame_texture.size.width, self.frame_texture.size.height),
        );
        self.queue
            .write_buffer(&self.viewport_buffer, 0, bytemuck::cast_slice(&[viewport]));
    }

    /// Uploads `framebuffer` and presents it.
    ///
    /// A lost or outdated surface is reconfigured and the frame is dropped.
    pub fn present(&mut self, framebuffer: &Framebuffer) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                return;
            }
            Err(err) => {
                error!("Error getting current frame: {:?}", err);
                return;
            }
        };

        self.frame_texture.write_rgba(&self.queue, framebuffer.as_bytes());

        let view = frame.texture.create_view(&Default::default());
        let mut encoder = self.device.create_command_encoder(&Default::default());
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Present Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.draw(0..QUAD_VERTEX_COUNT, 0..1);
        }

        self.queue.submit([encoder.finish()]);
        frame.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_window_shrinks_horizontally() {
        let viewport = ViewportUniform::letterbox((1600, 600), (800, 600));
        let [x, y] = viewport.scale();
        assert!((x - 0.5).abs() < 1e-6);
        assert_eq!(y, 1.0);
    }

    #[test]
    fn tall_window_shrinks_vertically() {
        let viewport = ViewportUniform::letterbox((800, 1200), (800, 600));
        let [x, y] = viewport.scale();
        assert_eq!(x, 1.0);
        assert!((y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn matching_aspect_fills_the_window() {
        let viewport = ViewportUniform::letterbox((1024, 768), (800, 600));
        assert_eq!(viewport.scale(), [1.0, 1.0]);
        assert_eq!(std::mem::size_of::<ViewportUniform>(), 16);
    }
}
