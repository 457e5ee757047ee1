//! Texture handling for the presentation pass.
//!
//! The CPU framebuffer is copied into a GPU texture every frame and sampled by
//! the present shader.

/// Represents a GPU texture with associated view and sampler.
///
/// This struct wraps a WebGPU texture along with its view and sampler,
/// providing a convenient way to manage texture resources in the rendering pipeline.
pub struct Texture {
    /// The underlying WebGPU texture resource.
    pub texture: wgpu::Texture,
    /// The texture view used for binding the texture to the pipeline.
    pub view: wgpu::TextureView,
    /// The sampler used for texture filtering and addressing.
    pub sampler: wgpu::Sampler,
    /// Size of the texture in texels.
    pub size: wgpu::Extent3d,
}

impl Texture {
    /// The texture format used for framebuffer uploads.
    ///
    /// Terrain colors are sRGB-encoded bytes, so sampling decodes them.
    pub const FRAME_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Creates a texture matching the CPU framebuffer's dimensions.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `width` - Framebuffer width in pixels
    /// * `height` - Framebuffer height in pixels
    /// * `label` - Debug label for the texture
    pub fn create_frame_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FRAME_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        };

        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Frames are scaled without smoothing.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            size,
        }
    }

    /// Uploads tightly packed RGBA8 rows covering the whole texture.
    ///
    /// # Arguments
    /// * `queue` - The WebGPU queue used for the copy
    /// * `rgba_bytes` - `width * height * 4` bytes, row-major
    pub fn write_rgba(&self, queue: &wgpu::Queue, rgba_bytes: &[u8]) {
        debug_assert_eq!(
            rgba_bytes.len(),
            (self.size.width * self.size.height * 4) as usize,
            "framebuffer size doesn't match the frame texture"
        );
        queue.write_texture(
            self.texture.as_image_copy(),
            rgba_bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.size.width),
                rows_per_image: Some(self.size.height),
            },
            self.size,
        );
    }
}
