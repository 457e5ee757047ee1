//! CPU render targets: the color raster and the per-column occlusion horizon.

use std::path::Path;

use image::{Rgb, Rgba, RgbaImage};

/// RGB raster the voxel renderer paints into.
///
/// Stored as RGBA8 with an opaque alpha channel so the bytes can be uploaded
/// to the GPU without conversion. Only vertical spans are ever written.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    image: RgbaImage,
}

impl Framebuffer {
    /// Creates a framebuffer filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, opaque(background)),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Fills every pixel with `background`.
    pub fn clear(&mut self, background: Rgb<u8>) {
        let background = opaque(background);
        for pixel in self.image.pixels_mut() {
            *pixel = background;
        }
    }

    /// Paints rows `top..bottom` of `column` with `color`.
    ///
    /// Rows are clipped to the raster; an empty or inverted range paints nothing.
    #[inline]
    pub fn paint_span(&mut self, column: u32, top: u32, bottom: u32, color: Rgb<u8>) {
        if column >= self.image.width() {
            return;
        }
        let color = opaque(color);
        for row in top..bottom.min(self.image.height()) {
            self.image.put_pixel(column, row, color);
        }
    }

    /// The RGB value at `(column, row)`.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the raster.
    pub fn pixel(&self, column: u32, row: u32) -> Rgb<u8> {
        let [r, g, b, _] = self.image.get_pixel(column, row).0;
        Rgb([r, g, b])
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Writes the current contents to a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), image::ImageError> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }
}

#[inline]
fn opaque(color: Rgb<u8>) -> Rgba<u8> {
    let [r, g, b] = color.0;
    Rgba([r, g, b, u8::MAX])
}

/// Highest painted screen row per column for the frame in progress.
///
/// Reset to the screen height at the start of every frame. Within a frame each
/// entry only ever decreases.
#[derive(Debug, Clone, PartialEq)]
pub struct OcclusionBuffer {
    horizon: Vec<f32>,
    floor: f32,
}

impl OcclusionBuffer {
    /// Creates a buffer for `width` columns, each open down to `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            horizon: vec![height as f32; width as usize],
            floor: height as f32,
        }
    }

    /// Reopens every column to the screen height.
    pub fn reset(&mut self) {
        self.horizon.fill(self.floor);
    }

    /// Current horizon of `column`.
    #[inline]
    pub fn get(&self, column: usize) -> f32 {
        self.horizon[column]
    }

    /// Tightens `column` to `screen_y` if it lies above the current horizon.
    ///
    /// Returns the previous horizon when the point is visible, `None` when it is
    /// occluded by something already painted.
    #[inline]
    pub fn raise(&mut self, column: usize, screen_y: f32) -> Option<f32> {
        let previous = self.horizon[column];
        if screen_y < previous {
            self.horizon[column] = screen_y;
            Some(previous)
        } else {
            None
        }
    }

    /// All column horizons, left to right.
    pub fn as_slice(&self) -> &[f32] {
        &self.horizon
    }
}
