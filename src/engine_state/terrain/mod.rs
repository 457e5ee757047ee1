//! # Terrain Field
//!
//! Read-only heightmap + colormap pair sampled by the voxel renderer.
//!
//! Both maps are flattened into row-major vectors once at load time. Colors are
//! normalised to a single RGB representation during loading (grayscale color
//! maps have their channel replicated), so the renderer never branches on the
//! shape of a color sample.
//!
//! Coordinates outside `[0, width) x [0, height)` are never clamped or wrapped.
//! Callers check bounds through [`TerrainField::sample_index`] first.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, Rgb};
use log::info;

/// A single terrain color sample.
pub type TerrainColor = Rgb<u8>;

/// Errors raised while loading the terrain maps. All of them are fatal at startup.
#[derive(thiserror::Error, Debug)]
pub enum TerrainLoadError {
    /// The image file could not be opened or decoded.
    #[error("failed to load {kind} map from {path}: {source}")]
    Image {
        /// Which of the two maps failed ("height" or "color")
        kind: &'static str,
        /// Path that was attempted
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: image::ImageError,
    },

    /// Height and color maps must cover the same grid.
    #[error("height map is {height_map:?} but color map is {color_map:?}")]
    DimensionMismatch {
        /// (width, height) of the height map
        height_map: (u32, u32),
        /// (width, height) of the color map
        color_map: (u32, u32),
    },

    /// A map with no samples cannot be rendered.
    #[error("terrain maps must not be empty")]
    Empty,
}

/// Two aligned 2D grids: elevation and color.
///
/// Immutable once constructed; the renderer only reads from it.
#[derive(Debug, Clone)]
pub struct TerrainField {
    width: u32,
    height: u32,
    elevations: Vec<f32>,
    colors: Vec<TerrainColor>,
}

impl TerrainField {
    /// Loads a terrain from a height map image and a color map image.
    ///
    /// The height map is read as luminance, keeping the full range of 16-bit
    /// sources. The color map is converted to
    /// 8-bit RGB, which replicates single-channel images across all three
    /// components.
    ///
    /// # Errors
    /// Returns [`TerrainLoadError`] if either file is missing or unreadable, or
    /// if the two maps differ in size.
    pub fn load(height_map_path: &Path, color_map_path: &Path) -> Result<Self, TerrainLoadError> {
        let height_image =
            image::open(height_map_path).map_err(|source| TerrainLoadError::Image {
                kind: "height",
                path: height_map_path.to_path_buf(),
                source,
            })?;
        let color_image =
            image::open(color_map_path).map_err(|source| TerrainLoadError::Image {
                kind: "color",
                path: color_map_path.to_path_buf(),
                source,
            })?;

        let terrain = Self::from_images(&height_image, &color_image)?;
        info!(
            "Loaded terrain {}x{} from {} and {}",
            terrain.width,
            terrain.height,
            height_map_path.display(),
            color_map_path.display()
        );
        Ok(terrain)
    }

    /// Builds a terrain from already decoded images.
    pub fn from_images(
        height_image: &DynamicImage,
        color_image: &DynamicImage,
    ) -> Result<Self, TerrainLoadError> {
        if height_image.dimensions() != color_image.dimensions() {
            return Err(TerrainLoadError::DimensionMismatch {
                height_map: height_image.dimensions(),
                color_map: color_image.dimensions(),
            });
        }

        let (width, height) = height_image.dimensions();
        if width == 0 || height == 0 {
            return Err(TerrainLoadError::Empty);
        }

        let elevations = match height_image {
            DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_)
            | DynamicImage::ImageRgb16(_)
            | DynamicImage::ImageRgba16(_) => height_image
                .to_luma16()
                .pixels()
                .map(|pixel| pixel.0[0] as f32)
                .collect(),
            _ => height_image
                .to_luma8()
                .pixels()
                .map(|pixel| pixel.0[0] as f32)
                .collect(),
        };
        let colors = color_image.to_rgb8().pixels().copied().collect();

        Ok(Self {
            width,
            height,
            elevations,
            colors,
        })
    }

    /// Builds a terrain by evaluating `sample(x, y)` for every grid cell.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn from_fn<F>(width: u32, height: u32, mut sample: F) -> Self
    where
        F: FnMut(u32, u32) -> (f32, TerrainColor),
    {
        assert!(width > 0 && height > 0, "terrain dimensions must be non-zero");

        let cell_count = width as usize * height as usize;
        let mut elevations = Vec::with_capacity(cell_count);
        let mut colors = Vec::with_capacity(cell_count);
        for y in 0..height {
            for x in 0..width {
                let (elevation, color) = sample(x, y);
                elevations.push(elevation);
                colors.push(color);
            }
        }

        Self {
            width,
            height,
            elevations,
            colors,
        }
    }

    /// Grid width in samples.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in samples.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Maps a world-space point to a grid index, or `None` outside the grid.
    ///
    /// The point is floored to the cell that contains it. Points left of or
    /// above the grid are rejected rather than truncated into cell zero.
    #[inline]
    pub fn sample_index(&self, x: f32, y: f32) -> Option<usize> {
        let cell_x = x.floor();
        let cell_y = y.floor();
        let inside = (0.0..self.width as f32).contains(&cell_x)
            && (0.0..self.height as f32).contains(&cell_y);
        if !inside {
            return None;
        }
        Some(cell_y as usize * self.width as usize + cell_x as usize)
    }

    /// Elevation of the cell at `index`, as returned by [`Self::sample_index`].
    #[inline]
    pub fn height_at_index(&self, index: usize) -> f32 {
        self.elevations[index]
    }

    /// Color of the cell at `index`, as returned by [`Self::sample_index`].
    #[inline]
    pub fn color_at_index(&self, index: usize) -> TerrainColor {
        self.colors[index]
    }

    /// Elevation at integer grid coordinates.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the grid.
    pub fn height_at(&self, x: u32, y: u32) -> f32 {
        self.elevations[self.grid_index(x, y)]
    }

    /// Color at integer grid coordinates.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the grid.
    pub fn color_at(&self, x: u32, y: u32) -> TerrainColor {
        self.colors[self.grid_index(x, y)]
    }

    fn grid_index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "terrain coordinate ({x}, {y}) outside {}x{}",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }
}
