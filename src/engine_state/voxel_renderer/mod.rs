//! # Voxel Renderer
//!
//! Column-based ray marcher that turns a heightmap/colormap pair into a
//! first-person image.
//!
//! ## Algorithm
//!
//! The renderer sweeps depth rings front to back. Each ring is a line of
//! constant depth `z` produced by [`ColumnProjector`]; every sampled screen
//! column on that line looks up the terrain cell beneath it and projects its
//! elevation with a perspective divide:
//!
//! ```text
//! screen_y = (camera_height - terrain_height) / z * height_scale + horizon
//! ```
//!
//! An [`OcclusionBuffer`] remembers the highest row painted so far in every
//! column. Because depth only grows during the sweep, a sample is visible
//! exactly when it projects above that horizon; the span between the two is
//! painted and the horizon tightens.
//!
//! ## Level of detail
//!
//! Two levers bound the per-frame cost, both taken from the active
//! [`QualityParameters`]:
//! * the depth step grows by `depth_growth_rate` after every ring
//! * beyond `column_stride_switch_distance` only every `far_column_stride`-th
//!   column is sampled, and each sample covers the skipped columns too

use cgmath::Point2;
use image::Rgb;

use super::{camera_state::camera::CameraPose, terrain::TerrainField};

pub mod framebuffer;
pub mod projector;
pub mod quality;

pub use framebuffer::{Framebuffer, OcclusionBuffer};
pub use projector::{ColumnProjector, DepthRing};
pub use quality::{QualityLevel, QualityParameters, QualityPolicy, MAX_VIEW_DISTANCE};

/// Depth of the first ring and the initial depth step.
const INITIAL_DEPTH: f32 = 1.0;

/// A vertical span painted during a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintedSpan {
    /// Screen column that was painted
    pub column: usize,
    /// Depth of the ring that produced the span
    pub depth: f32,
    /// Projected screen row of the terrain sample (new horizon)
    pub top: f32,
    /// Horizon of the column before this span
    pub bottom: f32,
    /// Terrain color used for the span
    pub color: Rgb<u8>,
}

/// Owns the per-frame render targets and runs the depth sweep.
///
/// Both targets are reset at the start of every [`VoxelRenderer::render`]
/// call, so nothing carries over between frames except their allocations.
pub struct VoxelRenderer {
    framebuffer: Framebuffer,
    occlusion: OcclusionBuffer,
    background: Rgb<u8>,
}

impl VoxelRenderer {
    /// Creates a renderer producing `width` x `height` frames.
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            framebuffer: Framebuffer::new(width, height, background),
            occlusion: OcclusionBuffer::new(width, height),
            background,
        }
    }

    /// The most recently rendered frame.
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Column horizons left by the most recent frame.
    pub fn occlusion(&self) -> &OcclusionBuffer {
        &self.occlusion
    }

    /// Renders one complete frame.
    pub fn render(
        &mut self,
        pose: &CameraPose,
        quality: QualityParameters,
        terrain: &TerrainField,
    ) -> &Framebuffer {
        self.render_traced(pose, quality, terrain, |_| {});
        &self.framebuffer
    }

    /// Renders one complete frame, reporting every painted span to `on_span`
    /// in paint order.
    pub fn render_traced<F>(
        &mut self,
        pose: &CameraPose,
        quality: QualityParameters,
        terrain: &TerrainField,
        mut on_span: F,
    ) where
        F: FnMut(&PaintedSpan),
    {
        self.framebuffer.clear(self.background);
        self.occlusion.reset();

        let screen_width = self.framebuffer.width();
        let projector = ColumnProjector::new(
            Point2::new(pose.position.x, pose.position.y),
            pose.yaw.0,
            screen_width,
        );

        let mut z = INITIAL_DEPTH;
        let mut dz = INITIAL_DEPTH;
        while z < quality.max_view_distance {
            let ring = projector.ring(z);
            let stride = quality.column_stride(z);

            for (column, point) in ring.columns(screen_width, stride) {
                let Some(cell) = terrain.sample_index(point.x, point.y) else {
                    continue;
                };

                let screen_y = (pose.height - terrain.height_at_index(cell)) / z
                    * pose.height_scale
                    + pose.horizon;
                let color = terrain.color_at_index(cell);

                let covered = (column + stride).min(screen_width as usize);
                for painted in column..covered {
                    let Some(previous) = self.occlusion.raise(painted, screen_y) else {
                        continue;
                    };
                    self.framebuffer.paint_span(
                        painted as u32,
                        screen_y.max(0.0) as u32,
                        previous.max(0.0) as u32,
                        color,
                    );
                    on_span(&PaintedSpan {
                        column: painted,
                        depth: z,
                        top: screen_y,
                        bottom: previous,
                        color,
                    });
                }
            }

            // Stop once f32 precision swallows the step.
            let next = z + dz;
            if next <= z {
                break;
            }
            z = next;
            dz += quality.depth_growth_rate;
        }
    }
}
