//! Level-of-detail presets for the voxel renderer.
//!
//! A [`QualityPolicy`] holds two named [`QualityParameters`] bundles and the
//! currently active [`QualityLevel`]. The renderer receives the active bundle
//! by value, so a frame can never observe a mix of the two levels.

use serde::{Deserialize, Serialize};

/// The discrete quality levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QualityLevel {
    /// Dense depth sweep and long view distance
    #[default]
    High,
    /// Coarser depth sweep, shorter view distance, early column striding
    Low,
}

impl QualityLevel {
    /// The other level.
    pub fn toggled(self) -> Self {
        match self {
            QualityLevel::High => QualityLevel::Low,
            QualityLevel::Low => QualityLevel::High,
        }
    }
}

/// Largest usable view distance. Beyond 2^24 an f32 depth no longer advances by whole steps.
pub const MAX_VIEW_DISTANCE: f32 = 16_777_216.0;

/// Numeric sweep parameters bound to a quality level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityParameters {
    /// Amount added to the depth step after every depth ring
    pub depth_growth_rate: f32,
    /// The sweep stops once depth reaches this value
    pub max_view_distance: f32,
    /// Depth at which the column stride switches from 1 to the far stride
    pub column_stride_switch_distance: f32,
    /// Column stride used beyond the switch distance
    pub far_column_stride: usize,
}

impl QualityParameters {
    /// Column stride for a depth ring at depth `z`.
    #[inline]
    pub fn column_stride(&self, z: f32) -> usize {
        if z < self.column_stride_switch_distance {
            1
        } else {
            self.far_column_stride.max(1)
        }
    }
}

/// Owns both presets and tracks which one is active.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityPolicy {
    active: QualityLevel,
    high: QualityParameters,
    low: QualityParameters,
}

impl QualityPolicy {
    /// Creates a policy from the two presets.
    pub fn new(initial: QualityLevel, high: QualityParameters, low: QualityParameters) -> Self {
        Self {
            active: initial,
            high,
            low,
        }
    }

    /// The currently active level.
    pub fn level(&self) -> QualityLevel {
        self.active
    }

    /// Switches to the other level and returns it.
    pub fn toggle(&mut self) -> QualityLevel {
        self.active = self.active.toggled();
        self.active
    }

    /// A snapshot of the active level's parameters.
    pub fn parameters(&self) -> QualityParameters {
        self.parameters_for(self.active)
    }

    /// Parameters bound to `level`, regardless of which level is active.
    pub fn parameters_for(&self, level: QualityLevel) -> QualityParameters {
        match level {
            QualityLevel::High => self.high,
            QualityLevel::Low => self.low,
        }
    }
}
