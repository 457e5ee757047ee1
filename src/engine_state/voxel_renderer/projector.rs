//! Screen-edge sampling lines for one depth ring.

use cgmath::{Point2, Vector2};

/// Computes the world-space sampling line for a camera pose at a given depth.
///
/// The left and right offsets are built from `±cos φ·z` and `±sin φ·z`, which
/// fixes a 90° horizontal field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnProjector {
    origin: Point2<f32>,
    sin_yaw: f32,
    cos_yaw: f32,
    screen_width: u32,
}

impl ColumnProjector {
    /// Creates a projector for a camera at `origin` looking along `yaw`.
    pub fn new(origin: Point2<f32>, yaw: f32, screen_width: u32) -> Self {
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        Self {
            origin,
            sin_yaw,
            cos_yaw,
            screen_width,
        }
    }

    /// The sampling line at depth `z`.
    pub fn ring(&self, z: f32) -> DepthRing {
        let (sin, cos) = (self.sin_yaw, self.cos_yaw);
        let left = Point2::new(
            -cos * z - sin * z + self.origin.x,
            sin * z - cos * z + self.origin.y,
        );
        let right = Point2::new(
            cos * z - sin * z + self.origin.x,
            -sin * z - cos * z + self.origin.y,
        );
        DepthRing {
            left,
            right,
            column_delta: (right - left) / self.screen_width.max(1) as f32,
        }
    }
}

/// One constant-depth sampling line spanning the horizontal field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRing {
    /// World point sampled by screen column 0
    pub left: Point2<f32>,
    /// World point at the right screen edge
    pub right: Point2<f32>,
    /// World-space increment between two adjacent screen columns
    pub column_delta: Vector2<f32>,
}

impl DepthRing {
    /// Increment between two sampled columns when striding by `stride`.
    #[inline]
    pub fn step(&self, stride: usize) -> Vector2<f32> {
        self.column_delta * stride as f32
    }

    /// World point sampled by `column`, computed directly from the left edge.
    #[inline]
    pub fn point_at(&self, column: usize) -> Point2<f32> {
        self.left + self.column_delta * column as f32
    }

    /// Iterates `(column, world point)` pairs from column 0 to `screen_width`
    /// with the given stride, advancing the world point incrementally.
    pub fn columns(&self, screen_width: u32, stride: usize) -> RingColumns {
        RingColumns {
            position: self.left,
            step: self.step(stride.max(1)),
            column: 0,
            stride: stride.max(1),
            screen_width: screen_width as usize,
        }
    }
}

/// Iterator over the sampled columns of a [`DepthRing`].
#[derive(Debug, Clone)]
pub struct RingColumns {
    position: Point2<f32>,
    step: Vector2<f32>,
    column: usize,
    stride: usize,
    screen_width: usize,
}

impl Iterator for RingColumns {
    type Item = (usize, Point2<f32>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.column >= self.screen_width {
            return None;
        }
        let item = (self.column, self.position);
        self.column += self.stride;
        self.position += self.step;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(a: Point2<f32>, b: Point2<f32>, tolerance: f32) {
        assert!(
            (a.x - b.x).abs() < tolerance && (a.y - b.y).abs() < tolerance,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn yaw_zero_fans_toward_negative_y() {
        let projector = ColumnProjector::new(Point2::new(50.0, 50.0), 0.0, 100);
        let ring = projector.ring(10.0);

        assert_close(ring.left, Point2::new(40.0, 40.0), 1e-4);
        assert_close(ring.right, Point2::new(60.0, 40.0), 1e-4);
        assert!((ring.column_delta.x - 0.2).abs() < 1e-6);
        assert!(ring.column_delta.y.abs() < 1e-6);
    }

    #[test]
    fn quarter_turn_rotates_the_fan() {
        let projector = ColumnProjector::new(Point2::new(0.0, 0.0), FRAC_PI_2, 10);
        let ring = projector.ring(1.0);

        assert_close(ring.left, Point2::new(-1.0, 1.0), 1e-6);
        assert_close(ring.right, Point2::new(-1.0, -1.0), 1e-6);
    }

    #[test]
    fn strided_columns_match_single_stride_positions() {
        let projector = ColumnProjector::new(Point2::new(512.0, 300.0), 1.234, 800);
        let ring = projector.ring(137.5);

        let dense: Vec<_> = ring.columns(800, 1).collect();
        for stride in [2, 3, 5] {
            let sparse: Vec<_> = ring.columns(800, stride).collect();
            assert_eq!(sparse.len(), (800 + stride - 1) / stride);
            for (column, point) in sparse {
                assert_eq!(column % stride, 0);
                // Incremental f32 stepping drifts slightly; stay well inside one cell.
                assert_close(point, dense[column].1, 0.05);
                assert_close(point, ring.point_at(column), 0.05);
            }
        }
    }

    #[test]
    fn stride_step_is_a_multiple_of_the_column_delta() {
        let ring = ColumnProjector::new(Point2::new(0.0, 0.0), 0.7, 640).ring(42.0);
        let step = ring.step(3);

        assert!((step.x - 3.0 * ring.column_delta.x).abs() < 1e-6);
        assert!((step.y - 3.0 * ring.column_delta.y).abs() < 1e-6);
    }
}
