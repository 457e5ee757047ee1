//! # Camera Implementation
//!
//! This module contains the camera pose consumed by the voxel renderer and the
//! controller that moves it:
//! - `CameraPose`: position over the terrain plane, yaw, height and view constants
//! - `MovementIntent`: the closed set of per-frame movement flags
//! - `CameraController`: applies an intent to a pose with fixed speeds
//!
//! ## Conventions
//! The view fan at yaw `φ` opens along `(-sin φ, -cos φ)`. Forward motion follows
//! that direction and strafing follows the screen's left-to-right axis
//! `(cos φ, -sin φ)`, so all movement is relative to the current yaw.

use std::f32::consts::TAU;

use cgmath::{Point2, Rad, Vector2, Zero};

/// Where the camera is and how it projects.
///
/// Position and height are unbounded: the camera may leave the terrain or sink
/// below it. Yaw is kept in `[0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Position on the terrain plane, in terrain cells
    pub position: Point2<f32>,
    /// Heading in radians, in `[0, 2π)`
    pub yaw: Rad<f32>,
    /// Camera elevation in terrain height units
    pub height: f32,
    /// Screen row of the horizon line
    pub horizon: f32,
    /// Pixels per unit of height difference per unit of inverse depth
    pub height_scale: f32,
}

impl CameraPose {
    /// Creates a pose, normalising `yaw` into `[0, 2π)`.
    ///
    /// # Example
    /// ```rust
    /// use cgmath::{Deg, Point2};
    /// use voxel_space::CameraPose;
    ///
    /// let pose = CameraPose::new(Point2::new(400.0, 400.0), Deg(-90.0_f32), 10.0, 100.0, 120.0);
    /// assert!((pose.yaw.0 - 3.0 * std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    /// ```
    pub fn new<Y: Into<Rad<f32>>>(
        position: Point2<f32>,
        yaw: Y,
        height: f32,
        horizon: f32,
        height_scale: f32,
    ) -> Self {
        let mut yaw = yaw.into().0.rem_euclid(TAU);
        if yaw >= TAU {
            yaw = 0.0;
        }
        Self {
            position,
            yaw: Rad(yaw),
            height,
            horizon,
            height_scale,
        }
    }

    /// Unit vector the view fan opens along.
    ///
    /// Must stay `(-sin φ, -cos φ)` to match the rings built by `ColumnProjector`;
    /// `(sin φ, cos φ)` would move the camera away from what it sees.
    pub fn forward(&self) -> Vector2<f32> {
        let (sin, cos) = self.yaw.0.sin_cos();
        Vector2::new(-sin, -cos)
    }

    /// Unit vector pointing from the left screen edge to the right one.
    pub fn right(&self) -> Vector2<f32> {
        let (sin, cos) = self.yaw.0.sin_cos();
        Vector2::new(cos, -sin)
    }
}

/// The movement flags sampled once per frame.
///
/// Flags are independent and may combine freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    /// Move along the view direction
    pub move_forward: bool,
    /// Move against the view direction
    pub move_backward: bool,
    /// Move toward the left screen edge
    pub strafe_left: bool,
    /// Move toward the right screen edge
    pub strafe_right: bool,
    /// Turn counter-clockwise (yaw increases)
    pub yaw_left: bool,
    /// Turn clockwise (yaw decreases)
    pub yaw_right: bool,
    /// Raise the camera
    pub rise_up: bool,
    /// Lower the camera
    pub rise_down: bool,
}

impl MovementIntent {
    /// `true` when no flag is set.
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Applies movement intents to a pose with fixed per-frame amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraController {
    /// Distance moved per frame, in terrain cells
    pub movement_speed: f32,
    /// Yaw change per frame, in radians
    pub rotation_speed: f32,
    /// Height change per frame
    pub height_increment: f32,
}

impl CameraController {
    /// Creates a new camera controller.
    ///
    /// # Arguments
    /// * `movement_speed` - Distance moved per frame
    /// * `rotation_speed` - Radians turned per frame
    /// * `height_increment` - Height change per frame
    pub fn new(movement_speed: f32, rotation_speed: f32, height_increment: f32) -> Self {
        Self {
            movement_speed,
            rotation_speed,
            height_increment,
        }
    }

    /// Applies one frame of `intent` to `pose`.
    ///
    /// Directions are taken from the yaw at the start of the frame, so a frame
    /// that both turns and moves translates along the old heading. Yaw is
    /// wrapped back into `[0, 2π)` with a single correction.
    pub fn apply(&self, pose: &mut CameraPose, intent: MovementIntent) {
        let forward = pose.forward();
        let right = pose.right();

        let mut displacement = Vector2::zero();
        if intent.move_forward {
            displacement += forward;
        }
        if intent.move_backward {
            displacement -= forward;
        }
        if intent.strafe_right {
            displacement += right;
        }
        if intent.strafe_left {
            displacement -= right;
        }
        pose.position += displacement * self.movement_speed;

        let mut yaw = pose.yaw.0;
        if intent.yaw_left {
            yaw += self.rotation_speed;
        }
        if intent.yaw_right {
            yaw -= self.rotation_speed;
        }
        pose.yaw = Rad(wrap_yaw(yaw));

        if intent.rise_up {
            pose.height += self.height_increment;
        }
        if intent.rise_down {
            pose.height -= self.height_increment;
        }
    }
}

/// Brings a yaw at most one turn outside `[0, 2π)` back into range.
fn wrap_yaw(yaw: f32) -> f32 {
    let wrapped = if yaw < 0.0 {
        yaw + TAU
    } else if yaw >= TAU {
        yaw - TAU
    } else {
        yaw
    };
    // A tiny negative yaw plus TAU can round up to exactly TAU in f32.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
