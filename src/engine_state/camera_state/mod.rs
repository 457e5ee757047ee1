//! # Camera State Management
//!
//! This module owns the camera for the lifetime of the application:
//! - Camera pose tracking (position, yaw, height, projection constants)
//! - Per-frame movement intents queued by the input layer
//! - Applying those intents in one pass at the start of each frame
//!
//! ## Core Components
//! - `CameraPose`: The pose read by the voxel renderer
//! - `CameraController`: Fixed speeds used to move the pose
//! - `MovementIntent`: The flag set produced from player input

use cgmath::{Point2, Rad};

use crate::config::Settings;

pub mod camera;

use camera::{CameraController, CameraPose, MovementIntent};

/// Owns the camera pose and the controller that moves it.
///
/// The pose is created once from the settings and then only mutated by
/// [`CameraState::update`]. Nothing else holds a mutable handle to it.
#[derive(Debug)]
pub struct CameraState {
    /// The current camera pose
    pose: CameraPose,
    /// Speeds used to apply intents
    controller: CameraController,
    /// Intent queued for the next update
    pending: MovementIntent,
}

impl CameraState {
    /// Creates the camera at the initial pose from `settings`.
    pub fn new(settings: &Settings) -> Self {
        let pose = CameraPose::new(
            Point2::new(settings.initial_position[0], settings.initial_position[1]),
            Rad(settings.initial_yaw),
            settings.initial_height,
            settings.horizon,
            settings.height_scale,
        );
        let controller = CameraController::new(
            settings.movement_speed,
            settings.rotation_speed,
            settings.height_increment,
        );

        Self {
            pose,
            controller,
            pending: MovementIntent::default(),
        }
    }

    /// Queues the intent snapshot for the next update, replacing any earlier one.
    ///
    /// # Arguments
    /// * `intent` - The movement flags sampled from input this frame
    pub fn intake_intent(&mut self, intent: MovementIntent) {
        self.pending = intent;
    }

    /// Applies the queued intent to the pose and clears it.
    ///
    /// # Returns
    /// `true` if the pose changed
    pub fn update(&mut self) -> bool {
        let intent = std::mem::take(&mut self.pending);
        if intent.is_idle() {
            return false;
        }

        let before = self.pose;
        self.controller.apply(&mut self.pose, intent);
        self.pose != before
    }

    /// The current pose.
    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_the_configured_pose() {
        let settings = Settings::default();
        let state = CameraState::new(&settings);

        assert_eq!(state.pose().position, Point2::new(400.0, 400.0));
        assert_eq!(state.pose().height, 10.0);
        assert_eq!(state.pose().horizon, 100.0);
        assert_eq!(state.pose().height_scale, 120.0);
    }

    #[test]
    fn queued_intent_is_applied_once() {
        let mut state = CameraState::new(&Settings::default());
        state.intake_intent(MovementIntent {
            rise_up: true,
            ..Default::default()
        });

        assert!(state.update());
        assert_eq!(state.pose().height, 20.0);
        assert!(!state.update());
        assert_eq!(state.pose().height, 20.0);
    }

    #[test]
    fn opposing_intents_report_no_change() {
        let mut state = CameraState::new(&Settings::default());
        state.intake_intent(MovementIntent {
            rise_up: true,
            rise_down: true,
            ..Default::default()
        });

        assert!(!state.update());
    }
}
