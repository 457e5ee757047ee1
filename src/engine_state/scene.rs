//! # Scene
//!
//! The window-independent half of the engine: camera, quality policy, terrain
//! and voxel renderer. One call to [`Scene::advance_frame`] is one frame:
//! apply the queued intent to the camera, then render from the updated pose.

use log::info;

use crate::config::Settings;

use super::{
    camera_state::{
        camera::{CameraPose, MovementIntent},
        CameraState,
    },
    terrain::TerrainField,
    voxel_renderer::{Framebuffer, QualityLevel, QualityPolicy, VoxelRenderer},
    PlayerAction,
};

/// Everything needed to produce frames, without any window or GPU.
pub struct Scene {
    camera_state: CameraState,
    quality: QualityPolicy,
    terrain: TerrainField,
    renderer: VoxelRenderer,
}

impl Scene {
    /// Creates a scene at the initial camera pose from `settings`.
    pub fn new(settings: &Settings, terrain: TerrainField) -> Self {
        Self {
            camera_state: CameraState::new(settings),
            quality: settings.quality.policy(),
            terrain,
            renderer: VoxelRenderer::new(
                settings.screen_width,
                settings.screen_height,
                settings.background(),
            ),
        }
    }

    /// Applies the actions translated from one input snapshot.
    pub fn apply_actions(&mut self, actions: &PlayerAction) {
        if actions.toggle_quality {
            self.toggle_quality();
        }
        self.set_intent(actions.intent);
    }

    /// Queues the movement intent for the next frame.
    pub fn set_intent(&mut self, intent: MovementIntent) {
        self.camera_state.intake_intent(intent);
    }

    /// Switches to the other quality level.
    ///
    /// Takes effect from the next rendered frame; a frame never mixes levels.
    pub fn toggle_quality(&mut self) -> QualityLevel {
        let level = self.quality.toggle();
        info!("Quality level switched to {:?}", level);
        level
    }

    /// Updates the camera from the queued intent and renders one frame.
    pub fn advance_frame(&mut self) -> &Framebuffer {
        self.camera_state.update();
        let parameters = self.quality.parameters();
        self.renderer
            .render(self.camera_state.pose(), parameters, &self.terrain)
    }

    /// The current camera pose.
    pub fn camera(&self) -> &CameraPose {
        self.camera_state.pose()
    }

    /// The quality policy and its active level.
    pub fn quality(&self) -> &QualityPolicy {
        &self.quality
    }

    /// The terrain being rendered.
    pub fn terrain(&self) -> &TerrainField {
        &self.terrain
    }

    /// The most recently rendered frame.
    pub fn framebuffer(&self) -> &Framebuffer {
        self.renderer.framebuffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn scene() -> Scene {
        let settings = Settings {
            screen_width: 64,
            screen_height: 48,
            initial_position: [32.0, 60.0],
            initial_height: 40.0,
            horizon: 10.0,
            ..Settings::default()
        };
        let terrain = TerrainField::from_fn(64, 64, |x, y| {
            (((x + y) % 16) as f32, Rgb([x as u8 * 4, y as u8 * 4, 90]))
        });
        Scene::new(&settings, terrain)
    }

    #[test]
    fn intent_is_applied_before_rendering() {
        let mut scene = scene();
        scene.set_intent(MovementIntent {
            move_forward: true,
            ..Default::default()
        });

        scene.advance_frame();
        assert_eq!(scene.camera().position.y, 55.0);

        // The intent is consumed: the next frame leaves the camera in place.
        scene.advance_frame();
        assert_eq!(scene.camera().position.y, 55.0);
    }

    #[test]
    fn toggle_action_switches_quality_once() {
        let mut scene = scene();
        assert_eq!(scene.quality().level(), QualityLevel::High);

        scene.apply_actions(&PlayerAction {
            toggle_quality: true,
            ..Default::default()
        });
        assert_eq!(scene.quality().level(), QualityLevel::Low);

        scene.apply_actions(&PlayerAction::default());
        assert_eq!(scene.quality().level(), QualityLevel::Low);
    }

    #[test]
    fn advancing_without_input_is_deterministic() {
        let mut scene = scene();
        let first = scene.advance_frame().clone();
        let second = scene.advance_frame().clone();
        assert_eq!(first, second);
    }
}
