//! # Input Manager
//!
//! This module handles keyboard input for the application, including:
//! - Key state tracking across frames
//! - Window event intake
//! - Producing per-frame snapshots with press/hold/release transitions

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{ProcessedInputState, RawInputState};

/// Keys the engine reacts to. Everything else is ignored at intake.
pub const KEY_CODES: [KeyCode; 10] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::KeyQ,
    KeyCode::KeyE,
    KeyCode::Space,
    KeyCode::ShiftLeft,
    KeyCode::KeyL,
    KeyCode::KeyP,
];

/// Manages the state of the tracked keys and processes input events.
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a new InputManager with every tracked key released.
    pub fn new() -> Self {
        let keyboard_inputs_old = KEY_CODES.iter().map(|&key| (key, false)).collect();
        let keyboard_inputs_new = KEY_CODES.iter().map(|&key| (key, false)).collect();

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
        }
    }

    /// Copies the current state into the old state for the next frame's comparisons.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event and updates internal key state.
    ///
    /// # Arguments
    /// * `event` - The window event to process
    pub fn intake_input(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    state,
                    physical_key: PhysicalKey::Code(key),
                    ..
                },
            ..
        } = event
        {
            self.set_key(*key, *state == ElementState::Pressed);
        }
    }

    /// Records the raw pressed state of a tracked key.
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = pressed;
        }
    }

    /// Creates a processed input state from the current raw boolean states.
    ///
    /// # Returns
    /// A new `ProcessedInputState` with one transition per tracked key.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                (*key, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState { keyboard_states }
    }

    /// Returns the processed input state and advances to the next frame.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.move_old_states();
        processed_input
    }

    /// Releases every key.
    ///
    /// Called when the window loses focus to prevent stuck keys.
    pub fn reset_inputs(&mut self) {
        for key_state in self.keyboard_inputs_new.values_mut() {
            *key_state = false;
        }
        self.move_old_states();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_then_hold_then_release() {
        let mut manager = InputManager::new();

        manager.set_key(KeyCode::KeyW, true);
        let first = manager.get_and_reset_processed_input();
        assert_eq!(first.get_key_state(KeyCode::KeyW), RawInputState::Pressed);

        let second = manager.get_and_reset_processed_input();
        assert_eq!(second.get_key_state(KeyCode::KeyW), RawInputState::Held);

        manager.set_key(KeyCode::KeyW, false);
        let third = manager.get_and_reset_processed_input();
        assert_eq!(third.get_key_state(KeyCode::KeyW), RawInputState::Released);
    }

    #[test]
    fn untracked_keys_are_ignored() {
        let mut manager = InputManager::new();
        manager.set_key(KeyCode::KeyZ, true);

        let processed = manager.get_and_reset_processed_input();
        assert_eq!(processed.keyboard_states.len(), KEY_CODES.len());
        assert_eq!(processed.get_key_state(KeyCode::KeyZ), RawInputState::NotPressed);
    }

    #[test]
    fn reset_releases_held_keys() {
        let mut manager = InputManager::new();
        manager.set_key(KeyCode::KeyQ, true);
        manager.get_and_reset_processed_input();

        manager.reset_inputs();
        let processed = manager.get_and_reset_processed_input();
        assert_eq!(processed.get_key_state(KeyCode::KeyQ), RawInputState::NotPressed);
    }
}
