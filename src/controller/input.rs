use std::collections::HashSet;

use glam::Vec2;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Per-frame keyboard and mouse state, fed by the window event loop.
/// Edge queries compare against the previous frame, so `end_frame` must run
/// exactly once per update.
#[derive(Debug, Default)]
pub struct InputSnapshot {
    keys_down: HashSet<KeyCode>,
    keys_down_prev: HashSet<KeyCode>,
    pub mouse_delta: Vec2,
    pub gamepad: GamepadState,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_event(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.keys_down.insert(key);
            }
            ElementState::Released => {
                self.keys_down.remove(&key);
            }
        }
    }

    pub fn add_mouse_delta(&mut self, delta: Vec2) {
        self.mouse_delta += delta;
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn was_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key) && !self.keys_down_prev.contains(&key)
    }

    /// Rolls held state into the previous frame and clears accumulated deltas.
    pub fn end_frame(&mut self) {
        self.keys_down_prev = self.keys_down.clone();
        self.mouse_delta = Vec2::ZERO;
        self.gamepad.end_frame();
    }

    /// Drops all held keys, e.g. when the window loses focus, so nothing
    /// stays stuck down.
    pub fn clear_keys(&mut self) {
        self.keys_down.clear();
    }
}

/// Gamepad state mirrored into plain data each frame. The window layer owns
/// whatever backend polls the device; game code only reads this struct.
#[derive(Debug, Default, Clone, Copy)]
pub struct GamepadState {
    pub left_stick: Vec2,
    pub left_trigger: f32,
    pub right_trigger: f32,
    pub button_a: bool,
    pub left_shoulder: bool,
    pub right_shoulder: bool,
    pub start: bool,
    start_prev: bool,
}

impl GamepadState {
    pub fn start_just_pressed(&self) -> bool {
        self.start && !self.start_prev
    }

    fn end_frame(&mut self) {
        self.start_prev = self.start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_edges_last_one_frame() {
        let mut input = InputSnapshot::new();
        input.key_event(KeyCode::Space, ElementState::Pressed);
        assert!(input.is_key_down(KeyCode::Space));
        assert!(input.was_key_just_pressed(KeyCode::Space));

        input.end_frame();
        assert!(input.is_key_down(KeyCode::Space));
        assert!(!input.was_key_just_pressed(KeyCode::Space));

        input.key_event(KeyCode::Space, ElementState::Released);
        assert!(!input.is_key_down(KeyCode::Space));
    }

    #[test]
    fn mouse_delta_accumulates_until_end_of_frame() {
        let mut input = InputSnapshot::new();
        input.add_mouse_delta(Vec2::new(1.0, 2.0));
        input.add_mouse_delta(Vec2::new(3.0, -1.0));
        assert_eq!(input.mouse_delta, Vec2::new(4.0, 1.0));
        input.end_frame();
        assert_eq!(input.mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn gamepad_start_edge() {
        let mut input = InputSnapshot::new();
        input.gamepad.start = true;
        assert!(input.gamepad.start_just_pressed());
        input.end_frame();
        assert!(!input.gamepad.start_just_pressed());
    }

    #[test]
    fn clear_keys_drops_held_state() {
        let mut input = InputSnapshot::new();
        input.key_event(KeyCode::KeyW, ElementState::Pressed);
        input.clear_keys();
        assert!(!input.is_key_down(KeyCode::KeyW));
    }
}
