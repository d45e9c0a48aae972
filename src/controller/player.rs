use glam::Vec3;
use winit::keyboard::KeyCode;

use crate::controller::InputSnapshot;
use crate::model::{Camera, EulerAngles};

const LOOK_DEGREES_PER_COUNT: f32 = 0.08;
const MOVE_SPEED: f32 = 2.0;
const SPRINT_FACTOR: f32 = 10.0;

/// Free-fly first-person player. Keyboard and gamepad both steer the same
/// position and orientation; the camera is re-synced at the end of every
/// update.
#[derive(Debug)]
pub struct Player {
    pub position: Vec3,
    pub orientation: EulerAngles,
    pub camera: Camera,
}

impl Player {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Camera::new();
        camera.set_perspective(2.0, 60.0, 0.1, 300.0);
        Self {
            position,
            orientation: EulerAngles::ZERO,
            camera,
        }
    }

    pub fn update(&mut self, delta_seconds: f32, input: &InputSnapshot) {
        self.keyboard_pass(delta_seconds, input);
        self.gamepad_pass(delta_seconds, input);

        self.orientation.pitch = self.orientation.pitch.clamp(-85.0, 85.0);
        self.orientation.roll = self.orientation.roll.clamp(-45.0, 45.0);

        self.camera
            .set_position_and_orientation(self.position, self.orientation);
        self.camera.set_perspective(2.0, 60.0, 0.1, 300.0);
    }

    fn keyboard_pass(&mut self, delta_seconds: f32, input: &InputSnapshot) {
        // Yaw and pitch with the mouse
        self.orientation.yaw += LOOK_DEGREES_PER_COUNT * input.mouse_delta.x;
        self.orientation.pitch -= LOOK_DEGREES_PER_COUNT * input.mouse_delta.y;

        let mut speed = MOVE_SPEED;
        if input.is_key_down(KeyCode::ShiftLeft) || input.is_key_down(KeyCode::ShiftRight) {
            speed *= SPRINT_FACTOR;
        }

        let forward = self.orientation.forward();
        let left = self.orientation.left();

        if input.is_key_down(KeyCode::KeyA) {
            self.position += speed * left * delta_seconds;
        }
        if input.is_key_down(KeyCode::KeyD) {
            self.position += -speed * left * delta_seconds;
        }
        if input.is_key_down(KeyCode::KeyW) {
            self.position += speed * forward * delta_seconds;
        }
        if input.is_key_down(KeyCode::KeyS) {
            self.position += -speed * forward * delta_seconds;
        }

        // Vertical movement is always along world up, ignoring orientation.
        if input.is_key_down(KeyCode::KeyZ) {
            self.position += -speed * Vec3::Z * delta_seconds;
        }
        if input.is_key_down(KeyCode::KeyC) {
            self.position += speed * Vec3::Z * delta_seconds;
        }

        // Reset runs last so it wins over movement applied this frame.
        if input.was_key_just_pressed(KeyCode::KeyH) {
            self.reset();
        }
    }

    fn gamepad_pass(&mut self, delta_seconds: f32, input: &InputSnapshot) {
        let pad = &input.gamepad;
        let mut speed = MOVE_SPEED;
        if pad.button_a {
            speed *= SPRINT_FACTOR;
        }

        // Triggers assign roll directly rather than accumulating it, so roll
        // snaps back toward zero the moment a trigger is released.
        if pad.left_trigger > 0.0 {
            self.orientation.roll = -90.0 * delta_seconds;
        }
        if pad.right_trigger > 0.0 {
            self.orientation.roll = 90.0 * delta_seconds;
        }

        if pad.left_stick.length() > 0.0 {
            let forward = self.orientation.forward();
            let left = self.orientation.left();
            self.position += -speed * pad.left_stick.x * left * delta_seconds;
            self.position += speed * pad.left_stick.y * forward * delta_seconds;
        }

        if pad.left_shoulder {
            self.position += -speed * Vec3::Z * delta_seconds;
        }
        if pad.right_shoulder {
            self.position += speed * Vec3::Z * delta_seconds;
        }

        if pad.start_just_pressed() {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.position = Vec3::ZERO;
        self.orientation = EulerAngles::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use winit::event::ElementState;

    fn press(input: &mut InputSnapshot, key: KeyCode) {
        input.key_event(key, ElementState::Pressed);
    }

    #[test]
    fn forward_movement_follows_orientation() {
        let mut player = Player::new(Vec3::ZERO);
        let mut input = InputSnapshot::new();
        press(&mut input, KeyCode::KeyW);
        player.update(1.0, &input);
        assert!((player.position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn sprint_multiplies_speed_by_ten() {
        let mut player = Player::new(Vec3::ZERO);
        let mut input = InputSnapshot::new();
        press(&mut input, KeyCode::KeyW);
        press(&mut input, KeyCode::ShiftLeft);
        player.update(1.0, &input);
        assert!((player.position - Vec3::new(20.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn vertical_keys_move_along_world_up() {
        let mut player = Player::new(Vec3::ZERO);
        player.orientation.yaw = 90.0;
        let mut input = InputSnapshot::new();
        press(&mut input, KeyCode::KeyC);
        player.update(0.5, &input);
        assert!((player.position - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn mouse_look_scales_and_clamps_pitch() {
        let mut player = Player::new(Vec3::ZERO);
        let mut input = InputSnapshot::new();
        input.add_mouse_delta(Vec2::new(100.0, -50.0));
        player.update(0.016, &input);
        assert!((player.orientation.yaw - 8.0).abs() < 1e-4);
        assert!((player.orientation.pitch - 4.0).abs() < 1e-4);

        let mut input = InputSnapshot::new();
        input.add_mouse_delta(Vec2::new(0.0, -10_000.0));
        player.update(0.016, &input);
        assert_eq!(player.orientation.pitch, 85.0);
    }

    #[test]
    fn reset_wins_over_same_frame_movement() {
        let mut player = Player::new(Vec3::new(5.0, 5.0, 5.0));
        player.orientation.yaw = 30.0;
        let mut input = InputSnapshot::new();
        press(&mut input, KeyCode::KeyW);
        press(&mut input, KeyCode::KeyH);
        player.update(1.0, &input);
        assert_eq!(player.position, Vec3::ZERO);
        assert_eq!(player.orientation, EulerAngles::ZERO);
    }

    #[test]
    fn roll_is_clamped_after_update() {
        let mut player = Player::new(Vec3::ZERO);
        let mut input = InputSnapshot::new();
        // At dt = 1.0 the trigger assignment yields 90 degrees before the
        // clamp runs.
        input.gamepad.right_trigger = 1.0;
        player.update(1.0, &input);
        assert_eq!(player.orientation.roll, 45.0);

        let mut input = InputSnapshot::new();
        input.gamepad.left_trigger = 1.0;
        player.update(1.0, &input);
        assert_eq!(player.orientation.roll, -45.0);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut player = Player::new(Vec3::new(3.0, -2.0, 7.0));
        for _ in 0..2 {
            let mut input = InputSnapshot::new();
            press(&mut input, KeyCode::KeyH);
            player.update(1.0, &input);
            assert_eq!(player.position, Vec3::ZERO);
            assert_eq!(player.orientation, EulerAngles::ZERO);
        }
    }

    #[test]
    fn trigger_roll_does_not_accumulate() {
        let mut player = Player::new(Vec3::ZERO);
        let mut input = InputSnapshot::new();
        input.gamepad.right_trigger = 1.0;
        player.update(0.1, &input);
        assert!((player.orientation.roll - 9.0).abs() < 1e-5);
        player.update(0.1, &input);
        // Assigned each frame, not summed.
        assert!((player.orientation.roll - 9.0).abs() < 1e-5);
    }

    #[test]
    fn camera_tracks_player_after_update() {
        let mut player = Player::new(Vec3::new(-1.0, 0.0, 0.5));
        let input = InputSnapshot::new();
        player.update(0.0, &input);
        assert_eq!(player.camera.position, Vec3::new(-1.0, 0.0, 0.5));
        assert_eq!(player.camera.aspect, 2.0);
        assert_eq!(player.camera.fov_y_degrees, 60.0);
    }
}
