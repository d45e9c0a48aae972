use anyhow::Result;
use glam::{Mat4, Vec2, Vec3};
use tracing::info;
use winit::keyboard::KeyCode;

use crate::config::GameConfig;
use crate::controller::{DebugModeSelector, GameClock, InputSnapshot, Player};
use crate::model::{
    build_grid_vertices, load_obj_mesh, model_transform, Camera, ScreenCamera, VertexPcu,
    VertexPcutbn,
};

pub const SCREEN_SIZE_X: f32 = 1600.0;
pub const SCREEN_SIZE_Y: f32 = 800.0;

pub const DEFAULT_METADATA_PATH: &str = "data/models/woman.xml";
const BASE_MESH_PATH: &str = "data/models/cube_vni.obj";
const PLAYER_START: Vec3 = Vec3::new(-1.0, 0.0, 0.5);

/// Everything the frame loop updates and the renderer reads: the loaded model,
/// the reference grid, the player, the clocks and the attract state machine.
pub struct Scene {
    pub config: GameConfig,
    pub model_verts: Vec<VertexPcutbn>,
    pub grid_verts: Vec<VertexPcu>,
    pub model_to_world: Mat4,
    pub player: Player,
    pub screen_camera: ScreenCamera,
    pub clock: GameClock,
    pub debug_modes: DebugModeSelector,
    pub is_attract: bool,
    pub quit_requested: bool,
    pub overlay_text: String,
    pub sun_direction: Vec3,
    pub sun_intensity: f32,
    pub ambient_intensity: f32,
}

impl Scene {
    /// Loads metadata and meshes from disk. The base cube and the configured
    /// model are appended to the same vertex list; either failing to load is
    /// fatal.
    pub fn load() -> Result<Self> {
        let config = GameConfig::load(DEFAULT_METADATA_PATH);

        let mut model_verts = Vec::new();
        load_obj_mesh(&mut model_verts, BASE_MESH_PATH)?;
        let obj_file = config.get_string("objFile", "");
        load_obj_mesh(&mut model_verts, &obj_file)?;
        info!(vertices = model_verts.len(), %obj_file, "model loaded");

        Ok(Self::new(config, model_verts))
    }

    pub fn new(config: GameConfig, model_verts: Vec<VertexPcutbn>) -> Self {
        let units_per_meter = config.get_f32("unitsPerMeter", 0.0);
        let x = config.get_string("x", "left");
        let y = config.get_string("y", "up");
        let z = config.get_string("z", "forward");
        let model_to_world = model_transform(units_per_meter, &x, &y, &z);

        Self {
            config,
            model_verts,
            grid_verts: build_grid_vertices(),
            model_to_world,
            player: Player::new(PLAYER_START),
            screen_camera: ScreenCamera::new(),
            clock: GameClock::new(),
            debug_modes: DebugModeSelector::new(),
            is_attract: true,
            quit_requested: false,
            overlay_text: String::new(),
            sun_direction: Vec3::new(3.0, 1.0, -2.0),
            sun_intensity: 0.35,
            ambient_intensity: 0.25,
        }
    }

    pub fn diffuse_map_path(&self) -> String {
        self.config.get_string("diffuseMap", "")
    }

    pub fn normal_map_path(&self) -> String {
        self.config.get_string("normalMap", "")
    }

    pub fn camera(&self) -> &Camera {
        &self.player.camera
    }

    pub fn update(&mut self, raw_delta_seconds: f32, input: &InputSnapshot) {
        let delta_seconds = self.clock.tick(raw_delta_seconds);

        self.overlay_text = format!(
            "Debug Mode [{}]: {}",
            self.debug_modes.mode,
            self.debug_modes.describe()
        );

        self.player.update(delta_seconds, input);

        self.adjust_for_pause_and_time_distortion(input);
        self.process_key_presses(input);

        self.update_cameras();
    }

    fn adjust_for_pause_and_time_distortion(&mut self, input: &InputSnapshot) {
        // Slow motion while T is held.
        if input.is_key_down(KeyCode::KeyT) {
            self.clock.time_scale = 0.1;
        } else {
            self.clock.time_scale = 1.0;
        }

        if input.was_key_just_pressed(KeyCode::KeyP) {
            self.clock.toggle_pause();
        }

        if input.was_key_just_pressed(KeyCode::KeyO) {
            self.clock.step_single_frame();
        }

        // Escape quits only from the attract screen. This runs before the
        // attract transition below, so the first press from the active scene
        // returns to attract and the next press quits.
        if input.was_key_just_pressed(KeyCode::Escape) && self.is_attract {
            self.quit_requested = true;
        }
    }

    fn process_key_presses(&mut self, input: &InputSnapshot) {
        if input.was_key_just_pressed(KeyCode::Space) {
            self.is_attract = false;
        }
        if input.was_key_just_pressed(KeyCode::Escape) {
            self.is_attract = true;
        }

        self.debug_modes.process_input(input);
    }

    fn update_cameras(&mut self) {
        self.screen_camera
            .set_ortho_view(Vec2::ZERO, Vec2::new(SCREEN_SIZE_X, SCREEN_SIZE_Y));
    }
}
