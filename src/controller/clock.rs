/// Game-side clock: scales the wall-clock delta, supports pausing and
/// single-frame stepping. Total elapsed game time only advances by scaled
/// deltas.
#[derive(Debug, Clone, Copy)]
pub struct GameClock {
    pub time_scale: f32,
    paused: bool,
    step_queued: bool,
    total_seconds: f32,
}

impl GameClock {
    pub fn new() -> Self {
        Self {
            time_scale: 1.0,
            paused: false,
            step_queued: false,
            total_seconds: 0.0,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Runs exactly one unpaused tick, then pauses again.
    pub fn step_single_frame(&mut self) {
        self.step_queued = true;
        self.paused = false;
    }

    pub fn total_seconds(&self) -> f32 {
        self.total_seconds
    }

    /// Converts a raw frame delta into game time. Returns zero while paused.
    pub fn tick(&mut self, raw_delta_seconds: f32) -> f32 {
        if self.paused {
            return 0.0;
        }
        let delta = raw_delta_seconds * self.time_scale;
        self.total_seconds += delta;
        if self.step_queued {
            self.step_queued = false;
            self.paused = true;
        }
        delta
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}
