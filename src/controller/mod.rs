pub mod clock;
pub mod debug_modes;
pub mod input;
pub mod player;

pub use clock::GameClock;
pub use debug_modes::DebugModeSelector;
pub use input::{GamepadState, InputSnapshot};
pub use player::Player;
