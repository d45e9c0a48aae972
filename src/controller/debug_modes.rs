use winit::keyboard::KeyCode;

use crate::controller::InputSnapshot;

/// Keyboard bindings for the shader debug visualization modes. Later entries
/// win when several keys fire on the same frame.
const MODE_BINDINGS: &[(KeyCode, i32)] = &[
    (KeyCode::Digit0, 0),
    (KeyCode::Digit1, 1),
    (KeyCode::Digit2, 2),
    (KeyCode::Digit3, 3),
    (KeyCode::Digit7, 7),
    (KeyCode::Digit8, 8),
    (KeyCode::Digit9, 9),
    (KeyCode::KeyK, 10),
    (KeyCode::KeyL, 11),
    // Tangent/bitangent/normal views
    (KeyCode::KeyT, 4),
    (KeyCode::KeyB, 5),
    (KeyCode::KeyN, 6),
    // Specular/glossiness/emissive views (numpad, num lock required)
    (KeyCode::Numpad0, 14),
    (KeyCode::Numpad1, 15),
    (KeyCode::Numpad2, 16),
    (KeyCode::Numpad3, 17),
    (KeyCode::Numpad4, 18),
    (KeyCode::Numpad5, 19),
    (KeyCode::Numpad6, 20),
];

/// Holds the active shader debug mode, selected by number and letter keys.
#[derive(Debug, Default)]
pub struct DebugModeSelector {
    pub mode: i32,
}

impl DebugModeSelector {
    pub fn new() -> Self {
        Self { mode: 0 }
    }

    pub fn process_input(&mut self, input: &InputSnapshot) {
        for &(key, mode) in MODE_BINDINGS {
            if input.was_key_just_pressed(key) {
                self.mode = mode;
            }
        }
    }

    pub fn describe(&self) -> &'static str {
        describe_mode(self.mode)
    }
}

pub fn describe_mode(mode: i32) -> &'static str {
    match mode {
        0 => "Lit (including normal maps)",
        1 => "Diffuse Texel only",
        2 => "Vertex Color only (C)",
        3 => "UV TexCoords only (U)",
        4 => "Vertex Tangents: Transformed into world space (T)",
        5 => "Vertex BiTangents: Transformed into world space (B)",
        6 => "Vertex Normals: Transformed into world space (N)",
        7 => "Normal Map texel only",
        8 => "Pixel Normal in TBN space (decoded, raw)",
        9 => "Pixel Normal in World space (decoded, transformed)",
        10 => "Lit, but without normal maps",
        11 => "Light strength (vs. pixel normal in world space)",
        14 => "SGE Texel only",
        15 => "Specular: Specular only (red channel)",
        16 => "Glossiness: Glossiness only (green channel)",
        17 => "Emissive: Emissive only (blue channel",
        18 => "Light: Total Specular * Specular channel",
        19 => "Light: Total Light Color * diffTexture with added Emissive",
        20 => "Specular: Sharp glare, supressing other light",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    #[test]
    fn every_binding_selects_its_mode() {
        for &(key, mode) in MODE_BINDINGS {
            let mut input = InputSnapshot::new();
            let mut selector = DebugModeSelector::new();
            selector.mode = -1;
            input.key_event(key, ElementState::Pressed);
            selector.process_input(&input);
            assert_eq!(selector.mode, mode, "key {key:?}");
        }
    }

    #[test]
    fn held_key_does_not_reselect() {
        let mut input = InputSnapshot::new();
        let mut selector = DebugModeSelector::new();
        input.key_event(KeyCode::KeyL, ElementState::Pressed);
        selector.process_input(&input);
        assert_eq!(selector.mode, 11);

        input.end_frame();
        selector.mode = 0;
        selector.process_input(&input);
        assert_eq!(selector.mode, 0);
    }

    #[test]
    fn unbound_modes_describe_as_unknown() {
        assert_eq!(describe_mode(12), "Unknown");
        assert_eq!(describe_mode(13), "Unknown");
        assert_eq!(describe_mode(21), "Unknown");
        assert_eq!(describe_mode(-1), "Unknown");
        assert_eq!(describe_mode(0), "Lit (including normal maps)");
    }
}
