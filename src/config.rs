//! Input configuration.
//!
//! One [`InputConfig`] feeds all three sources of a
//! [`UnifiedInput`](crate::unified::UnifiedInput). It is plain serde data, so it
//! can live in a TOML file next to the rest of a game's settings:
//!
//! ```toml
//! [keyboard]
//! keys = ["KeyW", "KeyA", "KeyS", "KeyD", "KeySpace"]
//!
//! [mouse]
//! reference_frame = 0
//! scale = { x = 3.0, y = 3.0 }
//!
//! [gamepad]
//! dead_zone = 0.15
//! clamp_axes = false
//! ```
//!
//! Every field is optional; missing ones take the defaults below.

use crate::error::Result;
use crate::event::FrameId;
use crate::mouse::Scale;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub keyboard: KeyboardConfig,
    pub mouse: MouseConfig,
    pub gamepad: GamepadConfig,
}

impl InputConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// `Key`-prefixed identifiers to track.
    pub keys: Vec<String>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            keys: default_keys(),
        }
    }
}

/// Letters, digits, arrows and the usual control keys.
pub fn default_keys() -> Vec<String> {
    let letters = ('A'..='Z').map(|c| format!("Key{c}"));
    let digits = ('0'..='9').map(|c| format!("Key{c}"));
    let named = [
        "ArrowUp",
        "ArrowDown",
        "ArrowLeft",
        "ArrowRight",
        "Space",
        "Enter",
        "Escape",
        "Tab",
        "Backspace",
        "Shift",
        "Control",
        "Alt",
    ]
    .iter()
    .map(|name| format!("Key{name}"));
    letters.chain(digits).chain(named).collect()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseConfig {
    /// Frame whose mouse events are observed.
    pub reference_frame: FrameId,
    pub scale: Scale,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadConfig {
    /// Axis readings with a smaller magnitude are treated as exactly zero.
    pub dead_zone: f32,
    /// Magnitude an axis must reach to press a virtual direction button.
    pub press_threshold: f32,
    /// Axis value a trigger must exceed to count as pressed (axis trigger mode only).
    pub trigger_press_threshold: f32,
    /// Rescale each stick onto the unit disk in [`get_axis`](crate::gamepad::GamepadInput::get_axis).
    pub clamp_axes: bool,
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            dead_zone: 0.1,
            press_threshold: 0.35,
            trigger_press_threshold: 0.0,
            clamp_axes: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = InputConfig::default();
        assert_eq!(cfg.gamepad.dead_zone, 0.1);
        assert_eq!(cfg.gamepad.press_threshold, 0.35);
        assert_eq!(cfg.gamepad.trigger_press_threshold, 0.0);
        assert!(cfg.gamepad.clamp_axes);
        assert_eq!(cfg.mouse.reference_frame, FrameId::ROOT);
        assert_eq!(cfg.mouse.scale, Scale { x: 1.0, y: 1.0 });
        assert_eq!(cfg.keyboard.keys.len(), 26 + 10 + 12);
        assert!(cfg.keyboard.keys.iter().any(|k| k == "KeyArrowUp"));
        assert!(cfg.keyboard.keys.iter().all(|k| k.starts_with("Key")));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = InputConfig::from_toml_str(
            r#"
            [keyboard]
            keys = ["KeyW", "KeyS"]

            [mouse]
            reference_frame = 4
            scale = { x = 3.0, y = 3.0 }

            [gamepad]
            dead_zone = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.keyboard.keys, vec!["KeyW", "KeyS"]);
        assert_eq!(cfg.mouse.reference_frame, FrameId(4));
        assert_eq!(cfg.mouse.scale.x, 3.0);
        assert_eq!(cfg.gamepad.dead_zone, 0.2);
        assert_eq!(cfg.gamepad.press_threshold, 0.35);
        assert!(cfg.gamepad.clamp_axes);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(InputConfig::from_toml_str("").unwrap(), InputConfig::default());
    }

    #[test]
    fn toml_round_trip() {
        let mut cfg = InputConfig::default();
        cfg.gamepad.clamp_axes = false;
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(InputConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = InputConfig::from_toml_str("gamepad = 3").unwrap_err();
        assert!(matches!(err, crate::error::InputError::Config(_)));
    }
}
