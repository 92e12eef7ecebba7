//! Per-frame input snapshot, key bindings and the control panel record.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const SETTINGS_DEFAULT_SHAPE: &str = "A1";
pub const SETTINGS_MIN_HEIGHT: f32 = 0.1;
pub const SETTINGS_MAX_HEIGHT: f32 = 20.0;
pub const SETTINGS_DEFAULT_HEIGHT: f32 = 20.0;
pub const SETTINGS_MIN_TWIST_ANGLE: f32 = 0.0;
pub const SETTINGS_MAX_TWIST_ANGLE: f32 = 360.0;
pub const SETTINGS_DEFAULT_TWIST_ANGLE: f32 = 90.0;

/// Keyboard state keyed by physical key code (`"KeyW"`, `"Digit1"`, ...).
///
/// `held` mirrors key-down/key-up. `pressed` records key-down edges and is
/// cleared by the caller once the frame has been dispatched, so a press
/// triggers edge actions exactly once however long the key stays down.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: HashMap<String, bool>,
    pressed: HashMap<String, bool>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, code: &str) {
        self.held.insert(code.to_string(), true);
        self.pressed.insert(code.to_string(), true);
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.insert(code.to_string(), false);
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.get(code).copied().unwrap_or(false)
    }

    pub fn just_pressed(&self, code: &str) -> bool {
        self.pressed.get(code).copied().unwrap_or(false)
    }

    pub fn clear_pressed(&mut self) {
        self.pressed.clear();
    }
}

/// Physical key codes driving the forklift.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: String,
    pub backwards: String,
    pub left: String,
    pub right: String,
    pub lift_up: String,
    pub lift_down: String,
    pub grab: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "KeyW".into(),
            backwards: "KeyS".into(),
            left: "KeyA".into(),
            right: "KeyD".into(),
            lift_up: "KeyQ".into(),
            lift_down: "KeyE".into(),
            grab: "KeyG".into(),
        }
    }
}

/// Values written by the on-screen printer panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrintSettings {
    /// Shape tag name, as picked in the panel.
    pub shape: String,
    pub height: f32,
    pub twist_angle: f32,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            shape: SETTINGS_DEFAULT_SHAPE.to_string(),
            height: SETTINGS_DEFAULT_HEIGHT,
            twist_angle: SETTINGS_DEFAULT_TWIST_ANGLE,
        }
    }
}

impl PrintSettings {
    /// The settings restricted to the panel's slider ranges.
    pub fn clamped(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            height: self.height.clamp(SETTINGS_MIN_HEIGHT, SETTINGS_MAX_HEIGHT),
            twist_angle: self
                .twist_angle
                .clamp(SETTINGS_MIN_TWIST_ANGLE, SETTINGS_MAX_TWIST_ANGLE),
        }
    }
}
