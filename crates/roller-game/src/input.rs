//! Input state sampled by the host once per render frame
//!
//! Analog axes are addressed by name, discrete actions report button-down
//! edges for the frame they happened in.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Named analog axes, each in `[-1, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAxis {
    /// Strafe left/right
    #[serde(rename = "Horizontal")]
    Horizontal,
    /// Move forward/backward
    #[serde(rename = "Vertical")]
    Vertical,
    /// Orbit the camera around the vertical axis (yaw)
    #[serde(rename = "Horizontal Camera")]
    HorizontalCamera,
    /// Tilt the camera up/down (pitch)
    #[serde(rename = "Vertical Camera")]
    VerticalCamera,
}

impl InputAxis {
    pub const ALL: [InputAxis; 4] = [
        InputAxis::Horizontal,
        InputAxis::Vertical,
        InputAxis::HorizontalCamera,
        InputAxis::VerticalCamera,
    ];

    /// Name the host input layer knows this axis by
    pub fn name(self) -> &'static str {
        match self {
            InputAxis::Horizontal => "Horizontal",
            InputAxis::Vertical => "Vertical",
            InputAxis::HorizontalCamera => "Horizontal Camera",
            InputAxis::VerticalCamera => "Vertical Camera",
        }
    }

    /// Look an axis up by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|axis| axis.name() == name)
    }
}

/// Discrete game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    Jump,
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Analog axis values for this frame
    axes: HashMap<InputAxis, f32>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<InputAction>,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an axis value, clamped to `[-1, 1]`
    pub fn set_axis(&mut self, axis: InputAxis, value: f32) {
        let value = if value.is_finite() { value.clamp(-1.0, 1.0) } else { 0.0 };
        self.axes.insert(axis, value);
    }

    /// Current value of an axis (0 when never set)
    pub fn axis(&self, axis: InputAxis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    /// Current value of an axis looked up by name
    pub fn axis_by_name(&self, name: &str) -> f32 {
        InputAxis::from_name(name).map_or(0.0, |axis| self.axis(axis))
    }

    /// Record a button-down edge for this frame
    pub fn press(&mut self, action: InputAction) {
        self.just_pressed.insert(action);
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Movement input: x = Horizontal, y = Vertical
    pub fn movement(&self) -> Vec2 {
        Vec2::new(self.axis(InputAxis::Horizontal), self.axis(InputAxis::Vertical))
    }

    /// Camera input: x = Vertical Camera (pitch), y = Horizontal Camera (yaw)
    pub fn camera(&self) -> Vec2 {
        Vec2::new(
            self.axis(InputAxis::VerticalCamera),
            self.axis(InputAxis::HorizontalCamera),
        )
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
    }

    /// Clear all input state
    pub fn clear_all(&mut self) {
        self.axes.clear();
        self.just_pressed.clear();
    }
}
