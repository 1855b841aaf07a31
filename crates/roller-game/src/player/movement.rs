//! Movement configuration and derived slope thresholds

use roller_core::math::clamp_setting;
use roller_core::{Layer, LayerMask};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Movement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Top horizontal speed in meters per second
    pub max_speed: f32,
    /// Speed change per second while supported
    pub max_acceleration: f32,
    /// Speed change per second while airborne
    pub max_air_acceleration: f32,
    /// Apex height of a jump from rest, in meters
    pub jump_height: f32,
    /// Extra jumps allowed before landing again
    pub max_air_jumps: u32,
    /// Steepest surface, in degrees, that still counts as ground
    pub max_ground_angle: f32,
    /// Steepest stairs surface, in degrees, that still counts as ground
    pub max_stairs_angle: f32,
    /// No ground snapping above this speed
    pub max_snap_speed: f32,
    /// Length of the downward snap probe
    pub probe_distance: f32,
    /// Layers the snap probe can hit
    pub probe_mask: LayerMask,
    /// Layers whose surfaces use the stairs angle instead of the ground angle
    pub stairs_mask: LayerMask,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            max_acceleration: 10.0,
            max_air_acceleration: 1.0,
            jump_height: 2.0,
            max_air_jumps: 0,
            max_ground_angle: 25.0,
            max_stairs_angle: 50.0,
            max_snap_speed: 100.0,
            probe_distance: 1.0,
            probe_mask: LayerMask::ALL,
            stairs_mask: LayerMask::NONE,
        }
    }
}

fn clamp_field(name: &str, value: f32, min: f32, max: f32) -> f32 {
    clamp_setting("Movement", name, value, min, max)
}

impl MovementConfig {
    /// Copy of this config with every value clamped into its designer range
    pub fn validated(mut self) -> Self {
        self.max_speed = clamp_field("max_speed", self.max_speed, 0.0, 100.0);
        self.max_acceleration = clamp_field("max_acceleration", self.max_acceleration, 0.0, 100.0);
        self.max_air_acceleration =
            clamp_field("max_air_acceleration", self.max_air_acceleration, 0.0, 100.0);
        self.jump_height = clamp_field("jump_height", self.jump_height, 0.0, 10.0);
        if self.max_air_jumps > 5 {
            warn!("Movement max_air_jumps {} out of range, clamped to 5", self.max_air_jumps);
            self.max_air_jumps = 5;
        }
        self.max_ground_angle = clamp_field("max_ground_angle", self.max_ground_angle, 0.0, 90.0);
        self.max_stairs_angle = clamp_field("max_stairs_angle", self.max_stairs_angle, 0.0, 90.0);
        self.max_snap_speed = clamp_field("max_snap_speed", self.max_snap_speed, 0.0, 100.0);
        self.probe_distance = clamp_field("probe_distance", self.probe_distance, 0.0, f32::MAX);
        self
    }

    /// Get the current acceleration based on grounded state
    pub fn acceleration(&self, grounded: bool) -> f32 {
        if grounded {
            self.max_acceleration
        } else {
            self.max_air_acceleration
        }
    }

    /// Minimum up-alignment thresholds derived from the slope angles
    pub fn thresholds(&self) -> SlopeThresholds {
        SlopeThresholds {
            min_ground_dot: self.max_ground_angle.to_radians().cos(),
            min_stairs_dot: self.max_stairs_angle.to_radians().cos(),
            stairs_mask: self.stairs_mask,
        }
    }
}

/// Cosines of the maximum ground and stairs angles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeThresholds {
    pub min_ground_dot: f32,
    pub min_stairs_dot: f32,
    pub stairs_mask: LayerMask,
}

impl SlopeThresholds {
    /// Minimum `normal . up` for a surface on `layer` to count as ground
    pub fn min_dot(&self, layer: Layer) -> f32 {
        if self.stairs_mask.contains(layer) {
            self.min_stairs_dot
        } else {
            self.min_ground_dot
        }
    }
}
