//! Core types used throughout the Roller crates
//!
//! Orientation convention: +Y is up, +Z is forward and +X is right. Yaw is
//! measured in degrees from +Z toward +X, positive pitch tilts the view down.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Collision layer index (0..32)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Layer(pub u8);

impl Layer {
    /// Layer every collider belongs to unless told otherwise
    pub const DEFAULT: Layer = Layer(0);

    /// Highest valid layer index
    pub const MAX: u8 = 31;

    /// Create a layer, clamping the index to the valid range
    pub fn new(index: u8) -> Self {
        Self(index.min(Self::MAX))
    }

    /// Single-bit mask for this layer
    pub fn bit(self) -> u32 {
        1u32 << self.0.min(Self::MAX)
    }
}

/// Set of collision layers, one bit per layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    /// Mask containing exactly the given layers
    pub fn from_layers(layers: &[Layer]) -> Self {
        Self(layers.iter().fold(0, |bits, layer| bits | layer.bit()))
    }

    /// Check whether a layer is part of this mask
    pub fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }

    /// Copy of this mask with a layer removed
    pub fn without(self, layer: Layer) -> Self {
        Self(self.0 & !layer.bit())
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Position and rotation of an object in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    /// Create a new pose with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Rotation for a pitch/yaw pair given in degrees
    pub fn orbit_rotation(pitch: f32, yaw: f32) -> Quat {
        Quat::from_euler(EulerRot::YXZ, yaw.to_radians(), pitch.to_radians(), 0.0)
    }

    /// Get the forward direction (positive Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Get the right direction (positive X in local space)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask_membership() {
        let stairs = Layer::new(9);
        let mask = LayerMask::from_layers(&[stairs, Layer::new(3)]);
        assert!(mask.contains(stairs));
        assert!(!mask.contains(Layer::DEFAULT));
        assert!(!mask.without(stairs).contains(stairs));
        assert!(LayerMask::ALL.contains(Layer::new(31)));
        assert!(!LayerMask::NONE.contains(Layer::DEFAULT));
    }

    #[test]
    fn test_orbit_rotation_axes() {
        let level = Pose::from_position_rotation(Vec3::ZERO, Pose::orbit_rotation(0.0, 90.0));
        assert!((level.forward() - Vec3::X).length() < 1e-5);
        assert!((level.right() - Vec3::NEG_Z).length() < 1e-5);

        let down = Pose::from_position_rotation(Vec3::ZERO, Pose::orbit_rotation(90.0, 0.0));
        assert!((down.forward() - Vec3::NEG_Y).length() < 1e-5);
    }
}
