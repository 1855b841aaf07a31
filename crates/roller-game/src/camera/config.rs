//! Camera configuration

use glam::Vec2;
use roller_core::math::clamp_setting;
use roller_core::LayerMask;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Orbit distance from the focus point
    pub distance: f32,
    /// Radius the focus point may lag behind the target (0 = rigid follow)
    pub focus_radius: f32,
    /// Fraction of the remaining lag closed per second (0 = no centering)
    pub focus_centering: f32,
    /// Rotation speed in degrees per second, manual and automatic
    pub rotation_speed: f32,
    /// Lowest pitch in degrees (negative looks up)
    pub min_vertical_angle: f32,
    /// Highest pitch in degrees
    pub max_vertical_angle: f32,
    /// Seconds without manual input before the camera re-aligns itself
    pub align_delay: f32,
    /// Angle range in degrees over which automatic alignment eases in
    pub align_smooth_range: f32,
    /// Starting pitch (x) and yaw (y) in degrees
    pub initial_orbit_angles: Vec2,
    /// Layers that block the camera
    pub obstruction_mask: LayerMask,
    /// Distance from the camera to its near clip plane
    pub near_clip_plane: f32,
    /// Vertical field of view in degrees
    pub field_of_view: f32,
    /// Viewport width / height
    pub aspect: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            focus_radius: 1.0,
            focus_centering: 0.5,
            rotation_speed: 90.0,
            min_vertical_angle: -30.0,
            max_vertical_angle: 60.0,
            align_delay: 5.0,
            align_smooth_range: 45.0,
            initial_orbit_angles: Vec2::new(45.0, 0.0),
            obstruction_mask: LayerMask::ALL,
            near_clip_plane: 0.3,
            field_of_view: 60.0,
            aspect: 16.0 / 9.0,
        }
    }
}

fn clamp_field(name: &str, value: f32, min: f32, max: f32) -> f32 {
    clamp_setting("Camera", name, value, min, max)
}

impl CameraConfig {
    /// Copy of this config with every value clamped into its designer range
    pub fn validated(mut self) -> Self {
        self.distance = clamp_field("distance", self.distance, 1.0, 20.0);
        self.focus_radius = clamp_field("focus_radius", self.focus_radius, 0.0, f32::MAX);
        self.focus_centering = clamp_field("focus_centering", self.focus_centering, 0.0, 1.0);
        self.rotation_speed = clamp_field("rotation_speed", self.rotation_speed, 1.0, 360.0);
        self.min_vertical_angle =
            clamp_field("min_vertical_angle", self.min_vertical_angle, -89.0, 89.0);
        self.max_vertical_angle =
            clamp_field("max_vertical_angle", self.max_vertical_angle, -89.0, 89.0);
        if self.max_vertical_angle < self.min_vertical_angle {
            warn!(
                "Camera max_vertical_angle {} below min_vertical_angle {}, raised to match",
                self.max_vertical_angle, self.min_vertical_angle
            );
            self.max_vertical_angle = self.min_vertical_angle;
        }
        self.align_delay = clamp_field("align_delay", self.align_delay, 0.0, f32::MAX);
        self.align_smooth_range =
            clamp_field("align_smooth_range", self.align_smooth_range, 0.0, 90.0);
        self.near_clip_plane = clamp_field("near_clip_plane", self.near_clip_plane, 0.01, f32::MAX);
        self.field_of_view = clamp_field("field_of_view", self.field_of_view, 1.0, 179.0);
        self.aspect = clamp_field("aspect", self.aspect, 0.01, f32::MAX);
        self
    }
}
