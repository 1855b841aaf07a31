//! Orbit camera with manual rotation, automatic re-alignment and obstruction handling

use glam::{Quat, Vec2, Vec3};
use roller_core::math::{delta_angle, move_towards_angle, wrap_degrees};
use roller_core::{GameTime, Pose};
use roller_physics::SceneQuery;
use tracing::trace;

use crate::input::InputState;

use super::focus::FocusTracker;
use super::CameraConfig;

/// Camera input components within this magnitude count as no input
pub const INPUT_DEAD_ZONE: f32 = 0.001;

/// Focus movement (squared, horizontal) below this does not trigger alignment
pub const MIN_ALIGN_MOVEMENT_SQR: f32 = 0.0001;

/// How the orbit angles changed during the last update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    /// Player turned the camera this frame
    Manual,
    /// Camera turned itself toward the focus heading
    Automatic,
    /// Orientation kept from the previous frame
    Unchanged,
}

/// Heading in `[0, 360)` degrees of a normalized horizontal direction (x, z),
/// measured from +Z toward +X
pub fn heading_angle(direction: Vec2) -> f32 {
    let angle = direction.y.clamp(-1.0, 1.0).acos().to_degrees();
    let angle = if direction.x < 0.0 { 360.0 - angle } else { angle };
    wrap_degrees(angle)
}

/// Orbit camera controller
pub struct OrbitCamera {
    /// Configuration (validated)
    config: CameraConfig,
    focus: FocusTracker,
    /// Pitch (x) and yaw (y) in degrees
    orbit_angles: Vec2,
    /// Unscaled time of the last manual rotation
    last_manual_rotation_time: f64,
    rotation_mode: RotationMode,
    /// Camera pose resolved by the last update
    pose: Pose,
}

impl OrbitCamera {
    /// Create an orbit camera focused on `target`
    pub fn new(config: CameraConfig, target: Vec3) -> Self {
        let config = config.validated();
        let mut camera = Self {
            focus: FocusTracker::new(target),
            orbit_angles: config.initial_orbit_angles,
            last_manual_rotation_time: 0.0,
            rotation_mode: RotationMode::Unchanged,
            pose: Pose::default(),
            config,
        };
        camera.constrain_angles();
        let rotation = camera.orbit_rotation();
        camera.pose = Pose::from_position_rotation(
            target - rotation * Vec3::Z * camera.config.distance,
            rotation,
        );
        camera
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Camera pose resolved by the last update
    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn focus_point(&self) -> Vec3 {
        self.focus.focus_point()
    }

    /// Pitch (x) and yaw (y) in degrees
    pub fn orbit_angles(&self) -> Vec2 {
        self.orbit_angles
    }

    pub fn rotation_mode(&self) -> RotationMode {
        self.rotation_mode
    }

    /// Set the orbit angles directly; applied on the next update
    pub fn set_orbit_angles(&mut self, angles: Vec2) {
        self.orbit_angles = angles;
        self.constrain_angles();
        self.pose.rotation = self.orbit_rotation();
    }

    /// Update the camera (call each frame, after all movement is resolved).
    ///
    /// With no target the camera keeps its last pose.
    pub fn late_update(
        &mut self,
        target: Option<Vec3>,
        input: &InputState,
        time: &GameTime,
        scene: &impl SceneQuery,
    ) -> Pose {
        let Some(target) = target else {
            self.focus.hold();
            self.rotation_mode = RotationMode::Unchanged;
            trace!("Orbit camera has no target, holding pose");
            return self.pose;
        };

        let dt = time.unscaled_delta_time;
        self.focus.update(
            target,
            self.config.focus_radius,
            self.config.focus_centering,
            dt,
        );

        self.rotation_mode = if self.manual_rotation(input.camera(), dt, time.unscaled_time) {
            RotationMode::Manual
        } else if self.automatic_rotation(dt, time.unscaled_time) {
            RotationMode::Automatic
        } else {
            RotationMode::Unchanged
        };

        let rotation = match self.rotation_mode {
            RotationMode::Unchanged => self.pose.rotation,
            RotationMode::Manual | RotationMode::Automatic => {
                self.constrain_angles();
                self.orbit_rotation()
            }
        };

        self.pose = self.resolve_placement(target, rotation, scene);
        self.pose
    }

    /// Half extents of the near-plane rectangle used for obstruction casts
    pub fn camera_half_extents(&self) -> Vec3 {
        let y = self.config.near_clip_plane * (0.5 * self.config.field_of_view).to_radians().tan();
        Vec3::new(y * self.config.aspect, y, 0.0)
    }

    fn orbit_rotation(&self) -> Quat {
        Pose::orbit_rotation(self.orbit_angles.x, self.orbit_angles.y)
    }

    /// Apply player input when it leaves the dead zone
    fn manual_rotation(&mut self, input: Vec2, dt: f32, now: f64) -> bool {
        if input.x.abs() > INPUT_DEAD_ZONE || input.y.abs() > INPUT_DEAD_ZONE {
            self.orbit_angles += self.config.rotation_speed * dt * input;
            self.last_manual_rotation_time = now;
            return true;
        }
        false
    }

    /// Turn toward the direction the focus point is moving in
    fn automatic_rotation(&mut self, dt: f32, now: f64) -> bool {
        if now - self.last_manual_rotation_time < self.config.align_delay as f64 {
            return false;
        }

        let movement = self.focus.movement();
        let movement = Vec2::new(movement.x, movement.z);
        let movement_delta_sqr = movement.length_squared();
        if movement_delta_sqr < MIN_ALIGN_MOVEMENT_SQR {
            return false;
        }

        let heading = heading_angle(movement / movement_delta_sqr.sqrt());
        let delta_abs = delta_angle(self.orbit_angles.y, heading).abs();
        let smooth_range = self.config.align_smooth_range;

        let mut rotation_change = self.config.rotation_speed * dt.min(movement_delta_sqr);
        if delta_abs < smooth_range {
            rotation_change *= delta_abs / smooth_range;
        } else if 180.0 - delta_abs < smooth_range {
            rotation_change *= (180.0 - delta_abs) / smooth_range;
        }
        self.orbit_angles.y = move_towards_angle(self.orbit_angles.y, heading, rotation_change);
        true
    }

    fn constrain_angles(&mut self) {
        self.orbit_angles.x = self
            .orbit_angles
            .x
            .clamp(self.config.min_vertical_angle, self.config.max_vertical_angle);
        self.orbit_angles.y = wrap_degrees(self.orbit_angles.y);
    }

    /// Place the camera behind the focus point, pulled in when geometry
    /// sits between the target and the near clip plane
    fn resolve_placement(&self, target: Vec3, rotation: Quat, scene: &impl SceneQuery) -> Pose {
        let look_direction = rotation * Vec3::Z;
        let mut look_position = self.focus.focus_point() - look_direction * self.config.distance;

        let rect_offset = look_direction * self.config.near_clip_plane;
        let rect_position = look_position + rect_offset;
        let cast_line = rect_position - target;
        let cast_distance = cast_line.length();

        if let Some(cast_direction) = cast_line.try_normalize() {
            if let Some(hit) = scene.box_cast(
                target,
                self.camera_half_extents(),
                rotation,
                cast_direction,
                cast_distance,
                self.config.obstruction_mask,
            ) {
                trace!("Camera obstructed at {:.3}", hit.distance);
                look_position = target + cast_direction * hit.distance - rect_offset;
            }
        }

        Pose::from_position_rotation(look_position, rotation)
    }
}
