//! Velocity adjustment along the contact plane and jump impulses

use glam::Vec3;
use roller_core::math::move_towards;

use super::movement::MovementConfig;
use super::state::MotionState;

/// Where a jump took its direction from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Ground,
    Wall,
    Air,
}

/// Remove the component of `vector` along `normal`
pub fn project_on_contact_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    vector - normal * vector.dot(normal)
}

#[derive(Debug, Clone)]
pub struct VelocitySolver {
    config: MovementConfig,
}

impl VelocitySolver {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Move the velocity's contact-plane components toward the desired velocity.
    ///
    /// World X and Z are projected onto the contact plane so the sphere
    /// follows slopes; each projected axis changes by at most
    /// `acceleration * dt` and the normal-axis component is left alone.
    pub fn adjust_velocity(&self, state: &mut MotionState, dt: f32) {
        let x_axis = project_on_contact_plane(Vec3::X, state.contact_normal).normalize_or_zero();
        let z_axis = project_on_contact_plane(Vec3::Z, state.contact_normal).normalize_or_zero();

        let current_x = state.velocity.dot(x_axis);
        let current_z = state.velocity.dot(z_axis);

        let max_speed_change = self.config.acceleration(state.on_ground()) * dt;

        let new_x = move_towards(current_x, state.desired_velocity.x, max_speed_change);
        let new_z = move_towards(current_z, state.desired_velocity.z, max_speed_change);

        state.velocity += x_axis * (new_x - current_x) + z_axis * (new_z - current_z);
    }

    /// Apply a jump impulse if any jump source is available.
    ///
    /// Returns `None` when the request is dropped (not grounded, no steep
    /// wall, air jumps used up).
    pub fn jump(&self, state: &mut MotionState, gravity: Vec3, up_axis: Vec3) -> Option<JumpKind> {
        let (direction, kind) = if state.on_ground() {
            (state.contact_normal, JumpKind::Ground)
        } else if state.on_steep() {
            state.jump_phase = 0;
            (state.steep_normal, JumpKind::Wall)
        } else if self.config.max_air_jumps > 0 && state.jump_phase <= self.config.max_air_jumps {
            // Phase 0 belongs to the grounded state, so walking off a ledge
            // still costs the ground jump
            if state.jump_phase == 0 {
                state.jump_phase = 1;
            }
            (state.contact_normal, JumpKind::Air)
        } else {
            return None;
        };

        state.steps_since_last_jump = 0;
        state.jump_phase += 1;

        let direction = (direction + up_axis).normalize_or_zero();
        let mut jump_speed = (2.0 * gravity.length() * self.config.jump_height).sqrt();
        let aligned_speed = state.velocity.dot(direction);
        if aligned_speed > 0.0 {
            jump_speed = (jump_speed - aligned_speed).max(0.0);
        }
        state.velocity += direction * jump_speed;
        Some(kind)
    }
}
