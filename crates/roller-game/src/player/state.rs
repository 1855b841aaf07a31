//! Mutable motion state carried by the sphere controller

use glam::Vec3;

/// Support classification for one simulation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    /// Standing on a walkable surface (or snapped to one)
    Ground,
    /// Touching only surfaces too steep to stand on
    Steep,
    /// No usable contact
    Air,
}

/// Motion state of the sphere.
///
/// Contact counts and normals are per-tick accumulators: they are filled
/// from this tick's contacts and cleared once the new velocity is written.
/// Jump phase and the step counters persist across ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionState {
    pub velocity: Vec3,
    pub desired_velocity: Vec3,
    /// Sum of ground normals, normalized during state resolution
    pub contact_normal: Vec3,
    /// Sum of steep normals
    pub steep_normal: Vec3,
    pub ground_contact_count: u32,
    pub steep_contact_count: u32,
    /// Jumps used since last landing
    pub jump_phase: u32,
    pub steps_since_last_grounded: u32,
    pub steps_since_last_jump: u32,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            desired_velocity: Vec3::ZERO,
            contact_normal: Vec3::ZERO,
            steep_normal: Vec3::ZERO,
            ground_contact_count: 0,
            steep_contact_count: 0,
            jump_phase: 0,
            steps_since_last_grounded: 0,
            steps_since_last_jump: 0,
        }
    }
}

impl MotionState {
    pub fn on_ground(&self) -> bool {
        self.ground_contact_count > 0
    }

    pub fn on_steep(&self) -> bool {
        self.steep_contact_count > 0
    }

    /// Classification implied by the current contact counts
    pub fn support(&self) -> Support {
        if self.on_ground() {
            Support::Ground
        } else if self.on_steep() {
            Support::Steep
        } else {
            Support::Air
        }
    }

    /// Reset the per-tick accumulators
    pub fn clear_contacts(&mut self) {
        self.ground_contact_count = 0;
        self.steep_contact_count = 0;
        self.contact_normal = Vec3::ZERO;
        self.steep_normal = Vec3::ZERO;
    }
}
