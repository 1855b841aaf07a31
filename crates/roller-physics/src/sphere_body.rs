//! Dynamic sphere body driven by a velocity-writing controller

use glam::Vec3;
use rapier3d::prelude::*;
use roller_core::Layer;

use crate::{from_vector, to_vector, Contact, PhysicsWorld};

/// Sphere body configuration
#[derive(Debug, Clone)]
pub struct SphereBodyConfig {
    /// Sphere radius (default: 0.5m)
    pub radius: f32,
    /// Collision layer of the sphere itself
    pub layer: Layer,
    /// Surface friction (default: 0, so walls do not grab the sphere)
    pub friction: f32,
    /// Bounciness (default: 0)
    pub restitution: f32,
    /// Enable continuous collision detection for fast movement
    pub ccd: bool,
}

impl Default for SphereBodyConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            layer: Layer::new(8),
            friction: 0.0,
            restitution: 0.0,
            ccd: true,
        }
    }
}

/// Rigid sphere living in a [`PhysicsWorld`].
///
/// The physics engine integrates gravity and resolves collisions; the host
/// reads the body's velocity before each controller tick and writes the
/// adjusted velocity back afterwards.
pub struct SphereBody {
    /// Configuration
    pub config: SphereBodyConfig,
    /// The rigid body handle for this sphere
    pub body_handle: Option<RigidBodyHandle>,
    /// The collider handle for this sphere
    pub collider_handle: Option<ColliderHandle>,
}

impl SphereBody {
    /// Create an unspawned sphere body
    pub fn new(config: SphereBodyConfig) -> Self {
        Self {
            config,
            body_handle: None,
            collider_handle: None,
        }
    }

    /// Spawn the sphere in the physics world
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) -> ColliderHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position))
            .ccd_enabled(self.config.ccd)
            .build();
        let collider = ColliderBuilder::ball(self.config.radius)
            .friction(self.config.friction)
            .restitution(self.config.restitution)
            .collision_groups(PhysicsWorld::layer_groups(self.config.layer))
            .build();

        let (body_handle, collider_handle) = physics.add_dynamic_body(body, collider);
        self.body_handle = Some(body_handle);
        self.collider_handle = Some(collider_handle);
        tracing::debug!("Spawned sphere body at {:?}", position);
        collider_handle
    }

    /// Current world-space center of the sphere
    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        let body = physics.get_rigid_body(self.body_handle?)?;
        Some(from_vector(body.translation()))
    }

    /// Current linear velocity
    pub fn velocity(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        let body = physics.get_rigid_body(self.body_handle?)?;
        Some(from_vector(body.linvel()))
    }

    /// Overwrite the linear velocity
    pub fn set_velocity(&self, physics: &mut PhysicsWorld, velocity: Vec3) {
        let Some(handle) = self.body_handle else {
            return;
        };
        if let Some(body) = physics.get_rigid_body_mut(handle) {
            body.set_linvel(to_vector(velocity), true);
        }
    }

    /// Contacts touching the sphere after the last physics step
    pub fn contacts(&self, physics: &PhysicsWorld) -> Vec<Contact> {
        self.collider_handle
            .map(|handle| physics.contacts_of(handle))
            .unwrap_or_default()
    }
}

impl Default for SphereBody {
    fn default() -> Self {
        Self::new(SphereBodyConfig::default())
    }
}
