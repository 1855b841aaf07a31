//! Per-tick contact collection from rapier's narrow phase

use glam::Vec3;
use rapier3d::prelude::*;
use roller_core::Layer;

use crate::{from_vector, PhysicsWorld};

/// Contact points further apart than this are speculative and not reported
pub const CONTACT_DISTANCE: f32 = 0.01;

/// A single contact point touching a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Surface normal at the contact, pointing away from the touched surface
    pub normal: Vec3,
    /// Layer of the touched collider
    pub layer: Layer,
}

impl Contact {
    pub fn new(normal: Vec3, layer: Layer) -> Self {
        Self { normal, layer }
    }
}

impl PhysicsWorld {
    /// Collect every contact point currently touching `collider`.
    ///
    /// One entry is produced per contact point, so a body resting on two
    /// surfaces (or on one surface through several points) reports each of
    /// them. The result is a multiset; order carries no meaning.
    pub fn contacts_of(&self, collider: ColliderHandle) -> Vec<Contact> {
        let mut contacts = Vec::new();

        for pair in self.narrow_phase.contact_pairs_with(collider) {
            if !pair.has_any_active_contact {
                continue;
            }

            // Manifold normals point out of collider1
            let (other, sign) = if pair.collider1 == collider {
                (pair.collider2, -1.0)
            } else {
                (pair.collider1, 1.0)
            };
            let layer = self.layer_of(other);

            for manifold in &pair.manifolds {
                let normal = from_vector(&manifold.data.normal) * sign;
                let touching = manifold
                    .points
                    .iter()
                    .filter(|point| point.dist <= CONTACT_DISTANCE)
                    .count();
                contacts.extend(std::iter::repeat(Contact::new(normal, layer)).take(touching));
            }
        }

        contacts
    }
}
