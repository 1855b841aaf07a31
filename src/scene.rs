//! Demo course geometry

use glam::{Quat, Vec3};
use roller_core::{Layer, LayerMask};
use roller_physics::{ColliderHandle, PhysicsWorld, SphereBodyConfig};
use tracing::{debug, info};

/// Layer for surfaces climbed with the stairs angle
pub const STAIRS_LAYER: Layer = Layer(9);

/// Named static collider in the course
#[derive(Debug, Clone, Copy)]
pub struct CoursePiece {
    pub name: &'static str,
    pub handle: ColliderHandle,
}

/// Static geometry the demo run plays out on
#[derive(Debug, Clone)]
pub struct Course {
    /// Sphere center resting on the ground at the origin
    pub spawn: Vec3,
    pub pieces: Vec<CoursePiece>,
}

impl Course {
    /// Layers that should use the stairs angle on this course
    pub fn stairs_mask() -> LayerMask {
        LayerMask::from_layers(&[STAIRS_LAYER])
    }

    /// Build the course into `world` and refresh its query pipeline:
    ///
    /// - flat ground at y = 0
    /// - a 20 degree ramp rising along +Z ahead of the spawn
    /// - a 40 degree stairs ramp on [`STAIRS_LAYER`] to the left of it
    /// - a V-shaped valley of two 60 degree plates to the right
    /// - a wall behind the spawn
    pub fn build(world: &mut PhysicsWorld, sphere: &SphereBodyConfig) -> Self {
        let mut pieces = Vec::new();
        let mut add = |name: &'static str, handle: ColliderHandle| {
            debug!("Course piece {} -> {:?}", name, handle);
            pieces.push(CoursePiece { name, handle });
        };

        add("ground", world.create_ground(0.0, Layer::DEFAULT));
        add(
            "ramp",
            world.create_static_box(
                Vec3::new(3.0, 0.5, 6.0),
                Vec3::new(0.0, 0.0, 20.0),
                Quat::from_rotation_x(-20f32.to_radians()),
                Layer::DEFAULT,
            ),
        );
        add(
            "stairs",
            world.create_static_box(
                Vec3::new(3.0, 0.5, 6.0),
                Vec3::new(-12.0, 0.0, 20.0),
                Quat::from_rotation_x(-40f32.to_radians()),
                STAIRS_LAYER,
            ),
        );
        add(
            "valley_left",
            world.create_static_box(
                Vec3::new(2.0, 0.25, 4.0),
                Vec3::new(11.0, 1.0, 20.0),
                Quat::from_rotation_z(-60f32.to_radians()),
                Layer::DEFAULT,
            ),
        );
        add(
            "valley_right",
            world.create_static_box(
                Vec3::new(2.0, 0.25, 4.0),
                Vec3::new(13.0, 1.0, 20.0),
                Quat::from_rotation_z(60f32.to_radians()),
                Layer::DEFAULT,
            ),
        );
        add(
            "wall",
            world.create_static_box(
                Vec3::new(6.0, 3.0, 0.5),
                Vec3::new(0.0, 3.0, -8.0),
                Quat::IDENTITY,
                Layer::DEFAULT,
            ),
        );

        world.refresh_queries();
        info!("Built course with {} pieces", pieces.len());

        Self {
            spawn: Vec3::new(0.0, sphere.radius, 0.0),
            pieces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> (PhysicsWorld, Course) {
        let mut world = PhysicsWorld::new();
        let course = Course::build(&mut world, &SphereBodyConfig::default());
        (world, course)
    }

    #[test]
    fn test_spawn_rests_on_ground() {
        let (world, course) = course();
        let hit = world
            .raycast_detailed(course.spawn, Vec3::NEG_Y, 2.0, LayerMask::ALL, None)
            .unwrap();
        assert!((hit.distance - 0.5).abs() < 1e-3);
        assert!(course.pieces.iter().any(|p| p.name == "ground"));
    }

    #[test]
    fn test_ramp_slope() {
        let (world, _) = course();
        let hit = world
            .raycast_detailed(Vec3::new(0.0, 10.0, 20.0), Vec3::NEG_Y, 20.0, LayerMask::ALL, None)
            .unwrap();
        assert_eq!(hit.layer, Layer::DEFAULT);
        assert!((hit.normal.y - 20f32.to_radians().cos()).abs() < 1e-3);
        // Rising along +Z, so the normal leans back toward -Z
        assert!(hit.normal.z < 0.0);
    }

    #[test]
    fn test_stairs_on_stairs_layer() {
        let (world, _) = course();
        let hit = world
            .raycast_detailed(Vec3::new(-12.0, 10.0, 20.0), Vec3::NEG_Y, 20.0, LayerMask::ALL, None)
            .unwrap();
        assert_eq!(hit.layer, STAIRS_LAYER);
        assert!((hit.normal.y - 40f32.to_radians().cos()).abs() < 1e-3);
        assert!(Course::stairs_mask().contains(hit.layer));
    }

    #[test]
    fn test_wall_blocks_camera_casts() {
        let (world, _) = course();
        let hit = world
            .raycast_detailed(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Z, 20.0, LayerMask::ALL, None)
            .unwrap();
        assert!((hit.distance - 7.5).abs() < 1e-3);
    }
}
