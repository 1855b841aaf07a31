//! Roller Physics - Physics simulation using rapier3d
//!
//! Provides the collision world, layer-filtered scene queries, contact
//! collection, and the dynamic sphere body the controller drives.

mod contact;
mod query;
mod sphere_body;

pub use contact::{Contact, CONTACT_DISTANCE};
pub use query::{CastHit, EmptyScene, SceneQuery, SurfaceHit};
pub use sphere_body::{SphereBody, SphereBodyConfig};

pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

use glam::{Quat, Vec3};
use nalgebra::{Isometry3, Quaternion, Translation3, Unit, UnitQuaternion};
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::parry::shape::Cuboid;
use rapier3d::prelude::*;
use roller_core::{Layer, LayerMask};

/// Cast boxes thinner than this are inflated so parry never sees a degenerate cuboid
const MIN_CAST_HALF_EXTENT: f32 = 1e-4;

/// Physics world configuration
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec3,
    /// Physics timestep (default: 1/50)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 50.0,
        }
    }
}

impl PhysicsConfig {
    /// Up axis implied by gravity, +Y when gravity is zero
    pub fn up_axis(&self) -> Vec3 {
        (-self.gravity).try_normalize().unwrap_or(Vec3::Y)
    }
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Impulse joint storage
    pub impulse_joint_set: ImpulseJointSet,
    /// Multi-body joint storage
    pub multibody_joint_set: MultibodyJointSet,

    /// Integration parameters
    integration_parameters: IntegrationParameters,
    /// Physics pipeline
    physics_pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,
    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,
    /// Continuous collision detection solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasts and shape casts
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Step the physics simulation
    pub fn step(&mut self) {
        let gravity = to_vector(self.config.gravity);

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        // Update query pipeline after physics step
        self.query_pipeline.update(&self.collider_set);
    }

    /// Refresh the query pipeline after adding colliders outside of a step
    pub fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Collision groups placing a collider on exactly one layer
    pub fn layer_groups(layer: Layer) -> InteractionGroups {
        InteractionGroups::new(Group::from_bits_truncate(layer.bit()), Group::ALL)
    }

    /// Layer a collider belongs to (its lowest membership bit)
    pub fn layer_of(&self, handle: ColliderHandle) -> Layer {
        self.collider_set
            .get(handle)
            .map(|collider| {
                let bits = collider.collision_groups().memberships.bits();
                Layer::new(bits.trailing_zeros().min(Layer::MAX as u32) as u8)
            })
            .unwrap_or(Layer::DEFAULT)
    }

    /// Add a static collider (ground, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Add a dynamic rigid body with a collider
    pub fn add_dynamic_body(
        &mut self,
        rigid_body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rb_handle = self.rigid_body_set.insert(rigid_body);
        let col_handle =
            self.collider_set
                .insert_with_parent(collider, rb_handle, &mut self.rigid_body_set);
        (rb_handle, col_handle)
    }

    /// Get a rigid body by handle
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable rigid body by handle
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Query filter accepting colliders on `mask`, optionally skipping one collider
    fn filter(mask: LayerMask, exclude: Option<ColliderHandle>) -> QueryFilter<'static> {
        let groups = InteractionGroups::new(Group::ALL, Group::from_bits_truncate(mask.bits()));
        let filter = QueryFilter::default().groups(groups);
        match exclude {
            Some(handle) => filter.exclude_collider(handle),
            None => filter,
        }
    }

    /// Cast a ray and get detailed hit information
    pub fn raycast_detailed(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
        exclude: Option<ColliderHandle>,
    ) -> Option<SurfaceHit> {
        let direction = direction.try_normalize()?;
        let ray = Ray::new(to_point(origin), to_vector(direction));

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                Self::filter(mask, exclude),
            )
            .map(|(handle, intersection)| SurfaceHit {
                distance: intersection.time_of_impact,
                point: origin + direction * intersection.time_of_impact,
                normal: from_vector(&intersection.normal),
                layer: self.layer_of(handle),
            })
    }

    /// Sweep an oriented box and report the first collider it touches
    #[allow(clippy::too_many_arguments)]
    pub fn box_cast(
        &self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
        exclude: Option<ColliderHandle>,
    ) -> Option<CastHit> {
        let direction = direction.try_normalize()?;
        let half_extents = half_extents.max(Vec3::splat(MIN_CAST_HALF_EXTENT));
        let shape = Cuboid::new(to_vector(half_extents));
        let shape_pos = to_isometry(center, rotation);
        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            target_distance: 0.0,
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: false,
        };

        self.query_pipeline
            .cast_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &shape_pos,
                &to_vector(direction),
                &shape,
                options,
                Self::filter(mask, exclude),
            )
            .map(|(handle, hit)| CastHit {
                distance: hit.time_of_impact,
                layer: self.layer_of(handle),
            })
    }

    /// Scene query view that ignores one collider (usually the caller's own body)
    pub fn scene_query(&self, exclude: Option<ColliderHandle>) -> WorldQuery<'_> {
        WorldQuery {
            world: self,
            exclude,
        }
    }

    /// Create a ground plane collider
    pub fn create_ground(&mut self, y: f32, layer: Layer) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .restitution(0.0)
            .collision_groups(Self::layer_groups(layer))
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static, possibly rotated, box collider
    pub fn create_static_box(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        rotation: Quat,
        layer: Layer,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .position(to_isometry(position, rotation))
            .friction(0.7)
            .collision_groups(Self::layer_groups(layer))
            .build();
        self.add_static_collider(collider)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// [`SceneQuery`] over a [`PhysicsWorld`] that skips one collider
#[derive(Clone, Copy)]
pub struct WorldQuery<'a> {
    world: &'a PhysicsWorld,
    exclude: Option<ColliderHandle>,
}

impl SceneQuery for WorldQuery<'_> {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        self.world
            .raycast_detailed(origin, direction, max_distance, mask, self.exclude)
    }

    fn box_cast(
        &self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<CastHit> {
        self.world.box_cast(
            center,
            half_extents,
            rotation,
            direction,
            max_distance,
            mask,
            self.exclude,
        )
    }
}

pub(crate) fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub(crate) fn to_point(v: Vec3) -> Point<Real> {
    point![v.x, v.y, v.z]
}

pub(crate) fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn to_isometry(position: Vec3, rotation: Quat) -> Isometry3<Real> {
    let rotation = UnitQuaternion::from_quaternion(Quaternion::new(
        rotation.w, rotation.x, rotation.y, rotation.z,
    ));
    Isometry3::from_parts(Translation3::new(position.x, position.y, position.z), rotation)
}
