//! Synchronous scene queries used by the ground probe and the camera

use glam::{Quat, Vec3};
use roller_core::{Layer, LayerMask};

/// Ray hit against scene geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Distance along the ray to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
    /// Layer of the collider that was hit
    pub layer: Layer,
}

/// Shape cast hit against scene geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastHit {
    /// Distance the shape travelled before touching geometry
    pub distance: f32,
    /// Layer of the collider that was hit
    pub layer: Layer,
}

/// Blocking queries against a collision world.
///
/// A `None` result means nothing was hit within `max_distance`; callers
/// treat it as "behavior does not trigger this tick" and never retry.
pub trait SceneQuery {
    /// Cast a ray from `origin` along `direction` and return the first hit
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit>;

    /// Sweep an oriented box from `center` along `direction`
    fn box_cast(
        &self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<CastHit>;
}

/// Scene without any geometry; every query misses
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyScene;

impl SceneQuery for EmptyScene {
    fn raycast(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<SurfaceHit> {
        None
    }

    fn box_cast(&self, _: Vec3, _: Vec3, _: Quat, _: Vec3, _: f32, _: LayerMask) -> Option<CastHit> {
        None
    }
}

impl<T: SceneQuery + ?Sized> SceneQuery for &T {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        (**self).raycast(origin, direction, max_distance, mask)
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
        (**self).box_cast(center, half_extents, rotation, direction, max_distance, mask)
    }
}
