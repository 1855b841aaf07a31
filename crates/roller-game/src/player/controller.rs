//! Sphere controller tying ground classification and velocity solving to the host tick

use glam::{Vec2, Vec3};
use roller_core::Pose;
use roller_physics::{Contact, SceneQuery};
use tracing::{debug, trace};

use crate::input::{InputAction, InputState};

use super::ground::GroundClassifier;
use super::movement::MovementConfig;
use super::state::{MotionState, Support};
use super::velocity::VelocitySolver;

/// Body state sampled by the host right before a simulation tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySample {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Physics-driven sphere controller.
///
/// The host calls [`update`](Self::update) once per render frame to sample
/// input, and [`fixed_update`](Self::fixed_update) once per simulation tick
/// with the contacts gathered during the previous physics step. The returned
/// velocity must be written back to the body before the next step.
pub struct SphereController {
    /// Movement configuration (validated)
    config: MovementConfig,
    classifier: GroundClassifier,
    solver: VelocitySolver,
    state: MotionState,
    /// Jump pressed since the last simulation tick
    desired_jump: bool,
    /// Support resolved during the last tick
    last_support: Support,
}

impl SphereController {
    /// Create a new controller with default config
    pub fn new() -> Self {
        Self::with_config(MovementConfig::default())
    }

    /// Create a controller with custom config, clamped into range
    pub fn with_config(config: MovementConfig) -> Self {
        let config = config.validated();
        Self {
            classifier: GroundClassifier::new(&config),
            solver: VelocitySolver::new(&config),
            config,
            state: MotionState::default(),
            desired_jump: false,
            last_support: Support::Air,
        }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Support classification resolved during the last tick
    pub fn support(&self) -> Support {
        self.last_support
    }

    /// Per-frame input sampling.
    ///
    /// Movement is relative to `input_space` (typically the camera) when
    /// given, otherwise to the world X/Z axes.
    pub fn update(&mut self, input: &InputState, input_space: Option<&Pose>) {
        self.state.desired_velocity = desired_velocity(input.movement(), input_space, self.config.max_speed);
        self.desired_jump |= input.is_just_pressed(InputAction::Jump);
    }

    /// Queue a jump for the next simulation tick
    pub fn request_jump(&mut self) {
        self.desired_jump = true;
    }

    /// Run one simulation tick and return the velocity to write to the body
    pub fn fixed_update(
        &mut self,
        body: BodySample,
        contacts: &[Contact],
        gravity: Vec3,
        dt: f32,
        scene: &impl SceneQuery,
    ) -> Vec3 {
        let up_axis = (-gravity).try_normalize().unwrap_or(Vec3::Y);

        self.classifier.evaluate_contacts(&mut self.state, contacts, up_axis);
        self.state.velocity = body.velocity;
        self.classifier.update_state(&mut self.state, body.position, up_axis, scene);

        let support = self.state.support();
        if support != self.last_support {
            debug!("Support changed {:?} -> {:?}", self.last_support, support);
        }
        self.last_support = support;

        self.solver.adjust_velocity(&mut self.state, dt);

        if self.desired_jump {
            self.desired_jump = false;
            match self.solver.jump(&mut self.state, gravity, up_axis) {
                Some(kind) => debug!("{:?} jump, phase {}", kind, self.state.jump_phase),
                None => trace!("Jump request dropped"),
            }
        }

        let velocity = self.state.velocity;
        trace!(
            "Tick velocity {:?} ground {} steep {}",
            velocity,
            self.state.ground_contact_count,
            self.state.steep_contact_count
        );
        self.state.clear_contacts();
        velocity
    }
}

impl Default for SphereController {
    fn default() -> Self {
        Self::new()
    }
}

/// Desired horizontal velocity for a movement input
pub fn desired_velocity(input: Vec2, input_space: Option<&Pose>, max_speed: f32) -> Vec3 {
    let input = input.clamp_length_max(1.0);
    match input_space {
        Some(space) => {
            let forward = flatten(space.forward());
            let right = flatten(space.right());
            (forward * input.y + right * input.x) * max_speed
        }
        None => Vec3::new(input.x, 0.0, input.y) * max_speed,
    }
}

fn flatten(direction: Vec3) -> Vec3 {
    Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputAxis;
    use glam::Quat;
    use roller_core::{Layer, LayerMask};
    use roller_physics::{CastHit, EmptyScene, PhysicsWorld, SphereBody, SurfaceHit};

    const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
    const DT: f32 = 0.02;

    struct Floor;

    impl SceneQuery for Floor {
        fn raycast(&self, origin: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<SurfaceHit> {
            Some(SurfaceHit {
                distance: 0.5,
                point: origin - Vec3::Y * 0.5,
                normal: Vec3::Y,
                layer: Layer::DEFAULT,
            })
        }

        fn box_cast(&self, _: Vec3, _: Vec3, _: Quat, _: Vec3, _: f32, _: LayerMask) -> Option<CastHit> {
            None
        }
    }

    fn floor_contact() -> Vec<Contact> {
        vec![Contact::new(Vec3::Y, Layer::DEFAULT)]
    }

    fn at_rest() -> BodySample {
        BodySample {
            position: Vec3::new(0.0, 0.5, 0.0),
            velocity: Vec3::ZERO,
        }
    }

    #[test]
    fn test_desired_velocity_world_space() {
        let velocity = desired_velocity(Vec2::new(1.0, 1.0), None, 10.0);
        assert!((velocity.length() - 10.0).abs() < 1e-4);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn test_desired_velocity_follows_camera_heading() {
        // Camera looking down at 45 degrees, yawed to face +X
        let camera = Pose::from_position_rotation(Vec3::ZERO, Pose::orbit_rotation(45.0, 90.0));
        let velocity = desired_velocity(Vec2::new(0.0, 1.0), Some(&camera), 4.0);
        assert!((velocity - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_resting_sphere_accelerates_to_target() {
        let mut controller = SphereController::new();
        let mut input = InputState::new();
        input.set_axis(InputAxis::Horizontal, 0.5);
        controller.update(&input, None);
        assert_eq!(controller.state().desired_velocity, Vec3::new(5.0, 0.0, 0.0));

        let mut body = at_rest();
        body.velocity = controller.fixed_update(body, &floor_contact(), GRAVITY, 0.1, &EmptyScene);
        assert!((body.velocity.x - 1.0).abs() < 1e-5);
        assert_eq!(controller.support(), Support::Ground);

        for _ in 0..4 {
            body.velocity = controller.fixed_update(body, &floor_contact(), GRAVITY, 0.1, &EmptyScene);
        }
        assert!((body.velocity.x - 5.0).abs() < 1e-5);

        body.velocity = controller.fixed_update(body, &floor_contact(), GRAVITY, 0.1, &EmptyScene);
        assert!((body.velocity.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_accumulators_cleared_between_ticks() {
        let mut controller = SphereController::new();
        controller.fixed_update(at_rest(), &floor_contact(), GRAVITY, DT, &EmptyScene);
        assert_eq!(controller.state().ground_contact_count, 0);
        assert_eq!(controller.state().contact_normal, Vec3::ZERO);
    }

    #[test]
    fn test_jump_request_is_consumed_once() {
        let mut controller = SphereController::new();
        let mut input = InputState::new();
        input.press(InputAction::Jump);
        controller.update(&input, None);
        input.clear_frame();
        controller.update(&input, None);

        let velocity = controller.fixed_update(at_rest(), &floor_contact(), GRAVITY, DT, &EmptyScene);
        assert!(velocity.y > 6.0);

        let body = BodySample {
            position: Vec3::new(0.0, 0.6, 0.0),
            velocity,
        };
        let next = controller.fixed_update(body, &[], GRAVITY, DT, &EmptyScene);
        assert_eq!(next.y, velocity.y);
    }

    /// Ground jump, then one air jump, then landing restores the budget
    #[test]
    fn test_air_jump_budget_resets_after_landing() {
        let mut controller = SphereController::with_config(MovementConfig {
            max_air_jumps: 1,
            ..Default::default()
        });
        let airborne = BodySample {
            position: Vec3::new(0.0, 3.0, 0.0),
            velocity: Vec3::ZERO,
        };

        controller.request_jump();
        let v = controller.fixed_update(at_rest(), &floor_contact(), GRAVITY, DT, &EmptyScene);
        assert!(v.y > 0.0);

        controller.request_jump();
        let v = controller.fixed_update(airborne, &[], GRAVITY, DT, &EmptyScene);
        assert!(v.y > 0.0, "first air jump succeeds");

        controller.request_jump();
        let v = controller.fixed_update(airborne, &[], GRAVITY, DT, &EmptyScene);
        assert_eq!(v.y, 0.0, "second air jump is dropped");

        // Land and stand for a tick
        controller.fixed_update(at_rest(), &floor_contact(), GRAVITY, DT, &EmptyScene);
        assert_eq!(controller.state().jump_phase, 0);

        // Leave the ground without jumping, then use the air jump
        for _ in 0..3 {
            controller.fixed_update(airborne, &[], GRAVITY, DT, &EmptyScene);
        }
        controller.request_jump();
        let v = controller.fixed_update(airborne, &[], GRAVITY, DT, &EmptyScene);
        assert!(v.y > 0.0, "budget restored after landing");
    }

    #[test]
    fn test_no_snap_for_two_ticks_after_jump() {
        let mut controller = SphereController::new();
        controller.request_jump();
        let mut body = at_rest();
        body.velocity = controller.fixed_update(body, &floor_contact(), GRAVITY, DT, &Floor);
        let jump_velocity = body.velocity;

        // Floor probe would hit every tick, but the sphere must stay airborne
        for _ in 0..2 {
            body.velocity = controller.fixed_update(body, &[], GRAVITY, DT, &Floor);
            assert_eq!(controller.support(), Support::Air);
        }
        assert_eq!(body.velocity.y, jump_velocity.y);
    }

    #[test]
    fn test_snap_keeps_sphere_grounded_over_crest() {
        let mut controller = SphereController::new();
        let mut body = at_rest();
        for _ in 0..5 {
            body.velocity = controller.fixed_update(body, &floor_contact(), GRAVITY, DT, &Floor);
        }

        // Lost contact cresting a bump while drifting upward
        body.velocity = Vec3::new(3.0, 1.0, 0.0);
        let velocity = controller.fixed_update(body, &[], GRAVITY, DT, &Floor);
        assert_eq!(controller.support(), Support::Ground);
        assert!(velocity.y.abs() < 1e-5);
    }

    #[test]
    fn test_drives_rapier_sphere_across_ground() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0, Layer::DEFAULT);
        let mut sphere = SphereBody::default();
        let collider = sphere.spawn(&mut world, Vec3::new(0.0, 0.5, 0.0));
        world.refresh_queries();

        let mut controller = SphereController::with_config(MovementConfig {
            probe_mask: LayerMask::ALL.without(sphere.config.layer),
            ..Default::default()
        });
        let mut input = InputState::new();
        input.set_axis(InputAxis::Vertical, 1.0);
        controller.update(&input, None);

        let gravity = world.config.gravity;
        let dt = world.config.timestep;
        for _ in 0..150 {
            let body = BodySample {
                position: sphere.position(&world).unwrap(),
                velocity: sphere.velocity(&world).unwrap(),
            };
            let contacts = sphere.contacts(&world);
            let velocity =
                controller.fixed_update(body, &contacts, gravity, dt, &world.scene_query(Some(collider)));
            sphere.set_velocity(&mut world, velocity);
            world.step();
        }

        assert_eq!(controller.support(), Support::Ground);
        let velocity = sphere.velocity(&world).unwrap();
        assert!(velocity.z > 5.0);
        assert!(velocity.y.abs() < 0.5);
    }
}
