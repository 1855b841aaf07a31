//! Headless simulation host
//!
//! Owns the physics world, the sphere and its controller, and the orbit
//! camera, and drives them in frame / fixed-step order.

use glam::Vec3;
use roller_core::{GameTime, Pose, TimeError};
use roller_game::{BodySample, InputState, OrbitCamera, SphereController, Support};
use roller_physics::{ColliderHandle, PhysicsWorld, SphereBody, SphereBodyConfig};
use tracing::{debug, info, trace};

use crate::scene::Course;
use crate::script::InputScript;
use crate::settings::SimSettings;

/// Snapshot of the simulation after a frame
#[derive(Debug, Clone, Copy)]
pub struct FrameReport {
    pub time: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub support: Support,
    pub camera: Pose,
}

pub struct Simulation {
    world: PhysicsWorld,
    course: Course,
    sphere: SphereBody,
    sphere_collider: ColliderHandle,
    controller: SphereController,
    camera: OrbitCamera,
    time: GameTime,
    input: InputState,
    script: InputScript,
}

impl Simulation {
    pub fn new(settings: &SimSettings) -> Result<Self, TimeError> {
        let time = GameTime::new(settings.physics.time_config())?;
        let mut world = PhysicsWorld::with_config(settings.physics.physics_config());

        let mut sphere = SphereBody::new(SphereBodyConfig::default());
        let course = Course::build(&mut world, &sphere.config);
        let sphere_collider = sphere.spawn(&mut world, course.spawn);
        world.refresh_queries();

        let controller = SphereController::with_config(settings.movement.clone());
        let camera = OrbitCamera::new(settings.camera.clone(), course.spawn);
        let script = InputScript::new(settings.demo.script.clone());

        info!(
            "Simulation ready: sphere at {:?}, {} script segments ending at {:.1}s",
            course.spawn,
            script.segments().len(),
            script.end_time()
        );

        Ok(Self {
            world,
            course,
            sphere,
            sphere_collider,
            controller,
            camera,
            time,
            input: InputState::new(),
            script,
        })
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn time(&self) -> &GameTime {
        &self.time
    }

    pub fn controller(&self) -> &SphereController {
        &self.controller
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Advance one render frame of `raw_delta` seconds
    pub fn frame(&mut self, raw_delta: f32) -> FrameReport {
        let previous = self.time.unscaled_time;
        self.time.update(raw_delta);

        self.script.apply(previous, self.time.unscaled_time, &mut self.input);
        let input_space = self.camera.pose();
        self.controller.update(&self.input, Some(&input_space));

        let steps = self.time.fixed_steps();
        for _ in 0..steps {
            self.fixed_step();
        }
        trace!("Frame {} ran {} fixed steps", self.time.frame_count, steps);

        let target = self.sphere.position(&self.world);
        let scene = self.world.scene_query(Some(self.sphere_collider));
        let camera = self.camera.late_update(target, &self.input, &self.time, &scene);

        self.input.clear_frame();

        FrameReport {
            time: self.time.unscaled_time,
            position: target.unwrap_or(Vec3::ZERO),
            velocity: self.sphere.velocity(&self.world).unwrap_or(Vec3::ZERO),
            support: self.controller.support(),
            camera,
        }
    }

    fn fixed_step(&mut self) {
        let (Some(position), Some(velocity)) = (
            self.sphere.position(&self.world),
            self.sphere.velocity(&self.world),
        ) else {
            debug!("Sphere body missing, skipping tick");
            return;
        };

        let contacts = self.sphere.contacts(&self.world);
        let scene = self.world.scene_query(Some(self.sphere_collider));
        let velocity = self.controller.fixed_update(
            BodySample { position, velocity },
            &contacts,
            self.world.config.gravity,
            self.time.fixed_delta_time(),
            &scene,
        );

        self.sphere.set_velocity(&mut self.world, velocity);
        self.world.step();
    }

    /// Run the configured demo and log a summary at each report interval
    pub fn run(&mut self, duration: f32, frame_rate: f32, report_interval: f32) -> FrameReport {
        let frame_delta = 1.0 / frame_rate.max(1.0);
        let frames = (duration.max(0.0) / frame_delta).ceil() as u64;
        let report_every = ((report_interval / frame_delta).round() as u64).max(1);

        info!("Running {} frames at {} fps", frames, frame_rate);

        let mut report = self.frame(0.0);
        for frame in 1..=frames {
            report = self.frame(frame_delta);
            if frame % report_every == 0 {
                info!(
                    "t={:.2}s pos=({:.2}, {:.2}, {:.2}) speed={:.2} {:?} camera=({:.2}, {:.2}, {:.2}) {:?}",
                    report.time,
                    report.position.x,
                    report.position.y,
                    report.position.z,
                    report.velocity.length(),
                    report.support,
                    report.camera.position.x,
                    report.camera.position.y,
                    report.camera.position.z,
                    self.camera.rotation_mode(),
                );
            }
        }
        report
    }
}
