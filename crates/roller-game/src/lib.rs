//! Roller Game - Sphere controller and orbit camera
//!
//! Provides the physics-driven sphere controller, the orbit camera, and the
//! input state both of them sample.

pub mod camera;
pub mod input;
pub mod player;

pub use camera::{CameraConfig, FocusTracker, OrbitCamera, RotationMode};
pub use input::{InputAction, InputAxis, InputState};
pub use player::{
    BodySample, GroundClassifier, JumpKind, MotionState, MovementConfig, SphereController,
    Support, VelocitySolver,
};
