//! Player sphere controller module
//!
//! Classifies contacts into ground/steep/air support, snaps to ground after
//! small bumps, and steers the rigid body's velocity along the contact plane.

mod controller;
mod ground;
mod movement;
mod state;
mod velocity;

pub use controller::{desired_velocity, BodySample, SphereController};
pub use ground::{ContactKind, GroundClassifier, STEEP_UP_DOT_TOLERANCE};
pub use movement::{MovementConfig, SlopeThresholds};
pub use state::{MotionState, Support};
pub use velocity::{project_on_contact_plane, JumpKind, VelocitySolver};
