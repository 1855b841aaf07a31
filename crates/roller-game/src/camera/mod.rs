//! Camera system module
//!
//! Provides a third-person orbit camera with a lagging focus point,
//! automatic re-alignment behind a moving target, and near-plane
//! obstruction handling.

mod config;
mod controller;
mod focus;

pub use config::CameraConfig;
pub use controller::{
    heading_angle, OrbitCamera, RotationMode, INPUT_DEAD_ZONE, MIN_ALIGN_MOVEMENT_SQR,
};
pub use focus::{FocusTracker, FOCUS_SETTLE_DISTANCE};
