//! Roller Core - Core types and utilities shared by the Roller crates
//!
//! This crate provides the foundational types used by the controller and camera:
//! - Mathematical primitives (re-exported from glam)
//! - Pose and collision layer types
//! - Scalar helpers for approaching values and wrapping angles
//! - Time system with scaled and unscaled clocks

pub mod math;
pub mod time;
pub mod types;

pub use glam::{Quat, Vec2, Vec3};
pub use time::{GameTime, TimeConfig, TimeError};
pub use types::{Layer, LayerMask, Pose};
