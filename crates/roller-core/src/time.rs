//! Time system for the Roller host loop
//!
//! Tracks scaled simulation time (drives the fixed physics tick) alongside
//! unscaled real time (drives the camera, which must keep responding while
//! the simulation is slowed down or paused).

use serde::{Deserialize, Serialize};

/// Errors that can occur when configuring the clock
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeError {
    #[error("fixed timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),

    #[error("time scale must be non-negative and finite, got {0}")]
    InvalidTimeScale(f32),

    #[error("max delta time must be positive and finite, got {0}")]
    InvalidMaxDelta(f32),
}

/// Configuration for game time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
    /// Fixed timestep for physics (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 50.0,
            max_delta_time: 0.25,
        }
    }
}

/// Game time tracking
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Scaled time since start in seconds
    pub total_time: f64,
    /// Unscaled (real) time since start in seconds
    pub unscaled_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    /// Unscaled delta time for this frame (clamped)
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Whether the simulation is paused
    pub paused: bool,
    /// Accumulated time for fixed timestep
    fixed_accumulator: f32,
}

impl Default for GameTime {
    fn default() -> Self {
        Self {
            config: TimeConfig::default(),
            total_time: 0.0,
            unscaled_time: 0.0,
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            frame_count: 0,
            paused: false,
            fixed_accumulator: 0.0,
        }
    }
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Result<Self, TimeError> {
        if !(config.fixed_timestep.is_finite() && config.fixed_timestep > 0.0) {
            return Err(TimeError::InvalidTimestep(config.fixed_timestep));
        }
        if !(config.time_scale.is_finite() && config.time_scale >= 0.0) {
            return Err(TimeError::InvalidTimeScale(config.time_scale));
        }
        if !(config.max_delta_time.is_finite() && config.max_delta_time > 0.0) {
            return Err(TimeError::InvalidMaxDelta(config.max_delta_time));
        }
        Ok(Self {
            config,
            ..Default::default()
        })
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        // Non-finite deltas count as an empty frame
        let raw_delta = if raw_delta.is_finite() { raw_delta } else { 0.0 };
        self.unscaled_delta_time = raw_delta.max(0.0).min(self.config.max_delta_time.max(0.0));
        self.unscaled_time += self.unscaled_delta_time as f64;
        self.frame_count += 1;

        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Get the number of fixed timesteps to process this frame
    pub fn fixed_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        steps
    }

    /// Duration of one fixed simulation tick
    pub fn fixed_delta_time(&self) -> f32 {
        self.config.fixed_timestep
    }

    /// Pause the simulation clock (real time keeps running)
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume the simulation clock
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f32) -> Result<(), TimeError> {
        if !(scale.is_finite() && scale >= 0.0) {
            return Err(TimeError::InvalidTimeScale(scale));
        }
        self.config.time_scale = scale;
        Ok(())
    }
}
