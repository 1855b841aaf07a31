//! Scripted input timeline for headless runs

use glam::Vec2;
use roller_game::{InputAction, InputAxis, InputState};
use serde::{Deserialize, Serialize};

/// One span of held input.
///
/// `movement` is (horizontal, vertical) and `camera` is (pitch, yaw), the
/// same layout [`InputState::movement`] and [`InputState::camera`] return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSegment {
    /// Start time in seconds (inclusive)
    pub start: f64,
    /// End time in seconds (exclusive)
    pub end: f64,
    pub movement: Vec2,
    pub camera: Vec2,
    /// Press jump once on the frame that reaches `start`
    pub jump: bool,
}

impl Default for InputSegment {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 0.0,
            movement: Vec2::ZERO,
            camera: Vec2::ZERO,
            jump: false,
        }
    }
}

impl InputSegment {
    fn held(start: f64, end: f64, movement: Vec2) -> Self {
        Self {
            start,
            end,
            movement,
            ..Default::default()
        }
    }

    fn active_at(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }
}

/// Timeline of input segments replayed against real time
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    segments: Vec<InputSegment>,
}

impl InputScript {
    pub fn new(mut segments: Vec<InputSegment>) -> Self {
        segments.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self { segments }
    }

    pub fn segments(&self) -> &[InputSegment] {
        &self.segments
    }

    /// Time at which the last segment ends
    pub fn end_time(&self) -> f64 {
        self.segments.iter().map(|s| s.end).fold(0.0, f64::max)
    }

    /// Write the input for a frame covering `[previous, time)` into `input`.
    ///
    /// Axes take the sum of every segment active at `time`. Jumps fire once
    /// for segments whose start falls inside the frame.
    pub fn apply(&self, previous: f64, time: f64, input: &mut InputState) {
        let mut movement = Vec2::ZERO;
        let mut camera = Vec2::ZERO;

        for segment in &self.segments {
            if segment.active_at(time) {
                movement += segment.movement;
                camera += segment.camera;
            }
            if segment.jump && previous <= segment.start && segment.start < time {
                input.press(InputAction::Jump);
            }
        }

        input.set_axis(InputAxis::Horizontal, movement.x);
        input.set_axis(InputAxis::Vertical, movement.y);
        input.set_axis(InputAxis::VerticalCamera, camera.x);
        input.set_axis(InputAxis::HorizontalCamera, camera.y);
    }
}

/// Demo timeline: roll up the ramp, jump, curve right, spin the camera, coast
pub fn default_timeline() -> Vec<InputSegment> {
    vec![
        InputSegment::held(0.0, 3.0, Vec2::new(0.0, 1.0)),
        InputSegment {
            start: 1.5,
            end: 1.6,
            jump: true,
            ..Default::default()
        },
        InputSegment::held(3.0, 5.0, Vec2::new(0.7, 0.7)),
        InputSegment {
            start: 5.0,
            end: 6.0,
            camera: Vec2::new(0.0, 1.0),
            ..Default::default()
        },
        InputSegment::held(6.0, 9.0, Vec2::new(0.0, 1.0)),
        InputSegment::held(9.0, 12.0, Vec2::ZERO),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_sorted_by_start() {
        let script = InputScript::new(vec![
            InputSegment::held(2.0, 3.0, Vec2::X),
            InputSegment::held(0.0, 1.0, Vec2::Y),
        ]);
        assert_eq!(script.segments()[0].start, 0.0);
        assert_eq!(script.end_time(), 3.0);
    }

    #[test]
    fn test_active_axes_applied() {
        let script = InputScript::new(vec![InputSegment {
            start: 0.0,
            end: 1.0,
            movement: Vec2::new(0.5, 1.0),
            camera: Vec2::new(-1.0, 0.25),
            jump: false,
        }]);
        let mut input = InputState::new();

        script.apply(0.0, 0.5, &mut input);
        assert_eq!(input.movement(), Vec2::new(0.5, 1.0));
        assert_eq!(input.camera(), Vec2::new(-1.0, 0.25));

        // Past the end everything is released
        script.apply(1.0, 1.5, &mut input);
        assert_eq!(input.movement(), Vec2::ZERO);
        assert_eq!(input.camera(), Vec2::ZERO);
    }

    #[test]
    fn test_overlapping_segments_sum_and_clamp() {
        let script = InputScript::new(vec![
            InputSegment::held(0.0, 2.0, Vec2::new(0.0, 0.75)),
            InputSegment::held(1.0, 2.0, Vec2::new(0.0, 0.75)),
        ]);
        let mut input = InputState::new();
        script.apply(1.0, 1.5, &mut input);
        assert_eq!(input.axis(InputAxis::Vertical), 1.0);
    }

    #[test]
    fn test_jump_fires_once() {
        let script = InputScript::new(vec![InputSegment {
            start: 0.0,
            end: 0.5,
            jump: true,
            ..Default::default()
        }]);
        let mut input = InputState::new();

        script.apply(0.0, 0.02, &mut input);
        assert!(input.is_just_pressed(InputAction::Jump));
        input.clear_frame();

        script.apply(0.02, 0.04, &mut input);
        assert!(!input.is_just_pressed(InputAction::Jump));
    }

    #[test]
    fn test_default_timeline_has_jump() {
        let script = InputScript::new(default_timeline());
        assert!(script.segments().iter().any(|s| s.jump));
        assert_eq!(script.end_time(), 12.0);
    }
}
