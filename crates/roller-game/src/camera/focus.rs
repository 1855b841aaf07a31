//! Lagging focus point that follows the camera target

use glam::Vec3;

/// Below this distance the focus point no longer centers on the target
pub const FOCUS_SETTLE_DISTANCE: f32 = 0.01;

/// Smoothed point the camera orbits around
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusTracker {
    focus_point: Vec3,
    previous_focus_point: Vec3,
}

impl FocusTracker {
    /// Start focused exactly on the target
    pub fn new(target: Vec3) -> Self {
        Self {
            focus_point: target,
            previous_focus_point: target,
        }
    }

    pub fn focus_point(&self) -> Vec3 {
        self.focus_point
    }

    /// Focus point from before the last update
    pub fn previous_focus_point(&self) -> Vec3 {
        self.previous_focus_point
    }

    /// Focus-point displacement produced by the last update
    pub fn movement(&self) -> Vec3 {
        self.focus_point - self.previous_focus_point
    }

    /// Move the focus point toward `target`.
    ///
    /// Inside `radius` the point only drifts toward the target by
    /// `centering` per second of `unscaled_dt`; it is never left further
    /// than `radius` from the target. A zero radius follows rigidly.
    pub fn update(&mut self, target: Vec3, radius: f32, centering: f32, unscaled_dt: f32) {
        self.previous_focus_point = self.focus_point;

        if radius <= 0.0 {
            self.focus_point = target;
            return;
        }

        let distance = target.distance(self.focus_point);
        // Fraction of the old offset kept this update
        let mut t = 1.0;
        if distance > FOCUS_SETTLE_DISTANCE && centering > 0.0 {
            t = (1.0 - centering).powf(unscaled_dt);
        }
        if distance > radius {
            t = t.min(radius / distance);
        }
        self.focus_point = target.lerp(self.focus_point, t);
    }

    /// Keep the current focus point and report no movement
    pub fn hold(&mut self) {
        self.previous_focus_point = self.focus_point;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_radius_follows_exactly() {
        let mut focus = FocusTracker::new(Vec3::ZERO);
        for step in 1..10 {
            let target = Vec3::new(step as f32 * 0.7, 0.3, -(step as f32));
            focus.update(target, 0.0, 0.5, 0.016);
            assert_eq!(focus.focus_point(), target);
        }
    }

    #[test]
    fn test_focus_stays_within_radius() {
        let mut focus = FocusTracker::new(Vec3::ZERO);
        let radius = 1.0;
        for step in 1..50 {
            let target = Vec3::new(step as f32 * 0.8, 0.0, 0.0);
            focus.update(target, radius, 0.0, 0.016);
            assert!(focus.focus_point().distance(target) <= radius + 1e-4);
        }
    }

    #[test]
    fn test_no_centering_keeps_lag_inside_radius() {
        let mut focus = FocusTracker::new(Vec3::ZERO);
        focus.update(Vec3::new(0.5, 0.0, 0.0), 1.0, 0.0, 0.1);
        assert_eq!(focus.focus_point(), Vec3::ZERO);
        assert_eq!(focus.previous_focus_point(), Vec3::ZERO);
    }

    #[test]
    fn test_centering_closes_half_the_gap_per_second() {
        let mut focus = FocusTracker::new(Vec3::ZERO);
        let target = Vec3::new(0.8, 0.0, 0.0);
        focus.update(target, 1.0, 0.5, 1.0);
        assert!((focus.focus_point().x - 0.4).abs() < 1e-5);

        // Distance never grows while the target stands still
        let before = focus.focus_point().distance(target);
        focus.update(target, 1.0, 0.5, 0.25);
        assert!(focus.focus_point().distance(target) <= before);
    }

    #[test]
    fn test_previous_point_and_movement() {
        let mut focus = FocusTracker::new(Vec3::ZERO);
        focus.update(Vec3::new(3.0, 0.0, 0.0), 1.0, 0.0, 0.016);
        assert_eq!(focus.previous_focus_point(), Vec3::ZERO);
        assert!((focus.movement() - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);

        focus.hold();
        assert_eq!(focus.movement(), Vec3::ZERO);
    }
}
