//! Ground contact classification and snap-to-ground

use glam::Vec3;
use roller_core::LayerMask;
use roller_physics::{Contact, SceneQuery};
use tracing::trace;

use super::movement::{MovementConfig, SlopeThresholds};
use super::state::MotionState;

/// Contacts with `normal . up` above this count as steep walls rather than ceilings
pub const STEEP_UP_DOT_TOLERANCE: f32 = -0.01;

/// One touching contact's classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Ground,
    Steep,
    Ignored,
}

/// Classifies contacts into ground/steep/air and resolves support each tick
#[derive(Debug, Clone)]
pub struct GroundClassifier {
    thresholds: SlopeThresholds,
    max_snap_speed: f32,
    probe_distance: f32,
    probe_mask: LayerMask,
}

impl GroundClassifier {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            thresholds: config.thresholds(),
            max_snap_speed: config.max_snap_speed,
            probe_distance: config.probe_distance,
            probe_mask: config.probe_mask,
        }
    }

    pub fn thresholds(&self) -> &SlopeThresholds {
        &self.thresholds
    }

    /// Classify a single contact against the up axis
    pub fn classify(&self, contact: &Contact, up_axis: Vec3) -> ContactKind {
        let up_dot = up_axis.dot(contact.normal);
        if up_dot >= self.thresholds.min_dot(contact.layer) {
            ContactKind::Ground
        } else if up_dot > STEEP_UP_DOT_TOLERANCE {
            ContactKind::Steep
        } else {
            ContactKind::Ignored
        }
    }

    /// Accumulate a tick's worth of contacts into the state
    pub fn evaluate_contacts(&self, state: &mut MotionState, contacts: &[Contact], up_axis: Vec3) {
        for contact in contacts {
            match self.classify(contact, up_axis) {
                ContactKind::Ground => {
                    state.ground_contact_count += 1;
                    state.contact_normal += contact.normal;
                }
                ContactKind::Steep => {
                    state.steep_contact_count += 1;
                    state.steep_normal += contact.normal;
                }
                ContactKind::Ignored => {}
            }
        }
    }

    /// End-of-tick support resolution.
    ///
    /// Expects `state.velocity` to hold the body's current velocity and the
    /// accumulators to hold this tick's contacts. Returns whether the sphere
    /// counts as grounded.
    pub fn update_state(
        &self,
        state: &mut MotionState,
        position: Vec3,
        up_axis: Vec3,
        scene: &impl SceneQuery,
    ) -> bool {
        state.steps_since_last_grounded = state.steps_since_last_grounded.saturating_add(1);
        state.steps_since_last_jump = state.steps_since_last_jump.saturating_add(1);

        let grounded = state.on_ground()
            || self.snap_to_ground(state, position, up_axis, scene)
            || self.check_steep_contacts(state, up_axis);

        if grounded {
            state.steps_since_last_grounded = 0;
            if state.steps_since_last_jump > 1 {
                state.jump_phase = 0;
            }
            state.contact_normal = state.contact_normal.normalize_or_zero();
        } else {
            state.contact_normal = up_axis;
        }
        grounded
    }

    /// Probe downward and stick to the surface when the sphere has just left it
    pub fn snap_to_ground(
        &self,
        state: &mut MotionState,
        position: Vec3,
        up_axis: Vec3,
        scene: &impl SceneQuery,
    ) -> bool {
        if state.steps_since_last_grounded > 1 || state.steps_since_last_jump <= 2 {
            return false;
        }
        let speed = state.velocity.length();
        if speed > self.max_snap_speed {
            return false;
        }
        let Some(hit) = scene.raycast(position, -up_axis, self.probe_distance, self.probe_mask)
        else {
            return false;
        };
        let up_dot = up_axis.dot(hit.normal);
        if up_dot < self.thresholds.min_dot(hit.layer) {
            return false;
        }

        state.ground_contact_count = 1;
        state.contact_normal = hit.normal;
        let dot = state.velocity.dot(hit.normal);
        if dot > 0.0 {
            state.velocity = (state.velocity - hit.normal * dot).normalize_or_zero() * speed;
        }
        trace!("Snapped to ground {:.3} below", hit.distance);
        true
    }

    /// Treat a crevasse of steep contacts as ground when they average to a walkable normal
    pub fn check_steep_contacts(&self, state: &mut MotionState, up_axis: Vec3) -> bool {
        if state.steep_contact_count > 1 {
            state.steep_normal = state.steep_normal.normalize_or_zero();
            let up_dot = up_axis.dot(state.steep_normal);
            if up_dot >= self.thresholds.min_ground_dot {
                state.ground_contact_count = 1;
                state.contact_normal = state.steep_normal;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use roller_core::Layer;
    use roller_physics::{CastHit, EmptyScene, SurfaceHit};
    use std::cell::Cell;

    /// Floor below every probe, counting how often it is queried
    struct Floor {
        normal: Vec3,
        layer: Layer,
        probes: Cell<u32>,
    }

    impl Floor {
        fn flat() -> Self {
            Self {
                normal: Vec3::Y,
                layer: Layer::DEFAULT,
                probes: Cell::new(0),
            }
        }
    }

    impl SceneQuery for Floor {
        fn raycast(&self, origin: Vec3, _: Vec3, max: f32, mask: LayerMask) -> Option<SurfaceHit> {
            self.probes.set(self.probes.get() + 1);
            (mask.contains(self.layer) && max >= 0.6).then(|| SurfaceHit {
                distance: 0.6,
                point: origin - Vec3::Y * 0.6,
                normal: self.normal,
                layer: self.layer,
            })
        }

        fn box_cast(&self, _: Vec3, _: Vec3, _: Quat, _: Vec3, _: f32, _: LayerMask) -> Option<CastHit> {
            None
        }
    }

    fn tilted(degrees: f32) -> Vec3 {
        Quat::from_rotation_z(degrees.to_radians()) * Vec3::Y
    }

    fn classifier(max_ground_angle: f32) -> GroundClassifier {
        GroundClassifier::new(&MovementConfig {
            max_ground_angle,
            ..Default::default()
        })
    }

    #[test]
    fn test_twenty_degree_slope_depends_on_threshold() {
        let contact = Contact::new(tilted(20.0), Layer::DEFAULT);

        assert_eq!(classifier(25.0).classify(&contact, Vec3::Y), ContactKind::Ground);
        assert_eq!(classifier(15.0).classify(&contact, Vec3::Y), ContactKind::Steep);
    }

    #[test]
    fn test_walls_are_steep_and_ceilings_ignored() {
        let classifier = classifier(25.0);
        let wall = Contact::new(Vec3::X, Layer::DEFAULT);
        let ceiling = Contact::new(Vec3::NEG_Y, Layer::DEFAULT);

        assert_eq!(classifier.classify(&wall, Vec3::Y), ContactKind::Steep);
        assert_eq!(classifier.classify(&ceiling, Vec3::Y), ContactKind::Ignored);
    }

    #[test]
    fn test_stairs_layer_accepts_steeper_surface() {
        let stairs = Layer::new(9);
        let classifier = GroundClassifier::new(&MovementConfig {
            stairs_mask: LayerMask::from_layers(&[stairs]),
            ..Default::default()
        });

        let on_stairs = Contact::new(tilted(40.0), stairs);
        let on_ramp = Contact::new(tilted(40.0), Layer::DEFAULT);
        assert_eq!(classifier.classify(&on_stairs, Vec3::Y), ContactKind::Ground);
        assert_eq!(classifier.classify(&on_ramp, Vec3::Y), ContactKind::Steep);
    }

    #[test]
    fn test_multiple_ground_contacts_average() {
        let classifier = classifier(25.0);
        let mut state = MotionState::default();
        let contacts = [
            Contact::new(tilted(10.0), Layer::DEFAULT),
            Contact::new(tilted(-10.0), Layer::DEFAULT),
        ];
        classifier.evaluate_contacts(&mut state, &contacts, Vec3::Y);
        assert_eq!(state.ground_contact_count, 2);

        assert!(classifier.update_state(&mut state, Vec3::ZERO, Vec3::Y, &EmptyScene));
        assert!((state.contact_normal - Vec3::Y).length() < 1e-5);
        assert_eq!(state.steps_since_last_grounded, 0);
    }

    #[test]
    fn test_airborne_contact_normal_is_up_axis() {
        let classifier = classifier(25.0);
        let mut state = MotionState {
            steps_since_last_grounded: 5,
            ..Default::default()
        };
        let up = Vec3::new(0.0, 0.0, 1.0);
        assert!(!classifier.update_state(&mut state, Vec3::ZERO, up, &EmptyScene));
        assert_eq!(state.contact_normal, up);
        assert_eq!(state.steps_since_last_grounded, 6);
    }

    #[test]
    fn test_steep_crevasse_counts_as_ground() {
        let classifier = classifier(25.0);
        let mut state = MotionState {
            steps_since_last_grounded: 10,
            ..Default::default()
        };
        let contacts = [
            Contact::new(tilted(60.0), Layer::DEFAULT),
            Contact::new(tilted(-60.0), Layer::DEFAULT),
        ];
        classifier.evaluate_contacts(&mut state, &contacts, Vec3::Y);
        assert_eq!(state.steep_contact_count, 2);
        assert_eq!(state.ground_contact_count, 0);

        assert!(classifier.update_state(&mut state, Vec3::ZERO, Vec3::Y, &EmptyScene));
        assert_eq!(state.ground_contact_count, 1);
        assert!((state.contact_normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_single_steep_contact_is_not_ground() {
        let classifier = classifier(25.0);
        let mut state = MotionState {
            steps_since_last_grounded: 10,
            ..Default::default()
        };
        classifier.evaluate_contacts(&mut state, &[Contact::new(tilted(60.0), Layer::DEFAULT)], Vec3::Y);
        assert!(!classifier.update_state(&mut state, Vec3::ZERO, Vec3::Y, &EmptyScene));
        assert!(state.on_steep());
    }

    #[test]
    fn test_snap_blocked_right_after_jump() {
        let classifier = classifier(25.0);
        let floor = Floor::flat();
        // Just jumped: the update increments this to 1, then 2
        let mut state = MotionState {
            steps_since_last_jump: 0,
            steps_since_last_grounded: 0,
            ..Default::default()
        };

        for _ in 0..2 {
            assert!(!classifier.update_state(&mut state, Vec3::ZERO, Vec3::Y, &floor));
            state.clear_contacts();
            // Keep the sphere eligible on every other count
            state.steps_since_last_grounded = 0;
        }
        assert_eq!(floor.probes.get(), 0);

        // Third tick after the jump: probe allowed
        assert!(classifier.update_state(&mut state, Vec3::ZERO, Vec3::Y, &floor));
        assert_eq!(floor.probes.get(), 1);
    }

    #[test]
    fn test_snap_removes_velocity_away_from_surface() {
        let classifier = classifier(25.0);
        let floor = Floor::flat();
        let mut state = MotionState {
            velocity: Vec3::new(3.0, 4.0, 0.0),
            steps_since_last_jump: 10,
            ..Default::default()
        };

        assert!(classifier.update_state(&mut state, Vec3::ZERO, Vec3::Y, &floor));
        assert!((state.velocity - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(state.contact_normal, Vec3::Y);
    }

    #[test]
    fn test_snap_skipped_when_too_fast_or_long_airborne() {
        let floor = Floor::flat();
        let slow = GroundClassifier::new(&MovementConfig {
            max_snap_speed: 5.0,
            ..Default::default()
        });
        let mut fast = MotionState {
            velocity: Vec3::new(8.0, 0.0, 0.0),
            steps_since_last_jump: 10,
            ..Default::default()
        };
        assert!(!slow.snap_to_ground(&mut fast, Vec3::ZERO, Vec3::Y, &floor));

        let mut falling = MotionState {
            steps_since_last_jump: 10,
            steps_since_last_grounded: 2,
            ..Default::default()
        };
        assert!(!slow.snap_to_ground(&mut falling, Vec3::ZERO, Vec3::Y, &floor));
        assert_eq!(floor.probes.get(), 0);
    }

    #[test]
    fn test_snap_rejects_steep_hit() {
        let classifier = classifier(25.0);
        let floor = Floor {
            normal: tilted(45.0),
            ..Floor::flat()
        };
        let mut state = MotionState {
            steps_since_last_jump: 10,
            ..Default::default()
        };
        assert!(!classifier.snap_to_ground(&mut state, Vec3::ZERO, Vec3::Y, &floor));
        assert_eq!(state.ground_contact_count, 0);
    }

    #[test]
    fn test_snap_threshold_follows_hit_layer() {
        let stairs = Layer::new(9);
        let classifier = GroundClassifier::new(&MovementConfig {
            stairs_mask: LayerMask::from_layers(&[stairs]),
            ..Default::default()
        });
        let eligible = || MotionState {
            steps_since_last_jump: 10,
            ..Default::default()
        };

        let stairs_floor = Floor {
            normal: tilted(40.0),
            layer: stairs,
            probes: Cell::new(0),
        };
        let mut state = eligible();
        assert!(classifier.snap_to_ground(&mut state, Vec3::ZERO, Vec3::Y, &stairs_floor));
        assert_eq!(state.ground_contact_count, 1);
        assert!((state.contact_normal - tilted(40.0)).length() < 1e-5);

        let ramp_floor = Floor {
            normal: tilted(40.0),
            layer: Layer::DEFAULT,
            probes: Cell::new(0),
        };
        let mut state = eligible();
        assert!(!classifier.snap_to_ground(&mut state, Vec3::ZERO, Vec3::Y, &ramp_floor));
        assert_eq!(state.ground_contact_count, 0);
        assert_eq!(ramp_floor.probes.get(), 1);
    }
}
