//! Tracking session manager

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use melt_body::Skeleton;
use melt_core::{BodyColor, FrameTime, SessionTime};
use melt_wire::{OscMessage, TrackingUpdate};

use crate::{
    BodySnapshot, EvictionPolicy, SessionConfig, SessionSnapshot, TouchDetector, TouchReport,
};

/// Result of routing one message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ingest {
    /// Joint stored on an existing body
    Applied,
    /// A new body was created for it
    Created,
    /// Not a joint update the session understands
    Ignored,
}

/// What one tick did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub evicted: Vec<String>,
    pub colors_rotated: bool,
    pub touches: TouchReport,
}

#[derive(Clone, Debug, Default)]
pub struct SessionStats {
    pub ticks: u64,
    pub updates_applied: u64,
    pub messages_ignored: u64,
    pub bodies_created: u64,
    pub bodies_evicted: u64,
}

/// The set of currently tracked bodies
pub struct TrackingSession {
    bodies: HashMap<String, Skeleton>,
    config: SessionConfig,
    touch: TouchDetector,
    rng: StdRng,
    last_color_change: SessionTime,
    now: SessionTime,
    stats: SessionStats,
}

impl TrackingSession {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        TrackingSession {
            bodies: HashMap::new(),
            touch: TouchDetector::new(config.touching_threshold_base),
            config,
            rng,
            last_color_change: SessionTime::ZERO,
            now: SessionTime::ZERO,
            stats: SessionStats::default(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn touch_detector_mut(&mut self) -> &mut TouchDetector {
        &mut self.touch
    }

    /// Session time of the last tick
    pub fn now(&self) -> SessionTime {
        self.now
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn body(&self, id: &str) -> Option<&Skeleton> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: &str) -> Option<&mut Skeleton> {
        self.bodies.get_mut(id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (&str, &Skeleton)> {
        self.bodies.iter().map(|(id, s)| (id.as_str(), s))
    }

    /// Start a frame, before any updates for it arrive
    pub fn begin_frame(&mut self) {
        for skeleton in self.bodies.values_mut() {
            skeleton.begin_frame();
        }
    }

    /// Route a raw tracking message
    pub fn ingest(&mut self, msg: &OscMessage, now: SessionTime) -> Ingest {
        match TrackingUpdate::from_message(msg) {
            Some(update) => self.apply(&update, now),
            None => {
                debug!(address = %msg.addr, "ignoring message");
                self.stats.messages_ignored += 1;
                Ingest::Ignored
            }
        }
    }

    /// Store a joint update, creating the body on first sight
    pub fn apply(&mut self, update: &TrackingUpdate, now: SessionTime) -> Ingest {
        let mut outcome = Ingest::Applied;
        if !self.bodies.contains_key(&update.body_id) {
            let color = BodyColor::random(&mut self.rng);
            let skeleton = Skeleton::build(color, self.config.viewport, now);
            self.bodies.insert(update.body_id.clone(), skeleton);
            self.stats.bodies_created += 1;
            info!(body = %update.body_id, ?color, "body appeared");
            outcome = Ingest::Created;
        }

        if let Some(skeleton) = self.bodies.get_mut(&update.body_id) {
            skeleton.add_or_update_joint(update.joint, update.position, update.seen(), now);
            self.stats.updates_applied += 1;
        }
        outcome
    }

    /// Advance every body by one frame
    pub fn tick(&mut self, frame: FrameTime) -> TickReport {
        self.now = frame.now;
        self.stats.ticks += 1;

        let mut report = TickReport::default();
        if frame.now - self.last_color_change > self.config.color_interval {
            self.randomize_colors();
            self.last_color_change = frame.now;
            report.colors_rotated = true;
        }

        report.evicted = self.evict_stale(frame.now);

        let dt = frame.dt_secs();
        for skeleton in self.bodies.values_mut() {
            skeleton.update(dt);
        }
        report.touches = self.touch.detect(self.bodies.values_mut(), dt);
        report
    }

    /// Remove bodies not updated within the stale timeout
    pub fn evict_stale(&mut self, now: SessionTime) -> Vec<String> {
        let timeout = self.config.stale_timeout;
        let mut stale: Vec<String> = self
            .bodies
            .iter()
            .filter(|(_, s)| s.is_stale(now, timeout))
            .map(|(id, _)| id.clone())
            .collect();

        if self.config.eviction == EvictionPolicy::OnePerFrame {
            // Oldest first, so the throttled policy is deterministic
            stale.sort_by_key(|id| self.bodies[id].last_seen());
            stale.truncate(1);
        }

        for id in &stale {
            self.bodies.remove(id);
            self.stats.bodies_evicted += 1;
            info!(body = %id, "body lost");
        }
        stale
    }

    /// Give every body an independent random color
    pub fn randomize_colors(&mut self) {
        // Id order keeps seeded sessions reproducible
        let mut bodies: Vec<(&String, &mut Skeleton)> = self.bodies.iter_mut().collect();
        bodies.sort_by(|a, b| a.0.cmp(b.0));
        for (_, skeleton) in bodies {
            skeleton.color = BodyColor::random(&mut self.rng);
        }
    }

    /// Reform every body at once
    pub fn restore_all(&mut self) {
        for skeleton in self.bodies.values_mut() {
            skeleton.restore_full();
        }
        info!(bodies = self.bodies.len(), "forced restore");
    }

    /// End a forced restore
    pub fn release_restore(&mut self) {
        for skeleton in self.bodies.values_mut() {
            skeleton.restoring = false;
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut bodies: Vec<BodySnapshot> = self
            .bodies
            .iter()
            .map(|(id, s)| BodySnapshot::new(id, s))
            .collect();
        bodies.sort_by(|a, b| a.id.cmp(&b.id));
        SessionSnapshot {
            time: self.now.as_secs_f64(),
            bodies,
        }
    }
}

impl Default for TrackingSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use melt_core::{JointId, SectionId, Vec3};
    use melt_wire::{message, OscType, TrackingState};

    fn at(ms: u64) -> SessionTime {
        SessionTime::from_millis(ms)
    }

    fn frame(ms: u64) -> FrameTime {
        FrameTime::new(at(ms), Duration::from_millis(16))
    }

    fn hand(body: &str, joint: JointId, x: f32) -> TrackingUpdate {
        TrackingUpdate::new(body, joint, Vec3::new(x, 0.0, 2.0), TrackingState::Tracked)
    }

    #[test]
    fn test_first_update_creates_body_with_all_joints() {
        let mut session = TrackingSession::with_config(SessionConfig::seeded(1));
        let update = TrackingUpdate::new(
            "B1",
            JointId::HandLeft,
            Vec3::new(0.0, 0.0, 1.0),
            TrackingState::Tracked,
        );
        assert_eq!(session.apply(&update, at(100)), Ingest::Created);
        assert_eq!(session.len(), 1);

        let body = session.body("B1").unwrap();
        assert_eq!(body.joints().len(), JointId::COUNT);
        let origin = session.config().viewport.origin();
        for joint in body.joints() {
            if joint.id == JointId::HandLeft {
                assert!(joint.seen);
                // Depth 1 -> scale 800, z = 800
                assert_eq!(joint.position, origin + Vec3::new(0.0, 0.0, 800.0));
            } else {
                assert!(!joint.seen);
                assert_eq!(joint.position, origin);
            }
        }
        assert_eq!(session.apply(&update, at(120)), Ingest::Applied);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_ingest_routes_osc_messages() {
        let mut session = TrackingSession::with_config(SessionConfig::seeded(1));
        let msg = message(
            "/bodies/9/joints/Head",
            vec![
                OscType::Float(0.0),
                OscType::Float(0.5),
                OscType::Float(2.0),
                OscType::String("NotTracked".into()),
            ],
        );
        assert_eq!(session.ingest(&msg, at(5)), Ingest::Created);
        let head = session.body("9").unwrap().joint(JointId::Head);
        assert!(!head.seen);
        assert!((head.position.y - (648.0 - 300.0)).abs() < 1e-3);

        let hands = message("/bodies/9/hands/Left", vec![OscType::String("Open".into())]);
        assert_eq!(session.ingest(&hands, at(6)), Ingest::Ignored);
        let unknown = message(
            "/bodies/10/joints/Tail",
            vec![
                OscType::Float(0.0),
                OscType::Float(0.0),
                OscType::Float(0.0),
                OscType::String("Tracked".into()),
            ],
        );
        assert_eq!(session.ingest(&unknown, at(6)), Ingest::Ignored);
        assert_eq!(session.len(), 1);
        assert_eq!(session.stats().messages_ignored, 2);
    }

    #[test]
    fn test_eviction_after_timeout() {
        let mut session = TrackingSession::with_config(SessionConfig::seeded(2));
        session.apply(&hand("A", JointId::Head, 0.0), at(1000));

        let report = session.tick(frame(3000));
        assert!(report.evicted.is_empty());
        assert_eq!(session.len(), 1);

        let report = session.tick(frame(3001));
        assert_eq!(report.evicted, vec!["A".to_string()]);
        assert!(session.is_empty());
    }

    #[test]
    fn test_eviction_all_stale() {
        let mut session = TrackingSession::with_config(SessionConfig::seeded(3));
        session.apply(&hand("A", JointId::Head, 0.0), at(0));
        session.apply(&hand("B", JointId::Head, 0.0), at(100));
        session.apply(&hand("C", JointId::Head, 0.0), at(2500));

        let mut evicted = session.evict_stale(at(2600));
        evicted.sort();
        assert_eq!(evicted, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(session.len(), 1);
        assert!(session.body("C").is_some());
    }

    #[test]
    fn test_eviction_one_per_frame() {
        let config = SessionConfig {
            eviction: EvictionPolicy::OnePerFrame,
            ..SessionConfig::seeded(3)
        };
        let mut session = TrackingSession::with_config(config);
        session.apply(&hand("A", JointId::Head, 0.0), at(100));
        session.apply(&hand("B", JointId::Head, 0.0), at(0));

        assert_eq!(session.tick(frame(2600)).evicted, vec!["B".to_string()]);
        assert_eq!(session.tick(frame(2616)).evicted, vec!["A".to_string()]);
        assert!(session.is_empty());
    }

    #[test]
    fn test_color_rotation_interval() {
        let mut session = TrackingSession::with_config(SessionConfig::seeded(4));
        for i in 0..8 {
            session.apply(&hand(&i.to_string(), JointId::Head, 0.0), at(9_000));
        }
        assert!(!session.tick(frame(9_500)).colors_rotated);
        assert!(!session.tick(frame(10_000)).colors_rotated);
        assert!(session.tick(frame(10_001)).colors_rotated);
        // Next rotation is measured from the last one
        assert!(!session.tick(frame(10_100)).colors_rotated);
    }

    #[test]
    fn test_colors_are_seeded() {
        let colors = |seed| {
            let mut session = TrackingSession::with_config(SessionConfig::seeded(seed));
            for i in 0..6 {
                session.apply(&hand(&i.to_string(), JointId::Head, 0.0), at(0));
            }
            session.randomize_colors();
            let mut out: Vec<_> = session.bodies().map(|(id, s)| (id.to_string(), s.color)).collect();
            out.sort_by(|a, b| a.0.cmp(&b.0));
            out
        };
        assert_eq!(colors(11), colors(11));
    }

    #[test]
    fn test_same_color_contact_restores() {
        let mut session = TrackingSession::with_config(SessionConfig::seeded(5));
        session.apply(&hand("A", JointId::HandRight, -0.02), at(0));
        session.apply(&hand("B", JointId::HandLeft, 0.02), at(0));
        // Keep the other hands apart
        session.apply(&hand("A", JointId::HandLeft, -1.0), at(0));
        session.apply(&hand("B", JointId::HandRight, 1.0), at(0));
        session.body_mut("A").unwrap().color = BodyColor::Blue;
        session.body_mut("B").unwrap().color = BodyColor::Blue;

        let report = session.tick(frame(16));
        assert!(report.touches.healing_contacts > 0);
        assert!(session.body("A").unwrap().restoring);
        assert!(session.body("B").unwrap().restoring);
    }

    #[test]
    fn test_restore_all_and_release() {
        let mut session = TrackingSession::with_config(SessionConfig::seeded(6));
        session.apply(&hand("A", JointId::Head, 0.0), at(0));
        session.body_mut("A").unwrap().melting_speed = 0.5;
        session.body_mut("A").unwrap().update(0.016);
        assert!(session.body("A").unwrap().section(SectionId::Spine).percent_left < 1.0);

        session.restore_all();
        let body = session.body("A").unwrap();
        assert!(body.restoring);
        assert!(body.sections().iter().all(|s| s.percent_left == 1.0));

        session.release_restore();
        assert!(!session.body("A").unwrap().restoring);
    }

    #[test]
    fn test_snapshot_is_sorted_and_serializable() {
        let mut session = TrackingSession::with_config(SessionConfig::seeded(7));
        session.apply(&hand("b", JointId::Head, 0.0), at(0));
        session.apply(&hand("a", JointId::Head, 0.0), at(0));
        session.tick(frame(16));

        let snapshot = session.snapshot();
        let ids: Vec<_> = snapshot.bodies.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        let body = snapshot.body("a").unwrap();
        assert_eq!(body.sections.len(), SectionId::COUNT);
        assert_eq!(body.sections[4].name, "Spine");
        assert_eq!(body.sections[4].points.len(), 5);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"melted_point\""));
    }
}
