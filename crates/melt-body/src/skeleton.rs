//! Skeleton aggregate - joints, sections and the staged melt rules

use std::time::Duration;

use melt_core::{map_range, BodyColor, JointId, SectionId, SessionTime, Vec3};

use crate::{joint_table, BodySection, Joint};

/// Sensor depth range (meters) mapped onto the display scale range
pub const DEPTH_NEAR: f32 = 0.0;
pub const DEPTH_FAR: f32 = 4.0;
/// Display scale at `DEPTH_NEAR` and `DEPTH_FAR`; nearer bodies draw larger
pub const SCALE_NEAR: f32 = 1000.0;
pub const SCALE_FAR: f32 = 200.0;

/// Restore rate, in chain share per second
pub const RESTORE_RATE: f32 = 0.5;

/// Starting rates before the first frame sets them from frame time
pub const INITIAL_MELTING_SPEED: f32 = 0.002;
pub const INITIAL_RESTORING_SPEED: f32 = 0.01;

/// Restoring: a stage regrows once the previous stage is past this share
pub const RESTORE_GATE: f32 = 0.9;
/// Melting: arms start once the spine is below this share
pub const ARM_MELT_GATE: f32 = 0.5;
/// Melting: legs start once the spine is below this share
pub const LEG_MELT_GATE: f32 = 0.1;
/// Melting: limbs stop dissolving at this share
pub const LIMB_MELT_FLOOR: f32 = 0.05;

/// Display surface the figures are placed on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl Viewport {
    /// Bodies are centered horizontally, with the sensor origin in the lower
    /// part of the view
    pub fn origin(&self) -> Vec3 {
        Vec3::new(self.width / 2.0, self.height * 3.0 / 5.0, 0.0)
    }
}

/// Display scale for a sensor depth, unclamped
pub fn scale_for_depth(depth: f32) -> f32 {
    map_range(depth, DEPTH_NEAR, DEPTH_FAR, SCALE_NEAR, SCALE_FAR)
}

/// One tracked body
#[derive(Clone, Debug)]
pub struct Skeleton {
    joints: [Joint; JointId::COUNT],
    sections: [BodySection; SectionId::COUNT],
    viewport: Viewport,

    /// Assigned display color
    pub color: BodyColor,
    /// Display scale of the most recent joint update
    pub scale: f32,
    /// Regrowing instead of melting
    pub restoring: bool,
    /// Melt amount applied per frame
    pub melting_speed: f32,
    /// Regrow amount applied per frame
    pub restoring_speed: f32,
    /// Another tracked body shares this color
    pub has_same_color: bool,

    first_seen: Option<SessionTime>,
    last_seen: SessionTime,
}

impl Skeleton {
    /// Empty skeleton; joints sit at the sensor origin, unseen
    pub fn new(color: BodyColor, viewport: Viewport) -> Self {
        Skeleton {
            joints: joint_table(),
            sections: SectionId::ALL.map(BodySection::new),
            viewport,
            color,
            scale: 0.0,
            restoring: false,
            melting_speed: INITIAL_MELTING_SPEED,
            restoring_speed: INITIAL_RESTORING_SPEED,
            has_same_color: false,
            first_seen: None,
            last_seen: SessionTime::ZERO,
        }
    }

    /// New skeleton with every joint pre-populated through the ingest path
    /// at a zero sensor position, unseen
    pub fn build(color: BodyColor, viewport: Viewport, now: SessionTime) -> Self {
        let mut skeleton = Skeleton::new(color, viewport);
        for joint in JointId::ALL {
            skeleton.add_or_update_joint(joint, Vec3::ZERO, false, now);
        }
        skeleton
    }

    /// Store a sensor-space joint observation in display space
    pub fn add_or_update_joint(
        &mut self,
        joint: JointId,
        position: Vec3,
        seen: bool,
        now: SessionTime,
    ) {
        self.scale = scale_for_depth(position.z);

        let origin = self.viewport.origin();
        let entry = &mut self.joints[joint.index()];
        entry.position = position * self.scale + origin;
        entry.seen = seen;
        entry.new_this_frame = true;
        entry.last_update = Some(now);

        if self.first_seen.is_none() {
            self.first_seen = Some(now);
        }
        self.last_seen = now;
    }

    /// Start a frame: remember positions and clear the per-frame flags
    pub fn begin_frame(&mut self) {
        for joint in &mut self.joints {
            joint.prev_position = joint.position;
            joint.new_this_frame = false;
        }
    }

    /// Rebuild section chains from the joints and advance the melt state.
    ///
    /// `dt` is the previous frame's duration in seconds.
    pub fn update(&mut self, dt: f32) {
        self.rebuild_sections();
        self.restoring_speed = dt * RESTORE_RATE;

        if self.restoring {
            self.restore_step();
        } else {
            self.melt_step();
        }
    }

    /// Legs, then spine, then arms
    fn restore_step(&mut self) {
        let speed = self.restoring_speed;
        self.grow(SectionId::LeftLeg, speed);
        self.grow(SectionId::RightLeg, speed);

        let legs_ready = self.percent(SectionId::LeftLeg) > RESTORE_GATE
            && self.percent(SectionId::RightLeg) > RESTORE_GATE;
        self.grow(SectionId::Spine, if legs_ready { speed } else { 0.0 });

        let spine_ready = self.percent(SectionId::Spine) > RESTORE_GATE;
        let arm_speed = if spine_ready { speed } else { 0.0 };
        self.grow(SectionId::RightArm, arm_speed);
        self.grow(SectionId::LeftArm, arm_speed);
    }

    /// Spine, then arms, then legs
    fn melt_step(&mut self) {
        let speed = self.melting_speed;
        self.grow(SectionId::Spine, -speed);

        let arms_melt = self.percent(SectionId::Spine) < ARM_MELT_GATE
            && self.percent(SectionId::RightArm) > LIMB_MELT_FLOOR;
        let arm_speed = if arms_melt { -speed } else { 0.0 };
        self.grow(SectionId::RightArm, arm_speed);
        self.grow(SectionId::LeftArm, arm_speed);

        let legs_melt = self.percent(SectionId::Spine) < LEG_MELT_GATE
            && self.percent(SectionId::LeftLeg) > LIMB_MELT_FLOOR;
        let leg_speed = if legs_melt { -speed } else { 0.0 };
        self.grow(SectionId::LeftLeg, leg_speed);
        self.grow(SectionId::RightLeg, leg_speed);
    }

    fn rebuild_sections(&mut self) {
        let joints = &self.joints;
        for section in &mut self.sections {
            let chain = section.id().chain();
            section
                .line
                .set_vertices(chain.iter().map(|j| joints[j.index()].position.xy()));
        }
    }

    fn grow(&mut self, id: SectionId, amount: f32) {
        self.sections[id.index()].update_percent(amount);
    }

    fn percent(&self, id: SectionId) -> f32 {
        self.sections[id.index()].percent_left
    }

    /// Reform the whole body at once and hold it in the restoring state
    pub fn restore_full(&mut self) {
        for section in &mut self.sections {
            section.percent_left = 1.0;
        }
        self.restoring = true;
    }

    pub fn joint(&self, id: JointId) -> &Joint {
        &self.joints[id.index()]
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn section(&self, id: SectionId) -> &BodySection {
        &self.sections[id.index()]
    }

    pub fn section_mut(&mut self, id: SectionId) -> &mut BodySection {
        &mut self.sections[id.index()]
    }

    pub fn sections(&self) -> &[BodySection] {
        &self.sections
    }

    pub fn hand_left(&self) -> Vec3 {
        self.joint(JointId::HandLeft).position
    }

    pub fn hand_right(&self) -> Vec3 {
        self.joint(JointId::HandRight).position
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn first_seen(&self) -> Option<SessionTime> {
        self.first_seen
    }

    pub fn last_seen(&self) -> SessionTime {
        self.last_seen
    }

    /// No update for longer than `timeout`
    pub fn is_stale(&self, now: SessionTime, timeout: Duration) -> bool {
        now - self.last_seen > timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Sensor-space standing pose, 2 m from the sensor, Y pointing down
    fn standing_pose(z: f32) -> Vec<(JointId, Vec3)> {
        use JointId::*;
        let at = |x: f32, y: f32| Vec3::new(x, y, z);
        vec![
            (SpineBase, at(0.0, 0.0)),
            (SpineMid, at(0.0, -0.3)),
            (SpineShoulder, at(0.0, -0.55)),
            (Neck, at(0.0, -0.62)),
            (Head, at(0.0, -0.75)),
            (ShoulderLeft, at(-0.18, -0.52)),
            (ElbowLeft, at(-0.3, -0.3)),
            (WristLeft, at(-0.35, -0.08)),
            (HandLeft, at(-0.36, -0.02)),
            (HandTipLeft, at(-0.37, 0.05)),
            (ThumbLeft, at(-0.33, -0.02)),
            (ShoulderRight, at(0.18, -0.52)),
            (ElbowRight, at(0.3, -0.3)),
            (WristRight, at(0.35, -0.08)),
            (HandRight, at(0.36, -0.02)),
            (HandTipRight, at(0.37, 0.05)),
            (ThumbRight, at(0.33, -0.02)),
            (HipLeft, at(-0.1, 0.02)),
            (KneeLeft, at(-0.12, 0.45)),
            (AnkleLeft, at(-0.12, 0.85)),
            (FootLeft, at(-0.1, 0.9)),
            (HipRight, at(0.1, 0.02)),
            (KneeRight, at(0.12, 0.45)),
            (AnkleRight, at(0.12, 0.85)),
            (FootRight, at(0.1, 0.9)),
        ]
    }

    fn posed_skeleton() -> Skeleton {
        let now = SessionTime::from_millis(10);
        let mut skeleton = Skeleton::build(BodyColor::Red, Viewport::default(), now);
        for (joint, position) in standing_pose(2.0) {
            skeleton.add_or_update_joint(joint, position, true, now);
        }
        skeleton
    }

    #[test]
    fn test_build_prepopulates_all_joints() {
        let now = SessionTime::from_millis(500);
        let skeleton = Skeleton::build(BodyColor::Blue, Viewport::default(), now);
        assert_eq!(skeleton.joints().len(), JointId::COUNT);
        for joint in skeleton.joints() {
            assert!(!joint.seen);
            assert_eq!(joint.position, Viewport::default().origin());
            assert_eq!(joint.last_update, Some(now));
        }
        assert_eq!(skeleton.first_seen(), Some(now));
        assert_eq!(skeleton.last_seen(), now);
        assert_eq!(skeleton.scale, SCALE_NEAR);
    }

    #[test]
    fn test_joint_scaling_and_offset() {
        let mut skeleton = Skeleton::new(BodyColor::Red, Viewport::default());
        let now = SessionTime::from_millis(20);
        skeleton.add_or_update_joint(JointId::HandLeft, Vec3::new(0.5, -0.25, 2.0), true, now);

        assert!((skeleton.scale - 600.0).abs() < 1e-3);
        let hand = skeleton.joint(JointId::HandLeft);
        assert!(hand.seen);
        assert!(hand.new_this_frame);
        assert!((hand.position.x - (960.0 + 300.0)).abs() < 1e-3);
        assert!((hand.position.y - (648.0 - 150.0)).abs() < 1e-3);
        assert!((hand.position.z - 1200.0).abs() < 1e-3);
    }

    #[test]
    fn test_depth_outside_sensor_range_is_not_clamped() {
        assert!((scale_for_depth(6.0) - (-200.0)).abs() < 1e-3);
        assert!((scale_for_depth(-0.5) - 1100.0).abs() < 1e-3);
    }

    #[test]
    fn test_first_seen_only_set_once() {
        let mut skeleton = Skeleton::new(BodyColor::Red, Viewport::default());
        skeleton.add_or_update_joint(JointId::Head, Vec3::ZERO, true, SessionTime::from_millis(1));
        skeleton.add_or_update_joint(JointId::Head, Vec3::ZERO, true, SessionTime::from_millis(9));
        assert_eq!(skeleton.first_seen(), Some(SessionTime::from_millis(1)));
        assert_eq!(skeleton.last_seen(), SessionTime::from_millis(9));
    }

    #[test]
    fn test_begin_frame_tracks_previous_position() {
        let mut skeleton = posed_skeleton();
        skeleton.begin_frame();
        let before = skeleton.joint(JointId::Head).position;
        assert!(!skeleton.joint(JointId::Head).new_this_frame);

        skeleton.add_or_update_joint(JointId::Head, Vec3::new(0.1, -0.75, 2.0), true, SessionTime::from_millis(30));
        let head = skeleton.joint(JointId::Head);
        assert_eq!(head.prev_position, before);
        assert!(head.new_this_frame);
        assert!((head.velocity().x - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_sections_follow_joints() {
        let mut skeleton = posed_skeleton();
        // Hold the melt so the spine keeps its full length
        skeleton.melting_speed = 0.0;
        skeleton.update(0.0);
        let spine = skeleton.section(SectionId::Spine);
        assert_eq!(spine.line.len(), 5);
        assert_eq!(spine.line.vertices()[0], skeleton.joint(JointId::SpineBase).position.xy());
        assert_eq!(spine.line.vertices()[4], skeleton.joint(JointId::Head).position.xy());
        let arm = skeleton.section(SectionId::LeftArm);
        assert_eq!(arm.line.vertices()[0], skeleton.joint(JointId::HandTipLeft).position.xy());
    }

    #[test]
    fn test_melt_starts_with_spine_only() {
        let mut skeleton = posed_skeleton();
        skeleton.melting_speed = 0.1;
        skeleton.update(1.0 / 60.0);
        assert!((skeleton.section(SectionId::Spine).percent_left - 0.9).abs() < 1e-5);
        for id in [SectionId::LeftArm, SectionId::RightArm, SectionId::LeftLeg, SectionId::RightLeg] {
            assert_eq!(skeleton.section(id).percent_left, 1.0);
        }
    }

    #[test]
    fn test_melt_stages() {
        let mut skeleton = posed_skeleton();
        skeleton.melting_speed = 0.05;
        for _ in 0..200 {
            skeleton.update(1.0 / 60.0);
        }
        assert_eq!(skeleton.section(SectionId::Spine).percent_left, 0.0);
        // Limbs stop at the floor, give or take one step
        for id in [SectionId::LeftArm, SectionId::RightArm, SectionId::LeftLeg, SectionId::RightLeg] {
            let p = skeleton.section(id).percent_left;
            assert!(p <= LIMB_MELT_FLOOR + 1e-5 && p >= 0.0, "{id} at {p}");
        }
    }

    #[test]
    fn test_restore_waits_for_both_legs() {
        let mut skeleton = posed_skeleton();
        skeleton.section_mut(SectionId::Spine).percent_left = 0.0;
        skeleton.section_mut(SectionId::LeftLeg).percent_left = 1.0;
        skeleton.section_mut(SectionId::RightLeg).percent_left = 0.2;
        skeleton.restoring = true;

        skeleton.update(0.1);
        assert_eq!(skeleton.section(SectionId::Spine).percent_left, 0.0);
        assert!((skeleton.section(SectionId::RightLeg).percent_left - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_restore_full() {
        let mut skeleton = posed_skeleton();
        skeleton.melting_speed = 0.3;
        for _ in 0..10 {
            skeleton.update(0.016);
        }
        skeleton.restore_full();
        assert!(skeleton.restoring);
        assert!(skeleton.sections().iter().all(|s| s.percent_left == 1.0));
    }

    #[test]
    fn test_staleness() {
        let skeleton = Skeleton::build(BodyColor::Red, Viewport::default(), SessionTime::from_millis(1000));
        let timeout = Duration::from_secs(2);
        assert!(!skeleton.is_stale(SessionTime::from_millis(3000), timeout));
        assert!(skeleton.is_stale(SessionTime::from_millis(3001), timeout));
    }

    proptest! {
        #[test]
        fn prop_restore_order(
            start in proptest::collection::vec(0.0f32..=1.0, SectionId::COUNT),
            dts in proptest::collection::vec(0.0f32..0.2, 1..120),
        ) {
            let mut skeleton = posed_skeleton();
            for (id, p) in SectionId::ALL.iter().zip(&start) {
                skeleton.section_mut(*id).percent_left = *p;
            }
            skeleton.restoring = true;

            for dt in dts {
                let legs_before = (
                    skeleton.section(SectionId::LeftLeg).percent_left,
                    skeleton.section(SectionId::RightLeg).percent_left,
                );
                let spine_before = skeleton.section(SectionId::Spine).percent_left;
                let arms_before = (
                    skeleton.section(SectionId::LeftArm).percent_left,
                    skeleton.section(SectionId::RightArm).percent_left,
                );
                skeleton.update(dt);

                let spine_after = skeleton.section(SectionId::Spine).percent_left;
                if spine_after > spine_before {
                    // Legs were grown first this frame, so check their new values
                    prop_assert!(skeleton.section(SectionId::LeftLeg).percent_left > RESTORE_GATE);
                    prop_assert!(skeleton.section(SectionId::RightLeg).percent_left > RESTORE_GATE);
                }
                let arms_after = (
                    skeleton.section(SectionId::LeftArm).percent_left,
                    skeleton.section(SectionId::RightArm).percent_left,
                );
                if arms_after.0 > arms_before.0 || arms_after.1 > arms_before.1 {
                    prop_assert!(spine_after > RESTORE_GATE);
                }
                // Restoring never melts anything
                prop_assert!(skeleton.section(SectionId::LeftLeg).percent_left >= legs_before.0);
                prop_assert!(skeleton.section(SectionId::RightLeg).percent_left >= legs_before.1);
                prop_assert!(spine_after >= spine_before);
            }
        }

        #[test]
        fn prop_melt_order(
            speed in 0.0f32..0.2,
            frames in 1usize..200,
        ) {
            let mut skeleton = posed_skeleton();
            skeleton.melting_speed = speed;
            for _ in 0..frames {
                let arms_before = skeleton.section(SectionId::RightArm).percent_left;
                let legs_before = skeleton.section(SectionId::LeftLeg).percent_left;
                skeleton.update(1.0 / 60.0);

                let spine = skeleton.section(SectionId::Spine).percent_left;
                if skeleton.section(SectionId::RightArm).percent_left < arms_before {
                    prop_assert!(spine < ARM_MELT_GATE);
                }
                if skeleton.section(SectionId::LeftLeg).percent_left < legs_before {
                    prop_assert!(spine < LEG_MELT_GATE);
                }
            }
        }
    }
}
