//! Synthetic body poses

use melt_core::{JointId, Vec3};
use melt_wire::{OscMessage, TrackingState, TrackingUpdate};
use rand::rngs::StdRng;
use rand::Rng;

/// Sensor-space joint positions for one body (meters, Y up)
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    joints: [Vec3; JointId::COUNT],
}

impl Pose {
    /// Upright body, arms hanging, centered at `center_x` and `depth`
    pub fn standing(center_x: f32, depth: f32) -> Self {
        let mut joints = [Vec3::ZERO; JointId::COUNT];
        for joint in JointId::ALL {
            let (x, y) = standing_offset(joint);
            joints[joint.index()] = Vec3::new(center_x + x, y, depth);
        }
        Pose { joints }
    }

    pub fn joint(&self, id: JointId) -> Vec3 {
        self.joints[id.index()]
    }

    pub fn set_joint(&mut self, id: JointId, position: Vec3) {
        self.joints[id.index()] = position;
    }

    /// Shift the whole body
    pub fn translate(&mut self, by: Vec3) {
        for joint in &mut self.joints {
            *joint = *joint + by;
        }
    }

    /// Copy with every joint displaced by up to `amount` on each axis
    pub fn jittered(&self, rng: &mut StdRng, amount: f32) -> Pose {
        if amount <= 0.0 {
            return self.clone();
        }
        let mut pose = self.clone();
        for joint in &mut pose.joints {
            *joint = *joint
                + Vec3::new(
                    rng.gen_range(-amount..=amount),
                    rng.gen_range(-amount..=amount),
                    rng.gen_range(-amount..=amount),
                );
        }
        pose
    }

    /// One tracking message per joint, as the sensor bridge sends them
    pub fn messages(&self, body_id: &str, state: TrackingState) -> Vec<OscMessage> {
        JointId::ALL
            .iter()
            .map(|&joint| {
                let p = self.joint(joint);
                // Updates carry display-oriented Y; the wire carries sensor Y
                TrackingUpdate::new(body_id, joint, Vec3::new(p.x, -p.y, p.z), state).to_message()
            })
            .collect()
    }
}

fn standing_offset(joint: JointId) -> (f32, f32) {
    use JointId::*;
    match joint {
        SpineBase => (0.0, 0.0),
        SpineMid => (0.0, 0.3),
        SpineShoulder => (0.0, 0.5),
        Neck => (0.0, 0.58),
        Head => (0.0, 0.72),
        ShoulderLeft => (-0.2, 0.48),
        ElbowLeft => (-0.3, 0.22),
        WristLeft => (-0.35, 0.0),
        HandLeft => (-0.36, -0.06),
        HandTipLeft => (-0.37, -0.14),
        ThumbLeft => (-0.33, -0.08),
        ShoulderRight => (0.2, 0.48),
        ElbowRight => (0.3, 0.22),
        WristRight => (0.35, 0.0),
        HandRight => (0.36, -0.06),
        HandTipRight => (0.37, -0.14),
        ThumbRight => (0.33, -0.08),
        HipLeft => (-0.1, -0.05),
        KneeLeft => (-0.12, -0.45),
        AnkleLeft => (-0.13, -0.85),
        FootLeft => (-0.15, -0.9),
        HipRight => (0.1, -0.05),
        KneeRight => (0.12, -0.45),
        AnkleRight => (0.13, -0.85),
        FootRight => (0.15, -0.9),
    }
}
