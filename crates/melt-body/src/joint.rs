//! Joint store entries

use melt_core::{JointId, SessionTime, Vec3};

/// Latest known state of one skeletal joint, in display space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Joint {
    pub id: JointId,
    pub position: Vec3,
    /// Position at the start of the current frame
    pub prev_position: Vec3,
    /// Reported visible by the sensor
    pub seen: bool,
    /// Last time a tracking update named this joint
    pub last_update: Option<SessionTime>,
    /// Updated since the current frame began
    pub new_this_frame: bool,
}

impl Joint {
    pub fn new(id: JointId) -> Self {
        Joint {
            id,
            position: Vec3::ZERO,
            prev_position: Vec3::ZERO,
            seen: false,
            last_update: None,
            new_this_frame: false,
        }
    }

    /// Displacement since the frame began
    pub fn velocity(&self) -> Vec3 {
        self.position - self.prev_position
    }
}

/// Full joint set for one body, indexed by `JointId`
pub fn joint_table() -> [Joint; JointId::COUNT] {
    JointId::ALL.map(Joint::new)
}
