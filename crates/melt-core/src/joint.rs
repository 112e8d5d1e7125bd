//! Skeletal joint vocabulary
//!
//! The 25 joints reported by a Kinect V2 body frame, in sensor order.
//! Wire names are the PascalCase strings used in tracking addresses.

use std::fmt;

/// Joint identifier for a tracked body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JointId {
    // Spine
    SpineBase,
    SpineMid,
    SpineShoulder,
    Neck,
    Head,

    // Left arm
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    HandTipLeft,
    ThumbLeft,

    // Right arm
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HandTipRight,
    ThumbRight,

    // Left leg
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,

    // Right leg
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
}

impl JointId {
    /// Number of joints
    pub const COUNT: usize = 25;

    /// All joints in sensor order; `ALL[j as usize] == j`
    pub const ALL: [JointId; JointId::COUNT] = [
        JointId::SpineBase,
        JointId::SpineMid,
        JointId::SpineShoulder,
        JointId::Neck,
        JointId::Head,
        JointId::ShoulderLeft,
        JointId::ElbowLeft,
        JointId::WristLeft,
        JointId::HandLeft,
        JointId::HandTipLeft,
        JointId::ThumbLeft,
        JointId::ShoulderRight,
        JointId::ElbowRight,
        JointId::WristRight,
        JointId::HandRight,
        JointId::HandTipRight,
        JointId::ThumbRight,
        JointId::HipLeft,
        JointId::KneeLeft,
        JointId::AnkleLeft,
        JointId::FootLeft,
        JointId::HipRight,
        JointId::KneeRight,
        JointId::AnkleRight,
        JointId::FootRight,
    ];

    /// Index into a per-skeleton joint array
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire name used in `/bodies/{id}/joints/{name}`
    pub fn name(self) -> &'static str {
        match self {
            JointId::SpineBase => "SpineBase",
            JointId::SpineMid => "SpineMid",
            JointId::SpineShoulder => "SpineShoulder",
            JointId::Neck => "Neck",
            JointId::Head => "Head",
            JointId::ShoulderLeft => "ShoulderLeft",
            JointId::ElbowLeft => "ElbowLeft",
            JointId::WristLeft => "WristLeft",
            JointId::HandLeft => "HandLeft",
            JointId::HandTipLeft => "HandTipLeft",
            JointId::ThumbLeft => "ThumbLeft",
            JointId::ShoulderRight => "ShoulderRight",
            JointId::ElbowRight => "ElbowRight",
            JointId::WristRight => "WristRight",
            JointId::HandRight => "HandRight",
            JointId::HandTipRight => "HandTipRight",
            JointId::ThumbRight => "ThumbRight",
            JointId::HipLeft => "HipLeft",
            JointId::KneeLeft => "KneeLeft",
            JointId::AnkleLeft => "AnkleLeft",
            JointId::FootLeft => "FootLeft",
            JointId::HipRight => "HipRight",
            JointId::KneeRight => "KneeRight",
            JointId::AnkleRight => "AnkleRight",
            JointId::FootRight => "FootRight",
        }
    }

    /// Look up a joint by its wire name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<JointId> {
        JointId::ALL.iter().copied().find(|j| j.name() == name)
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
