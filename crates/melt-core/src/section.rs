//! Body sections - the five anatomical chains that melt independently

use std::fmt;

use crate::JointId;

/// Number of joints in every section chain
pub const CHAIN_LEN: usize = 5;

/// Anatomical group of a skeleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    LeftLeg,
    RightLeg,
    LeftArm,
    RightArm,
    Spine,
}

impl SectionId {
    pub const COUNT: usize = 5;

    pub const ALL: [SectionId; SectionId::COUNT] = [
        SectionId::LeftLeg,
        SectionId::RightLeg,
        SectionId::LeftArm,
        SectionId::RightArm,
        SectionId::Spine,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            SectionId::LeftLeg => "LeftLeg",
            SectionId::RightLeg => "RightLeg",
            SectionId::LeftArm => "LeftArm",
            SectionId::RightArm => "RightArm",
            SectionId::Spine => "Spine",
        }
    }

    /// Joint chain for this section.
    ///
    /// Limbs run from the extremity to the root; the spine runs from its
    /// base to the head. The melt percentage is measured along this order.
    pub fn chain(self) -> [JointId; CHAIN_LEN] {
        match self {
            SectionId::LeftLeg => [
                JointId::FootLeft,
                JointId::AnkleLeft,
                JointId::KneeLeft,
                JointId::HipLeft,
                JointId::SpineBase,
            ],
            SectionId::RightLeg => [
                JointId::FootRight,
                JointId::AnkleRight,
                JointId::KneeRight,
                JointId::HipRight,
                JointId::SpineBase,
            ],
            SectionId::LeftArm => [
                JointId::HandTipLeft,
                JointId::HandLeft,
                JointId::WristLeft,
                JointId::ElbowLeft,
                JointId::ShoulderLeft,
            ],
            SectionId::RightArm => [
                JointId::HandTipRight,
                JointId::HandRight,
                JointId::WristRight,
                JointId::ElbowRight,
                JointId::ShoulderRight,
            ],
            SectionId::Spine => [
                JointId::SpineBase,
                JointId::SpineMid,
                JointId::SpineShoulder,
                JointId::Neck,
                JointId::Head,
            ],
        }
    }

    pub fn is_leg(self) -> bool {
        matches!(self, SectionId::LeftLeg | SectionId::RightLeg)
    }

    pub fn is_arm(self) -> bool {
        matches!(self, SectionId::LeftArm | SectionId::RightArm)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limb_chains_end_at_root() {
        assert_eq!(SectionId::LeftLeg.chain()[4], JointId::SpineBase);
        assert_eq!(SectionId::RightLeg.chain()[4], JointId::SpineBase);
        assert_eq!(SectionId::LeftArm.chain()[4], JointId::ShoulderLeft);
        assert_eq!(SectionId::RightArm.chain()[0], JointId::HandTipRight);
        assert_eq!(SectionId::Spine.chain()[0], JointId::SpineBase);
        assert_eq!(SectionId::Spine.chain()[4], JointId::Head);
    }

    #[test]
    fn test_section_kinds() {
        let legs = SectionId::ALL.iter().filter(|s| s.is_leg()).count();
        let arms = SectionId::ALL.iter().filter(|s| s.is_arm()).count();
        assert_eq!(legs, 2);
        assert_eq!(arms, 2);
        assert!(!SectionId::Spine.is_leg() && !SectionId::Spine.is_arm());
    }
}
