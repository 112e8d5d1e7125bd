//! Touch detection between tracked bodies

use melt_body::Skeleton;
use melt_core::{BodyColor, Vec3};

use crate::DEFAULT_TOUCHING_THRESHOLD_BASE;

/// Melt rate for untouched bodies, per second of frame time
pub const BASE_MELT_RATE: f32 = 0.1;
/// Melt rate after touching a differently colored body, per second
pub const ACCELERATED_MELT_RATE: f32 = 0.4;

/// What touch detection decided this frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchReport {
    /// Ordered pairs of same-colored bodies in contact
    pub healing_contacts: usize,
    /// Ordered pairs of differently colored bodies in contact
    pub melting_contacts: usize,
    /// Bodies touching their own hands
    pub self_touches: usize,
}

/// The inputs one body contributes to detection
#[derive(Clone, Copy, Debug)]
struct Probe {
    color: BodyColor,
    threshold: f32,
    hand_left: Vec3,
    hand_right: Vec3,
}

/// Per-body result, applied after all pairs are evaluated
#[derive(Clone, Copy, Debug, Default)]
struct Outcome {
    has_same_color: bool,
    restoring: bool,
    accelerated: bool,
}

/// Proximity and color rules
#[derive(Clone, Copy, Debug)]
pub struct TouchDetector {
    threshold_base: f32,
}

impl Default for TouchDetector {
    fn default() -> Self {
        Self::new(DEFAULT_TOUCHING_THRESHOLD_BASE)
    }
}

impl TouchDetector {
    pub fn new(threshold_base: f32) -> Self {
        TouchDetector { threshold_base }
    }

    pub fn threshold_base(&self) -> f32 {
        self.threshold_base
    }

    pub fn set_threshold_base(&mut self, threshold_base: f32) {
        self.threshold_base = threshold_base;
    }

    /// Hand distance under which `skeleton` counts as touching
    pub fn threshold(&self, skeleton: &Skeleton) -> f32 {
        skeleton.scale / self.threshold_base
    }

    /// Re-evaluate `restoring`, `melting_speed` and `has_same_color` for
    /// every body from scratch. `dt` is the last frame's duration in seconds.
    pub fn detect<'a, I>(&self, bodies: I, dt: f32) -> TouchReport
    where
        I: IntoIterator<Item = &'a mut Skeleton>,
    {
        let mut bodies: Vec<&mut Skeleton> = bodies.into_iter().collect();
        let probes: Vec<Probe> = bodies
            .iter()
            .map(|s| Probe {
                color: s.color,
                threshold: self.threshold(s),
                hand_left: s.hand_left(),
                hand_right: s.hand_right(),
            })
            .collect();

        let mut report = TouchReport::default();
        let mut outcomes = vec![Outcome::default(); probes.len()];

        for (i, a) in probes.iter().enumerate() {
            outcomes[i].has_same_color = probes
                .iter()
                .enumerate()
                .any(|(j, b)| i != j && a.color == b.color);
        }

        for (i, a) in probes.iter().enumerate() {
            for (j, b) in probes.iter().enumerate() {
                if i == j || !hands_touch(a, b, a.threshold) {
                    continue;
                }
                if a.color == b.color {
                    outcomes[i].restoring = true;
                    outcomes[j].restoring = true;
                    report.healing_contacts += 1;
                } else {
                    outcomes[i].accelerated = true;
                    outcomes[j].accelerated = true;
                    report.melting_contacts += 1;
                }
            }

            if a.hand_right.distance(&a.hand_left) < a.threshold {
                if outcomes[i].has_same_color {
                    outcomes[i].accelerated = true;
                } else {
                    outcomes[i].restoring = true;
                }
                report.self_touches += 1;
            }
        }

        for (skeleton, outcome) in bodies.iter_mut().zip(&outcomes) {
            skeleton.has_same_color = outcome.has_same_color;
            skeleton.restoring = outcome.restoring;
            skeleton.melting_speed = if outcome.accelerated {
                dt * ACCELERATED_MELT_RATE
            } else {
                dt * BASE_MELT_RATE
            };
        }

        report
    }
}

/// Any of the four hand pairings within `threshold`
fn hands_touch(a: &Probe, b: &Probe, threshold: f32) -> bool {
    a.hand_left.distance(&b.hand_left) < threshold
        || a.hand_right.distance(&b.hand_right) < threshold
        || a.hand_left.distance(&b.hand_right) < threshold
        || a.hand_right.distance(&b.hand_left) < threshold
}
