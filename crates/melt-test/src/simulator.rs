//! Installation simulator - frame-stepped bodies on a simulated clock

use std::collections::BTreeMap;
use std::time::Duration;

use melt_core::SessionTime;
use melt_session::{SessionConfig, TickReport, TrackingSession};
use melt_time::{Clock, SimulatedClock};
use melt_wire::{bundle, decode_messages, encode_packet, OscMessage, TrackingState};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::pose::Pose;

/// A body the simulator reports to the session
#[derive(Clone, Debug)]
pub struct SimulatedBody {
    pub pose: Pose,
    pub state: TrackingState,
    /// Hidden bodies send nothing, as if the sensor lost them
    pub visible: bool,
}

impl SimulatedBody {
    pub fn new(pose: Pose) -> Self {
        SimulatedBody {
            pose,
            state: TrackingState::Tracked,
            visible: true,
        }
    }
}

/// Feeds simulated bodies into a tracking session, one bundle per frame
pub struct InstallationSimulator {
    session: TrackingSession,
    clock: SimulatedClock,
    rng: StdRng,
    bodies: BTreeMap<String, SimulatedBody>,
    /// Per-axis pose noise in meters
    jitter: f32,
    last_frame: Vec<OscMessage>,
    codec_errors: u64,
}

impl InstallationSimulator {
    /// Seeded session at 60 fps
    pub fn new(seed: u64) -> Self {
        Self::with_config(SessionConfig::seeded(seed), SimulatedClock::at_fps(60))
    }

    pub fn with_config(config: SessionConfig, clock: SimulatedClock) -> Self {
        let rng = StdRng::seed_from_u64(config.seed.unwrap_or(0));
        InstallationSimulator {
            session: TrackingSession::with_config(config),
            clock,
            rng,
            bodies: BTreeMap::new(),
            jitter: 0.0,
            last_frame: Vec::new(),
            codec_errors: 0,
        }
    }

    pub fn with_jitter(mut self, amount: f32) -> Self {
        self.jitter = amount;
        self
    }

    pub fn add_body(&mut self, id: &str, pose: Pose) {
        self.bodies.insert(id.to_string(), SimulatedBody::new(pose));
    }

    pub fn body_mut(&mut self, id: &str) -> Option<&mut SimulatedBody> {
        self.bodies.get_mut(id)
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) {
        if let Some(body) = self.bodies.get_mut(id) {
            body.visible = visible;
        }
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TrackingSession {
        &mut self.session
    }

    pub fn now(&self) -> SessionTime {
        self.clock.now()
    }

    pub fn frame_duration(&self) -> Duration {
        self.clock.step()
    }

    /// Messages the session received in the last frame
    pub fn last_frame(&self) -> &[OscMessage] {
        &self.last_frame
    }

    /// Frames or bundle elements that failed to decode; stays zero unless the codec is broken
    pub fn codec_errors(&self) -> u64 {
        self.codec_errors
    }

    /// Advance one frame
    pub fn step(&mut self) -> TickReport {
        let frame = self.clock.tick();
        self.session.begin_frame();

        let mut messages = Vec::new();
        for (id, body) in &self.bodies {
            if !body.visible {
                continue;
            }
            let pose = body.pose.jittered(&mut self.rng, self.jitter);
            messages.extend(pose.messages(id, body.state));
        }

        // Round-trip through the wire format like a real datagram
        let decoded = encode_packet(&bundle(messages)).and_then(|bytes| decode_messages(&bytes));
        let delivered = match decoded {
            Ok(decoded) => {
                self.codec_errors += decoded.skipped as u64;
                decoded.messages
            }
            Err(_) => {
                self.codec_errors += 1;
                Vec::new()
            }
        };

        for message in &delivered {
            self.session.ingest(message, frame.now);
        }
        self.last_frame = delivered;
        self.session.tick(frame)
    }

    /// Advance `frames` frames and return the last report
    pub fn run(&mut self, frames: usize) -> TickReport {
        let mut report = TickReport::default();
        for _ in 0..frames {
            report = self.step();
        }
        report
    }

    /// Advance until at least `duration` of session time has passed
    pub fn run_for(&mut self, duration: Duration) -> TickReport {
        let step = self.clock.step().max(Duration::from_micros(1));
        let frames = duration.as_micros().div_ceil(step.as_micros()) as usize;
        self.run(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use melt_core::JointId;

    #[test]
    fn test_step_delivers_every_visible_joint() {
        let mut sim = InstallationSimulator::new(1);
        sim.add_body("a", Pose::standing(-1.0, 2.0));
        sim.add_body("b", Pose::standing(1.0, 2.0));
        sim.set_visible("b", false);

        sim.step();
        assert_eq!(sim.last_frame().len(), JointId::COUNT);
        assert_eq!(sim.session().len(), 1);
        assert_eq!(sim.codec_errors(), 0);
    }

    #[test]
    fn test_run_for_covers_duration() {
        let mut sim = InstallationSimulator::with_config(
            SessionConfig::seeded(1),
            SimulatedClock::new(Duration::from_millis(100)),
        );
        sim.run_for(Duration::from_millis(250));
        assert_eq!(sim.now(), SessionTime::from_millis(300));
    }

    #[test]
    fn test_same_seed_same_session() {
        let build = || {
            let mut sim = InstallationSimulator::new(42).with_jitter(0.01);
            sim.add_body("a", Pose::standing(0.0, 2.5));
            sim.run(30);
            sim.session().body("a").map(|b| b.joint(JointId::HandLeft).position)
        };
        assert_eq!(build(), build());
    }
}
