//! Tracking messages - OSC joint messages as body updates

use melt_core::{JointId, Vec3};

use crate::{arg_f32, arg_str, message, OscMessage, OscType};

/// Per-joint tracking confidence reported by the sensor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingState {
    Tracked,
    Inferred,
    NotTracked,
    Unknown,
    /// Any token the bridge invents later
    Unrecognized,
}

impl TrackingState {
    pub fn from_token(token: &str) -> Self {
        match token {
            "Tracked" => TrackingState::Tracked,
            "Inferred" => TrackingState::Inferred,
            "NotTracked" => TrackingState::NotTracked,
            "Unknown" => TrackingState::Unknown,
            _ => TrackingState::Unrecognized,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            TrackingState::Tracked => "Tracked",
            TrackingState::Inferred => "Inferred",
            TrackingState::NotTracked => "NotTracked",
            TrackingState::Unknown | TrackingState::Unrecognized => "Unknown",
        }
    }

    /// Only an explicit "not tracked" or "unknown" hides a joint
    pub fn is_seen(self) -> bool {
        !matches!(self, TrackingState::NotTracked | TrackingState::Unknown)
    }
}

/// Routed address of a tracking message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackingAddress<'a> {
    /// `/bodies/{bodyId}/joints/{jointName}`
    Joint { body_id: &'a str, joint_name: &'a str },
    /// `/bodies/{bodyId}/hands/{handId}`
    Hand { body_id: &'a str, hand: &'a str },
}

impl<'a> TrackingAddress<'a> {
    /// Route an address. Anything outside `/bodies/...` yields `None`.
    pub fn parse(address: &'a str) -> Option<Self> {
        let address = address.strip_prefix('/').unwrap_or(address);
        let mut parts = address.split('/');
        let (Some("bodies"), Some(body_id), Some(kind), Some(name)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return None;
        };
        match kind {
            "joints" => Some(TrackingAddress::Joint {
                body_id,
                joint_name: name,
            }),
            "hands" => Some(TrackingAddress::Hand {
                body_id,
                hand: name,
            }),
            _ => None,
        }
    }
}

/// One joint observation for one body, in sensor space
#[derive(Clone, Debug, PartialEq)]
pub struct TrackingUpdate {
    pub body_id: String,
    pub joint: JointId,
    /// Sensor position with Y already pointing down the screen
    pub position: Vec3,
    pub state: TrackingState,
}

impl TrackingUpdate {
    pub fn new(body_id: impl Into<String>, joint: JointId, position: Vec3, state: TrackingState) -> Self {
        TrackingUpdate {
            body_id: body_id.into(),
            joint,
            position,
            state,
        }
    }

    pub fn seen(&self) -> bool {
        self.state.is_seen()
    }

    /// Decode a joint message.
    ///
    /// Returns `None` for other addresses, unknown joint names and messages
    /// whose arguments are missing or mistyped.
    pub fn from_message(msg: &OscMessage) -> Option<Self> {
        let TrackingAddress::Joint {
            body_id,
            joint_name,
        } = TrackingAddress::parse(&msg.addr)?
        else {
            return None;
        };
        let joint = JointId::from_name(joint_name)?;

        let x = arg_f32(msg.args.first()?)?;
        let y = arg_f32(msg.args.get(1)?)?;
        let z = arg_f32(msg.args.get(2)?)?;
        let state = TrackingState::from_token(arg_str(msg.args.get(3)?)?);

        Some(TrackingUpdate {
            body_id: body_id.to_string(),
            joint,
            position: Vec3::new(x, -y, z),
            state,
        })
    }

    /// Encode as the bridge would send it
    pub fn to_message(&self) -> OscMessage {
        message(
            format!("/bodies/{}/joints/{}", self.body_id, self.joint.name()),
            vec![
                OscType::Float(self.position.x),
                OscType::Float(-self.position.y),
                OscType::Float(self.position.z),
                OscType::String(self.state.token().to_string()),
            ],
        )
    }
}
