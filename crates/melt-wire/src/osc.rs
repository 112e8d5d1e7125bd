//! OSC packet handling on top of `rosc`
//!
//! Decoding is strict per element. A bundle whose elements do not all
//! decode is walked element by element so the readable ones still arrive.

use melt_core::{MeltError, MeltResult};

pub use rosc::{OscBundle, OscMessage, OscPacket, OscTime, OscType};

/// Largest datagram the receiver accepts
pub const MAX_PACKET_SIZE: usize = 65_507;

/// Time tag meaning "process on receipt"
pub const IMMEDIATELY: OscTime = OscTime {
    seconds: 0,
    fractional: 1,
};

/// Bundle marker, including its terminating NUL
const BUNDLE_TAG: &[u8] = b"#bundle\0";

/// Marker plus the 8-byte time tag
const BUNDLE_HEADER_LEN: usize = 16;

/// Bundles may nest; salvage stops descending past this
const MAX_BUNDLE_DEPTH: usize = 8;

/// Build a message
pub fn message(addr: impl Into<String>, args: Vec<OscType>) -> OscMessage {
    OscMessage {
        addr: addr.into(),
        args,
    }
}

/// Wrap messages in one immediate bundle
pub fn bundle(messages: impl IntoIterator<Item = OscMessage>) -> OscPacket {
    OscPacket::Bundle(OscBundle {
        timetag: IMMEDIATELY,
        content: messages.into_iter().map(OscPacket::Message).collect(),
    })
}

/// Decode one datagram
pub fn decode_packet(buf: &[u8]) -> MeltResult<OscPacket> {
    rosc::decoder::decode_udp(buf)
        .map(|(_, packet)| packet)
        .map_err(|e| MeltError::InvalidPacket(format!("{e:?}")))
}

pub fn encode_packet(packet: &OscPacket) -> MeltResult<Vec<u8>> {
    rosc::encoder::encode(packet).map_err(|e| MeltError::InvalidPacket(format!("{e:?}")))
}

/// Flatten into messages, depth first, in bundle order
pub fn flatten(packet: OscPacket) -> Vec<OscMessage> {
    let mut out = Vec::new();
    collect_messages(packet, &mut out);
    out
}

fn collect_messages(packet: OscPacket, out: &mut Vec<OscMessage>) {
    match packet {
        OscPacket::Message(msg) => out.push(msg),
        OscPacket::Bundle(bundle) => {
            for packet in bundle.content {
                collect_messages(packet, out);
            }
        }
    }
}

/// Numeric argument as f32, converting ints and doubles
pub fn arg_f32(arg: &OscType) -> Option<f32> {
    match arg {
        OscType::Float(v) => Some(*v),
        OscType::Int(v) => Some(*v as f32),
        OscType::Double(v) => Some(*v as f32),
        OscType::Long(v) => Some(*v as f32),
        _ => None,
    }
}

pub fn arg_str(arg: &OscType) -> Option<&str> {
    match arg {
        OscType::String(s) => Some(s),
        _ => None,
    }
}

/// Messages recovered from one datagram
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Decoded {
    pub messages: Vec<OscMessage>,
    /// Bundle elements that could not be decoded
    pub skipped: usize,
}

/// Decode a datagram into messages.
///
/// Fails only when nothing in it is readable; undecodable bundle elements
/// are counted in [`Decoded::skipped`] and their siblings kept.
pub fn decode_messages(buf: &[u8]) -> MeltResult<Decoded> {
    decode_at_depth(buf, 0)
}

fn decode_at_depth(buf: &[u8], depth: usize) -> MeltResult<Decoded> {
    match decode_packet(buf) {
        Ok(packet) => Ok(Decoded {
            messages: flatten(packet),
            skipped: 0,
        }),
        Err(_) if buf.starts_with(BUNDLE_TAG) && buf.len() >= BUNDLE_HEADER_LEN => {
            if depth >= MAX_BUNDLE_DEPTH {
                return Err(MeltError::InvalidPacket("bundle nesting too deep".into()));
            }
            Ok(salvage_bundle(&buf[BUNDLE_HEADER_LEN..], depth))
        }
        Err(e) => Err(e),
    }
}

fn salvage_bundle(mut rest: &[u8], depth: usize) -> Decoded {
    let mut decoded = Decoded::default();
    while !rest.is_empty() {
        let size = match rest.get(..4).and_then(|b| <[u8; 4]>::try_from(b).ok()) {
            Some(prefix) => i32::from_be_bytes(prefix),
            None => {
                decoded.skipped += 1;
                break;
            }
        };
        rest = &rest[4..];
        let size = match usize::try_from(size) {
            Ok(size) if size <= rest.len() => size,
            _ => {
                decoded.skipped += 1;
                break;
            }
        };

        let (element, tail) = rest.split_at(size);
        rest = tail;
        match decode_at_depth(element, depth + 1) {
            Ok(inner) => {
                decoded.messages.extend(inner.messages);
                decoded.skipped += inner.skipped;
            }
            Err(_) => decoded.skipped += 1,
        }
    }
    decoded
}
