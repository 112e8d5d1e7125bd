#![no_main]

use libfuzzer_sys::fuzz_target;
use melt_wire::{decode_messages, decode_packet, encode_packet, flatten, TrackingUpdate};

fuzz_target!(|data: &[u8]| {
    // Salvage must never panic, whatever the bytes
    let _ = decode_messages(data);

    let Ok(packet) = decode_packet(data) else {
        return;
    };

    // Whatever decodes and re-encodes must decode again
    if let Ok(bytes) = encode_packet(&packet) {
        assert!(decode_packet(&bytes).is_ok());
    }

    for message in flatten(packet) {
        let _ = TrackingUpdate::from_message(&message);
    }
});
