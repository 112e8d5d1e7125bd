#![no_main]

use libfuzzer_sys::fuzz_target;
use melt_record::Recording;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let recording = Recording::parse(text);
    let _ = Recording::parse(&recording.to_text());
});
