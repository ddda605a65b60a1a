//! Fuzz target for ChannelFrame::decode
//!
//! Feeds arbitrary text to the realtime frame decoder to find:
//! - Panics on malformed or deeply nested JSON
//! - Recognized frames that do not survive re-encoding
//!
//! The decoder should NEVER panic. Invalid input returns an error and
//! unknown kinds decode to `Unknown`.

#![no_main]

use campus_proto::ChannelFrame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(frame) = ChannelFrame::decode(text) {
        if frame == ChannelFrame::Unknown {
            return;
        }
        let encoded = frame.encode().expect("decoded frame must encode");
        let again = ChannelFrame::decode(&encoded).expect("encoded frame must decode");
        assert_eq!(frame, again);
    }
});
