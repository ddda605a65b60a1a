//! Fuzz target for REST listing normalization
//!
//! Arbitrary bytes as room-list and history bodies. Any JSON value must
//! normalize to a (possibly empty) sequence; only non-JSON may error.

#![no_main]

use campus_proto::{Listing, MessageRecord, RoomSummary};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(listing) = Listing::<RoomSummary>::from_slice(data) {
        let recognized = listing.is_recognized();
        let rooms = listing.into_items();
        assert!(recognized || rooms.is_empty());
    }

    let _ = Listing::<MessageRecord>::from_slice(data).map(Listing::into_items);
});
