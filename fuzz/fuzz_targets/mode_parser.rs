//! Fuzz target for MODE parameter parsing

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_engine::ModeChangeSet;
use std::str;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = str::from_utf8(data) {
        if let Ok(set) = ModeChangeSet::parse(input) {
            // Every parsed change must be one of the two views.
            assert_eq!(set.added().count() + set.removed().count(), set.len());
        }
    }
});
