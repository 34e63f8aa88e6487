//! Fuzz target for line framing and classification
//!
//! Feeds arbitrary bytes through the framer and classifies every line it
//! produces. Neither step may panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_engine::{Line, LineFramer};

fuzz_target!(|data: &[u8]| {
    let mut framer = LineFramer::new(encoding_rs::UTF_8);
    framer.extend(data);
    while let Some(line) = framer.next_line() {
        if let Ok(line) = line {
            let _ = Line::classify(&line);
        }
    }
});
