//! Fuzz target for response normalization and failure classification.
//!
//! Run with: cargo +nightly fuzz run fuzz_normalize
//!
//! Whatever a backend sends, normalization must yield exactly three
//! suggestions and classification must not panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use replyai_core::provider::{RawFailure, SUGGESTION_COUNT, classify_failure, gemini, normalize};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    let suggestions = normalize(Some(text.as_ref()));
    assert_eq!(suggestions.len(), SUGGESTION_COUNT);

    let err = classify_failure(&gemini::INFO, RawFailure::new(text.into_owned()));
    assert_eq!(err.provider(), "gemini");
});
