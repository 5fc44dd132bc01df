//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser
//!
//! Parses arbitrary text as a config file, then resolves every provider
//! section against its adapter defaults.

#![no_main]

use libfuzzer_sys::fuzz_target;
use replyai_core::provider::{NETWORK_PROVIDERS, create_provider};

fn no_env(_: &str) -> Option<String> {
    None
}

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = replyai_config::AppConfig::parse(s) else {
        return;
    };
    for id in NETWORK_PROVIDERS {
        let _ = create_provider(id, &config.provider(id), no_env);
    }
});
