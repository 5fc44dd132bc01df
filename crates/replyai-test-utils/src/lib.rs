#![deny(unsafe_code)]

//! Shared test utilities for the reply suggester workspace.
//!
//! Provides reusable fixtures, config builders, a throwaway server and
//! tracing helpers so that individual crate tests stay concise.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! replyai-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod fixtures;
pub mod server;
pub mod tracing_setup;
