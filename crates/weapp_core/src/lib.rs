//! Provide the canonical vocabulary shared by every part of `weapp-cli`.
//!
//! This crate is intentionally small and dependency-free. It contains:
//! - the registries of supported runtime languages and host platforms,
//! - the `(platform, language)` runtime strategy table used by the test harness,
//! - the well-known file and directory names that make up a weapp project.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, no process handling.
//! - Anything that spawns processes, reads files, or formats output lives in the `weapp-cli` crate.

pub mod conventions;
pub mod lang;
