//! weapp-cli version information.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.

/// The weapp-cli version string (for example, `0.9.9`).
pub const WEAPP_VERSION: &str = env!("CARGO_PKG_VERSION");
