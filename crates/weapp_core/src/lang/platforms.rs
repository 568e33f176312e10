//! Define the host platforms the test harness can drive.
//!
//! The spellings match `std::env::consts::OS`, so [`current`] is a plain registry lookup.
//!
//! ## Examples
//! ```rust
//! use weapp_core::lang::platforms::{self, PlatformId};
//!
//! assert_eq!(platforms::from_str("linux"), Some(PlatformId::Linux));
//! assert_eq!(platforms::from_str("darwin"), Some(PlatformId::MacOs));
//! assert_eq!(platforms::from_str("freebsd"), None);
//! ```

use super::registry::{self, LangItemInfo};

/// Stable identifier for supported host platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlatformId {
    Windows,
    Linux,
    MacOs,
}

/// Metadata entry for a platform.
pub type PlatformInfo = LangItemInfo<PlatformId>;

/// Registry of supported platforms.
pub const PLATFORMS: &[PlatformInfo] = &[
    PlatformInfo {
        id: PlatformId::Windows,
        canonical: "windows",
        aliases: &[],
        description: "Microsoft Windows (cmd.exe pipeline, GBK console encoding).",
    },
    PlatformInfo {
        id: PlatformId::Linux,
        canonical: "linux",
        aliases: &[],
        description: "Linux (POSIX pipeline, UTF-8).",
    },
    PlatformInfo {
        id: PlatformId::MacOs,
        canonical: "macos",
        aliases: &["darwin"],
        description: "macOS (POSIX pipeline, UTF-8).",
    },
];

/// Every platform id, in registry order.
pub const ALL: &[PlatformId] = &[PlatformId::Windows, PlatformId::Linux, PlatformId::MacOs];

/// Resolve a platform spelling to its stable id.
pub fn from_str(name: &str) -> Option<PlatformId> {
    registry::resolve(PLATFORMS, name)
}

/// Return the canonical spelling for a platform.
pub fn as_str(id: PlatformId) -> &'static str {
    PLATFORMS
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.canonical)
        .unwrap_or("unknown")
}

/// Resolve the platform this binary is running on, if it is supported.
pub fn current() -> Option<PlatformId> {
    from_str(std::env::consts::OS)
}
