//! Accepted spellings for yes/no settings.
//!
//! Historical project layouts encoded toggles as `y`/`n` (interactive prompts) or `0`/`1`
//! (metadata files). Both encodings are accepted at every parsing boundary and collapse into a
//! plain `bool`.
//!
//! ## Examples
//! ```rust
//! use weapp_core::lang::toggles::parse;
//!
//! assert_eq!(parse("y"), Some(true));
//! assert_eq!(parse("0"), Some(false));
//! assert_eq!(parse("maybe"), None);
//! ```

/// Spellings that mean "enabled".
pub const TRUE_SPELLINGS: &[&str] = &["y", "yes", "1", "true", "on"];

/// Spellings that mean "disabled".
pub const FALSE_SPELLINGS: &[&str] = &["n", "no", "0", "false", "off"];

/// Parse a toggle spelling (ASCII case-insensitive, surrounding whitespace ignored).
pub fn parse(value: &str) -> Option<bool> {
    let value = value.trim();
    if TRUE_SPELLINGS.iter().any(|s| s.eq_ignore_ascii_case(value)) {
        Some(true)
    } else if FALSE_SPELLINGS.iter().any(|s| s.eq_ignore_ascii_case(value)) {
        Some(false)
    } else {
        None
    }
}

