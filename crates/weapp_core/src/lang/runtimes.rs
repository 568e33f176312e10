//! The `(platform, language)` runtime strategy table.
//!
//! Each entry says how the test harness feeds the fixture to a weapp on a given platform:
//! - `stream`: the command that writes the fixture file to stdout (the fixture path is appended),
//! - `interpreter`: the command that runs the weapp with the stream connected to its stdin,
//! - `encoding`: the WHATWG label of the console encoding used to decode the weapp's output.
//!
//! ## Notes
//! - The table is exhaustive over [`platforms::ALL`] x [`languages::ALL`]; the guardrail test in
//!   `tests/registry_guardrails.rs` and [`validate`] both check this.
//! - Windows consoles default to a locale code page, hence `gbk` there.
//!
//! ## Examples
//! ```rust
//! use weapp_core::lang::languages::LanguageId;
//! use weapp_core::lang::platforms::PlatformId;
//! use weapp_core::lang::runtimes;
//!
//! let rt = runtimes::lookup(PlatformId::Linux, LanguageId::Python3).unwrap();
//! assert_eq!(rt.interpreter, &["python3", "main.py"]);
//! assert_eq!(rt.encoding, "utf-8");
//! ```

use super::languages::{self, LanguageId};
use super::platforms::{self, PlatformId};

/// One row of the strategy table.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeInfo {
    pub platform: PlatformId,
    pub language: LanguageId,
    pub stream: &'static [&'static str],
    pub interpreter: &'static [&'static str],
    pub encoding: &'static str,
}

const WINDOWS_STREAM: &[&str] = &["cmd", "/C", "type"];
const POSIX_STREAM: &[&str] = &["cat"];

const fn row(
    platform: PlatformId,
    language: LanguageId,
    stream: &'static [&'static str],
    interpreter: &'static [&'static str],
    encoding: &'static str,
) -> RuntimeInfo {
    RuntimeInfo {
        platform,
        language,
        stream,
        interpreter,
        encoding,
    }
}

/// Strategy table.
pub const RUNTIMES: &[RuntimeInfo] = &[
    row(PlatformId::Windows, LanguageId::Python27, WINDOWS_STREAM, &["python", "main.py"], "gbk"),
    row(PlatformId::Windows, LanguageId::Python3, WINDOWS_STREAM, &["python", "main.py"], "gbk"),
    row(PlatformId::Windows, LanguageId::R, WINDOWS_STREAM, &["Rscript", "main.R"], "gbk"),
    row(PlatformId::Linux, LanguageId::Python27, POSIX_STREAM, &["python2", "main.py"], "utf-8"),
    row(PlatformId::Linux, LanguageId::Python3, POSIX_STREAM, &["python3", "main.py"], "utf-8"),
    row(PlatformId::Linux, LanguageId::R, POSIX_STREAM, &["Rscript", "main.R"], "utf-8"),
    row(PlatformId::MacOs, LanguageId::Python27, POSIX_STREAM, &["python2", "main.py"], "utf-8"),
    row(PlatformId::MacOs, LanguageId::Python3, POSIX_STREAM, &["python3", "main.py"], "utf-8"),
    row(PlatformId::MacOs, LanguageId::R, POSIX_STREAM, &["Rscript", "main.R"], "utf-8"),
];

/// Look up the runtime strategy for a platform/language pair.
pub fn lookup(platform: PlatformId, language: LanguageId) -> Option<&'static RuntimeInfo> {
    RUNTIMES.iter().find(|r| r.platform == platform && r.language == language)
}

/// Check that every supported platform/language pair has exactly one well-formed row.
///
/// ## Returns
/// - `Ok(())` when the table is complete, otherwise a list of human-readable problems.
pub fn validate() -> Result<(), Vec<String>> {
    let mut problems = Vec::new();
    for &platform in platforms::ALL {
        for &language in languages::ALL {
            let rows = RUNTIMES
                .iter()
                .filter(|r| r.platform == platform && r.language == language)
                .count();
            if rows != 1 {
                problems.push(format!(
                    "{} rows for ({}, {})",
                    rows,
                    platforms::as_str(platform),
                    languages::as_str(language)
                ));
            }
        }
    }
    for r in RUNTIMES {
        if r.stream.is_empty() || r.interpreter.is_empty() || r.encoding.is_empty() {
            problems.push(format!(
                "incomplete row for ({}, {})",
                platforms::as_str(r.platform),
                languages::as_str(r.language)
            ));
        }
        if r.interpreter.last() != Some(&languages::entry_script(r.language)) {
            problems.push(format!(
                "interpreter for ({}, {}) does not run {}",
                platforms::as_str(r.platform),
                languages::as_str(r.language),
                languages::entry_script(r.language)
            ));
        }
    }
    if problems.is_empty() { Ok(()) } else { Err(problems) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_complete() {
        assert_eq!(validate(), Ok(()));
    }

    #[test]
    fn test_windows_uses_locale_encoding() {
        for &language in languages::ALL {
            let rt = lookup(PlatformId::Windows, language).unwrap();
            assert_eq!(rt.encoding, "gbk");
            assert_eq!(rt.stream, WINDOWS_STREAM);
        }
    }

    #[test]
    fn test_python27_uses_python2_on_posix() {
        let rt = lookup(PlatformId::MacOs, LanguageId::Python27).unwrap();
        assert_eq!(rt.interpreter, &["python2", "main.py"]);
    }
}
