//! Define the runtime languages a weapp can be written in.
//!
//! ## Notes
//! - Lookup via [`from_str`] is case-insensitive.
//! - The canonical spelling is what `init` writes into the project metadata.
//!
//! ## Examples
//! ```rust
//! use weapp_core::lang::languages::{self, LanguageId};
//!
//! assert_eq!(languages::from_str("python3"), Some(LanguageId::Python3));
//! assert_eq!(languages::from_str("R"), Some(LanguageId::R));
//! assert_eq!(languages::as_str(LanguageId::Python27), "python27");
//! ```

use super::registry::LangItemInfo;

/// Stable identifier for every supported weapp language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LanguageId {
    Python27,
    Python3,
    R,
}

/// Metadata entry for a language, plus the entry script the interpreter runs.
#[derive(Debug, Clone, Copy)]
pub struct LanguageInfo {
    pub item: LangItemInfo<LanguageId>,
    /// Script the interpreter is pointed at, relative to the project root.
    pub entry_script: &'static str,
}

/// Registry of supported languages.
pub const LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        item: LangItemInfo {
            id: LanguageId::Python27,
            canonical: "python27",
            aliases: &[],
            description: "Python 2.7 weapp (`main.py`).",
        },
        entry_script: "main.py",
    },
    LanguageInfo {
        item: LangItemInfo {
            id: LanguageId::Python3,
            canonical: "python3",
            aliases: &[],
            description: "Python 3 weapp (`main.py`).",
        },
        entry_script: "main.py",
    },
    LanguageInfo {
        item: LangItemInfo {
            id: LanguageId::R,
            canonical: "r",
            aliases: &[],
            description: "R weapp (`main.R`).",
        },
        entry_script: "main.R",
    },
];

/// Spelling of the language new projects use unless told otherwise.
pub const DEFAULT_SPELLING: &str = "python27";

/// Every language id, in registry order.
pub const ALL: &[LanguageId] = &[LanguageId::Python27, LanguageId::Python3, LanguageId::R];

/// Resolve a language spelling to its stable id.
pub fn from_str(name: &str) -> Option<LanguageId> {
    let name = name.trim();
    LANGUAGES.iter().find(|l| l.item.matches(name)).map(|l| l.item.id)
}

/// Return the canonical spelling for a language.
pub fn as_str(id: LanguageId) -> &'static str {
    info_for(id).item.canonical
}

/// Return the metadata entry for a language.
pub fn info_for(id: LanguageId) -> &'static LanguageInfo {
    match id {
        LanguageId::Python27 => &LANGUAGES[0],
        LanguageId::Python3 => &LANGUAGES[1],
        LanguageId::R => &LANGUAGES[2],
    }
}

/// Return the entry script for a language.
pub fn entry_script(id: LanguageId) -> &'static str {
    info_for(id).entry_script
}

/// Return every canonical spelling, in registry order (for help text and value parsers).
pub fn canonical_spellings() -> Vec<&'static str> {
    LANGUAGES.iter().map(|l| l.item.canonical).collect()
}
