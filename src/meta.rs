//! Project metadata (`.weapp`)
//!
//! The metadata record is written once by `init` and read by `test` and `package`. It is the
//! only thing that identifies a directory as a weapp project.
//!
//! ## Accepted encodings
//!
//! The `markdown` field has been written as `0`/`1`, `"y"`/`"n"` and booleans over time, and is
//! absent in older projects. All of these parse; absence means disabled. It is always written
//! back as `0`/`1`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use weapp_core::conventions::{META_FILE, is_valid_project_name};
use weapp_core::lang::languages::{self, LanguageId};
use weapp_core::lang::toggles;

/// Errors raised while reading or writing project metadata.
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("not a weapp project folder: {} not found", .0.display())]
    Missing(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid project metadata in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The project's identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMeta {
    #[serde(deserialize_with = "deserialize_project")]
    pub project: String,
    #[serde(serialize_with = "serialize_language", deserialize_with = "deserialize_language")]
    pub language: LanguageId,
    #[serde(
        rename = "markdown",
        default,
        serialize_with = "serialize_toggle",
        deserialize_with = "deserialize_toggle"
    )]
    pub markdown_enabled: bool,
}

impl ProjectMeta {
    pub fn new(project: impl Into<String>, language: LanguageId, markdown_enabled: bool) -> Self {
        Self {
            project: project.into(),
            language,
            markdown_enabled,
        }
    }

    /// Path of the metadata file inside a project root.
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(META_FILE)
    }

    /// Check whether `root` looks like a weapp project.
    pub fn exists_in(root: &Path) -> bool {
        Self::path_in(root).is_file()
    }

    /// Load the metadata record from a project root.
    pub fn load(root: &Path) -> Result<Self, MetaError> {
        let path = Self::path_in(root);
        if !path.is_file() {
            return Err(MetaError::Missing(path));
        }
        let text = fs::read_to_string(&path).map_err(|source| MetaError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| MetaError::Parse { path, source })
    }

    /// Parse a metadata record from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Render the record with 4-space indentation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the record into a project root.
    pub fn save(&self, root: &Path) -> Result<PathBuf, MetaError> {
        let path = Self::path_in(root);
        let json = self.to_json().map_err(|e| MetaError::Write {
            path: path.clone(),
            source: e.into(),
        })?;
        fs::write(&path, json).map_err(|source| MetaError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

fn deserialize_project<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let name = String::deserialize(deserializer)?;
    if !is_valid_project_name(&name) {
        return Err(de::Error::custom(format!(
            "invalid project name `{name}` (must be a single folder name)"
        )));
    }
    Ok(name)
}

fn serialize_language<S: Serializer>(language: &LanguageId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(languages::as_str(*language))
}

fn deserialize_language<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LanguageId, D::Error> {
    let name = String::deserialize(deserializer)?;
    languages::from_str(&name).ok_or_else(|| {
        de::Error::custom(format!(
            "unsupported language `{}` (expected one of: {})",
            name,
            languages::canonical_spellings().join(", ")
        ))
    })
}

fn serialize_toggle<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

fn deserialize_toggle<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(de::Error::custom(format!("invalid toggle value {n} (expected 0 or 1)"))),
        },
        Value::String(s) => {
            toggles::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid toggle value `{s}`")))
        }
        other => Err(de::Error::custom(format!("invalid toggle value {other}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_markdown() {
        let meta = ProjectMeta::from_json(r#"{"project": "demo", "language": "python3", "markdown": 1}"#).unwrap();
        assert_eq!(meta, ProjectMeta::new("demo", LanguageId::Python3, true));
    }

    #[test]
    fn test_parse_legacy_yes_no_markdown() {
        let meta = ProjectMeta::from_json(r#"{"project": "demo", "language": "r", "markdown": "n"}"#).unwrap();
        assert!(!meta.markdown_enabled);
        let meta = ProjectMeta::from_json(r#"{"project": "demo", "language": "r", "markdown": "y"}"#).unwrap();
        assert!(meta.markdown_enabled);
    }

    #[test]
    fn test_missing_markdown_is_disabled() {
        let meta = ProjectMeta::from_json(r#"{"project": "demo", "language": "python27"}"#).unwrap();
        assert!(!meta.markdown_enabled);
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let err = ProjectMeta::from_json(r#"{"project": "demo", "language": "perl"}"#).unwrap_err();
        assert!(err.to_string().contains("unsupported language `perl`"));
    }

    #[test]
    fn test_project_name_cannot_leave_the_folder() {
        let err = ProjectMeta::from_json(r#"{"project": "../../escape", "language": "r"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid project name `../../escape`"));
        assert!(ProjectMeta::from_json(r#"{"project": "..", "language": "r"}"#).is_err());
    }

    #[test]
    fn test_written_form_uses_numeric_toggle() {
        let json = ProjectMeta::new("demo", LanguageId::R, true).to_json().unwrap();
        assert_eq!(json, "{\n    \"project\": \"demo\",\n    \"language\": \"r\",\n    \"markdown\": 1\n}");
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(ProjectMeta::load(dir.path()), Err(MetaError::Missing(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let meta = ProjectMeta::new("demo", LanguageId::Python27, false);
        meta.save(dir.path()).unwrap();
        assert_eq!(ProjectMeta::load(dir.path()).unwrap(), meta);
    }
}
