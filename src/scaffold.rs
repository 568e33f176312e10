//! Project generator - creates a new weapp project tree
//!
//! Generates:
//! - `.weapp` metadata
//! - language template files (`main.py` / `main.R` and helpers)
//! - `indexes/` with the reference index for the array format
//! - `html_template.html` when Markdown reports are enabled
//! - `extended_data/` copied from the data home, when installed
//! - `data/data.json`, the test fixture

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;
use weapp_core::conventions::{
    DATA_DIR, DEFAULT_ARRAY_FORMAT, EXTENDED_DATA_DIR, FIXTURE_FILE, INDEX_DIR, REPORT_TEMPLATE_FILE, index_file_name,
};
use weapp_core::lang::languages::LanguageId;

use crate::fixture::Fixture;
use crate::genome::lookup::BUNDLED_INDEX;
use crate::meta::{MetaError, ProjectMeta};

const HTML_TEMPLATE: &str = include_str!("../assets/templates/html_template.html");

const PYTHON27_TEMPLATES: &[(&str, &str)] = &[
    ("requirements.txt", include_str!("../assets/templates/python27/requirements.txt")),
    ("wegene_utils.py", include_str!("../assets/templates/python27/wegene_utils.py")),
    ("main.py", include_str!("../assets/templates/python27/main.py")),
];

const PYTHON3_TEMPLATES: &[(&str, &str)] = &[
    ("requirements.txt", include_str!("../assets/templates/python3/requirements.txt")),
    ("wegene_utils.py", include_str!("../assets/templates/python3/wegene_utils.py")),
    ("main.py", include_str!("../assets/templates/python3/main.py")),
];

const R_TEMPLATES: &[(&str, &str)] = &[
    ("pacman.R", include_str!("../assets/templates/r/pacman.R")),
    ("wegene_utils.R", include_str!("../assets/templates/r/wegene_utils.R")),
    ("main.R", include_str!("../assets/templates/r/main.R")),
];

/// Template files written for a language, as `(file name, contents)`.
pub fn templates_for(language: LanguageId) -> &'static [(&'static str, &'static str)] {
    match language {
        LanguageId::Python27 => PYTHON27_TEMPLATES,
        LanguageId::Python3 => PYTHON3_TEMPLATES,
        LanguageId::R => R_TEMPLATES,
    }
}

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("project folder already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Meta(#[from] MetaError),
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> ScaffoldError + '_ {
    move |source| ScaffoldError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Project generator for new weapp projects
pub struct ProjectGenerator {
    /// Directory the project folder is created in
    parent: PathBuf,
    meta: ProjectMeta,
    /// Array format of the bundled index
    array_format: String,
    /// Data home to copy `extended_data/` from, if any
    data_home: Option<PathBuf>,
}

impl ProjectGenerator {
    pub fn new(parent: impl AsRef<Path>, meta: ProjectMeta) -> Self {
        Self {
            parent: parent.as_ref().to_path_buf(),
            meta,
            array_format: DEFAULT_ARRAY_FORMAT.to_string(),
            data_home: None,
        }
    }

    /// Copy `extended_data/` from this data home when it is installed there.
    pub fn with_data_home(mut self, home: impl AsRef<Path>) -> Self {
        self.data_home = Some(home.as_ref().to_path_buf());
        self
    }

    /// Root of the project this generator creates.
    pub fn project_dir(&self) -> PathBuf {
        self.parent.join(&self.meta.project)
    }

    /// Fail early if the project folder is already there.
    pub fn check_target(&self) -> Result<(), ScaffoldError> {
        let dir = self.project_dir();
        if dir.exists() {
            return Err(ScaffoldError::AlreadyExists(dir));
        }
        Ok(())
    }

    /// Generate the project tree and write the fixture. Returns the project root.
    ///
    /// On failure the partly written project folder is removed again.
    #[tracing::instrument(skip_all, fields(project = %self.meta.project))]
    pub fn generate(&self, fixture: &Fixture) -> Result<PathBuf, ScaffoldError> {
        self.check_target()?;
        let root = self.project_dir();
        match self.populate(&root, fixture) {
            Ok(()) => {
                tracing::info!(root = %root.display(), "generated project");
                Ok(root)
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_dir_all(&root) {
                    tracing::warn!(root = %root.display(), error = %cleanup, "could not remove partial project");
                }
                Err(e)
            }
        }
    }

    fn populate(&self, root: &Path, fixture: &Fixture) -> Result<(), ScaffoldError> {
        let data_dir = root.join(DATA_DIR);
        fs::create_dir_all(&data_dir).map_err(io_at(&data_dir))?;

        if self.meta.markdown_enabled {
            write_file(&root.join(REPORT_TEMPLATE_FILE), HTML_TEMPLATE)?;
        }
        self.meta.save(root)?;

        for (name, contents) in templates_for(self.meta.language) {
            write_file(&root.join(name), contents)?;
        }

        let index_dir = root.join(INDEX_DIR);
        fs::create_dir_all(&index_dir).map_err(io_at(&index_dir))?;
        write_file(&index_dir.join(index_file_name(&self.array_format)), BUNDLED_INDEX)?;

        if let Some(home) = &self.data_home {
            let source = crate::config::extended_data_dir(home);
            if source.is_dir() {
                copy_dir(&source, &root.join(EXTENDED_DATA_DIR))?;
                tracing::info!(from = %source.display(), "copied extended data");
            }
        }

        let fixture_path = data_dir.join(FIXTURE_FILE);
        fixture.write(&fixture_path).map_err(io_at(&fixture_path))
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ScaffoldError> {
    fs::write(path, contents).map_err(io_at(path))
}

/// Recursively copy a directory tree.
fn copy_dir(from: &Path, to: &Path) -> Result<(), ScaffoldError> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|e| ScaffoldError::Io {
            path: from.to_path_buf(),
            source: e.into(),
        })?;
        let rel = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_at(&target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(io_at(&target))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixture::{FixtureBuilder, FixtureFlags};
    use crate::genome::{BundledSample, IndexedGenomeLookup};

    fn fixture() -> Fixture {
        let provider = BundledSample::load().unwrap();
        let lookup = IndexedGenomeLookup::bundled().unwrap();
        FixtureBuilder::new(&provider, &lookup)
            .build(&FixtureFlags::default(), &[], None)
            .fixture
    }

    #[test]
    fn test_templates_end_with_entry_script() {
        for &language in weapp_core::lang::languages::ALL {
            let last = templates_for(language).last().unwrap().0;
            assert_eq!(last, weapp_core::lang::languages::entry_script(language));
        }
    }

    #[test]
    fn test_generate_python_project() {
        let parent = tempfile::tempdir().unwrap();
        let meta = ProjectMeta::new("demo", LanguageId::Python3, true);
        let root = ProjectGenerator::new(parent.path(), meta.clone())
            .generate(&fixture())
            .unwrap();

        assert_eq!(ProjectMeta::load(&root).unwrap(), meta);
        assert!(root.join("main.py").is_file());
        assert!(root.join("wegene_utils.py").is_file());
        assert!(root.join("html_template.html").is_file());
        assert!(root.join("indexes").join("index_wegene_affy_2.idx").is_file());
        assert!(root.join("data").join("data.json").is_file());
        assert!(!root.join("extended_data").exists());
    }

    #[test]
    fn test_no_report_template_without_markdown() {
        let parent = tempfile::tempdir().unwrap();
        let meta = ProjectMeta::new("rproj", LanguageId::R, false);
        let root = ProjectGenerator::new(parent.path(), meta).generate(&fixture()).unwrap();
        assert!(root.join("main.R").is_file());
        assert!(root.join("pacman.R").is_file());
        assert!(!root.join("html_template.html").exists());
    }

    #[test]
    fn test_existing_folder_is_refused() {
        let parent = tempfile::tempdir().unwrap();
        fs::create_dir(parent.path().join("demo")).unwrap();
        let meta = ProjectMeta::new("demo", LanguageId::Python27, false);
        let err = ProjectGenerator::new(parent.path(), meta).generate(&fixture()).unwrap_err();
        assert!(matches!(err, ScaffoldError::AlreadyExists(_)));
    }

    #[test]
    fn test_extended_data_copied_from_home() {
        let parent = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let extra = home.path().join("extended_data");
        fs::create_dir_all(&extra).unwrap();
        fs::write(extra.join("extended_data.dat"), "rs1\t1\t100\tAA\n").unwrap();

        let meta = ProjectMeta::new("demo", LanguageId::Python3, false);
        let root = ProjectGenerator::new(parent.path(), meta)
            .with_data_home(home.path())
            .generate(&fixture())
            .unwrap();
        assert_eq!(
            fs::read_to_string(root.join("extended_data").join("extended_data.dat")).unwrap(),
            "rs1\t1\t100\tAA\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_generation_leaves_no_folder() {
        let parent = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let extra = home.path().join("extended_data");
        fs::create_dir_all(&extra).unwrap();
        std::os::unix::fs::symlink(home.path().join("gone.dat"), extra.join("extended_data.dat")).unwrap();

        let meta = ProjectMeta::new("demo", LanguageId::Python3, true);
        let generator = ProjectGenerator::new(parent.path(), meta).with_data_home(home.path());
        let err = generator.generate(&fixture()).unwrap_err();

        assert!(matches!(err, ScaffoldError::Io { .. }));
        assert!(!parent.path().join("demo").exists());
        generator.check_target().unwrap();
    }
}
