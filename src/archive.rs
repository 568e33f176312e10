//! Project packaging
//!
//! Zips a project tree into `<project>.zip` for upload, leaving out everything that only
//! exists for local testing: the fixture, reference indexes, extended data, the metadata file,
//! the report template and generated report, and the archive itself.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::{DirEntry, WalkDir};
use weapp_core::conventions::{LOCAL_ONLY_DIRS, LOCAL_ONLY_FILES, archive_name};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::meta::ProjectMeta;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk project tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// What `package` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    /// Entry names in the order written; directories end with `/`.
    pub entries: Vec<String>,
    /// Local-only directories that were left out, relative to the project root.
    pub skipped_dirs: Vec<String>,
}

/// Package the project at `root` into `<root>/<project>.zip`.
#[tracing::instrument(skip_all, fields(project = %meta.project))]
pub fn package(meta: &ProjectMeta, root: &Path) -> Result<ArchiveSummary, ArchiveError> {
    let name = archive_name(&meta.project);
    let path = root.join(&name);
    let file = File::create(&path).map_err(|source| ArchiveError::Io {
        path: path.clone(),
        source,
    })?;

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = Vec::new();
    let mut skipped_dirs = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if is_local_only_dir(entry) {
                let rel = entry_name(root, entry.path());
                tracing::info!(dir = %rel, "ignoring folder for local testing");
                skipped_dirs.push(rel);
                return false;
            }
            true
        });

    for entry in walker {
        let entry = entry?;
        let rel = entry_name(root, entry.path());
        if entry.file_type().is_dir() {
            let dir = format!("{rel}/");
            zip.add_directory(dir.as_str(), options)?;
            entries.push(dir);
            continue;
        }
        if is_excluded_file(&entry, &name) {
            tracing::debug!(file = %rel, "excluded from archive");
            continue;
        }
        if !entry.path().is_file() {
            tracing::debug!(path = %rel, "skipping non-regular file");
            continue;
        }

        zip.start_file(rel.as_str(), options)?;
        let mut source = File::open(entry.path()).map_err(|source| ArchiveError::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;
        io::copy(&mut source, &mut zip).map_err(|source| ArchiveError::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;
        entries.push(rel);
    }

    zip.finish()?;
    tracing::info!(path = %path.display(), entries = entries.len(), "wrote archive");
    Ok(ArchiveSummary {
        path,
        entries,
        skipped_dirs,
    })
}

/// Entry names of an existing archive, in stored order.
pub fn list_entries(path: &Path) -> Result<Vec<String>, ArchiveError> {
    let file = File::open(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let archive = zip::ZipArchive::new(file)?;
    Ok(archive.file_names().map(str::to_string).collect())
}

fn is_local_only_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && LOCAL_ONLY_DIRS.iter().any(|d| entry.file_name() == *d)
}

fn is_excluded_file(entry: &DirEntry, archive: &str) -> bool {
    let name = entry.file_name();
    name == archive || LOCAL_ONLY_FILES.iter().any(|f| name == *f)
}

/// `/`-separated path of `path` relative to `root`.
fn entry_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use weapp_core::lang::languages::LanguageId;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        let root = Path::new("proj");
        assert_eq!(entry_name(root, &root.join("a").join("b.py")), "a/b.py");
    }

    #[test]
    fn test_package_skips_local_only_content() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "main.py");
        touch(root, ".weapp");
        touch(root, "html_template.html");
        touch(root, "data/data.json");
        touch(root, "indexes/index_wegene_affy_2.idx");
        touch(root, "lib/helpers.py");

        let meta = ProjectMeta::new("demo", LanguageId::Python3, false);
        let summary = package(&meta, root).unwrap();

        assert_eq!(summary.entries, vec!["lib/", "lib/helpers.py", "main.py"]);
        assert_eq!(summary.skipped_dirs, vec!["data", "indexes"]);
        assert_eq!(list_entries(&summary.path).unwrap(), summary.entries);
    }
}
