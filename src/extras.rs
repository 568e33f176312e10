//! `download-extra`: fetch and install the extended dataset into the data home.

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtrasError {
    #[error("download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("download failed: server answered {0}")]
    Status(reqwest::StatusCode),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("downloaded file is not a valid zip archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

const DOWNLOAD_NAME: &str = "extended_data.zip";

/// Download the dataset from `url` and unpack it into `home`. Returns the data home.
#[tracing::instrument(skip_all, fields(url = %url))]
pub fn download_extra(url: &str, home: &Path) -> Result<PathBuf, ExtrasError> {
    let resp = reqwest::blocking::get(url)?;
    if !resp.status().is_success() {
        return Err(ExtrasError::Status(resp.status()));
    }
    let bytes = resp.bytes()?;
    tracing::info!(bytes = bytes.len(), "downloaded extended data");

    fs::create_dir_all(home).map_err(|source| ExtrasError::Io {
        path: home.to_path_buf(),
        source,
    })?;
    let archive_path = home.join(DOWNLOAD_NAME);
    fs::write(&archive_path, &bytes).map_err(|source| ExtrasError::Io {
        path: archive_path.clone(),
        source,
    })?;

    let installed = install_archive(&bytes, home);
    if let Err(e) = fs::remove_file(&archive_path) {
        tracing::warn!(path = %archive_path.display(), error = %e, "could not remove downloaded archive");
    }
    installed?;
    Ok(home.to_path_buf())
}

/// Unpack zip bytes into `home`.
pub fn install_archive(bytes: &[u8], home: &Path) -> Result<(), ExtrasError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    archive.extract(home)?;
    tracing::debug!(entries = archive.len(), home = %home.display(), "extracted extended data");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn dataset_zip() -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.add_directory("extended_data/", SimpleFileOptions::default()).unwrap();
        zip.start_file("extended_data/extended_data.dat", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"rs1\t1\t100\tAA\n").unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_install_archive_unpacks_dataset() {
        let home = tempfile::tempdir().unwrap();
        install_archive(&dataset_zip(), home.path()).unwrap();
        let data = fs::read_to_string(crate::config::extended_data_file(home.path())).unwrap();
        assert_eq!(data, "rs1\t1\t100\tAA\n");
    }

    #[test]
    fn test_garbage_is_not_an_archive() {
        let home = tempfile::tempdir().unwrap();
        let err = install_archive(b"not a zip", home.path()).unwrap_err();
        assert!(matches!(err, ExtrasError::Archive(_)));
    }
}
