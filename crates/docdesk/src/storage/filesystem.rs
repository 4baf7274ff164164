use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::sanitize::sanitize_file_name;

/// Directory name used when the store is rooted in the working directory.
pub const UPLOADS_DIR: &str = "uploads";

/// How the destination file name is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Keep the uploaded name verbatim. An existing file with the same name
    /// is overwritten without notice.
    #[default]
    Direct,
    /// Append a random UUID to the stem: `{stem}_{uuid}{.ext}`.
    Unique,
}

/// Flat on-disk store for uploaded document bytes.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `directory`. Relative paths are resolved
    /// against the current working directory so that saved paths are absolute.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self, StorageError> {
        let directory = directory.as_ref();
        let directory =
            std::path::absolute(directory).map_err(|e| StorageError::ResolveDirectory {
                path: directory.to_path_buf(),
                source: e,
            })?;
        Ok(Self { directory })
    }

    /// Store rooted at `<cwd>/uploads`.
    pub fn in_working_directory() -> Result<Self, StorageError> {
        Self::new(UPLOADS_DIR)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Creates the upload directory if it is missing. Safe to call from
    /// several requests at once: losing the creation race is not an error.
    pub fn ensure_directory(&self) -> Result<(), StorageError> {
        if self.directory.is_dir() {
            return Ok(());
        }
        match std::fs::create_dir_all(&self.directory) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(StorageError::CreateDirectory {
                path: self.directory.clone(),
                source: e,
            }),
        }
    }

    /// Writes `content` under a name derived from `original_name` and
    /// returns the absolute path written.
    pub fn save(
        &self,
        content: &[u8],
        original_name: &str,
        mode: SaveMode,
    ) -> Result<PathBuf, StorageError> {
        let filename = sanitize_file_name(original_name)
            .ok_or_else(|| StorageError::InvalidFileName(original_name.to_string()))?;

        self.ensure_directory()?;

        match mode {
            SaveMode::Direct => {
                let path = self.directory.join(&filename);
                std::fs::write(&path, content).map_err(|e| StorageError::WriteFile {
                    path: path.clone(),
                    source: e,
                })?;
                Ok(path)
            }
            SaveMode::Unique => {
                let path = self.directory.join(unique_file_name(&filename));
                write_new(&path, content)?;
                Ok(path)
            }
        }
    }
}

/// Creates `path` exclusively (O_CREAT | O_EXCL) and writes the content.
fn write_new(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    let write_err = |e| StorageError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(write_err)?;
    file.write_all(content).map_err(write_err)?;
    file.flush().map_err(write_err)
}

/// `deed.final.pdf` -> `deed.final_<uuid>.pdf`, `README` -> `README_<uuid>`.
fn unique_file_name(filename: &str) -> String {
    let token = uuid::Uuid::new_v4();
    match filename.rfind('.') {
        // A leading dot marks a hidden file, not an extension.
        Some(dot) if dot > 0 => format!("{}_{}{}", &filename[..dot], token, &filename[dot..]),
        _ => format!("{}_{}", filename, token),
    }
}
