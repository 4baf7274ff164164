use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::storage::{SaveMode, UPLOADS_DIR};

pub const CONFIG_VERSION: &str = "1.0";
pub const DEFAULT_PAGE_SIZE: u32 = 6;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 2 * 1024 * 1024;
pub const DEFAULT_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpeg", "application/pdf"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default = "default_uploads_directory")]
    pub uploads_directory: String,
    #[serde(default)]
    pub database_path: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub uploads: UploadPolicy,
    #[serde(default)]
    pub database_error_policy: DatabaseErrorPolicy,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_uploads_directory() -> String {
    UPLOADS_DIR.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            uploads_directory: default_uploads_directory(),
            database_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            uploads: UploadPolicy::default(),
            database_error_policy: DatabaseErrorPolicy::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Configured database file, falling back to the per-user default.
    pub fn resolved_database_path(&self) -> Option<PathBuf> {
        match &self.database_path {
            Some(path) => Some(PathBuf::from(path)),
            None => crate::db::default_database_path(),
        }
    }
}

/// Constraints applied to every uploaded document file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadPolicy {
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    #[serde(default = "default_content_types")]
    pub allowed_content_types: Vec<String>,
    /// File store mode used when a document is created. Verification
    /// uploads always use [`SaveMode::Unique`].
    #[serde(default)]
    pub create_mode: SaveMode,
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

fn default_content_types() -> Vec<String> {
    DEFAULT_CONTENT_TYPES.iter().map(|s| s.to_string()).collect()
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            allowed_content_types: default_content_types(),
            create_mode: SaveMode::Direct,
        }
    }
}

impl UploadPolicy {
    pub fn allows(&self, content_type: &str) -> bool {
        self.allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
    }
}

/// What create/delete actions do when the database rejects the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseErrorPolicy {
    /// Report the failure to the caller.
    #[default]
    FailClosed,
    /// Log the failure and let the caller carry on as if it succeeded.
    FailOpen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
}

fn default_listen_address() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
        }
    }
}
