//! Test harness for isolated test execution.
//!
//! `TestHarness` owns a temporary directory holding the upload store and
//! config files, an in-memory database, and a `Dashboard` wired to both.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use assert_fs::TempDir;

use docdesk::config::Config;
use docdesk::db::customer_repo::{self, CustomerRow};
use docdesk::{Dashboard, Database, FileStore};

pub struct TestHarness {
    temp_dir: TempDir,
    /// Upload directory used by the dashboard's file store.
    pub uploads_dir: PathBuf,
    pub dashboard: Dashboard,
}

impl TestHarness {
    /// Harness with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let uploads_dir = temp_dir.child("uploads").path().to_path_buf();

        let db = Database::open_in_memory().expect("Failed to open database");
        let files = FileStore::new(&uploads_dir).expect("Failed to create file store");

        Self {
            temp_dir,
            uploads_dir,
            dashboard: Dashboard::new(db, files, config),
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn db(&self) -> &Database {
        self.dashboard.database()
    }

    /// Inserts a customer directly, bypassing validation.
    pub fn add_customer(&self, id: &str, name: &str) {
        customer_repo::insert(
            self.db(),
            &CustomerRow {
                id: id.to_string(),
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                image_url: format!("/customers/{}.png", id),
            },
        )
        .expect("Failed to insert customer");
    }

    /// Writes a config file into the temp directory.
    pub fn write_config(&self, filename: &str, json: &str) -> PathBuf {
        let child = self.temp_dir.child(filename);
        child.write_str(json).expect("Failed to write config file");
        child.path().to_path_buf()
    }

    /// Names of the files currently in the upload directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.uploads_dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn upload(&self, name: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child("uploads").child(name)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
