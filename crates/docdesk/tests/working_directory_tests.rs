//! Tests that depend on the process working directory. They change it, so
//! they run serially.

use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use docdesk::config::Config;
use docdesk::{Dashboard, FileStore, SaveMode};

/// Restores the previous working directory on drop.
struct CwdGuard {
    previous: PathBuf,
}

impl CwdGuard {
    fn enter(dir: &Path) -> Self {
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        Self { previous }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.previous);
    }
}

#[test]
#[serial]
fn test_store_defaults_to_uploads_in_working_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let _guard = CwdGuard::enter(&root);

    let store = FileStore::in_working_directory().unwrap();
    assert_eq!(store.directory(), root.join("uploads"));

    let path = store.save(b"%PDF", "will.pdf", SaveMode::Direct).unwrap();
    assert!(path.is_absolute());
    assert_eq!(path, root.join("uploads").join("will.pdf"));
}

#[test]
#[serial]
fn test_dashboard_resolves_relative_uploads_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let _guard = CwdGuard::enter(&root);

    let config = Config {
        database_path: Some(root.join("db").join("docdesk.db").display().to_string()),
        ..Config::default()
    };
    let dashboard = Dashboard::open(config).unwrap();

    assert_eq!(dashboard.files().directory(), root.join("uploads"));
    assert!(root.join("db").join("docdesk.db").exists());
}
