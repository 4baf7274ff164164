pub mod filesystem;

pub use filesystem::{FileStore, SaveMode, UPLOADS_DIR};
