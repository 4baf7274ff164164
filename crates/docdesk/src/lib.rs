pub mod actions;
pub mod checksum;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod sanitize;
pub mod storage;
pub mod verify;

pub use actions::{ActionError, Dashboard, Persistence};
pub use checksum::{bytes_checksum, file_checksum};
pub use config::{load_config, Config, DatabaseErrorPolicy, UploadPolicy};
pub use db::{Database, DatabaseError};
pub use error::{ChecksumError, ConfigError, DocdeskError, Result, StorageError};
pub use forms::{FieldErrors, FormData, FormValue, UploadedFile};
pub use storage::{FileStore, SaveMode};
pub use verify::{VerificationOutcome, VerificationStatus, VerifyError};
