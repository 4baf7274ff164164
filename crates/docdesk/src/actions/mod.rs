//! Form actions and read queries behind the dashboard.
//!
//! [`Dashboard`] owns the injected database handle, file store and
//! configuration. Each submission goes through validation first and touches
//! storage only when every field passed.

use thiserror::Error;

use crate::config::{Config, DatabaseErrorPolicy};
use crate::db::dashboard_repo::{self, CardData};
use crate::db::{Database, DatabaseError};
use crate::error::{ChecksumError, ConfigError, StorageError};
use crate::forms::FieldErrors;
use crate::storage::FileStore;
use crate::verify::VerifyError;

mod customers;
mod documents;
mod invoices;

/// How many invoices `latest_invoices` returns.
pub const LATEST_INVOICES: u32 = 5;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("{message}")]
    Invalid {
        errors: FieldErrors,
        message: String,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Checksum error: {0}")]
    Checksum(#[from] ChecksumError),

    #[error("{message}")]
    Database {
        message: String,
        #[source]
        source: DatabaseError,
    },

    /// An update the database refused. Unlike [`ActionError::Database`],
    /// the message is meant for the caller.
    #[error("{message}")]
    UpdateFailed {
        message: String,
        #[source]
        source: DatabaseError,
    },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Verification failed: {0}")]
    Verification(#[from] VerifyError),
}

impl ActionError {
    /// Field-level rejection of the submission for `action`.
    pub fn invalid(errors: FieldErrors, action: &str) -> Self {
        Self::Invalid {
            errors,
            message: format!("Missing Fields. Failed to {}.", action),
        }
    }

    pub(crate) fn database(action: &str) -> impl FnOnce(DatabaseError) -> Self + '_ {
        move |source| Self::Database {
            message: format!("Database Error: Failed to {}.", action),
            source,
        }
    }

    pub(crate) fn update_failed(action: &str) -> impl FnOnce(DatabaseError) -> Self + '_ {
        move |source| Self::UpdateFailed {
            message: format!("Database Error: Failed to {}.", action),
            source,
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

/// Result of a create or delete under the configured database error policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence<T> {
    Persisted(T),
    /// The statement failed and the error was logged instead of returned.
    /// Only produced with [`DatabaseErrorPolicy::FailOpen`].
    Suppressed { reason: String },
}

impl<T> Persistence<T> {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Persistence<U> {
        match self {
            Self::Persisted(value) => Persistence::Persisted(f(value)),
            Self::Suppressed { reason } => Persistence::Suppressed { reason },
        }
    }

    pub fn persisted(self) -> Option<T> {
        match self {
            Self::Persisted(value) => Some(value),
            Self::Suppressed { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    db: Database,
    files: FileStore,
    config: Config,
}

impl Dashboard {
    pub fn new(db: Database, files: FileStore, config: Config) -> Self {
        Self { db, files, config }
    }

    /// Opens the configured database and upload directory.
    pub fn open(config: Config) -> crate::Result<Self> {
        let path = config
            .resolved_database_path()
            .ok_or_else(|| ConfigError::Validation {
                message: "Cannot determine a home directory for the default database_path"
                    .to_string(),
            })?;
        let db = Database::open(&path)?;
        let files = FileStore::new(&config.uploads_directory)?;

        log::info!("Uploads stored in {}", files.directory().display());

        Ok(Self::new(db, files, config))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn page_size(&self) -> u32 {
        self.config.page_size
    }

    /// Figures for the overview cards.
    pub fn card_data(&self) -> Result<CardData, ActionError> {
        dashboard_repo::card_data(&self.db).map_err(ActionError::database("Fetch Card Data"))
    }

    /// Applies the database error policy to a create or delete.
    fn persist<T>(
        &self,
        action: &str,
        result: Result<T, DatabaseError>,
    ) -> Result<Persistence<T>, ActionError> {
        match result {
            Ok(value) => Ok(Persistence::Persisted(value)),
            Err(e) => match self.config.database_error_policy {
                DatabaseErrorPolicy::FailClosed => Err(ActionError::database(action)(e)),
                DatabaseErrorPolicy::FailOpen => {
                    tracing::error!(action, error = %e, "Database error suppressed");
                    Ok(Persistence::Suppressed {
                        reason: e.to_string(),
                    })
                }
            },
        }
    }

    /// Delete shared by every entity: a missing row is `NotFound` unless the
    /// statement itself failed.
    fn delete_with(
        &self,
        entity: &'static str,
        action: &str,
        id: &str,
        delete: impl FnOnce(&Database, &str) -> Result<bool, DatabaseError>,
    ) -> Result<Persistence<()>, ActionError> {
        match self.persist(action, delete(&self.db, id))? {
            Persistence::Persisted(true) => {
                tracing::info!(entity, id, "Deleted");
                Ok(Persistence::Persisted(()))
            }
            Persistence::Persisted(false) => Err(ActionError::not_found(entity, id)),
            Persistence::Suppressed { reason } => Ok(Persistence::Suppressed { reason }),
        }
    }
}
