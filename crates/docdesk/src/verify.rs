//! Checks a freshly uploaded file against the checksum recorded when a
//! document was created.
//!
//! The flow has three stages, each of which can halt it:
//!
//! 1. `Stored`: the upload is written through the [`FileStore`] in
//!    [`SaveMode::Unique`], so the original file is never overwritten.
//! 2. `Checksummed`: the digest of the stored bytes is computed.
//! 3. `Compared`: the document row is asked whether it holds that digest.
//!
//! A mismatch is a normal outcome ([`VerificationStatus::NotVerified`]).
//! Only I/O and database failures are errors.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, info_span};

use crate::checksum::file_checksum;
use crate::db::{document_repo, Database, DatabaseError};
use crate::error::{ChecksumError, StorageError};
use crate::forms::UploadedFile;
use crate::sanitize;
use crate::storage::{FileStore, SaveMode};

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Failed to store uploaded file")]
    Store(#[source] StorageError),

    #[error("Failed to checksum uploaded file")]
    Checksum(#[source] ChecksumError),

    #[error("Failed to compare checksum")]
    Compare(#[source] DatabaseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    NotVerified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub status: VerificationStatus,
    pub message: String,
    #[serde(skip)]
    pub stored_path: PathBuf,
    pub checksum: String,
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }
}

/// Runs the verification flow for `document_id` with an already validated
/// upload.
pub fn verify_upload(
    store: &FileStore,
    db: &Database,
    document_id: &str,
    file: &UploadedFile,
) -> Result<VerificationOutcome, VerifyError> {
    let _span = info_span!("verify_document",
        document_id = %document_id,
        filename = %file.file_name,
    )
    .entered();

    let stored_path = {
        let _step = info_span!("store").entered();
        store
            .save(&file.bytes, &file.file_name, SaveMode::Unique)
            .map_err(VerifyError::Store)?
    };
    debug!(stored = %sanitize::redact_path(&stored_path), "Upload stored");

    let checksum = {
        let _step = info_span!("checksum").entered();
        file_checksum(&stored_path).map_err(VerifyError::Checksum)?
    };

    let matches = {
        let _step = info_span!("compare").entered();
        document_repo::count_matching(db, document_id, &checksum).map_err(VerifyError::Compare)?
    };

    let (status, message) = if matches > 0 {
        (
            VerificationStatus::Verified,
            format!("File {} is verified.", file.file_name),
        )
    } else {
        (
            VerificationStatus::NotVerified,
            format!("File {} is not verified.", file.file_name),
        )
    };
    info!(status = ?status, "Verification finished");

    Ok(VerificationOutcome {
        status,
        message,
        stored_path,
        checksum,
    })
}
