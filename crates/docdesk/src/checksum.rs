//! SHA-256 content fingerprints for stored documents.
//!
//! Digests are lowercase hex, 64 characters long. They are compared as plain
//! strings, so both sides of a comparison must come from this module.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::ChecksumError;

const READ_CHUNK: usize = 8 * 1024;

/// Computes the checksum of a file by streaming it from disk.
pub fn file_checksum(path: &Path) -> Result<String, ChecksumError> {
    let read_err = |source| ChecksumError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(read_err)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; READ_CHUNK];
    loop {
        let n = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_err(e)),
        };
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Computes the checksum of an in-memory buffer.
pub fn bytes_checksum(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}
