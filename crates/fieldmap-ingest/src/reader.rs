//! Upload size checks and file reading.

use std::path::Path;

use crate::error::{IngestError, Result};

/// Maximum upload size (10 MB default).
pub const MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// Check a payload length against a size limit.
pub fn check_payload_size(size: u64, max_size: u64) -> Result<()> {
    if size > max_size {
        return Err(IngestError::FileTooLarge { size, max_size });
    }
    Ok(())
}

/// Check file size against a limit before loading it.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
    check_payload_size(metadata.len(), max_size)
}

/// Reads an upload from disk, refusing files over `max_size` before reading them.
pub fn read_upload(path: &Path, max_size: u64) -> Result<Vec<u8>> {
    check_file_size_with_limit(path, max_size)?;
    std::fs::read(path).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}
