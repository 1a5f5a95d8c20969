// Error types pertaining to the storage medium (SD card, or whatever
// the host adapter puts behind the Storage trait).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
/// Errors coming back from the storage adapter.
///
/// `AlreadyExists` is its own variant because directory creation treats
/// "already there" as success, and the caller has to be able to tell.
pub enum StorageError {
    #[error("No such file or directory.")]
    NotFound,
    #[error("File or directory already exists.")]
    AlreadyExists,
    #[error("The medium refused the write.")]
    WriteRejected,
    #[error("Seek target is outside the file.")]
    BadSeek,
    #[error("Low-level I/O failure: {0}")]
    Io(String),
}
