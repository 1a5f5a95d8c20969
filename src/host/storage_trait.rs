// All storage backends MUST implement this.
// Paths are `/`-separated at this seam; the backend owns whatever the
// actual medium wants to see.

use crate::error_types::storage::StorageError;

// Structs, Enums, Flags

/// How a file is being opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Existing file, read only.
    Read,
    /// Existing file, writable, NOT truncated. The codec seeks into
    /// multi-side files and rewrites one side in place.
    Write,
    /// Brand new file. Fails if it already exists.
    CreateNew,
}

/// Sequential file access, the subset the codec needs.
pub trait StorageFile {
    /// Read up to `buf.len()` bytes. Short counts only at end of file.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write the whole buffer or fail.
    fn write_all(&mut self, buf: &[u8]) -> Result<(), StorageError>;

    /// Absolute seek from the start of the file.
    fn seek(&mut self, pos: u64) -> Result<(), StorageError>;

    /// Current size of the file in bytes.
    fn size(&self) -> u64;
}

/// The storage medium itself.
pub trait Storage {
    type File: StorageFile;

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<Self::File, StorageError>;

    /// Size of a file without opening it. `NotFound` doubles as the
    /// existence check.
    fn file_size(&mut self, path: &str) -> Result<u64, StorageError>;

    /// Create one directory level. Returns `AlreadyExists` when it is
    /// already there; callers that don't care treat that as success.
    fn mkdir(&mut self, path: &str) -> Result<(), StorageError>;
}

// Functions

/// The file name without any leading directories.
/// Accepts both separators, since images may arrive addressed with
/// FAT-style backslash paths.
pub fn basename(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}
