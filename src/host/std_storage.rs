// Storage backend over std::fs, rooted at a base directory.
// This is what the diagnostics binary and the integration tests use;
// embedded shells bring their own FAT driver instead.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use crate::error_types::storage::StorageError;
use crate::host::storage_trait::{OpenMode, Storage, StorageFile};

// Structs, Enums, Flags

/// `Storage` over the ordinary filesystem.
pub struct StdStorage {
    /// All `/`-separated paths resolve under here.
    base: PathBuf,
}

pub struct StdFile {
    file: File,
}

impl StdStorage {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        StdStorage { base: base.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut full = self.base.clone();
        for part in path.split(['/', '\\']) {
            if !part.is_empty() {
                full.push(part);
            }
        }
        full
    }
}

// Implementations

fn map_io(err: std::io::Error) -> StorageError {
    match err.kind() {
        ErrorKind::NotFound => StorageError::NotFound,
        ErrorKind::AlreadyExists => StorageError::AlreadyExists,
        _ => StorageError::Io(err.to_string()),
    }
}

impl Storage for StdStorage {
    type File = StdFile;

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<StdFile, StorageError> {
        let full = self.resolve(path);
        let mut options = OpenOptions::new();
        let _ = match mode {
            OpenMode::Read => options.read(true),
            OpenMode::Write => options.write(true),
            OpenMode::CreateNew => options.write(true).create_new(true),
        };
        let file = options.open(full).map_err(map_io)?;
        Ok(StdFile { file })
    }

    fn file_size(&mut self, path: &str) -> Result<u64, StorageError> {
        let meta = std::fs::metadata(self.resolve(path)).map_err(map_io)?;
        Ok(meta.len())
    }

    fn mkdir(&mut self, path: &str) -> Result<(), StorageError> {
        std::fs::create_dir(self.resolve(path)).map_err(map_io)
    }
}

impl StorageFile for StdFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        // Short reads before end of file are allowed by std, but the
        // codec wants "full or EOF", so keep pulling.
        let mut total = 0;
        while total < buf.len() {
            let got = self.file.read(&mut buf[total..]).map_err(map_io)?;
            if got == 0 {
                break;
            }
            total += got;
        }
        Ok(total)
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<(), StorageError> {
        self.file.write_all(buf).map_err(map_io)
    }

    fn seek(&mut self, pos: u64) -> Result<(), StorageError> {
        let _ = self.file.seek(SeekFrom::Start(pos)).map_err(map_io)?;
        Ok(())
    }

    fn size(&self) -> u64 {
        self.file.metadata().map(|m| m.len()).unwrap_or(0)
    }
}
