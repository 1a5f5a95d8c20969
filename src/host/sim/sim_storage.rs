// An in-memory storage medium.
// Files are plain byte vectors, directories are a set of names, and
// cloning hands out another handle onto the same medium so tests can
// inspect files after the drive has taken ownership.

// Imports

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::error_types::storage::StorageError;
use crate::host::storage_trait::{OpenMode, Storage, StorageFile};

// Structs, Enums, Flags

#[derive(Debug, Default)]
struct SimStorageInner {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
}

#[derive(Clone, Default)]
pub struct SimStorage {
    inner: Rc<RefCell<SimStorageInner>>,
}

/// An open handle onto one simulated file.
pub struct SimFile {
    inner: Rc<RefCell<SimStorageInner>>,
    path: String,
    pos: usize,
    writable: bool,
}

// Implementations

fn normalize(path: &str) -> String {
    // Accept both separators at the seam, store with one.
    path.split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn parent_of(path: &str) -> Option<&str> {
    path.rfind('/').map(|pos| &path[..pos])
}

impl SimStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a file onto the medium, creating it or replacing it.
    pub fn put_file(&self, path: &str, contents: Vec<u8>) {
        let _ = self
            .inner
            .borrow_mut()
            .files
            .insert(normalize(path), contents);
    }

    /// A copy of a file's bytes, if it exists.
    pub fn file_contents(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.borrow().files.get(&normalize(path)).cloned()
    }

    /// Does a directory exist?
    pub fn dir_exists(&self, path: &str) -> bool {
        self.inner.borrow().dirs.contains(&normalize(path))
    }
}

impl Storage for SimStorage {
    type File = SimFile;

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<SimFile, StorageError> {
        let path = normalize(path);
        let mut inner = self.inner.borrow_mut();
        match mode {
            OpenMode::Read | OpenMode::Write => {
                if !inner.files.contains_key(&path) {
                    return Err(StorageError::NotFound);
                }
            }
            OpenMode::CreateNew => {
                if inner.files.contains_key(&path) {
                    return Err(StorageError::AlreadyExists);
                }
                // New files need their directory to exist first.
                if let Some(parent) = parent_of(&path) {
                    if !inner.dirs.contains(parent) {
                        return Err(StorageError::NotFound);
                    }
                }
                let _ = inner.files.insert(path.clone(), Vec::new());
            }
        }
        Ok(SimFile {
            inner: Rc::clone(&self.inner),
            path,
            pos: 0,
            writable: mode != OpenMode::Read,
        })
    }

    fn file_size(&mut self, path: &str) -> Result<u64, StorageError> {
        self.inner
            .borrow()
            .files
            .get(&normalize(path))
            .map(|data| data.len() as u64)
            .ok_or(StorageError::NotFound)
    }

    fn mkdir(&mut self, path: &str) -> Result<(), StorageError> {
        let path = normalize(path);
        let mut inner = self.inner.borrow_mut();
        if let Some(parent) = parent_of(&path) {
            if !inner.dirs.contains(parent) {
                return Err(StorageError::NotFound);
            }
        }
        if !inner.dirs.insert(path) {
            return Err(StorageError::AlreadyExists);
        }
        Ok(())
    }
}

impl StorageFile for SimFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        let inner = self.inner.borrow();
        let data = inner.files.get(&self.path).ok_or(StorageError::NotFound)?;
        let available = data.len().saturating_sub(self.pos);
        let count = available.min(buf.len());
        buf[..count].copy_from_slice(&data[self.pos..self.pos + count]);
        self.pos += count;
        Ok(count)
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<(), StorageError> {
        if !self.writable {
            return Err(StorageError::WriteRejected);
        }
        let mut inner = self.inner.borrow_mut();
        let data = inner
            .files
            .get_mut(&self.path)
            .ok_or(StorageError::NotFound)?;
        // Grow if the write runs past the end, like any real file.
        if self.pos + buf.len() > data.len() {
            data.resize(self.pos + buf.len(), 0);
        }
        data[self.pos..self.pos + buf.len()].copy_from_slice(buf);
        self.pos += buf.len();
        Ok(())
    }

    fn seek(&mut self, pos: u64) -> Result<(), StorageError> {
        // Seeking past the end is fine; writes will grow the file.
        self.pos = pos as usize;
        Ok(())
    }

    fn size(&self) -> u64 {
        self.inner
            .borrow()
            .files
            .get(&self.path)
            .map(|data| data.len() as u64)
            .unwrap_or(0)
    }
}
