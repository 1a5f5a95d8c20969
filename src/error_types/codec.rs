// Error types for the load/save codec.

use thiserror::Error;

use crate::error_types::storage::StorageError;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
/// Why a disk side refused to load.
pub enum LoadError {
    /// Bad signature, wrong block tag, or the file ended before the
    /// block count promised by the file-amount block.
    #[error("Not a valid disk image.")]
    InvalidImage,
    /// The framed side stream would not fit in the media buffer before
    /// reaching the promised block count.
    #[error("Image does not fit on one side of the media.")]
    ImageTooLarge,
    /// Side buffer allocation failed. Only possible on hosts that are
    /// genuinely out of heap.
    #[error("No memory for the side buffer.")]
    OutOfMemory,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
/// Why disk changes refused to save.
pub enum SaveError {
    /// The side was loaded write-protected.
    #[error("Media is write protected.")]
    ReadOnly,
    /// A stored block checksum no longer matches its payload. Nothing
    /// is written when this happens.
    #[error("Block checksum mismatch, refusing to persist corruption.")]
    CrcMismatch,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
