// The raw media model for one disk side.

// Imports

use crate::error_types::codec::LoadError;

// Media constants

/// Capacity of the raw side buffer in bytes. Everything the head can
/// pass over lives in here: gaps, terminators, payloads, checksums.
pub const MAX_SIDE_SIZE: usize = 0x10000;

/// Reserved block-table capacity. The write engine appends entries
/// from interrupt context and must never reallocate.
pub const MAX_BLOCKS: usize = 1024;

/// Gap before the very first block, in bit cells as read.
pub const FIRST_GAP_READ_BITS: usize = 28300;

/// Gap between consecutive blocks, in bit cells as read.
pub const NEXT_GAPS_READ_BITS: usize = 976;

/// Every gap ends with this terminator byte; the set bit is the start
/// mark the console synchronizes on.
pub const GAP_TERMINATOR: u8 = 0x80;

// Structs, Enums, Flags

/// One loaded disk side: the byte-packed media stream plus the table
/// of where each block's leading gap starts.
///
/// Bytes are packed LSB-first in read order. A block in the stream is
/// `gap zeroes, 0x80, payload, crc_lo, crc_hi`, and `block_offsets[i]`
/// points at the first gap zero.
#[derive(Debug, PartialEq)]
pub struct SideImage {
    pub(crate) data: Box<[u8]>,
    pub(crate) block_offsets: Vec<usize>,
    pub(crate) used_space: usize,
}

impl SideImage {
    /// A blank side. Allocation is explicit and fallible, since the
    /// buffer is by far the largest thing the drive ever asks for.
    pub fn new() -> Result<Self, LoadError> {
        let mut data = Vec::new();
        data.try_reserve_exact(MAX_SIDE_SIZE)
            .map_err(|_| LoadError::OutOfMemory)?;
        data.resize(MAX_SIDE_SIZE, 0);

        let mut block_offsets = Vec::new();
        block_offsets
            .try_reserve_exact(MAX_BLOCKS)
            .map_err(|_| LoadError::OutOfMemory)?;

        Ok(SideImage {
            data: data.into_boxed_slice(),
            block_offsets,
            used_space: 0,
        })
    }
}
