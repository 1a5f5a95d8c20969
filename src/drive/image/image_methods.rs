// Geometry arithmetic and access onto the side image.

// Imports

use log::debug;

use crate::drive::image::image_struct::{
    SideImage, FIRST_GAP_READ_BITS, MAX_SIDE_SIZE, NEXT_GAPS_READ_BITS,
};

// Functions

/// Gap length in media bytes in front of block `index`.
pub fn gap_bytes(index: usize) -> usize {
    if index == 0 {
        FIRST_GAP_READ_BITS / 8
    } else {
        NEXT_GAPS_READ_BITS / 8
    }
}

/// The kind tag a block at `index` must start with.
/// Disk info, file amount, then header/data pairs forever.
pub fn block_kind(index: usize) -> u8 {
    match index {
        0 => 1,
        1 => 2,
        even if even % 2 == 0 => 3,
        _ => 4,
    }
}

// Implementations

impl SideImage {
    pub fn block_count(&self) -> usize {
        self.block_offsets.len()
    }

    pub fn used_space(&self) -> usize {
        self.used_space
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Media offset of block `index`'s leading gap.
    pub fn block_offset(&self, index: usize) -> usize {
        self.block_offsets[index]
    }

    /// Payload size of block `index`, not counting gap or checksum.
    ///
    /// For a file-data block the size comes out of the preceding file
    /// header, so that header must already be in the buffer.
    pub fn payload_size(&self, index: usize) -> usize {
        match index {
            0 => 56,
            1 => 2,
            even if even % 2 == 0 => 16,
            odd => {
                let header = self.block_offsets[odd - 1] + gap_bytes(odd - 1);
                let lo = self.data[header + 0x0D] as usize;
                let hi = self.data[header + 0x0E] as usize;
                1 + (lo | (hi << 8))
            }
        }
    }

    /// Full footprint of block `index` with the gap and checksum
    /// included or not.
    pub fn total_size(&self, index: usize, include_gap: bool, include_crc: bool) -> usize {
        let gap = if include_gap { gap_bytes(index) } else { 0 };
        let crc = if include_crc { 2 } else { 0 };
        gap + self.payload_size(index) + crc
    }

    /// The payload bytes of block `index`.
    pub fn payload(&self, index: usize) -> &[u8] {
        let start = self.block_offsets[index] + gap_bytes(index);
        &self.data[start..start + self.payload_size(index)]
    }

    /// The two checksum bytes stored after block `index`'s payload.
    pub fn stored_crc(&self, index: usize) -> [u8; 2] {
        let pos = self.block_offsets[index] + gap_bytes(index) + self.payload_size(index);
        [self.data[pos], self.data[pos + 1]]
    }

    /// Which block the media byte at `position` belongs to, counting a
    /// block's leading gap as part of it. `None` past the last block.
    pub fn block_containing(&self, position: usize) -> Option<usize> {
        for index in 0..self.block_offsets.len() {
            if position < self.block_offsets[index] + self.total_size(index, true, true) {
                return Some(index);
            }
        }
        None
    }

    /// Drop every block from `count` onward and wipe the media bytes
    /// they occupied, out to the end of the side.
    pub(crate) fn truncate_blocks(&mut self, count: usize) {
        if count >= self.block_offsets.len() {
            return;
        }
        let from = self.block_offsets[count];
        debug!(
            "truncating block table {} -> {} (wiping media from {from})",
            self.block_offsets.len(),
            count
        );
        self.block_offsets.truncate(count);
        self.data[from..MAX_SIDE_SIZE].fill(0);
    }
}
