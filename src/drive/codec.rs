// Between the file on storage and the framed media image.
// The file stores bare block payloads back to back; gaps, terminators
// and checksums exist only on the media side.

pub mod load;
pub mod save;


use crate::host::storage_trait::basename;

// File layout constants

/// Bytes one side occupies in an image file.
pub const ROM_SIDE_SIZE: u64 = 65500;

/// Optional file prefix. Present exactly when the file size modulo
/// [`ROM_SIDE_SIZE`] equals it.
pub const ROM_HEADER_SIZE: u64 = 16;

/// The signature every disk-info block carries at payload offset 1.
pub const SIGNATURE: &[u8; 14] = b"*NINTENDO-HVC*";

// Functions

/// Length of the header prefix for a file of `size` bytes.
pub fn header_len(size: u64) -> u64 {
    if size % ROM_SIDE_SIZE == ROM_HEADER_SIZE {
        ROM_HEADER_SIZE
    } else {
        0
    }
}

/// Where everdrive-style saves for `image_path` live.
/// The directory is named after the image file itself.
pub fn everdrive_save_path(image_path: &str) -> String {
    format!("EDN8/gamedata/{}/bram.srm", basename(image_path))
}
