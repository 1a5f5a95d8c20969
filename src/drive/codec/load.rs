// File to framed image.
// The file gives us bare payloads; we lay them out the way the head
// will see them, with gaps, terminators and fresh checksums.

// Imports

use log::{debug, info, warn};

use crate::drive::codec::{everdrive_save_path, header_len, ROM_HEADER_SIZE, ROM_SIDE_SIZE, SIGNATURE};
use crate::drive::crc::block_crc;
use crate::drive::image::image_methods::{block_kind, gap_bytes};
use crate::drive::image::image_struct::{SideImage, GAP_TERMINATOR, MAX_SIDE_SIZE};
use crate::error_types::codec::LoadError;
use crate::host::storage_trait::{OpenMode, Storage, StorageFile};

// Functions

/// Read one side out of an image file into a fresh [`SideImage`].
///
/// With the everdrive strategy the side is read from the game's
/// `bram.srm` when one exists, so earlier saves win over the pristine
/// image file.
pub fn load_side_image<S: Storage>(
    storage: &mut S,
    path: &str,
    side: u8,
    redirect_to_save: bool,
) -> Result<SideImage, LoadError> {
    let source = if redirect_to_save {
        let alt = everdrive_save_path(path);
        if storage.file_size(&alt).is_ok() {
            debug!("redirecting load to existing save file {alt}");
            alt
        } else {
            path.to_string()
        }
    } else {
        path.to_string()
    };

    let mut file = storage.open(&source, OpenMode::Read)?;
    let size = file.size();

    // A file is either bare sides or a 16-byte header plus sides.
    // Anything else is not ours.
    if size % ROM_SIDE_SIZE != 0 && size % ROM_SIDE_SIZE != ROM_HEADER_SIZE {
        warn!("{source}: size {size} is not a whole number of sides");
        return Err(LoadError::InvalidImage);
    }
    file.seek(header_len(size) + u64::from(side) * ROM_SIDE_SIZE)?;

    let image = parse_side(&mut file)?;
    info!(
        "loaded side {side} of {source}: {} blocks, {} media bytes",
        image.block_count(),
        image.used_space()
    );
    Ok(image)
}

/// Frame blocks from `file` until the side is full, the file runs out,
/// or a block doesn't look like the next block should.
fn parse_side<F: StorageFile>(file: &mut F) -> Result<SideImage, LoadError> {
    let mut image = SideImage::new()?;
    // Promised block count, known once the file-amount block is in.
    let mut min_blocks = 0;

    loop {
        let index = image.block_count();
        if index == 2 {
            let file_amount = image.data[image.block_offsets[1] + gap_bytes(1) + 1] as usize;
            min_blocks = file_amount * 2 + 2;
        }

        // The gap has to fit before we even look at the payload.
        let gap = gap_bytes(index);
        if image.used_space + gap > MAX_SIDE_SIZE {
            if index + 1 < min_blocks {
                return Err(LoadError::ImageTooLarge);
            }
            break;
        }
        image.block_offsets.push(image.used_space);
        let gap_start = image.used_space;
        image.data[gap_start..gap_start + gap - 1].fill(0);
        image.data[gap_start + gap - 1] = GAP_TERMINATOR;
        image.used_space += gap;

        // Payload plus checksum has to fit too.
        let payload_size = image.payload_size(index);
        if image.used_space + payload_size + 2 > MAX_SIDE_SIZE {
            rollback_gap(&mut image, gap);
            if index + 1 < min_blocks {
                return Err(LoadError::ImageTooLarge);
            }
            break;
        }

        let start = image.used_space;
        let got = file.read(&mut image.data[start..start + payload_size])?;
        if got != payload_size {
            // End of file. Fine if we already have what was promised.
            rollback_gap(&mut image, gap);
            if index + 1 < min_blocks {
                warn!("file ended at block {index}, expected at least {min_blocks}");
                return Err(LoadError::InvalidImage);
            }
            break;
        }
        if image.data[start] != block_kind(index) {
            rollback_gap(&mut image, gap);
            if index + 1 < min_blocks {
                warn!(
                    "block {index} tagged {:#04x}, expected {:#04x}",
                    image.data[start],
                    block_kind(index)
                );
                return Err(LoadError::InvalidImage);
            }
            break;
        }
        if index == 0 && image.data[start + 1..start + 1 + SIGNATURE.len()] != SIGNATURE[..] {
            warn!("disk info block is missing the format signature");
            return Err(LoadError::InvalidImage);
        }

        let crc = block_crc(&image.data[start..start + payload_size]);
        image.used_space += payload_size;
        image.data[image.used_space] = crc as u8;
        image.data[image.used_space + 1] = (crc >> 8) as u8;
        image.used_space += 2;
    }

    Ok(image)
}

/// Undo the gap laid for a block that turned out not to exist.
fn rollback_gap(image: &mut SideImage, gap: usize) {
    image.data[image.used_space - 1] = 0; // remove terminator
    image.used_space -= gap;
    let _ = image.block_offsets.pop();
}
