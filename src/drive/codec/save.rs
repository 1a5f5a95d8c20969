// Framed image back to file.
// Only payloads go out; gaps and checksums are a media-side thing.

// Imports

use log::{debug, error, info};

use crate::drive::codec::{everdrive_save_path, ROM_HEADER_SIZE, ROM_SIDE_SIZE};
use crate::drive::crc::check_crc;
use crate::drive::image::image_struct::SideImage;
use crate::error_types::codec::SaveError;
use crate::error_types::storage::StorageError;
use crate::host::storage_trait::{basename, OpenMode, Storage, StorageFile};
use crate::settings::SaveStrategy;

// Functions

/// Write every block of `image` back into side `side` of the right
/// file for `strategy`, creating the backup / everdrive target on the
/// first save.
pub fn save_side_image<S: Storage>(
    storage: &mut S,
    image: &SideImage,
    path: &str,
    side: u8,
    strategy: SaveStrategy,
) -> Result<(), SaveError> {
    // Refuse to persist anything whose checksum went bad. A console
    // always rewrites the checksum with the block, so a mismatch here
    // means the buffer was half-written or corrupted.
    for index in 0..image.block_count() {
        if !check_crc(image.payload(index), image.stored_crc(index)) {
            error!("block {index} checksum mismatch, aborting save");
            return Err(SaveError::CrcMismatch);
        }
    }

    let destination = match strategy {
        SaveStrategy::InPlace => path.to_string(),
        SaveStrategy::RewriteBackup => {
            // The original gets rewritten; the side-file keeps the
            // pristine copy from before the first save.
            let backup = format!("{path}.bak");
            ensure_copy(storage, path, &backup, false)?;
            path.to_string()
        }
        SaveStrategy::Everdrive => {
            make_everdrive_dirs(storage, path)?;
            let save_file = everdrive_save_path(path);
            // The save file holds bare sides, so drop the header when
            // seeding it from a headered original.
            ensure_copy(storage, path, &save_file, true)?;
            save_file
        }
    };

    // Where the requested side starts in the destination. The header
    // length comes from the destination's own size: a seeded save file
    // is headerless even when the original is not.
    let destination_size = storage.file_size(&destination)?;
    let header_offset = destination_size % ROM_SIDE_SIZE;

    let mut file = storage.open(&destination, OpenMode::Write)?;
    file.seek(header_offset + u64::from(side) * ROM_SIDE_SIZE)?;
    for index in 0..image.block_count() {
        file.write_all(image.payload(index))?;
    }

    info!(
        "saved {} blocks of side {side} to {destination}",
        image.block_count()
    );
    Ok(())
}

/// Create the everdrive directory chain for `path`. "Already there"
/// is success at every level.
fn make_everdrive_dirs<S: Storage>(storage: &mut S, path: &str) -> Result<(), SaveError> {
    for dir in [
        "EDN8".to_string(),
        "EDN8/gamedata".to_string(),
        format!("EDN8/gamedata/{}", basename(path)),
    ] {
        match storage.mkdir(&dir) {
            Ok(()) | Err(StorageError::AlreadyExists) => {}
            Err(other) => return Err(other.into()),
        }
    }
    Ok(())
}

/// Copy `from` to `to` verbatim unless `to` already exists.
fn ensure_copy<S: Storage>(
    storage: &mut S,
    from: &str,
    to: &str,
    strip_header: bool,
) -> Result<(), SaveError> {
    match storage.file_size(to) {
        Ok(_) => return Ok(()),
        Err(StorageError::NotFound) => {}
        Err(other) => return Err(other.into()),
    }
    debug!("seeding {to} from {from}");

    let mut src = storage.open(from, OpenMode::Read)?;
    let mut dst = storage.open(to, OpenMode::CreateNew)?;
    if strip_header && src.size() % ROM_SIDE_SIZE == ROM_HEADER_SIZE {
        src.seek(ROM_HEADER_SIZE)?;
    }
    let mut chunk = [0u8; 4096];
    loop {
        let got = src.read(&mut chunk)?;
        if got == 0 {
            break;
        }
        dst.write_all(&chunk[..got])?;
    }
    Ok(())
}
