// The drive core.

// The block checksum.
pub mod crc;

// Raw side bytes plus the block table.
pub mod image;

// Between the framed image and the file on storage.
pub mod codec;

// The two bit engines.
pub mod io;

// The aggregate and its state machine.
pub mod drive_methods;
pub mod drive_struct;
