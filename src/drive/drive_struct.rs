// The drive itself.

// Imports

use crate::drive::image::image_struct::SideImage;
use crate::host::host_trait::HostSignals;
use crate::host::storage_trait::Storage;
use crate::settings::DriveSettings;

// Transport constants

/// Phase slots in the read DMA buffer. Two slots make one bit cell,
/// and the DMA interrupts at the halfway mark, so keep it even.
pub const READ_BUFFER_SIZE: usize = 128;

/// Capture timestamps in the write DMA buffer.
pub const WRITE_BUFFER_SIZE: usize = 128;

/// PWM compare value for one read impulse. Anything short enough to
/// fit well inside a half-bit window works; the console only looks at
/// edges.
pub const READ_IMPULSE_LENGTH: u16 = 24;

/// The capture timer counts at 6 MHz, so these split the nominal
/// 10 / 15 / 20 microsecond pulse spacings at 12.5 and 17.5.
pub const THRESHOLD_1: u16 = 75;
pub const THRESHOLD_2: u16 = 105;

/// Pulses to discard after /WRITE asserts, while the analog side of a
/// real console is still ramping.
pub const WRITE_GAP_SKIP_BITS: u16 = 32;

/// Consecutive short pulses in the stopping state that mean the
/// console is writing the next block without toggling /WRITE.
/// Unlicensed software does this.
pub const MULTI_WRITE_UNLICENSED_BITS: u16 = 64;

/// How far past the end of data the head may run in turbo mode before
/// we snap it back.
pub const NOT_READY_BYTES: usize = 2;

/// NOT_READY dwell after a turbo rewind, milliseconds.
pub const NOT_READY_TIME: u32 = 100;

/// NOT_READY dwell emulating the real mechanism: roughly one full
/// pass of the head at the media bit rate, milliseconds.
pub const NOT_READY_TIME_ORIGINAL: u32 = 5440;

/// Idle time with the motor off before a dirty image is scheduled for
/// saving, milliseconds.
pub const AUTOSAVE_DELAY: u32 = 5000;

// Structs, Enums, Flags

/// Where the drive state machine is right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveState {
    /// No image loaded.
    Off,
    /// Image loaded, motor off.
    Idle,
    /// Dirty image waiting for the foreground to save it.
    SavePending,
    /// Motor on, holding NOT_READY for the rewind dwell.
    ReadWaitReadyTimer,
    /// Read engine running, but the console still sees NOT_READY
    /// until the head wraps back to byte zero.
    ReadWaitReady,
    /// Streaming data to the console.
    Reading,
    /// Console asserted /WRITE; swallowing the ramp and waiting for
    /// the start bit.
    WritingGap,
    /// Demodulating written data into the image.
    Writing,
    /// Block finished; waiting for /WRITE release or a consecutive
    /// block.
    WritingStopping,
}

/// One emulated quick-disk drive.
///
/// Owns the loaded side, both DMA buffers, every cursor, and the host
/// plumbing. The embedded shell calls the DMA service methods from its
/// transfer interrupts and everything else from the foreground;
/// `&mut self` everywhere keeps the ownership windows honest.
pub struct DiskDrive<H: HostSignals, S: Storage> {
    pub(crate) host: H,
    pub(crate) storage: S,
    pub(crate) settings: DriveSettings,

    pub(crate) state: DriveState,
    pub(crate) image: Option<SideImage>,

    // What is loaded.
    pub(crate) filename: Option<String>,
    pub(crate) side: u8,
    pub(crate) read_only: bool,
    pub(crate) changed: bool,

    // Head position. The read engine counts sixteen phases per byte,
    // the write engine eight bits.
    pub(crate) current_byte: usize,
    pub(crate) current_bit: u8,

    // Read engine.
    pub(crate) clock: bool,
    pub(crate) last_value: bool,

    // Write engine.
    pub(crate) write_carrier: u8,
    pub(crate) last_capture: u16,
    pub(crate) current_block_end: usize,
    pub(crate) write_gap_skip: u16,

    // Timing.
    pub(crate) not_ready_time: u32,
    pub(crate) last_action_time: u32,

    // DMA targets.
    pub(crate) read_buffer: [u16; READ_BUFFER_SIZE],
    pub(crate) write_buffer: [u16; WRITE_BUFFER_SIZE],
}

impl<H: HostSignals, S: Storage> DiskDrive<H, S> {
    pub fn new(host: H, storage: S, settings: DriveSettings) -> Self {
        DiskDrive {
            host,
            storage,
            settings,
            state: DriveState::Off,
            image: None,
            filename: None,
            side: 0,
            read_only: false,
            changed: false,
            current_byte: 0,
            current_bit: 0,
            clock: false,
            last_value: false,
            write_carrier: 0,
            last_capture: 0,
            current_block_end: 0,
            write_gap_skip: 0,
            not_ready_time: 0,
            last_action_time: 0,
            read_buffer: [0; READ_BUFFER_SIZE],
            write_buffer: [0; WRITE_BUFFER_SIZE],
        }
    }
}
