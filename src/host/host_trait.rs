// Every host shell MUST implement this.
// On real hardware these map straight onto GPIO, a PWM timer with a
// circular DMA, and an input-capture timer with another one.

use bitflags::bitflags;

// Structs, Enums, Flags

bitflags! {
    /// The three output lines we drive toward the console.
    /// All of them are active low on the connector; `set_output` takes
    /// the logical "asserted" view so nobody has to think about that
    /// twice.
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct OutputLines: u8 {
        /// Drive is ready to stream data.
        const READY = 1 << 0;
        /// A disk is inserted.
        const MEDIA_SET = 1 << 1;
        /// The inserted disk is writable.
        const WRITABLE_MEDIA = 1 << 2;
    }
}

/// Which half of a circular DMA buffer a callback refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaHalf {
    First,
    Second,
}

/// Pin, timer and DMA plumbing the drive core talks through.
///
/// The core never touches a register directly; a shell for a concrete
/// board implements this, and the simulated host in [`crate::host::sim`]
/// implements it for tests.
pub trait HostSignals {
    /// Drive one of our output lines. `asserted` is the logical state;
    /// the implementation owns the active-low inversion.
    fn set_output(&mut self, line: OutputLines, asserted: bool);

    /// /SCAN_MEDIA input: true while the console spins the motor.
    fn scan_media(&self) -> bool;

    /// /WRITE input: true while the console is writing.
    fn write_request(&self) -> bool;

    /// Start the PWM + DMA pair that drains the read buffer onto the
    /// read-data line. The DMA must call back into
    /// `DiskDrive::read_dma_service` at each half-transfer.
    fn start_read_stream(&mut self);

    /// Abort the read-side DMA and stop the PWM output.
    fn stop_read_stream(&mut self);

    /// Start the input-capture timer + DMA pair that fills the write
    /// buffer with edge timestamps. The DMA must call back into
    /// `DiskDrive::write_dma_service` at each half-transfer.
    fn start_write_capture(&mut self);

    /// Abort the capture DMA and stop the capture timer.
    fn stop_write_capture(&mut self);

    /// Monotonic millisecond counter.
    fn ticks_ms(&self) -> u32;
}
