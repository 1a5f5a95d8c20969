// Simulated console-side pins and timers.

// Imports

use std::cell::RefCell;
use std::rc::Rc;

use crate::host::host_trait::OutputLines;

// Structs, Enums, Flags

/// The observable state of the simulated host.
#[derive(Debug)]
pub(super) struct SimHostInner {
    /// Which of our output lines are currently asserted.
    pub(super) outputs: OutputLines,
    /// Console is spinning the motor.
    pub(super) scan_media: bool,
    /// Console is driving the write line.
    pub(super) write_request: bool,
    /// Simulated monotonic clock.
    pub(super) now_ms: u32,
    /// Read PWM + DMA running.
    pub(super) read_streaming: bool,
    /// Capture timer + DMA running.
    pub(super) write_capturing: bool,
    /// How many times each stream was started, for assertions.
    pub(super) read_starts: u32,
    pub(super) write_starts: u32,
}

/// A simulated host. Cloning hands out another handle onto the same
/// pins, so a test can keep one side while the drive owns the other.
#[derive(Clone)]
pub struct SimHost {
    pub(super) inner: Rc<RefCell<SimHostInner>>,
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimHost {
    pub fn new() -> Self {
        SimHost {
            inner: Rc::new(RefCell::new(SimHostInner {
                outputs: OutputLines::empty(),
                scan_media: false,
                write_request: false,
                now_ms: 0,
                read_streaming: false,
                write_capturing: false,
                read_starts: 0,
                write_starts: 0,
            })),
        }
    }
}
