// The two faces of the simulated host: the HostSignals impl the drive
// sees, and the control surface a test pokes at.

// Imports

use crate::host::host_trait::{HostSignals, OutputLines};
use crate::host::sim::sim_host_struct::SimHost;

// Implementations

impl HostSignals for SimHost {
    fn set_output(&mut self, line: OutputLines, asserted: bool) {
        let mut inner = self.inner.borrow_mut();
        if asserted {
            inner.outputs.insert(line);
        } else {
            inner.outputs.remove(line);
        }
    }

    fn scan_media(&self) -> bool {
        self.inner.borrow().scan_media
    }

    fn write_request(&self) -> bool {
        self.inner.borrow().write_request
    }

    fn start_read_stream(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.read_streaming = true;
        inner.read_starts += 1;
    }

    fn stop_read_stream(&mut self) {
        self.inner.borrow_mut().read_streaming = false;
    }

    fn start_write_capture(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.write_capturing = true;
        inner.write_starts += 1;
    }

    fn stop_write_capture(&mut self) {
        self.inner.borrow_mut().write_capturing = false;
    }

    fn ticks_ms(&self) -> u32 {
        self.inner.borrow().now_ms
    }
}

// Test-side controls.

impl SimHost {
    /// Spin the motor up or down.
    pub fn set_scan_media(&self, spinning: bool) {
        self.inner.borrow_mut().scan_media = spinning;
    }

    /// Assert or release the write line.
    pub fn set_write_request(&self, writing: bool) {
        self.inner.borrow_mut().write_request = writing;
    }

    /// Let simulated time pass.
    pub fn advance_ms(&self, ms: u32) {
        let mut inner = self.inner.borrow_mut();
        inner.now_ms = inner.now_ms.wrapping_add(ms);
    }

    /// Is a given output line asserted right now?
    pub fn output_asserted(&self, line: OutputLines) -> bool {
        self.inner.borrow().outputs.contains(line)
    }

    pub fn read_streaming(&self) -> bool {
        self.inner.borrow().read_streaming
    }

    pub fn write_capturing(&self) -> bool {
        self.inner.borrow().write_capturing
    }

    pub fn read_starts(&self) -> u32 {
        self.inner.borrow().read_starts
    }

    pub fn write_starts(&self) -> u32 {
        self.inner.borrow().write_starts
    }
}
