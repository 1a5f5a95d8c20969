// The read engine.
// Each slot of the read buffer is one half-bit phase: either silence
// or a single impulse. The console's RAM adapter reconstructs bits
// from the spacing of the impulses.

// Imports

use crate::drive::drive_struct::{
    DiskDrive, DriveState, NOT_READY_BYTES, READ_BUFFER_SIZE, READ_IMPULSE_LENGTH,
};
use crate::drive::image::image_struct::MAX_SIDE_SIZE;
use crate::host::host_trait::{DmaHalf, HostSignals, OutputLines};
use crate::host::storage_trait::Storage;
use crate::settings::RewindSpeed;

// Implementations

impl<H: HostSignals, S: Storage> DiskDrive<H, S> {
    /// Half-transfer callback for the read DMA. Refills whichever half
    /// the PWM just finished draining.
    pub fn read_dma_service(&mut self, half: DmaHalf) {
        match half {
            DmaHalf::First => self.fill_read_buffer(0, READ_BUFFER_SIZE / 2),
            DmaHalf::Second => self.fill_read_buffer(READ_BUFFER_SIZE / 2, READ_BUFFER_SIZE / 2),
        }
    }

    /// Produce `length` phase slots starting at `pos`.
    ///
    /// This is the hot path; it runs in interrupt context and must
    /// finish well inside `length` phase periods.
    pub(crate) fn fill_read_buffer(&mut self, pos: usize, length: usize) {
        match self.state {
            DriveState::Reading | DriveState::ReadWaitReady => {}
            _ => return,
        }
        let (used_space, turbo) = match self.image.as_ref() {
            Some(image) => (
                image.used_space(),
                self.settings.rewind_speed == RewindSpeed::Turbo,
            ),
            None => return,
        };

        for slot in pos..pos + length {
            self.clock = !self.clock;
            let byte = match self.image.as_ref() {
                Some(image) => image.data[self.current_byte],
                None => return,
            };
            let bit = (byte >> (self.current_bit / 2)) & 1 != 0;
            let value = bit ^ self.clock;
            // One impulse per low-to-high transition, silence otherwise.
            self.read_buffer[slot] = if value && !self.last_value {
                READ_IMPULSE_LENGTH - 1
            } else {
                0
            };
            self.last_value = value;
            self.current_bit += 1;
            if self.current_bit > 15 {
                self.current_bit = 0;
                self.current_byte = (self.current_byte + 1) % MAX_SIDE_SIZE;
                // Wrapped around, or ran off the end of data in turbo
                // mode: the "disk" has to rewind before the console
                // may scan again.
                if self.current_byte == 0
                    || (turbo && self.current_byte > used_space + NOT_READY_BYTES)
                {
                    self.host.set_output(OutputLines::READY, false);
                    self.not_ready_time = self.host.ticks_ms();
                    self.state = DriveState::ReadWaitReadyTimer;
                    self.reset_reading();
                }
            }
        }
    }

    /// Spin up the read path: prime the buffer, hand it to the PWM
    /// DMA, and start streaming.
    pub(crate) fn start_reading(&mut self) {
        self.current_bit = 0;
        self.fill_read_buffer(0, READ_BUFFER_SIZE);
        self.host.start_read_stream();
        self.state = DriveState::Reading;
    }

    pub(crate) fn stop_reading(&mut self) {
        self.host.stop_read_stream();
    }

    /// Park the read cursor for a rewind. Turbo snaps the head back to
    /// byte zero; original speed leaves it to sweep past the end.
    pub(crate) fn reset_reading(&mut self) {
        self.clock = false;
        if self.settings.rewind_speed == RewindSpeed::Turbo {
            self.current_byte = 0;
        }
        self.current_bit = 0;
        self.last_value = false;
    }
}
