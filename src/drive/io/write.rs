// The write engine.
// The capture timer stamps every falling edge on the write-data line;
// the spacing between stamps is one of three durations, and together
// with the carrier state that spacing demodulates back into bits.

// Imports

use log::warn;

use crate::drive::drive_struct::{
    DiskDrive, DriveState, MULTI_WRITE_UNLICENSED_BITS, THRESHOLD_1, THRESHOLD_2,
    WRITE_BUFFER_SIZE, WRITE_GAP_SKIP_BITS,
};
use crate::drive::image::image_methods::gap_bytes;
use crate::drive::image::image_struct::{GAP_TERMINATOR, MAX_SIDE_SIZE};
use crate::host::host_trait::{DmaHalf, HostSignals, OutputLines};
use crate::host::storage_trait::Storage;

// Implementations

impl<H: HostSignals, S: Storage> DiskDrive<H, S> {
    /// Half-transfer callback for the capture DMA. Turns the finished
    /// half's timestamps into pulse intervals and feeds the decoder.
    pub fn write_dma_service(&mut self, half: DmaHalf) {
        let (start, length) = match half {
            DmaHalf::First => (0, WRITE_BUFFER_SIZE / 2),
            DmaHalf::Second => (WRITE_BUFFER_SIZE / 2, WRITE_BUFFER_SIZE / 2),
        };
        for pos in start..start + length {
            let stamp = self.write_buffer[pos];
            let pulse = stamp.wrapping_sub(self.last_capture);
            self.last_capture = stamp;
            self.write_impulse(pulse);
        }
    }

    /// Decode one pulse interval.
    pub(crate) fn write_impulse(&mut self, pulse: u16) {
        match self.state {
            DriveState::WritingGap | DriveState::Writing => {}
            DriveState::WritingStopping => {
                // Consecutive short pulses here mean the console went
                // straight into the next block without releasing
                // /WRITE. Count them; anything longer resets.
                if pulse < THRESHOLD_1 {
                    self.write_gap_skip += 1;
                } else {
                    self.write_gap_skip = 0;
                }
                if self.write_gap_skip >= MULTI_WRITE_UNLICENSED_BITS {
                    self.reset_writing();
                    self.state = DriveState::WritingGap;
                }
                return;
            }
            other => {
                // Capture data arriving in a state that shouldn't have
                // any. Shut the capture path down.
                warn!("write pulse while {other:?}, stopping capture");
                self.stop_writing();
                return;
            }
        }

        if self.state == DriveState::WritingGap {
            if self.write_gap_skip < WRITE_GAP_SKIP_BITS {
                // Ramp garbage right after /WRITE asserts.
                self.write_gap_skip += 1;
            } else if pulse >= THRESHOLD_1 {
                // The gap ends with a start '1' bit, always the middle
                // duration.
                self.write_carrier = 0;
                self.current_bit = 0;
                self.state = DriveState::Writing;
            }
            return;
        }

        // Three possible spacings, two carrier phases.
        let key = self.write_carrier
            | if pulse < THRESHOLD_1 {
                2
            } else if pulse < THRESHOLD_2 {
                3
            } else {
                4
            };
        match key {
            0x82 => {
                self.write_bit(0);
                self.write_carrier = 0x80;
            }
            0x83 => {
                self.write_bit(1);
                self.write_carrier = 0;
            }
            0x02 => {
                self.write_bit(1);
                self.write_carrier = 0;
            }
            0x03 => {
                self.write_bit(0);
                self.write_bit(0);
                self.write_carrier = 0x80;
            }
            0x04 => {
                self.write_bit(0);
                self.write_bit(1);
                self.write_carrier = 0;
            }
            // 0x84: a long spacing with the carrier high never occurs
            // in a valid stream. Drop it.
            _ => {}
        }
    }

    /// Shift one demodulated bit into the image, and finalize the
    /// block when the head crosses its end.
    pub(crate) fn write_bit(&mut self, bit: u8) {
        if let Some(image) = self.image.as_mut() {
            image.data[self.current_byte] = (image.data[self.current_byte] >> 1) | (bit << 7);
        } else {
            return;
        }
        self.current_bit += 1;
        if self.current_bit > 7 {
            self.current_bit = 0;
            self.current_byte = (self.current_byte + 1) % MAX_SIDE_SIZE;
            if self.current_byte >= self.current_block_end {
                // End of block.
                if self.host.scan_media() {
                    self.state = DriveState::WritingStopping;
                    if !self.host.write_request() {
                        // /WRITE already released, back to streaming.
                        self.stop_writing();
                        self.start_reading();
                    } else {
                        // Console still writing garbage past the end.
                        self.write_gap_skip = 0;
                        self.state = DriveState::WritingStopping;
                    }
                } else {
                    // Motor gone, full stop.
                    self.stop();
                }
            }
        }
    }

    /// Work out which block the head sits in (appending a fresh one if
    /// it ran past the end), re-lay that block's gap, and point the
    /// cursors at it.
    pub(crate) fn reset_writing(&mut self) {
        let head = self.current_byte;
        let mut do_stop = false;
        let mut wrapped_end = false;
        let new_head;
        let block_end;
        {
            let Some(image) = self.image.as_mut() else {
                return;
            };

            // Find the block under the head.
            let mut current_block = 0;
            let mut index = 0;
            loop {
                if index >= image.block_offsets.len() {
                    // Past every known block: append a new one.
                    let offset = if index == 0 {
                        0
                    } else {
                        image.block_offsets[index - 1] + image.total_size(index - 1, true, true)
                    };
                    image.block_offsets.push(offset);
                    current_block = index;
                    break;
                }
                if head < image.block_offsets[index] + image.total_size(index, true, true) {
                    current_block = index;
                    break;
                }
                index += 1;
            }

            let count = image.block_offsets.len();
            image.used_space =
                image.block_offsets[count - 1] + image.total_size(count - 1, true, true);

            let cur_off = image.block_offsets[current_block];
            let gap = gap_bytes(current_block);
            block_end =
                (cur_off + gap + image.total_size(current_block, false, true)) % MAX_SIDE_SIZE;

            if image.used_space > MAX_SIDE_SIZE {
                // The fresh block doesn't fit. Drop it and stop below.
                warn!("write ran past the media capacity, dropping trailing block");
                let _ = image.block_offsets.pop();
                do_stop = true;
            }

            if block_end < cur_off {
                // Block end wrapped around the media. This should not
                // happen; park the head and go not-ready.
                wrapped_end = true;
                new_head = cur_off;
            } else {
                if current_block + 1 < image.block_offsets.len()
                    && block_end != image.block_offsets[current_block + 1]
                {
                    // The rewritten block spills into (or no longer
                    // lines up with) its successor. Everything behind
                    // it is garbage now.
                    image.truncate_blocks(current_block + 1);
                }
                // Fresh gap in front of the payload.
                let mut pos = cur_off;
                image.data[pos..pos + gap - 1].fill(0);
                pos += gap - 1;
                image.data[pos] = GAP_TERMINATOR;
                new_head = pos + 1;
            }
        }

        if do_stop {
            self.stop();
        }
        self.current_byte = new_head;
        self.current_block_end = block_end;
        if wrapped_end {
            self.host.set_output(OutputLines::READY, false);
            return;
        }
        self.write_gap_skip = 0;
        self.changed = true;
    }

    /// Spin up the write path.
    pub(crate) fn start_writing(&mut self) {
        self.reset_writing();
        self.state = DriveState::WritingGap;
        self.host.start_write_capture();
    }

    pub(crate) fn stop_writing(&mut self) {
        self.host.stop_write_capture();
    }
}
