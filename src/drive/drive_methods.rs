// Public operations and the pin-watching state machine.

// Imports

use log::{debug, info};

use crate::drive::codec::load::load_side_image;
use crate::drive::codec::save::save_side_image;
use crate::drive::drive_struct::{
    DiskDrive, DriveState, AUTOSAVE_DELAY, NOT_READY_TIME, NOT_READY_TIME_ORIGINAL,
};
use crate::drive::image::image_struct::MAX_SIDE_SIZE;
use crate::error_types::codec::{LoadError, SaveError};
use crate::host::host_trait::{HostSignals, OutputLines};
use crate::host::storage_trait::Storage;
use crate::settings::{RewindSpeed, SaveStrategy};

// Implementations

impl<H: HostSignals, S: Storage> DiskDrive<H, S> {
    /// Load one side of an image file and start emulating.
    ///
    /// Replaces whatever was loaded before. On failure the drive ends
    /// up in [`DriveState::Off`] with no media presented to the host.
    pub fn load_side(&mut self, path: &str, side: u8, read_only: bool) -> Result<(), LoadError> {
        let _ = self.close(false);
        self.reset_reading();

        // Media inserted, but not ready yet. The ready dwell runs
        // while we do file I/O.
        self.host.set_output(OutputLines::READY, false);
        self.host.set_output(OutputLines::MEDIA_SET, true);
        self.read_only = read_only;
        self.host
            .set_output(OutputLines::WRITABLE_MEDIA, !read_only);
        self.not_ready_time = self.host.ticks_ms();

        self.filename = Some(path.to_string());
        self.side = side;

        let redirect = self.settings.save_strategy == SaveStrategy::Everdrive;
        match load_side_image(&mut self.storage, path, side, redirect) {
            Ok(image) => self.image = Some(image),
            Err(err) => {
                let _ = self.close(false);
                return Err(err);
            }
        }

        // If the console is already spinning us in turbo mode, go
        // straight into the ready dwell.
        self.state = if self.host.scan_media() && self.settings.rewind_speed == RewindSpeed::Turbo
        {
            DriveState::ReadWaitReadyTimer
        } else {
            DriveState::Idle
        };
        self.check_pins();
        Ok(())
    }

    /// Persist disk changes according to the save strategy.
    /// A clean image is a successful no-op.
    pub fn save(&mut self) -> Result<(), SaveError> {
        if !self.changed {
            return Ok(());
        }
        if self.read_only {
            return Err(SaveError::ReadOnly);
        }
        let (Some(image), Some(path)) = (self.image.as_ref(), self.filename.clone()) else {
            return Ok(());
        };

        match save_side_image(
            &mut self.storage,
            image,
            &path,
            self.side,
            self.settings.save_strategy,
        ) {
            Ok(()) => {}
            // A checksum mismatch touches no files and changes no
            // state; everything else parks the machine in Idle so the
            // autosave window can retry.
            Err(SaveError::CrcMismatch) => return Err(SaveError::CrcMismatch),
            Err(err) => {
                self.state = DriveState::Idle;
                return Err(err);
            }
        }

        self.changed = false;
        self.check_pins();
        Ok(())
    }

    /// Eject: optionally save, stop everything, forget the image.
    /// A save failure is returned but the eject still happens.
    pub fn close(&mut self, save: bool) -> Result<(), SaveError> {
        self.host.set_output(OutputLines::MEDIA_SET, false);
        self.host.set_output(OutputLines::WRITABLE_MEDIA, false);

        let result = if save { self.save() } else { Ok(()) };

        self.stop();
        self.state = DriveState::Off;
        self.image = None;
        self.changed = false;

        result
    }

    /// Abort both engines, raise NOT_READY, park in Idle.
    pub(crate) fn stop(&mut self) {
        self.stop_reading();
        self.stop_writing();
        self.host.set_output(OutputLines::READY, false);
        self.state = DriveState::Idle;
    }

    /// The state machine tick. Call on every /SCAN_MEDIA or /WRITE
    /// edge and every ~100 ms besides.
    pub fn check_pins(&mut self) {
        if !self.host.scan_media() {
            // Motor off.
            match self.state {
                // Writing drains through the capture buffer until the
                // engine reaches the block end on its own.
                DriveState::Off | DriveState::Writing => {}
                DriveState::Idle => {
                    if self.changed
                        && self.host.ticks_ms() > self.last_action_time + AUTOSAVE_DELAY
                    {
                        debug!("autosave window reached, requesting save");
                        self.state = DriveState::SavePending;
                    }
                }
                DriveState::SavePending => {
                    // The foreground saves; we notice when it's done.
                    if !self.changed {
                        self.state = DriveState::Idle;
                    }
                }
                _ => {
                    self.stop();
                    if self.settings.rewind_speed == RewindSpeed::Turbo {
                        self.reset_reading();
                    }
                }
            }
            return;
        }

        // Motor on.
        if self.state == DriveState::SavePending && !self.changed {
            self.state = DriveState::Idle;
        }
        if !self.host.write_request() {
            // Console wants to read.
            match self.state {
                DriveState::Idle => {
                    if self.settings.rewind_speed == RewindSpeed::Turbo || self.current_byte == 0 {
                        // Hold NOT_READY for the rewind dwell first.
                        self.host.set_output(OutputLines::READY, false);
                        self.not_ready_time = self.host.ticks_ms();
                        self.state = DriveState::ReadWaitReadyTimer;
                        self.reset_reading();
                    } else {
                        // Head is mid-disk at original speed: stream
                        // now, the wrap through byte zero will raise
                        // NOT_READY when it comes.
                        self.start_reading();
                        self.state = DriveState::ReadWaitReady;
                    }
                }
                DriveState::ReadWaitReadyTimer => {
                    let dwell = if self.settings.rewind_speed == RewindSpeed::Original {
                        NOT_READY_TIME_ORIGINAL
                    } else {
                        NOT_READY_TIME
                    };
                    if self.host.ticks_ms() > self.not_ready_time + dwell {
                        self.host.set_output(OutputLines::READY, true);
                        self.start_reading();
                    }
                }
                DriveState::WritingStopping => {
                    self.stop_writing();
                    self.start_reading();
                }
                _ => {}
            }
        } else {
            // Console wants to write.
            match self.state {
                DriveState::Idle
                | DriveState::Reading
                | DriveState::ReadWaitReady
                | DriveState::ReadWaitReadyTimer => {
                    self.stop_reading();
                    self.start_writing();
                }
                _ => {}
            }
        }
        self.last_action_time = self.host.ticks_ms();
    }

    // Observers.

    pub fn state(&self) -> DriveState {
        self.state
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Index of the block the head is currently over, if any.
    pub fn current_block(&self) -> Option<usize> {
        self.image.as_ref()?.block_containing(self.current_byte)
    }

    pub fn block_count(&self) -> usize {
        self.image.as_ref().map_or(0, |image| image.block_count())
    }

    /// Head position on the media, in bytes.
    pub fn head_position(&self) -> usize {
        self.current_byte
    }

    /// Media capacity in bytes.
    pub fn max_size(&self) -> usize {
        MAX_SIDE_SIZE
    }

    pub fn used_space(&self) -> usize {
        self.image.as_ref().map_or(0, |image| image.used_space())
    }

    /// The loaded image, for inspection.
    pub fn image(&self) -> Option<&crate::drive::image::image_struct::SideImage> {
        self.image.as_ref()
    }

    /// The PWM DMA's source buffer.
    pub fn read_buffer(&self) -> &[u16] {
        &self.read_buffer
    }

    /// The capture DMA's target buffer. The host shell points its DMA
    /// here; the simulated host writes timestamps in directly.
    pub fn write_buffer_mut(&mut self) -> &mut [u16] {
        &mut self.write_buffer
    }
}

impl<H: HostSignals, S: Storage> DiskDrive<H, S> {
    /// Log a one-line summary of what is loaded. Handy in shells.
    pub fn log_summary(&self) {
        if let Some(image) = self.image.as_ref() {
            info!(
                "side {} of {}: {} blocks, {}/{} bytes used",
                self.side,
                self.filename.as_deref().unwrap_or("<none>"),
                image.block_count(),
                image.used_space(),
                MAX_SIDE_SIZE
            );
        } else {
            info!("no media loaded");
        }
    }
}
