// Shared helpers for the integration suite: image files on real
// (temporary) storage, a simulated console, and the pulse plumbing.
#![allow(dead_code)]

use log::info;
use tempfile::{tempdir, TempDir};

use quickdisk::drive::crc::block_crc;
use quickdisk::drive::drive_struct::{DiskDrive, DriveState, NOT_READY_TIME, WRITE_GAP_SKIP_BITS};
use quickdisk::host::host_trait::{DmaHalf, HostSignals};
use quickdisk::host::sim::sim_host_struct::SimHost;
use quickdisk::host::std_storage::StdStorage;
use quickdisk::host::storage_trait::Storage;
use quickdisk::settings::{DriveSettings, RewindSpeed, SaveStrategy};

pub type FileDrive = DiskDrive<SimHost, StdStorage>;

/// Pulse spacings in capture ticks: the nominal 10 / 15 / 20 µs.
pub const SHORT: u16 = 60;
pub const MEDIUM: u16 = 90;
pub const LONG: u16 = 120;

//
// Image building
//

/// One zero-padded side holding the given file bodies.
pub fn side_bytes(file_bodies: &[&[u8]]) -> Vec<u8> {
    let mut bytes = Vec::new();

    let mut info = vec![0u8; 56];
    info[0] = 1;
    info[1..15].copy_from_slice(b"*NINTENDO-HVC*");
    bytes.extend_from_slice(&info);

    bytes.extend_from_slice(&[2, file_bodies.len() as u8]);

    for (number, body) in file_bodies.iter().enumerate() {
        let mut header = vec![0u8; 16];
        header[0] = 3;
        header[1] = number as u8;
        header[0x0D] = (body.len() & 0xFF) as u8;
        header[0x0E] = (body.len() >> 8) as u8;
        bytes.extend_from_slice(&header);

        bytes.push(4);
        bytes.extend_from_slice(body);
    }
    bytes.resize(65500, 0);
    bytes
}

/// A temp dir with an image file in it, ready to mount a drive over.
pub fn image_dir(name: &str, file_bodies: &[&[u8]]) -> TempDir {
    let dir = tempdir().expect("temp dir for test images");
    std::fs::write(dir.path().join(name), side_bytes(file_bodies)).expect("write test image");
    info!("test image at {}", dir.path().to_string_lossy());
    dir
}

/// Payload plus its little-endian checksum, as a console writes it.
pub fn with_crc(payload: &[u8]) -> Vec<u8> {
    let mut bytes = payload.to_vec();
    bytes.extend_from_slice(&block_crc(payload).to_le_bytes());
    bytes
}

//
// Drive building
//

pub fn settings(rewind_speed: RewindSpeed, save_strategy: SaveStrategy) -> DriveSettings {
    DriveSettings {
        rewind_speed,
        save_strategy,
    }
}

/// A turbo-rewind drive over the given directory. Returns the host
/// handle alongside so tests can work the console side of the cable.
pub fn drive_over(dir: &TempDir, save_strategy: SaveStrategy) -> (FileDrive, SimHost) {
    let host = SimHost::new();
    let storage = StdStorage::new(dir.path());
    let drive = DiskDrive::new(
        host.clone(),
        storage,
        settings(RewindSpeed::Turbo, save_strategy),
    );
    (drive, host)
}

/// Spin the motor and wait out the ready dwell; leaves the drive
/// streaming.
pub fn spin_up(drive: &mut FileDrive, host: &SimHost) {
    host.set_scan_media(true);
    drive.check_pins();
    host.advance_ms(NOT_READY_TIME + 1);
    drive.check_pins();
    assert_eq!(drive.state(), DriveState::Reading, "drive should stream");
}

//
// Pulse plumbing
//

/// Intervals that decode back to `bytes`, starting from the carrier
/// state the gap start bit leaves behind.
pub fn modulate(bytes: &[u8]) -> Vec<u16> {
    let bits: Vec<u8> = bytes
        .iter()
        .flat_map(|byte| (0..8).map(move |index| (byte >> index) & 1))
        .collect();
    let mut intervals = Vec::new();
    let mut carrier = 0u8;
    let mut index = 0;
    while index < bits.len() {
        if carrier == 0x80 {
            if bits[index] == 0 {
                intervals.push(SHORT);
            } else {
                intervals.push(MEDIUM);
                carrier = 0;
            }
            index += 1;
        } else if bits[index] == 1 {
            intervals.push(SHORT);
            index += 1;
        } else if index + 1 >= bits.len() || bits[index + 1] == 0 {
            intervals.push(MEDIUM);
            carrier = 0x80;
            index += 2;
        } else {
            intervals.push(LONG);
            index += 2;
        }
    }
    intervals
}

/// Ramp garbage, the gap start bit, then the data train, front padded
/// to fill capture DMA halves exactly.
pub fn block_write_pulses(bytes: &[u8]) -> Vec<u16> {
    let data = modulate(bytes);
    let mut pulses = vec![SHORT; WRITE_GAP_SKIP_BITS as usize];
    let pad = (64 - (pulses.len() + 1 + data.len()) % 64) % 64;
    pulses.extend(std::iter::repeat(SHORT).take(pad));
    pulses.push(MEDIUM);
    pulses.extend(data);
    pulses
}

/// Feeds pulse trains through the capture buffer as cumulative
/// timestamps, one DMA half at a time.
pub struct PulseFeeder {
    timestamp: u16,
    second_half: bool,
}

impl Default for PulseFeeder {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseFeeder {
    pub fn new() -> Self {
        PulseFeeder {
            timestamp: 0,
            second_half: false,
        }
    }

    pub fn feed<H: HostSignals, S: Storage>(
        &mut self,
        drive: &mut DiskDrive<H, S>,
        intervals: &[u16],
    ) {
        assert!(
            intervals.len() % 64 == 0,
            "pulse trains must fill whole DMA halves"
        );
        for chunk in intervals.chunks(64) {
            let base = if self.second_half { 64 } else { 0 };
            for (index, &interval) in chunk.iter().enumerate() {
                self.timestamp = self.timestamp.wrapping_add(interval);
                drive.write_buffer_mut()[base + index] = self.timestamp;
            }
            drive.write_dma_service(if self.second_half {
                DmaHalf::Second
            } else {
                DmaHalf::First
            });
            self.second_half = !self.second_half;
        }
    }
}

/// Drains the read buffer half by half, like the PWM DMA would.
pub struct ReadPump {
    second_half: bool,
}

impl Default for ReadPump {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadPump {
    pub fn new() -> Self {
        ReadPump { second_half: false }
    }

    pub fn pump<H: HostSignals, S: Storage>(&mut self, drive: &mut DiskDrive<H, S>, halves: usize) {
        for _ in 0..halves {
            drive.read_dma_service(if self.second_half {
                DmaHalf::Second
            } else {
                DmaHalf::First
            });
            self.second_half = !self.second_half;
        }
    }
}

/// Rewrite the block currently under the head with `payload` through
/// the write path, leaving the drive in WritingStopping.
pub fn write_block(drive: &mut FileDrive, host: &SimHost, feeder: &mut PulseFeeder, payload: &[u8]) {
    host.set_write_request(true);
    drive.check_pins();
    feeder.feed(drive, &block_write_pulses(&with_crc(payload)));
    assert_eq!(
        drive.state(),
        DriveState::WritingStopping,
        "block should have closed"
    );
}

/// A fresh disk-info payload with a recognizable tail.
pub fn info_payload(fill: u8) -> Vec<u8> {
    let mut payload = vec![fill; 56];
    payload[0] = 1;
    payload[1..15].copy_from_slice(b"*NINTENDO-HVC*");
    payload
}
