// Whole-session scenarios: the console spins, reads, writes, and the
// drive follows, all over the public surface.
// Unwrapping is okay here, since we want unexpected outcomes to fail tests.
#![allow(clippy::unwrap_used)]

use test_log::test; // We want to see logs while testing.

use quickdisk::drive::crc::block_crc;
use quickdisk::drive::drive_struct::{DriveState, NOT_READY_TIME};
use quickdisk::host::host_trait::OutputLines;
use quickdisk::settings::SaveStrategy;

use crate::test_common::{
    block_write_pulses, drive_over, image_dir, with_crc, PulseFeeder, ReadPump,
};
pub mod test_common;

// Power-on to streaming: the drive walks Off, Idle, the ready dwell,
// then Reading with READY asserted.
#[test]
fn spin_up_state_walk() {
    let dir = image_dir("game.fds", &[b"first file"]);
    let (mut drive, host) = drive_over(&dir, SaveStrategy::InPlace);
    assert_eq!(drive.state(), DriveState::Off);

    drive.load_side("game.fds", 0, false).unwrap();
    assert_eq!(drive.state(), DriveState::Idle);
    assert!(host.output_asserted(OutputLines::MEDIA_SET));

    host.set_scan_media(true);
    drive.check_pins();
    assert_eq!(drive.state(), DriveState::ReadWaitReadyTimer);
    assert!(!host.output_asserted(OutputLines::READY));

    host.advance_ms(NOT_READY_TIME + 1);
    drive.check_pins();
    assert_eq!(drive.state(), DriveState::Reading);
    assert!(host.output_asserted(OutputLines::READY));
}

// One full pass over the data raises NOT_READY again and rewinds.
#[test]
fn full_traversal_rewinds() {
    let dir = image_dir("game.fds", &[b"traverse me"]);
    let (mut drive, host) = drive_over(&dir, SaveStrategy::InPlace);
    drive.load_side("game.fds", 0, false).unwrap();
    host.set_scan_media(true);
    drive.check_pins();
    host.advance_ms(NOT_READY_TIME + 1);
    drive.check_pins();

    let used = drive.used_space();
    let mut pump = ReadPump::new();
    pump.pump(&mut drive, (used + 8) * 16 / 64);

    assert_eq!(drive.state(), DriveState::ReadWaitReadyTimer);
    assert!(!host.output_asserted(OutputLines::READY));
    assert!(drive.head_position() < 8, "head snapped back");
}

// Mid-read the console decides to rewrite the file data block: stream
// to it, overwrite it, and come back reading.
#[test]
fn overwrite_one_block_mid_session() {
    let body = b"new file body 16";
    let dir = image_dir("game.fds", &[b"old file body 16"]);
    let (mut drive, host) = drive_over(&dir, SaveStrategy::InPlace);
    drive.load_side("game.fds", 0, false).unwrap();
    host.set_scan_media(true);
    drive.check_pins();
    host.advance_ms(NOT_READY_TIME + 1);
    drive.check_pins();

    // Stream until the head reaches the file data block.
    let mut pump = ReadPump::new();
    let mut reached = false;
    for _ in 0..4096 {
        pump.pump(&mut drive, 1);
        if drive.current_block() == Some(3) {
            reached = true;
            break;
        }
    }
    assert!(reached, "head must reach the data block");

    // The console flips to writing.
    host.set_write_request(true);
    drive.check_pins();
    assert_eq!(drive.state(), DriveState::WritingGap);

    let mut payload = vec![4u8];
    payload.extend_from_slice(body);
    let mut feeder = PulseFeeder::new();
    feeder.feed(&mut drive, &block_write_pulses(&with_crc(&payload)));
    assert_eq!(drive.state(), DriveState::WritingStopping);

    // Release /WRITE: streaming resumes.
    host.set_write_request(false);
    drive.check_pins();
    assert_eq!(drive.state(), DriveState::Reading);

    let image = drive.image().unwrap();
    assert_eq!(image.payload(3), &payload[..]);
    assert_eq!(image.stored_crc(3), block_crc(&payload).to_le_bytes());
    assert!(drive.is_changed());
}

// The CRC guard: a block whose stored checksum went stale blocks the
// save and the file stays untouched.
#[test]
fn stale_checksum_blocks_the_save() {
    use quickdisk::error_types::codec::SaveError;

    let dir = image_dir("game.fds", &[b"guard me"]);
    let before = std::fs::read(dir.path().join("game.fds")).unwrap();

    let (mut drive, host) = drive_over(&dir, SaveStrategy::InPlace);
    drive.load_side("game.fds", 0, false).unwrap();

    // Half a rewrite: the payload changes but the block never closes,
    // so the stored checksum goes stale.
    host.set_scan_media(true);
    drive.check_pins();
    host.advance_ms(NOT_READY_TIME + 1);
    drive.check_pins();
    host.set_write_request(true);
    drive.check_pins();

    let mut feeder = PulseFeeder::new();
    feeder.feed(&mut drive, &block_write_pulses(&[0xFF; 8]));
    assert!(drive.is_changed());

    assert_eq!(drive.save(), Err(SaveError::CrcMismatch));
    assert_eq!(
        std::fs::read(dir.path().join("game.fds")).unwrap(),
        before,
        "no bytes may reach the file"
    );
}
