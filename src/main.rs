// Manual exercise tool: load a side of an image and show what the
// drive would put on the media.

use quickdisk::drive::drive_struct::DiskDrive;
use quickdisk::drive::image::image_methods::gap_bytes;
use quickdisk::helpers::hex_view::hex_view;
use quickdisk::host::sim::sim_host_struct::SimHost;
use quickdisk::host::std_storage::StdStorage;
use quickdisk::settings::DriveSettings;

fn main() {
    // usage: quickdisk <image.fds> [side]
    // The path is taken relative to the working directory.
    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: quickdisk <image.fds> [side]");
            std::process::exit(2);
        }
    };
    let side: u8 = args.next().and_then(|raw| raw.parse().ok()).unwrap_or(0);

    // A simulated console is all we need to inspect an image.
    let host = SimHost::new();
    let storage = StdStorage::new(".");
    let mut drive = DiskDrive::new(host, storage, DriveSettings::default());

    if let Err(err) = drive.load_side(&path, side, true) {
        eprintln!("could not load {path}: {err}");
        std::process::exit(1);
    }

    let image = drive.image().expect("load succeeded, image is present");
    println!(
        "side {side}: {} blocks, {} of {} media bytes used",
        image.block_count(),
        image.used_space(),
        drive.max_size()
    );
    for index in 0..image.block_count() {
        let crc = image.stored_crc(index);
        println!(
            "  block {index:3}: offset {:5}  gap {:4}  payload {:5}  crc {:02X}{:02X}",
            image.block_offset(index),
            gap_bytes(index),
            image.payload_size(index),
            crc[1],
            crc[0],
        );
    }

    // The disk info block, as the console would read it.
    println!("{}", hex_view(image.payload(0)));
}
