// The drive core cannot use unwraps.
#![deny(clippy::unwrap_used)]

// Asserts need to have a reason.
#![deny(clippy::missing_assert_message)]

// Gotta use all the results.
#![deny(unused_results)]

// The drive itself: image model, codec, bit engines, state machine.
pub mod drive;

// Seams to the outside world: pins, timers, storage.
pub mod host;

// Error enums for everything above.
pub mod error_types;

// Rewind speed and save strategy knobs.
pub mod settings;

// Small odds and ends.
pub mod helpers;
