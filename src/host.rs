// Everything between the drive core and the physical world.

pub mod host_trait;
pub mod storage_trait;
pub mod std_storage;

// Deterministic stand-ins for tests and the diagnostics binary.
pub mod sim;
