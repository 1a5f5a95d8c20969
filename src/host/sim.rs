// A console that lives entirely in memory.
// The whole test suite runs against these instead of real hardware,
// which keeps every scenario deterministic and repeatable.

pub mod sim_host_methods;
pub mod sim_host_struct;
pub mod sim_storage;
