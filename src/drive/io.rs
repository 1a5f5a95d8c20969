// The two bit engines. Read produces phase slots for the PWM DMA,
// write consumes capture timestamps from the other one. They never
// run at the same time; the state machine guarantees it.

pub mod read;
pub mod write;
