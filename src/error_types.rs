// All the ways things go wrong, one module per concern.
// We do not allow string errors. This is RUST damn it, not C!

pub mod codec;
pub mod storage;
