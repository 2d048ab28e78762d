//! Application layer wiring services into the running daemon

pub mod sync;
