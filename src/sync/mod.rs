// sync/mod.rs
// Synchronization primitives shared by the coordinator and the particle workers

mod barrier;
mod gate;
mod latch;
mod termination;

pub use barrier::*;
pub use gate::*;
pub use latch::*;
pub use termination::*;

#[cfg(test)]
mod tests;
