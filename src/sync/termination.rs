// sync/termination.rs
// Shared run/stop flag polled by workers once per tick

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    Continue = 0,
    Stopped = 1,
}

/// Cloneable handle to one shared termination flag.
#[derive(Clone, Debug, Default)]
pub struct TerminationFlag(Arc<AtomicU8>);

impl TerminationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(RunState::Stopped as u8, Ordering::Release);
    }

    pub fn state(&self) -> RunState {
        match self.0.load(Ordering::Acquire) {
            0 => RunState::Continue,
            _ => RunState::Stopped,
        }
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.state() == RunState::Stopped
    }
}
