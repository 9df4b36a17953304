// sync/latch.rs
// Reusable countdown latch built on a parking_lot mutex and condition variable

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct LatchState {
    expected: usize,
    arrived: usize,
}

/// Counts arrivals up to an expected total and lets waiters block until the
/// total is reached. `reset` re-arms it for another round.
#[derive(Debug)]
pub struct CountdownLatch {
    state: Mutex<LatchState>,
    cond: Condvar,
}

impl CountdownLatch {
    pub fn new(expected: usize) -> Self {
        Self {
            state: Mutex::new(LatchState { expected, arrived: 0 }),
            cond: Condvar::new(),
        }
    }

    /// Record one arrival and wake the waiters. Returns the arrival count
    /// after this call; arrivals past the expected total are not counted.
    pub fn count_down(&self) -> usize {
        let arrived = {
            let mut state = self.state.lock();
            if state.arrived < state.expected {
                state.arrived += 1;
            } else {
                log::warn!(
                    "Latch already complete ({} of {}), ignoring extra arrival",
                    state.arrived,
                    state.expected
                );
            }
            state.arrived
        };
        self.cond.notify_all();
        arrived
    }

    /// Lower the expected total by one for a participant that will never arrive.
    pub fn abandon(&self) {
        {
            let mut state = self.state.lock();
            state.expected = state.expected.saturating_sub(1).max(state.arrived);
        }
        self.cond.notify_all();
    }

    /// Block until every expected participant arrived. With a timeout, returns
    /// `false` if the deadline passed first.
    pub fn wait(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut state = self.state.lock();
        while state.arrived < state.expected {
            match deadline {
                Some(deadline) => {
                    if self.cond.wait_until(&mut state, deadline).timed_out() {
                        return state.arrived >= state.expected;
                    }
                }
                None => self.cond.wait(&mut state),
            }
        }
        true
    }

    pub fn arrived(&self) -> usize {
        self.state.lock().arrived
    }

    pub fn expected(&self) -> usize {
        self.state.lock().expected
    }

    pub fn is_complete(&self) -> bool {
        let state = self.state.lock();
        state.arrived >= state.expected
    }

    pub fn reset(&self, expected: usize) {
        let mut state = self.state.lock();
        state.expected = expected;
        state.arrived = 0;
    }
}
