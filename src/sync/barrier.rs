// sync/barrier.rs
// Two-phase startup protocol: every worker announces it is placed, then all
// of them wait on a single start gate that an outside coordinator opens.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{CountdownLatch, StartGate};

/// Life of a worker: SPAWNED → PLACING → READY_WAIT → RUNNING → STOPPED.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkerPhase {
    Spawned,
    Placing,
    ReadyWait,
    Running,
    Stopped,
}

impl fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerPhase::Spawned => "spawned",
            WorkerPhase::Placing => "placing",
            WorkerPhase::ReadyWait => "ready-wait",
            WorkerPhase::Running => "running",
            WorkerPhase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct StartupBarrier {
    capacity: AtomicUsize,
    ready: CountdownLatch,
    gate: StartGate,
    running: AtomicUsize,
}

impl StartupBarrier {
    pub fn new(total: usize) -> Self {
        Self {
            capacity: AtomicUsize::new(total),
            ready: CountdownLatch::new(total),
            gate: StartGate::new(),
            running: AtomicUsize::new(0),
        }
    }

    /// Population the barrier was armed for.
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    /// Worker side: "I am placed". Returns the readiness count after the call.
    pub fn announce_ready(&self) -> usize {
        self.ready.count_down()
    }

    /// Worker side: this worker failed before announcing and will never do so.
    pub fn abandon(&self) {
        self.ready.abandon();
    }

    pub fn readiness(&self) -> usize {
        self.ready.arrived()
    }

    /// Workers still expected to announce, after abandonments.
    pub fn expected(&self) -> usize {
        self.ready.expected()
    }

    /// Coordinator side: block until every expected worker announced.
    pub fn wait_all_ready(&self, timeout: Option<Duration>) -> bool {
        self.ready.wait(timeout)
    }

    /// Coordinator side: open the start gate for everyone at once.
    pub fn release(&self) {
        self.gate.open();
    }

    pub fn is_released(&self) -> bool {
        self.gate.is_open()
    }

    /// Worker side: block until released.
    pub fn wait_for_start(&self) {
        self.wait_for_start_as(1);
    }

    /// Block until released on behalf of `workers` particles driven by the
    /// calling thread.
    pub fn wait_for_start_as(&self, workers: usize) {
        self.gate.wait();
        self.running.fetch_add(workers, Ordering::AcqRel);
    }

    /// Number of particles that passed the start gate.
    pub fn running(&self) -> usize {
        self.running.load(Ordering::Acquire)
    }

    /// Re-arm for another startup round. Must not race with waiting workers.
    pub fn rearm(&self, total: usize) {
        self.gate.close();
        self.ready.reset(total);
        self.running.store(0, Ordering::Release);
        self.capacity.store(total, Ordering::Release);
    }
}
