// sync/tests.rs
// Readiness counting, gate release and reuse of the startup barrier

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(10);

#[test]
fn readiness_reaches_total_exactly_once() {
    let total = 16;
    let barrier = Arc::new(StartupBarrier::new(total));
    let hits = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..total)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let hits = Arc::clone(&hits);
            thread::spawn(move || {
                let n = barrier.announce_ready();
                assert!(n <= total);
                if n == total {
                    hits.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(barrier.readiness(), total);
    assert!(barrier.wait_all_ready(Some(TIMEOUT)));
}

#[test]
fn extra_announcements_do_not_exceed_total() {
    let barrier = StartupBarrier::new(2);
    barrier.announce_ready();
    barrier.announce_ready();
    assert_eq!(barrier.announce_ready(), 2);
    assert_eq!(barrier.readiness(), 2);
}

fn run_mock_coordinator(n: usize) {
    let barrier = Arc::new(StartupBarrier::new(n));
    let handles: Vec<_> = (0..n)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.announce_ready();
                barrier.wait_for_start();
            })
        })
        .collect();

    assert!(barrier.wait_all_ready(Some(TIMEOUT)), "workers never became ready");
    assert_eq!(barrier.readiness(), n);
    assert_eq!(barrier.running(), 0, "no worker may run before release");

    barrier.release();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(barrier.running(), n);
}

#[test]
fn barrier_releases_one_worker() {
    run_mock_coordinator(1);
}

#[test]
fn barrier_releases_two_workers() {
    run_mock_coordinator(2);
}

#[test]
fn barrier_releases_fifty_workers() {
    run_mock_coordinator(50);
}

#[test]
fn abandoned_worker_does_not_block_coordinator() {
    let barrier = Arc::new(StartupBarrier::new(3));
    barrier.announce_ready();
    barrier.announce_ready();

    let b = Arc::clone(&barrier);
    let failed = thread::spawn(move || b.abandon());
    failed.join().unwrap();

    assert!(barrier.wait_all_ready(Some(TIMEOUT)));
    assert_eq!(barrier.expected(), 2);
    assert_eq!(barrier.capacity(), 3);
}

#[test]
fn wait_times_out_when_someone_is_missing() {
    let barrier = StartupBarrier::new(2);
    barrier.announce_ready();
    assert!(!barrier.wait_all_ready(Some(Duration::from_millis(20))));
}

#[test]
fn rearm_resets_both_phases() {
    let barrier = StartupBarrier::new(1);
    barrier.announce_ready();
    barrier.release();
    barrier.wait_for_start();
    assert_eq!(barrier.running(), 1);

    barrier.rearm(2);
    assert_eq!(barrier.readiness(), 0);
    assert_eq!(barrier.running(), 0);
    assert!(!barrier.is_released());
    assert_eq!(barrier.capacity(), 2);
}

#[test]
fn latch_is_reusable() {
    let latch = CountdownLatch::new(1);
    latch.count_down();
    assert!(latch.is_complete());
    latch.reset(2);
    assert!(!latch.is_complete());
    latch.count_down();
    latch.count_down();
    assert!(latch.wait(Some(TIMEOUT)));
}

#[test]
fn gate_wait_timeout_reports_state() {
    let gate = StartGate::new();
    assert!(!gate.wait_timeout(Duration::from_millis(10)));
    gate.open();
    assert!(gate.wait_timeout(Duration::from_millis(10)));
    gate.close();
    assert!(!gate.is_open());
}

#[test]
fn termination_flag_is_shared_between_clones() {
    let flag = TerminationFlag::new();
    let seen_by_worker = flag.clone();
    assert_eq!(seen_by_worker.state(), RunState::Continue);
    flag.stop();
    assert!(seen_by_worker.is_stopped());
}

#[test]
fn phases_are_ordered() {
    assert!(WorkerPhase::Spawned < WorkerPhase::Placing);
    assert!(WorkerPhase::ReadyWait < WorkerPhase::Running);
    assert_eq!(WorkerPhase::ReadyWait.to_string(), "ready-wait");
}
