// app/coordinator.rs
// Drives a run from the outside: launch the workers, wait for every one to
// be placed, open the start gate, let them run, then stop and collect.

use std::time::{Duration, Instant};

use crossbeam::channel;
use crossbeam::select;

use super::spawn::WorkerHandle;
use super::worker::WorkerReport;
use crate::diagnostics::SnapshotStats;
use crate::error::SimError;
use crate::particle::ParticleAttributes;
use crate::simulation::Simulation;
use crate::world::AmountCounters;

/// Everything collected once the workers have been joined.
#[derive(Debug)]
pub struct RunSummary {
    pub reports: Vec<WorkerReport>,
    pub failures: Vec<SimError>,
    pub counters: AmountCounters,
}

pub struct Coordinator {
    sim: Simulation,
    handles: Vec<WorkerHandle>,
}

impl Coordinator {
    pub fn launch(sim: Simulation, particles: Vec<ParticleAttributes>) -> Result<Self, SimError> {
        let count = particles.len();
        let handles = match sim.spawn_all(particles) {
            Ok(handles) => handles,
            Err(e) => {
                // Workers that did start must not be left parked on the gate.
                sim.stop();
                sim.barrier.release();
                return Err(e);
            }
        };
        log::info!("Launched {} particles on {} threads", count, handles.len());
        Ok(Self { sim, handles })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Block until every live worker has announced readiness or the ready
    /// timeout passes. Returns whether the barrier filled.
    pub fn await_ready(&self) -> bool {
        let timeout = self.sim.config.ready_timeout();
        let filled = self.sim.barrier.wait_all_ready(Some(timeout));
        let (ready, expected) = (self.sim.barrier.readiness(), self.sim.barrier.expected());
        if filled {
            log::info!("All {} particles placed", ready);
        } else {
            log::warn!(
                "Only {} of {} particles ready after {:?}",
                ready,
                expected,
                timeout
            );
        }
        filled
    }

    /// Open the gate once every worker is placed. If the ready timeout
    /// passes first the gate stays closed and `NotReady` is returned.
    pub fn start(&self) -> Result<(), SimError> {
        if !self.await_ready() {
            return Err(SimError::NotReady {
                ready: self.sim.barrier.readiness(),
                expected: self.sim.barrier.expected(),
            });
        }
        self.release();
        Ok(())
    }

    pub fn release(&self) {
        log::info!("Releasing {} workers", self.sim.barrier.readiness());
        self.sim.barrier.release();
    }

    /// Let the workers run for `duration`, logging snapshot statistics on
    /// every report interval.
    pub fn run_for(&self, duration: Duration) {
        let started = Instant::now();
        let ticker = channel::tick(self.sim.config.report_interval());
        let deadline = channel::after(duration);
        loop {
            select! {
                recv(ticker) -> _ => self.report(started.elapsed()),
                recv(deadline) -> _ => break,
            }
        }
    }

    fn report(&self, elapsed: Duration) {
        let snapshot = self.sim.world.snapshot();
        let stats = SnapshotStats::from_snapshot(&snapshot);
        log::info!(
            "t = {:.1}s: {} running, closest pair {}, energy {:.3e} J, centroid ({:.3}, {:.3}, {:.3})",
            elapsed.as_secs_f64(),
            self.sim.barrier.running(),
            stats
                .min_separation
                .map_or_else(|| "n/a".to_string(), |d| format!("{:.4}", d)),
            stats.potential_energy,
            stats.centroid.x,
            stats.centroid.y,
            stats.centroid.z
        );
    }

    /// Raise the termination flag, join every worker and release the world.
    pub fn stop_and_join(self) -> Result<RunSummary, SimError> {
        let Coordinator { sim, handles } = self;
        sim.stop();
        if !sim.barrier.is_released() {
            // The flag is already up, so workers leave the gate without running.
            sim.barrier.release();
        }

        let mut reports = Vec::new();
        let mut failures = Vec::new();
        for handle in handles {
            let name = handle.name().to_string();
            for outcome in handle.join() {
                match outcome {
                    Ok(report) => reports.push(report),
                    Err(e) => {
                        log::error!("{}: {}", name, e);
                        failures.push(e);
                    }
                }
            }
        }

        let counters = sim.shutdown()?;
        log::info!(
            "Joined {} workers ({} failed)",
            reports.len(),
            failures.len()
        );
        Ok(RunSummary {
            reports,
            failures,
            counters,
        })
    }
}
