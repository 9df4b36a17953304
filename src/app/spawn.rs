// app/spawn.rs
// Launching workers: one thread per particle, or a fixed pool of threads
// that share the particles between them.

use std::thread::{self, JoinHandle};

use super::worker::{self, WorkerOutcome};
use crate::config::{self, SpawnMode};
use crate::error::SimError;
use crate::particle::{ParticleAttributes, ParticleType};
use crate::simulation::Simulation;

pub struct WorkerHandle {
    name: String,
    handle: JoinHandle<Vec<WorkerOutcome>>,
}

impl WorkerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait for the thread and collect the outcome of every particle it drove.
    pub fn join(self) -> Vec<WorkerOutcome> {
        match self.handle.join() {
            Ok(outcomes) => outcomes,
            Err(panic) => {
                let msg = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                vec![Err(SimError::WorkerPanicked(format!("{}: {}", self.name, msg)))]
            }
        }
    }
}

impl Simulation {
    /// Launch one worker thread for one particle.
    pub fn spawn_worker(
        &self,
        index: usize,
        kind: ParticleType,
        mass: f64,
        charge: f64,
    ) -> Result<WorkerHandle, SimError> {
        let attributes = ParticleAttributes::new(index, kind, mass, charge);
        let name = format!("{}-{}", kind, index);
        let sim = self.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || vec![worker::run(sim, attributes)])
            .map_err(SimError::ThreadSpawn)?;
        Ok(WorkerHandle { name, handle })
    }

    /// Launch `threads` pool threads and deal the particles out round-robin.
    pub fn spawn_pool(
        &self,
        particles: Vec<ParticleAttributes>,
        threads: usize,
    ) -> Result<Vec<WorkerHandle>, SimError> {
        let threads = threads.clamp(1, particles.len().max(1));
        let mut shares: Vec<Vec<ParticleAttributes>> = vec![Vec::new(); threads];
        for (i, attributes) in particles.into_iter().enumerate() {
            shares[i % threads].push(attributes);
        }

        log::info!("Starting worker pool with {} threads", threads);
        shares
            .into_iter()
            .enumerate()
            .map(|(i, share)| {
                let name = format!("pool-{}", i);
                let sim = self.clone();
                let handle = thread::Builder::new()
                    .name(name.clone())
                    .spawn(move || worker::run_share(sim, share))
                    .map_err(SimError::ThreadSpawn)?;
                Ok(WorkerHandle { name, handle })
            })
            .collect()
    }

    /// Launch every particle according to the configured spawn mode.
    pub fn spawn_all(&self, particles: Vec<ParticleAttributes>) -> Result<Vec<WorkerHandle>, SimError> {
        match self.config.spawn_mode {
            SpawnMode::ThreadPerParticle => particles
                .into_iter()
                .map(|a| self.spawn_worker(a.index, a.kind, a.mass, a.charge))
                .collect(),
            SpawnMode::Pool { threads } => {
                let threads = if threads == 0 {
                    config::default_pool_threads()
                } else {
                    threads
                };
                self.spawn_pool(particles, threads)
            }
        }
    }
}
