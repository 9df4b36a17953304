// app/worker.rs
// The per-particle control loop:
// place → announce ready → wait for start → tick until told to stop.

use rand::rngs::StdRng;
use std::sync::Arc;
use std::thread;

use crate::error::SimError;
use crate::particle::{Location, Movement, ParticleAttributes};
use crate::profile_scope;
use crate::simulation::forces::{self, Subject};
use crate::simulation::{integrator, placement, Simulation};
use crate::sync::WorkerPhase;
use crate::world::{Placement, SlotHandle};

/// What a worker leaves behind when it stops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorkerReport {
    pub attributes: ParticleAttributes,
    pub ticks: u64,
    pub location: Location,
    pub phase: WorkerPhase,
}

pub type WorkerOutcome = Result<WorkerReport, SimError>;

pub struct ParticleWorker {
    attributes: ParticleAttributes,
    sim: Simulation,
    slot: SlotHandle,
    movement: Movement,
    phase: WorkerPhase,
    last_time: f64,
    ticks: u64,
}

impl ParticleWorker {
    /// SPAWNED: resolve and claim this particle's own slot.
    pub fn new(sim: Simulation, attributes: ParticleAttributes) -> Result<Self, SimError> {
        let slot = sim.world.claim(attributes.kind, attributes.index)?;
        log::trace!("{} {} {}", attributes.kind, attributes.index, WorkerPhase::Spawned);
        Ok(Self {
            attributes,
            sim,
            slot,
            movement: Movement::new(),
            phase: WorkerPhase::Spawned,
            last_time: 0.0,
            ticks: 0,
        })
    }

    /// PLACING → READY_WAIT: find a free location and announce readiness.
    /// On failure the worker stays in PLACING.
    pub fn place(&mut self) -> Result<Placement, SimError> {
        let ParticleAttributes { kind, index, .. } = self.attributes;
        self.phase = WorkerPhase::Placing;
        log::trace!("{} {} {}", kind, index, self.phase);

        let mut rng: StdRng = placement::rng_for(self.sim.config.seed, kind, index);
        let placed = placement::place(&self.slot, &mut rng, &self.sim.config)?;

        self.phase = WorkerPhase::ReadyWait;
        let ready = self.sim.barrier.announce_ready();
        log::debug!(
            "{} {} ready ({} of {})",
            kind,
            index,
            ready,
            self.sim.barrier.expected()
        );
        Ok(placed)
    }

    /// SPAWNED → PLACING → READY_WAIT in one go. On failure the worker gives
    /// up its place in the readiness count so the coordinator does not wait
    /// for it.
    pub fn prepare(sim: Simulation, attributes: ParticleAttributes) -> Result<Self, SimError> {
        let barrier = Arc::clone(&sim.barrier);
        let prepared = Self::new(sim, attributes).and_then(|mut worker| worker.place().map(|_| worker));
        if let Err(e) = &prepared {
            log::error!(
                "{} {} stopped before start: {}",
                attributes.kind,
                attributes.index,
                e
            );
            barrier.abandon();
        }
        prepared
    }

    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    pub fn movement(&self) -> &Movement {
        &self.movement
    }

    pub fn attributes(&self) -> &ParticleAttributes {
        &self.attributes
    }

    /// READY_WAIT → RUNNING. Blocks until the coordinator opens the gate.
    /// Returns `false` if the run was stopped before the gate opened; the
    /// worker then never enters RUNNING.
    pub fn wait_for_start(&mut self) -> bool {
        self.sim.barrier.wait_for_start();
        self.started()
    }

    /// Enter RUNNING after someone else waited on the gate for this worker.
    pub(crate) fn started(&mut self) -> bool {
        if self.sim.termination.is_stopped() {
            return false;
        }
        self.phase = WorkerPhase::Running;
        self.last_time = self.sim.clock.now();
        log::trace!(
            "{} {} {}",
            self.attributes.kind,
            self.attributes.index,
            self.phase
        );
        true
    }

    /// One tick with the elapsed time measured from this worker's own clock.
    pub fn step(&mut self) -> Location {
        let now = self.sim.clock.now();
        let elapsed = now - self.last_time;
        self.last_time = now;
        self.tick(elapsed)
    }

    /// Aggregate the force, integrate and publish the new location.
    pub fn tick(&mut self, elapsed: f64) -> Location {
        profile_scope!("worker_tick");
        let current = self.slot.location();
        let subject = Subject {
            kind: self.attributes.kind,
            index: self.attributes.index,
            charge: self.attributes.charge,
            location: current,
        };
        let net = forces::aggregate(
            &self.sim.world,
            &subject,
            self.movement.force_vec,
            &self.sim.config,
        );
        self.movement.apply_force(net);
        self.movement
            .integrate(self.sim.kinematics.as_ref(), self.attributes.mass, elapsed);

        let next = integrator::commit(&current, self.movement.displacement, self.sim.boundary.as_ref());
        self.slot.commit(next);
        self.ticks += 1;
        log::trace!(
            "{} {} tick {}: F = {:.3e}, at ({:.4}, {:.4}, {:.4})",
            self.attributes.kind,
            self.attributes.index,
            self.ticks,
            self.movement.force,
            next.x(),
            next.y(),
            next.z()
        );
        next
    }

    /// RUNNING until the termination flag is seen at the top of a tick.
    pub fn run_loop(&mut self) {
        let interval = self.sim.config.tick_interval();
        while !self.sim.termination.is_stopped() {
            self.step();
            thread::sleep(interval);
        }
        self.stop();
    }

    pub(crate) fn stop(&mut self) {
        self.phase = WorkerPhase::Stopped;
        log::debug!(
            "{} {} stopped after {} ticks",
            self.attributes.kind,
            self.attributes.index,
            self.ticks
        );
    }

    pub fn report(&self) -> WorkerReport {
        WorkerReport {
            attributes: self.attributes,
            ticks: self.ticks,
            location: self.slot.location(),
            phase: self.phase,
        }
    }
}

/// Whole life of a thread-per-particle worker.
pub fn run(sim: Simulation, attributes: ParticleAttributes) -> WorkerOutcome {
    let mut worker = ParticleWorker::prepare(sim, attributes)?;
    if worker.wait_for_start() {
        worker.run_loop();
    } else {
        worker.stop();
    }
    Ok(worker.report())
}

/// Drive a share of the particles from one pool thread. Every particle is
/// prepared first, then the thread waits on the gate once for all of them
/// and ticks them in turn each period.
pub fn run_share(sim: Simulation, share: Vec<ParticleAttributes>) -> Vec<WorkerOutcome> {
    let mut outcomes = Vec::with_capacity(share.len());
    let mut workers = Vec::with_capacity(share.len());
    for attributes in share {
        match ParticleWorker::prepare(sim.clone(), attributes) {
            Ok(worker) => workers.push(worker),
            Err(e) => outcomes.push(Err(e)),
        }
    }

    sim.barrier.wait_for_start_as(workers.len());
    for worker in &mut workers {
        worker.started();
    }

    let interval = sim.config.tick_interval();
    while !workers.is_empty() && !sim.termination.is_stopped() {
        for worker in &mut workers {
            worker.step();
        }
        thread::sleep(interval);
    }

    outcomes.extend(workers.iter_mut().map(|worker| {
        worker.stop();
        Ok(worker.report())
    }));
    outcomes
}
