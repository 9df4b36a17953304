// simulation/simulation.rs
// The simulation context handed to every worker: shared world, startup
// barrier, termination flag, configuration and the external collaborators.

use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::integrator::{boundary_for, BoundaryPolicy, Kinematics, Newtonian};
use crate::config::SimConfig;
use crate::error::SimError;
use crate::sync::{StartupBarrier, TerminationFlag};
use crate::world::{checked_total, AmountCounters, Charges, World};

/// Cheap to clone: every field is shared.
#[derive(Clone)]
pub struct Simulation {
    pub world: Arc<World>,
    pub barrier: Arc<StartupBarrier>,
    pub termination: TerminationFlag,
    pub config: Arc<SimConfig>,
    pub kinematics: Arc<dyn Kinematics>,
    pub boundary: Arc<dyn BoundaryPolicy>,
    pub clock: Arc<dyn Clock>,
}

impl Simulation {
    /// Build a simulation around synchronization handles owned by the caller.
    pub fn initialize(
        electrons: usize,
        protons: usize,
        charges: Charges,
        barrier: Arc<StartupBarrier>,
        termination: TerminationFlag,
        config: SimConfig,
    ) -> Result<Self, SimError> {
        let world = World::initialize_with(electrons, protons, charges, Arc::clone(&barrier))?;
        Ok(Self {
            world,
            barrier,
            termination,
            boundary: boundary_for(config.boundary),
            config: Arc::new(config),
            kinematics: Arc::new(Newtonian),
            clock: Arc::new(SystemClock::new()),
        })
    }

    /// Build a simulation with fresh handles and the default charges.
    pub fn new(electrons: usize, protons: usize, config: SimConfig) -> Result<Self, SimError> {
        let total = checked_total(electrons, protons)?;
        Self::initialize(
            electrons,
            protons,
            Charges::default(),
            Arc::new(StartupBarrier::new(total)),
            TerminationFlag::new(),
            config,
        )
    }

    pub fn with_kinematics(mut self, kinematics: Arc<dyn Kinematics>) -> Self {
        self.kinematics = kinematics;
        self
    }

    pub fn with_boundary(mut self, boundary: Arc<dyn BoundaryPolicy>) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn counters(&self) -> AmountCounters {
        self.world.counters()
    }

    pub fn stop(&self) {
        self.termination.stop();
    }

    /// Release the world. Fails with `WorldInUse` while any worker (or
    /// clone of this context) is still alive.
    pub fn shutdown(self) -> Result<AmountCounters, SimError> {
        let Simulation { world, .. } = self;
        World::shutdown(world)
    }
}
