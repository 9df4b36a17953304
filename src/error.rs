//! Error types for the simulator.
//!
//! Failures are few and mostly fatal: a world that cannot be allocated, a
//! worker that cannot resolve its slot, a scenario file that does not parse.
//! A worker-level failure ends only that worker; the caller decides whether
//! the rest of the run continues.

use std::fmt;

use crate::particle::ParticleType;

#[derive(Debug)]
pub enum SimError {
    /// Reserving a particle slot array failed.
    Allocation { what: &'static str, requested: usize },
    /// The startup barrier was sized for a different population.
    BarrierMismatch { expected: usize, barrier: usize },
    /// A worker was spawned for an index outside its population.
    SlotOutOfRange { kind: ParticleType, index: usize, len: usize },
    /// Another worker already owns this slot.
    SlotClaimed { kind: ParticleType, index: usize },
    /// A scenario names a particle type the simulator does not know.
    UnknownParticleType(String),
    /// Random placement kept colliding with existing particles.
    PlacementExhausted { kind: ParticleType, index: usize, attempts: usize },
    /// Not every worker was placed before the ready timeout; nobody was released.
    NotReady { ready: usize, expected: usize },
    /// Shutdown was requested while other handles to the world are alive.
    WorldInUse { handles: usize },
    /// The OS refused to start a worker thread.
    ThreadSpawn(std::io::Error),
    /// A worker thread panicked.
    WorkerPanicked(String),
    Io(std::io::Error),
    Config(toml::de::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Allocation { what, requested } => {
                write!(f, "Failed to allocate {} slots for {}", requested, what)
            }
            SimError::BarrierMismatch { expected, barrier } => write!(
                f,
                "Startup barrier expects {} particles but the world holds {}",
                barrier, expected
            ),
            SimError::SlotOutOfRange { kind, index, len } => write!(
                f,
                "No {} slot at index {} (population is {})",
                kind, index, len
            ),
            SimError::SlotClaimed { kind, index } => {
                write!(f, "{} slot {} is already driven by another worker", kind, index)
            }
            SimError::UnknownParticleType(name) => write!(f, "Unknown particle type: {}", name),
            SimError::PlacementExhausted { kind, index, attempts } => write!(
                f,
                "Failed to place {} {} after {} attempts",
                kind, index, attempts
            ),
            SimError::NotReady { ready, expected } => write!(
                f,
                "Only {} of {} particles were ready before the timeout",
                ready, expected
            ),
            SimError::WorldInUse { handles } => write!(
                f,
                "Cannot shut down the world while {} other handles are alive",
                handles
            ),
            SimError::ThreadSpawn(e) => write!(f, "Failed to spawn worker thread: {}", e),
            SimError::WorkerPanicked(msg) => write!(f, "Worker panicked: {}", msg),
            SimError::Io(e) => write!(f, "I/O error: {}", e),
            SimError::Config(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::ThreadSpawn(e) | SimError::Io(e) => Some(e),
            SimError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e)
    }
}

impl From<toml::de::Error> for SimError {
    fn from(e: toml::de::Error) -> Self {
        SimError::Config(e)
    }
}
