// Centralized configuration for simulation parameters

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ====================
// Geometry
// ====================
/// Display radius is derived from z as (1 + z) / RADIUS_DIVISOR.
pub const RADIUS_DIVISOR: f64 = 22.22;
/// Half-width of the cube particles are initially placed in.
pub const PLACEMENT_EXTENT: f64 = 1.0;
/// Re-samples allowed before a worker gives up on finding a free location.
pub const PLACEMENT_ATTEMPTS: usize = 100_000;
/// Re-sample count after which a placement is reported as crowded.
pub const PLACEMENT_WARN_ATTEMPTS: usize = 100;

// ====================
// Force Parameters
// ====================
/// Divides every per-axis force so motion stays visible on screen. Not physical.
pub const FORCE_SCALE: f64 = 100_000.0;
/// Offset of the second potential probe in the finite-difference model.
pub const PROBE_EPSILON: f64 = 0.1;

// ====================
// Timing
// ====================
/// Sleep between two ticks of a worker.
pub const TICK_INTERVAL_MS: u64 = 250;
/// How long the coordinator waits for every particle to be placed.
pub const READY_TIMEOUT_MS: u64 = 10_000;
/// Wall-clock duration of a default run.
pub const RUN_SECONDS: f64 = 5.0;
/// Interval between diagnostics reports during a run.
pub const REPORT_INTERVAL_MS: u64 = 1_000;

// ====================
// Population
// ====================
pub const DEFAULT_ELECTRONS: usize = 8;
pub const DEFAULT_PROTONS: usize = 8;

// ====================
// Threading/Parallelism
// ====================
pub const MIN_THREADS: usize = 3; // Minimum number of threads to use
pub const THREADS_LEAVE_FREE: usize = 2; // Number of logical cores to leave free

/// Pool size when none is configured: max(3, cores) minus the cores left free.
pub fn default_pool_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(MIN_THREADS)
        .max(MIN_THREADS)
        - THREADS_LEAVE_FREE
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceModel {
    /// Superposition of k·qᵢ·qⱼ·(rᵢ − rⱼ)/|rᵢ − rⱼ|³ over all other particles.
    Analytic,
    /// Legacy approximation: per-axis field sums whose sign is picked by
    /// comparing the potential at the particle with the potential one probe
    /// offset further along the axis. Kept for output compatibility.
    FiniteDifference,
}

impl Default for ForceModel {
    fn default() -> Self {
        ForceModel::Analytic
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Particles move freely.
    Unbounded,
    /// Particles are kept inside a cube of the given half-width.
    Contain { half_extent: f64 },
}

impl Default for BoundaryKind {
    fn default() -> Self {
        BoundaryKind::Unbounded
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SpawnMode {
    /// One OS thread per particle.
    ThreadPerParticle,
    /// A fixed number of threads, each driving a share of the particles.
    /// `threads = 0` picks a size from the available cores.
    Pool { threads: usize },
}

impl Default for SpawnMode {
    fn default() -> Self {
        SpawnMode::ThreadPerParticle
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub force_model: ForceModel,
    /// Divisor applied to per-axis forces
    pub force_scale: f64,
    /// Offset of the second potential probe (finite-difference model only)
    pub probe_epsilon: f64,
    pub placement_extent: f64,
    pub placement_attempts: usize,
    pub boundary: BoundaryKind,
    pub spawn_mode: SpawnMode,
    /// Fixed seed for placement; `None` draws from OS entropy
    pub seed: Option<u64>,
    pub tick_interval_ms: u64,
    pub ready_timeout_ms: u64,
    pub run_seconds: f64,
    pub report_interval_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            force_model: ForceModel::default(),
            force_scale: FORCE_SCALE,
            probe_epsilon: PROBE_EPSILON,
            placement_extent: PLACEMENT_EXTENT,
            placement_attempts: PLACEMENT_ATTEMPTS,
            boundary: BoundaryKind::default(),
            spawn_mode: SpawnMode::default(),
            seed: None,
            tick_interval_ms: TICK_INTERVAL_MS,
            ready_timeout_ms: READY_TIMEOUT_MS,
            run_seconds: RUN_SECONDS,
            report_interval_ms: REPORT_INTERVAL_MS,
        }
    }
}

impl SimConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    pub fn run_duration(&self) -> Duration {
        Duration::from_secs_f64(self.run_seconds.max(0.0))
    }
}
