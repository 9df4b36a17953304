use std::path::Path;

use crate::error::SimError;
use crate::init_config::InitConfig;
use crate::simulation::Simulation;
use crate::sync::{StartupBarrier, TerminationFlag};
use std::sync::Arc;
use std::time::Duration;

pub mod coordinator;
pub mod spawn;
pub mod worker;


pub use coordinator::{Coordinator, RunSummary};

pub const DEFAULT_CONFIG_PATH: &str = "init_config.toml";

pub fn run() -> Result<(), SimError> {
    // Diagnostics share a global rayon pool with threads = max(3, total cores) - 2
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(crate::config::MIN_THREADS)
        .max(crate::config::MIN_THREADS)
        - crate::config::THREADS_LEAVE_FREE;
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        log::warn!("Could not size the rayon pool: {}", e);
    }

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let init = load_config(Path::new(&path))?;
    let summary = run_config(init)?;

    log::info!(
        "Run finished: {} electrons, {} protons, {} reports, {} failures",
        summary.counters.electrons,
        summary.counters.protons,
        summary.reports.len(),
        summary.failures.len()
    );
    for report in &summary.reports {
        log::debug!(
            "{} {}: {} ticks, final ({:.4}, {:.4}, {:.4})",
            report.attributes.kind,
            report.attributes.index,
            report.ticks,
            report.location.x(),
            report.location.y(),
            report.location.z()
        );
    }

    #[cfg(feature = "profiling")]
    crate::PROFILER.lock().log_and_clear();

    Ok(())
}

fn load_config(path: &Path) -> Result<InitConfig, SimError> {
    if path.exists() {
        log::info!("Loading configuration from {}", path.display());
        InitConfig::load_from_file(path)
    } else {
        log::warn!("{} not found, using defaults", path.display());
        Ok(InitConfig::default())
    }
}

/// One full run: build the world, launch and release the workers, let them
/// run for the configured time, then stop and collect.
pub fn run_config(init: InitConfig) -> Result<RunSummary, SimError> {
    let plan = init.plan();
    log::info!(
        "Simulating {} electrons and {} protons with the {:?} force model",
        plan.electrons,
        plan.protons,
        init.simulation.force_model
    );

    let run_duration = init.simulation.run_duration();
    let sim = Simulation::initialize(
        plan.electrons,
        plan.protons,
        plan.charges,
        Arc::new(StartupBarrier::new(plan.total())),
        TerminationFlag::new(),
        init.simulation,
    )?;

    let coordinator = Coordinator::launch(sim, plan.particles)?;
    drive(coordinator, run_duration)
}

/// Start the launched workers, let them run, then stop and collect. When
/// not every worker gets placed in time nobody is started: the workers are
/// stopped and joined and `NotReady` is returned.
pub fn drive(coordinator: Coordinator, run_duration: Duration) -> Result<RunSummary, SimError> {
    if let Err(e) = coordinator.start() {
        let summary = coordinator.stop_and_join()?;
        log::error!(
            "Run abandoned before start ({} workers joined, {} failed)",
            summary.reports.len(),
            summary.failures.len()
        );
        return Err(e);
    }
    coordinator.run_for(run_duration);
    coordinator.stop_and_join()
}
