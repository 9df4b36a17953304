pub mod app;
pub mod config;
pub mod diagnostics;
pub mod electric;
pub mod error;
pub mod init_config;
pub mod particle;
pub mod profiler;
pub mod simulation;
pub mod sync;
pub mod units;
pub mod world;

pub use error::SimError;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
