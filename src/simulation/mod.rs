// simulation/mod.rs
// Re-exports and module declarations for simulation submodules

pub mod clock;
pub mod forces;
pub mod integrator;
pub mod placement;
pub mod simulation;
pub use simulation::*;

#[cfg(test)]
mod tests;
