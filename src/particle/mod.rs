// particle/mod.rs
// Re-exports for the particle module

mod types;
mod movement;

pub use types::*;
pub use movement::*;
