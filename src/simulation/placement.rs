// simulation/placement.rs
// Random, collision-free starting positions

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{self, SimConfig};
use crate::error::SimError;
use crate::particle::{Location, ParticleType};
use crate::world::{Placement, SlotHandle};

/// Per-particle generator. With a seed every particle gets its own
/// reproducible stream; without one it draws from OS entropy.
pub fn rng_for(seed: Option<u64>, kind: ParticleType, index: usize) -> StdRng {
    match seed {
        Some(seed) => {
            let stream = ((kind as u64) << 32) | index as u64;
            StdRng::seed_from_u64(seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        }
        None => StdRng::from_os_rng(),
    }
}

/// One coordinate is the difference of two single-precision uniforms, so
/// it lies in (-extent, extent) and clusters around the centre.
pub fn sample_location<R: Rng>(rng: &mut R, extent: f64) -> Location {
    let mut axis = || (rng.random::<f32>() - rng.random::<f32>()) as f64 * extent;
    let x = axis();
    let y = axis();
    let z = axis();
    Location::new(x, y, z)
}

/// Find a free location for the slot and publish it.
pub fn place<R: Rng>(
    slot: &SlotHandle,
    rng: &mut R,
    config: &SimConfig,
) -> Result<Placement, SimError> {
    let placement = slot.place(config.placement_attempts, || {
        sample_location(rng, config.placement_extent)
    })?;
    if placement.attempts > config::PLACEMENT_WARN_ATTEMPTS {
        log::warn!(
            "{} {} needed {} draws to find a free location",
            slot.kind(),
            slot.index(),
            placement.attempts
        );
    } else {
        log::debug!(
            "{} {} placed at ({:.4}, {:.4}, {:.4})",
            slot.kind(),
            slot.index(),
            placement.location.x(),
            placement.location.y(),
            placement.location.z()
        );
    }
    Ok(placement)
}
