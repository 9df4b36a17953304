// simulation/integrator.rs
// Turning force into motion: the kinematic formulas and the boundary policy
// consulted before a displacement is committed.

use std::sync::Arc;
use ultraviolet::DVec3;

use crate::config::BoundaryKind;
use crate::particle::{Axis, Location};

/// Single-expression motion formulas. Each call depends only on its inputs.
pub trait Kinematics: Send + Sync {
    fn acceleration(&self, force: f64, mass: f64) -> f64;
    fn velocity(&self, acceleration: f64, elapsed: f64) -> f64;
    fn displacement(&self, velocity: f64, elapsed: f64) -> f64;
}

/// a = F/m, v = a·t, d = v·t.
#[derive(Clone, Copy, Debug, Default)]
pub struct Newtonian;

impl Kinematics for Newtonian {
    fn acceleration(&self, force: f64, mass: f64) -> f64 {
        if mass != 0.0 {
            force / mass
        } else {
            0.0
        }
    }

    fn velocity(&self, acceleration: f64, elapsed: f64) -> f64 {
        acceleration * elapsed
    }

    fn displacement(&self, velocity: f64, elapsed: f64) -> f64 {
        velocity * elapsed
    }
}

/// Outcome of a boundary check for one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resolved {
    /// Use this coordinate as the new position.
    Adjusted(f64),
    /// Add the displacement to the coordinate as usual.
    Unchanged,
}

pub trait BoundaryPolicy: Send + Sync {
    fn resolve(&self, coordinate: f64, displacement: f64, radius: f64) -> Resolved;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Unbounded;

impl BoundaryPolicy for Unbounded {
    fn resolve(&self, _coordinate: f64, _displacement: f64, _radius: f64) -> Resolved {
        Resolved::Unchanged
    }
}

/// Keeps a particle's extent inside the cube [-half_extent, half_extent]³.
/// A coordinate that would cross a face is clamped to the face minus the
/// particle's radius.
#[derive(Clone, Copy, Debug)]
pub struct Contain {
    pub half_extent: f64,
}

impl BoundaryPolicy for Contain {
    fn resolve(&self, coordinate: f64, displacement: f64, radius: f64) -> Resolved {
        let limit = (self.half_extent - radius.abs()).max(0.0);
        let candidate = coordinate + displacement;
        if candidate > limit {
            Resolved::Adjusted(limit)
        } else if candidate < -limit {
            Resolved::Adjusted(-limit)
        } else {
            Resolved::Unchanged
        }
    }
}

pub fn boundary_for(kind: BoundaryKind) -> Arc<dyn BoundaryPolicy> {
    match kind {
        BoundaryKind::Unbounded => Arc::new(Unbounded),
        BoundaryKind::Contain { half_extent } => Arc::new(Contain { half_extent }),
    }
}

/// Apply `displacement` to `location` axis by axis through `policy`.
/// Every axis sees the radius from before the move; the returned location
/// carries the radius of its new z.
pub fn commit(location: &Location, displacement: DVec3, policy: &dyn BoundaryPolicy) -> Location {
    let radius = location.radius();
    let mut next = location.coords();
    for axis in Axis::ALL {
        let coordinate = axis.get(next);
        let delta = axis.get(displacement);
        let value = match policy.resolve(coordinate, delta, radius) {
            Resolved::Adjusted(value) => value,
            Resolved::Unchanged => coordinate + delta,
        };
        axis.set(&mut next, value);
    }
    Location::from_vec(next)
}
