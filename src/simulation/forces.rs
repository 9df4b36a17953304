//! Net electrostatic force on one particle.
//!
//! Sums contributions from every other placed particle, electrons first,
//! then protons. Two models are available (see [`ForceModel`]):
//!
//! - `Analytic`: vector superposition of Coulomb's law.
//! - `FiniteDifference`: the legacy approximation. Per axis it sums
//!   `q/Δ²` field terms and picks the sign of the resulting component by
//!   comparing the summed potential at Δ with the summed potential at
//!   Δ + ε. It is not a gradient; it only reproduces the old output.
//!
//! Both divide the per-axis force by `force_scale` so that motion stays in a
//! visible range.

use std::cmp::Ordering;
use ultraviolet::DVec3;

use crate::config::{ForceModel, SimConfig};
use crate::electric::{summation_field, summation_potential};
use crate::particle::{Axis, Location, ParticleType};
use crate::profile_scope;
use crate::units::COULOMB_CONSTANT;
use crate::world::World;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NetForce {
    /// k·q·|Σ| with the subject's charge sign, unscaled.
    pub magnitude: f64,
    /// Per-axis force divided by the configured scale.
    pub vector: DVec3,
}

/// The particle the force is computed for.
#[derive(Clone, Copy, Debug)]
pub struct Subject {
    pub kind: ParticleType,
    pub index: usize,
    pub charge: f64,
    pub location: Location,
}

impl Subject {
    fn is(&self, kind: ParticleType, index: usize) -> bool {
        self.kind == kind && self.index == index
    }
}

/// Compute the net force on `subject` with the configured model.
/// `prior` is the force from the previous tick; the finite-difference model
/// keeps a component from it when the potential probe cannot decide.
pub fn aggregate(world: &World, subject: &Subject, prior: DVec3, config: &SimConfig) -> NetForce {
    profile_scope!("forces_aggregate");
    match config.force_model {
        ForceModel::Analytic => analytic(world, subject, config.force_scale),
        ForceModel::FiniteDifference => finite_difference(
            world,
            subject,
            prior,
            config.force_scale,
            config.probe_epsilon,
        ),
    }
}

/// Visit every placed particle except the subject with its charge and the
/// displacement subject − other.
fn for_each_other(world: &World, subject: &Subject, mut f: impl FnMut(f64, DVec3)) {
    let own = subject.location.coords();
    for kind in ParticleType::ALL {
        let population = world.population(kind);
        let charge = population.charge();
        population.for_each_placed(|index, other| {
            if subject.is(kind, index) {
                return;
            }
            f(charge, own - other.coords());
        });
    }
}

pub fn analytic(world: &World, subject: &Subject, scale: f64) -> NetForce {
    let mut sum = DVec3::zero();
    for_each_other(world, subject, |charge, delta| {
        let distance = delta.mag();
        if distance != 0.0 {
            sum += delta * (charge / (distance * distance * distance));
        }
    });
    let kq = COULOMB_CONSTANT * subject.charge;
    NetForce {
        magnitude: kq * sum.mag(),
        vector: sum * (kq / scale),
    }
}

#[derive(Default)]
struct AxisSums {
    field: f64,
    potential_before: f64,
    potential_after: f64,
}

pub fn finite_difference(
    world: &World,
    subject: &Subject,
    prior: DVec3,
    scale: f64,
    epsilon: f64,
) -> NetForce {
    let mut sums: [AxisSums; 3] = Default::default();
    for_each_other(world, subject, |charge, delta| {
        for (axis, sum) in Axis::ALL.iter().zip(sums.iter_mut()) {
            let d = axis.get(delta);
            sum.field += summation_field(charge, d);
            sum.potential_before += summation_potential(charge, d);
            sum.potential_after += summation_potential(charge, d + epsilon);
        }
    });

    let kq = COULOMB_CONSTANT * subject.charge;
    let mut vector = prior;
    for (axis, sum) in Axis::ALL.iter().zip(sums.iter()) {
        let component = (kq * sum.field / scale).abs();
        let resolved = resolve_sign(
            sum.potential_before,
            sum.potential_after,
            subject.charge,
            component,
        );
        if let Some(value) = resolved {
            axis.set(&mut vector, value);
        }
    }

    let field_sq: f64 = sums.iter().map(|s| s.field * s.field).sum();
    NetForce {
        magnitude: kq * field_sq.sqrt(),
        vector,
    }
}

/// Sign of one axis from the potential probe. Returns `None` when the
/// probes tie or the charge is zero; the caller keeps the previous value.
fn resolve_sign(before: f64, after: f64, charge: f64, magnitude: f64) -> Option<f64> {
    match (before.partial_cmp(&after), charge.partial_cmp(&0.0)) {
        (Some(Ordering::Less), Some(Ordering::Less))
        | (Some(Ordering::Greater), Some(Ordering::Greater)) => Some(magnitude),
        (Some(Ordering::Less), Some(Ordering::Greater))
        | (Some(Ordering::Greater), Some(Ordering::Less)) => Some(-magnitude),
        _ => None,
    }
}

#[cfg(test)]
mod sign_tests {
    use super::resolve_sign;

    #[test]
    fn four_cases_and_tie() {
        assert_eq!(resolve_sign(1.0, 2.0, -1.0, 3.0), Some(3.0));
        assert_eq!(resolve_sign(1.0, 2.0, 1.0, 3.0), Some(-3.0));
        assert_eq!(resolve_sign(2.0, 1.0, -1.0, 3.0), Some(-3.0));
        assert_eq!(resolve_sign(2.0, 1.0, 1.0, 3.0), Some(3.0));
        assert_eq!(resolve_sign(2.0, 2.0, 1.0, 3.0), None);
        assert_eq!(resolve_sign(1.0, 2.0, 0.0, 3.0), None);
    }
}
