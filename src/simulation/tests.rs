// simulation/tests.rs
// Force aggregation, boundary policies, commits and clocks

use super::clock::{Clock, ManualClock, SystemClock};
use super::forces::{self, Subject};
use super::integrator::{commit, Contain, Resolved, BoundaryPolicy, Unbounded};
use super::placement;
use crate::config::{ForceModel, SimConfig};
use crate::particle::{Location, ParticleType};
use crate::sync::StartupBarrier;
use crate::units::{ELECTRON_CHARGE, PROTON_CHARGE};
use crate::world::World;
use rand::SeedableRng;
use std::sync::Arc;
use ultraviolet::DVec3;

fn world_with(electrons: &[Location], protons: &[Location]) -> Arc<World> {
    let barrier = Arc::new(StartupBarrier::new(electrons.len() + protons.len()));
    let world = World::initialize(electrons.len(), protons.len(), barrier).unwrap();
    for (kind, locations) in [(ParticleType::Electron, electrons), (ParticleType::Proton, protons)] {
        for (i, &loc) in locations.iter().enumerate() {
            let slot = world.claim(kind, i).unwrap();
            slot.place(1, || loc).unwrap();
        }
    }
    world
}

fn subject(world: &World, kind: ParticleType, index: usize) -> Subject {
    Subject {
        kind,
        index,
        charge: world.population(kind).charge(),
        location: world.location(kind, index).unwrap(),
    }
}

fn config(model: ForceModel) -> SimConfig {
    SimConfig {
        force_model: model,
        ..SimConfig::default()
    }
}

const MODELS: [ForceModel; 2] = [ForceModel::Analytic, ForceModel::FiniteDifference];

#[test]
fn electron_is_pulled_toward_proton() {
    let world = world_with(&[Location::new(0.0, 0.0, 0.0)], &[Location::new(1.0, 0.0, 0.0)]);
    for model in MODELS {
        let s = subject(&world, ParticleType::Electron, 0);
        let net = forces::aggregate(&world, &s, DVec3::zero(), &config(model));
        assert!(net.vector.x > 0.0, "{:?}: fx = {}", model, net.vector.x);

        let s = subject(&world, ParticleType::Proton, 0);
        let net = forces::aggregate(&world, &s, DVec3::zero(), &config(model));
        assert!(net.vector.x < 0.0, "{:?}: proton fx = {}", model, net.vector.x);
    }
}

#[test]
fn protons_push_each_other_apart() {
    let world = world_with(&[], &[Location::new(0.0, 0.0, 0.0), Location::new(1.0, 0.0, 0.0)]);
    for model in MODELS {
        let cfg = config(model);
        let left = forces::aggregate(&world, &subject(&world, ParticleType::Proton, 0), DVec3::zero(), &cfg);
        let right = forces::aggregate(&world, &subject(&world, ParticleType::Proton, 1), DVec3::zero(), &cfg);
        assert!(left.vector.x < 0.0, "{:?}: left fx = {}", model, left.vector.x);
        assert!(right.vector.x > 0.0, "{:?}: right fx = {}", model, right.vector.x);
    }
}

#[test]
fn electrons_repel_too() {
    let world = world_with(&[Location::new(0.0, 0.0, 0.0), Location::new(0.0, 0.0, 2.0)], &[]);
    for model in MODELS {
        let cfg = config(model);
        let low = forces::aggregate(&world, &subject(&world, ParticleType::Electron, 0), DVec3::zero(), &cfg);
        assert!(low.vector.z < 0.0, "{:?}: fz = {}", model, low.vector.z);
    }
}

#[test]
fn lone_particle_feels_nothing() {
    let world = world_with(&[Location::new(0.3, 0.2, 0.1)], &[]);
    for model in MODELS {
        let s = subject(&world, ParticleType::Electron, 0);
        let net = forces::aggregate(&world, &s, DVec3::zero(), &config(model));
        assert_eq!(net.magnitude, 0.0);
        assert_eq!(net.vector.mag(), 0.0);
    }
}

#[test]
fn same_index_in_other_population_is_not_self() {
    // Electron 0 and proton 0 share an index but are different particles.
    let world = world_with(&[Location::new(0.0, 0.0, 0.0)], &[Location::new(0.0, 2.0, 0.0)]);
    let s = subject(&world, ParticleType::Electron, 0);
    let net = forces::analytic(&world, &s, 1.0);
    assert!(net.vector.y > 0.0);
}

#[test]
fn scale_divides_axis_forces_only() {
    let world = world_with(&[Location::new(0.0, 0.0, 0.0)], &[Location::new(1.0, 0.0, 0.0)]);
    let s = subject(&world, ParticleType::Electron, 0);
    let unit = forces::analytic(&world, &s, 1.0);
    let scaled = forces::analytic(&world, &s, 100_000.0);
    assert!((unit.vector.x / scaled.vector.x - 100_000.0).abs() < 1e-6);
    assert_eq!(unit.magnitude, scaled.magnitude);
}

#[test]
fn analytic_matches_coulomb_for_a_pair() {
    let world = world_with(&[Location::new(0.0, 0.0, 0.0)], &[Location::new(0.0, 0.0, 0.5)]);
    let s = subject(&world, ParticleType::Electron, 0);
    let net = forces::analytic(&world, &s, 1.0);
    let expected = crate::electric::force(ELECTRON_CHARGE, PROTON_CHARGE, 0.5).abs();
    assert!((net.vector.z - expected).abs() / expected < 1e-12);
}

#[test]
fn potential_tie_keeps_previous_component() {
    // Δy = -0.05: the probe at Δy + 0.1 sits at the mirror distance, so
    // both potential sums are equal and y cannot be decided.
    let world = world_with(&[], &[Location::new(0.0, 0.0, 0.0), Location::new(1.0, 0.05, 0.0)]);
    let s = subject(&world, ParticleType::Proton, 0);
    let prior = DVec3::new(7.0, 8.0, 9.0);
    let net = forces::finite_difference(&world, &s, prior, 1.0, 0.1);
    assert_eq!(net.vector.y, 8.0);
    assert_ne!(net.vector.x, 7.0);
    assert_eq!(net.vector.z, 0.0);
}

#[test]
fn finite_difference_magnitude_uses_all_axes() {
    let world = world_with(&[Location::new(0.0, 0.0, 0.0)], &[Location::new(1.0, 0.0, 0.0)]);
    let s = subject(&world, ParticleType::Electron, 0);
    let net = forces::finite_difference(&world, &s, DVec3::zero(), 1.0, 0.1);
    // Σ field = (+e/1², 0, 0); magnitude = k·(−e)·e.
    let expected = crate::units::COULOMB_CONSTANT * ELECTRON_CHARGE * PROTON_CHARGE;
    assert!((net.magnitude - expected).abs() <= expected.abs() * 1e-12);
}

#[test]
fn unbounded_never_adjusts() {
    assert_eq!(Unbounded.resolve(1e9, 1e9, 1.0), Resolved::Unchanged);
}

#[test]
fn contain_clamps_to_faces() {
    let policy = Contain { half_extent: 1.0 };
    assert_eq!(policy.resolve(0.0, 0.5, 0.1), Resolved::Unchanged);
    assert_eq!(policy.resolve(0.8, 0.5, 0.1), Resolved::Adjusted(1.0 - 0.1));
    assert_eq!(policy.resolve(-0.8, -0.5, -0.1), Resolved::Adjusted(-(1.0 - 0.1)));
}

#[test]
fn commit_applies_policy_per_axis_and_refreshes_radius() {
    let start = Location::new(0.0, 0.5, 0.0);
    let moved = commit(&start, DVec3::new(0.25, 2.0, -0.5), &Contain { half_extent: 1.0 });
    let limit = 1.0 - start.radius();
    assert_eq!(moved.x(), 0.25);
    assert_eq!(moved.y(), limit);
    assert_eq!(moved.z(), -0.5);
    assert_eq!(moved.radius(), (1.0 + moved.z()) / 22.22);

    let free = commit(&start, DVec3::new(0.0, 0.0, 3.0), &Unbounded);
    assert_eq!(free.z(), 3.0);
    assert_eq!(free.radius(), (1.0 + 3.0) / 22.22);
}

#[test]
fn seeded_placement_is_reproducible() {
    let mut a = placement::rng_for(Some(42), ParticleType::Electron, 3);
    let mut b = placement::rng_for(Some(42), ParticleType::Electron, 3);
    let mut c = placement::rng_for(Some(42), ParticleType::Proton, 3);
    let la = placement::sample_location(&mut a, 1.0);
    assert_eq!(la, placement::sample_location(&mut b, 1.0));
    assert_ne!(la, placement::sample_location(&mut c, 1.0));
}

#[test]
fn samples_stay_inside_extent() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..1000 {
        let loc = placement::sample_location(&mut rng, 2.0);
        for v in [loc.x(), loc.y(), loc.z()] {
            assert!(v > -2.0 && v < 2.0, "{}", v);
        }
    }
}

#[test]
fn manual_clock_moves_only_when_advanced() {
    let clock = ManualClock::new(1.0);
    assert_eq!(clock.now(), 1.0);
    assert_eq!(clock.advance(0.25), 1.25);
    assert_eq!(clock.now(), 1.25);
    clock.set(0.0);
    assert_eq!(clock.now(), 0.0);
}

#[test]
fn system_clock_is_monotonic() {
    let clock = SystemClock::new();
    let a = clock.now();
    let b = clock.now();
    assert!(b >= a);
}

#[test]
fn oversized_simulation_is_rejected_without_panicking() {
    let result = super::Simulation::new(usize::MAX, 1, SimConfig::default());
    assert!(matches!(result, Err(crate::error::SimError::Allocation { .. })));
}
