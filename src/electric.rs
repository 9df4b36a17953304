//! Closed-form electrostatics.
//!
//! Every function guards the zero-distance case by returning exactly 0
//! instead of dividing by zero. The `summation_*` variants leave out
//! Coulomb's constant so callers can accumulate many terms and scale the
//! total once.

use crate::particle::Location;
use crate::units::COULOMB_CONSTANT;

/// Coulomb force between charges `q` and `big_q` separated by `radius`.
/// The sign follows the charge product: positive repels, negative attracts.
#[inline]
pub fn force(q: f64, big_q: f64, radius: f64) -> f64 {
    if radius != 0.0 {
        (COULOMB_CONSTANT * q * big_q) / (radius * radius)
    } else {
        0.0
    }
}

/// Electric field of a point charge `q` at `radius`.
#[inline]
pub fn field(q: f64, radius: f64) -> f64 {
    if radius != 0.0 {
        (COULOMB_CONSTANT * q) / (radius * radius)
    } else {
        0.0
    }
}

/// Unscaled field term `q / r²`.
#[inline]
pub fn summation_field(q: f64, radius: f64) -> f64 {
    if radius != 0.0 {
        q / (radius * radius)
    } else {
        0.0
    }
}

/// Electric potential of a point charge `q` at `radius`.
#[inline]
pub fn potential(q: f64, radius: f64) -> f64 {
    if radius != 0.0 {
        (COULOMB_CONSTANT * q) / radius.abs()
    } else {
        0.0
    }
}

/// Unscaled potential term `q / |r|`.
#[inline]
pub fn summation_potential(q: f64, radius: f64) -> f64 {
    if radius != 0.0 {
        q / radius.abs()
    } else {
        0.0
    }
}

/// Euclidean distance between two locations.
pub fn distance(a: &Location, b: &Location) -> f64 {
    let dx = a.x() - b.x();
    let dy = a.y() - b.y();
    let dz = a.z() - b.z();
    (dx * dx + dy * dy + dz * dz).sqrt()
}
