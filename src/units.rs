//! Physical constants in SI units.
//!
//! Base units:
//! - Length: metre (m)
//! - Time: second (s)
//! - Charge: coulomb (C)
//! - Mass: kilogram (kg)

/// Coulomb's constant k = 1 / (4πε₀) in N⋅m²/C².
pub const COULOMB_CONSTANT: f64 = 8.987_551_787_368_176e9;
/// Elementary charge in coulombs.
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;
/// Charge carried by an electron.
pub const ELECTRON_CHARGE: f64 = -ELEMENTARY_CHARGE;
/// Charge carried by a proton.
pub const PROTON_CHARGE: f64 = ELEMENTARY_CHARGE;
/// Electron rest mass in kilograms.
pub const ELECTRON_MASS: f64 = 9.109_383_701_5e-31;
/// Proton rest mass in kilograms.
pub const PROTON_MASS: f64 = 1.672_621_923_69e-27;
