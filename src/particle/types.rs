// particle/types.rs
// Particle identity (type, attributes) and the shared Location record

use std::fmt;
use std::str::FromStr;
use ultraviolet::DVec3;

use crate::config;
use crate::error::SimError;
use crate::units;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ParticleType {
    Electron,
    Proton,
}

impl ParticleType {
    pub const ALL: [ParticleType; 2] = [ParticleType::Electron, ParticleType::Proton];

    /// Rest mass used when a scenario does not override it.
    pub fn default_mass(self) -> f64 {
        match self {
            ParticleType::Electron => units::ELECTRON_MASS,
            ParticleType::Proton => units::PROTON_MASS,
        }
    }

    /// Charge of every particle of this type.
    pub fn default_charge(self) -> f64 {
        match self {
            ParticleType::Electron => units::ELECTRON_CHARGE,
            ParticleType::Proton => units::PROTON_CHARGE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParticleType::Electron => "electron",
            ParticleType::Proton => "proton",
        }
    }
}

impl fmt::Display for ParticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParticleType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "electron" | "e-" => Ok(ParticleType::Electron),
            "proton" | "p+" => Ok(ParticleType::Proton),
            _ => Err(SimError::UnknownParticleType(s.to_string())),
        }
    }
}

/// Everything a worker needs to know about the particle it drives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleAttributes {
    pub index: usize,
    pub kind: ParticleType,
    pub mass: f64,
    pub charge: f64,
}

impl ParticleAttributes {
    pub fn new(index: usize, kind: ParticleType, mass: f64, charge: f64) -> Self {
        Self { index, kind, mass, charge }
    }

    /// Attributes with the type's rest mass and elementary charge.
    pub fn of_type(index: usize, kind: ParticleType) -> Self {
        Self::new(index, kind, kind.default_mass(), kind.default_charge())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn get(self, v: DVec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    #[inline]
    pub fn set(self, v: &mut DVec3, value: f64) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
        }
    }
}

/// Position of a particle in metres plus its display radius.
///
/// The radius is derived from `z` and is recomputed on every construction,
/// so it can never be stale with respect to the coordinate it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    x: f64,
    y: f64,
    z: f64,
    radius: f64,
}

impl Location {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            radius: radius_for(z),
        }
    }

    pub fn from_vec(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn coords(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Exact equality on all three coordinates.
    pub fn coincides(&self, other: &Location) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

#[inline]
pub fn radius_for(z: f64) -> f64 {
    (1.0 + z) / config::RADIUS_DIVISOR
}
