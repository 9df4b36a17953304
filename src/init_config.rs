// init_config.rs
// Handles loading and parsing the run configuration from init_config.toml

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::config::{SimConfig, DEFAULT_ELECTRONS, DEFAULT_PROTONS};
use crate::error::SimError;
use crate::particle::{ParticleAttributes, ParticleType};
use crate::world::Charges;

#[derive(Debug, Deserialize)]
pub struct InitConfig {
    #[serde(default)]
    pub simulation: SimConfig,
    #[serde(default)]
    pub charges: Option<ChargesConfig>,
    #[serde(default)]
    pub particles: Vec<ParticleGroup>,
}

/// Per-type charge overrides, in coulombs.
#[derive(Debug, Default, Deserialize)]
pub struct ChargesConfig {
    pub electron: Option<f64>,
    pub proton: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ParticleGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: usize,
    /// Optional mass override in kilograms.
    pub mass: Option<f64>,
}

/// Resolved population sizes and per-particle attributes for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub electrons: usize,
    pub protons: usize,
    pub charges: Charges,
    pub particles: Vec<ParticleAttributes>,
}

impl RunPlan {
    pub fn total(&self) -> usize {
        self.electrons + self.protons
    }
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            simulation: SimConfig::default(),
            charges: None,
            particles: vec![
                ParticleGroup {
                    kind: ParticleType::Electron.name().to_string(),
                    count: DEFAULT_ELECTRONS,
                    mass: None,
                },
                ParticleGroup {
                    kind: ParticleType::Proton.name().to_string(),
                    count: DEFAULT_PROTONS,
                    mass: None,
                },
            ],
        }
    }
}

impl InitConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SimError> {
        let config: InitConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Turn the particle groups into a run plan. Groups with an unknown type
    /// are logged and left out; the rest still run.
    pub fn plan(&self) -> RunPlan {
        let defaults = Charges::default();
        let charges = match &self.charges {
            Some(c) => Charges {
                electron: c.electron.unwrap_or(defaults.electron),
                proton: c.proton.unwrap_or(defaults.proton),
            },
            None => defaults,
        };

        let mut electrons = Vec::new();
        let mut protons = Vec::new();
        for group in &self.particles {
            let kind = match group.to_type() {
                Ok(kind) => kind,
                Err(e) => {
                    log::error!("Skipping {} particles: {}", group.count, e);
                    continue;
                }
            };
            let (list, charge) = match kind {
                ParticleType::Electron => (&mut electrons, charges.electron),
                ParticleType::Proton => (&mut protons, charges.proton),
            };
            let mass = group.mass.unwrap_or_else(|| kind.default_mass());
            for _ in 0..group.count {
                let index = list.len();
                list.push(ParticleAttributes::new(index, kind, mass, charge));
            }
        }

        RunPlan {
            electrons: electrons.len(),
            protons: protons.len(),
            charges,
            particles: electrons.into_iter().chain(protons).collect(),
        }
    }
}

impl ParticleGroup {
    pub fn to_type(&self) -> Result<ParticleType, SimError> {
        self.kind.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{ELECTRON_MASS, PROTON_CHARGE};

    #[test]
    fn default_plan_has_both_populations() {
        let plan = InitConfig::default().plan();
        assert_eq!(plan.electrons, DEFAULT_ELECTRONS);
        assert_eq!(plan.protons, DEFAULT_PROTONS);
        assert_eq!(plan.particles.len(), plan.total());
        assert_eq!(plan.charges, Charges::default());
    }

    #[test]
    fn groups_of_same_type_share_index_space() {
        let config = InitConfig::parse(
            r#"
            [[particles]]
            type = "electron"
            count = 2

            [[particles]]
            type = "p+"
            count = 1

            [[particles]]
            type = "e-"
            count = 3
            mass = 2.0e-30
            "#,
        )
        .unwrap();
        let plan = config.plan();
        assert_eq!((plan.electrons, plan.protons), (5, 1));

        let electron_indices: Vec<_> = plan
            .particles
            .iter()
            .filter(|a| a.kind == ParticleType::Electron)
            .map(|a| a.index)
            .collect();
        assert_eq!(electron_indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(plan.particles[0].mass, ELECTRON_MASS);
        assert_eq!(plan.particles[4].mass, 2.0e-30);
        assert_eq!(plan.particles[5].kind, ParticleType::Proton);
        assert_eq!(plan.particles[5].index, 0);
    }

    #[test]
    fn unknown_type_is_skipped() {
        let config = InitConfig::parse(
            r#"
            [[particles]]
            type = "neutron"
            count = 4

            [[particles]]
            type = "proton"
            count = 2
            "#,
        )
        .unwrap();
        let plan = config.plan();
        assert_eq!(plan.electrons, 0);
        assert_eq!(plan.protons, 2);
        assert!(config.particles[0].to_type().is_err());
    }

    #[test]
    fn charge_overrides_apply_per_type() {
        let config = InitConfig::parse(
            r#"
            [charges]
            electron = -2.0e-19

            [[particles]]
            type = "electron"
            count = 1
            "#,
        )
        .unwrap();
        let plan = config.plan();
        assert_eq!(plan.charges.electron, -2.0e-19);
        assert_eq!(plan.charges.proton, PROTON_CHARGE);
        assert_eq!(plan.particles[0].charge, -2.0e-19);
    }

    #[test]
    fn simulation_table_is_optional() {
        let config = InitConfig::parse("").unwrap();
        assert_eq!(config.simulation, SimConfig::default());
        assert!(config.particles.is_empty());
        assert_eq!(config.plan().total(), 0);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let err = InitConfig::parse("[[particles]]\ntype = 3").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }
}
