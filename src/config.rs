//! Run configuration for the electron swarm simulation.

use crate::constants::DEFAULT_TEMPERATURE;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Spatial axis along which the electric field points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldAxis {
    X,
    Y,
    #[default]
    Z,
}

impl FieldAxis {
    /// Component index of the axis.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            FieldAxis::X => 0,
            FieldAxis::Y => 1,
            FieldAxis::Z => 2,
        }
    }

    /// Component indices of the two transverse axes, in increasing order.
    #[inline]
    pub fn transverse(self) -> [usize; 2] {
        match self {
            FieldAxis::X => [1, 2],
            FieldAxis::Y => [0, 2],
            FieldAxis::Z => [0, 1],
        }
    }
}

/// How post-collision directions are drawn for non-ionizing collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScatteringModel {
    /// New direction drawn in the fixed lab frame.
    Isotropic,
    /// Scattering angle measured from the incoming direction.
    #[default]
    Anisotropic,
}

/// Parameters of one simulation run.
///
/// Units: reduced field in Td, lengths in m, pressure in Torr, temperature in K,
/// energies in eV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Real collisions allowed per primary electron tree (>= 1).
    pub max_collisions: u64,
    /// Primary electrons to launch (>= 1).
    pub num_electrons: usize,
    /// Reduced field E/N (Td).
    pub reduced_field: f64,
    /// Electrode separation along the field axis (m).
    pub distance: f64,
    /// Gas pressure (Torr).
    pub pressure: f64,
    /// Drift-region diameter (m).
    pub diameter: f64,
    /// Random source seed.
    pub seed: u32,
    /// Gas temperature (K).
    pub temperature: f64,
    pub field_axis: FieldAxis,
    pub scattering: ScatteringModel,
    /// Drop electrons that leave the cylinder of `diameter` around the axis.
    pub radial_boundary: bool,
    /// Primary electrons start with a uniform energy in `[0, initial_energy_max]` (eV).
    pub initial_energy_max: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_collisions: 10_000_000,
            num_electrons: 1000,
            reduced_field: 100.0,
            distance: 0.01,
            pressure: 10.0,
            diameter: 0.05,
            seed: 10,
            temperature: DEFAULT_TEMPERATURE,
            field_axis: FieldAxis::Z,
            scattering: ScatteringModel::Anisotropic,
            radial_boundary: true,
            initial_energy_max: 1.0,
        }
    }
}

impl SimulationConfig {
    /// Check every field; called by the driver before anything is simulated.
    pub fn validate(&self) -> Result<()> {
        if self.max_collisions == 0 {
            return Err(Error::InvalidParam("max_collisions must be >= 1".into()));
        }
        if self.num_electrons == 0 {
            return Err(Error::InvalidParam("num_electrons must be >= 1".into()));
        }
        positive("reduced_field", self.reduced_field)?;
        positive("distance", self.distance)?;
        positive("pressure", self.pressure)?;
        positive("diameter", self.diameter)?;
        positive("temperature", self.temperature)?;
        if !self.initial_energy_max.is_finite() || self.initial_energy_max < 0.0 {
            return Err(Error::InvalidParam(
                "initial_energy_max must be finite and >= 0".into(),
            ));
        }
        Ok(())
    }

    /// Drift-region radius (m).
    #[inline]
    pub fn radius(&self) -> f64 {
        0.5 * self.diameter
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidParam(format!(
            "{name} must be finite and > 0, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() -> Result<()> {
        let cfg = SimulationConfig::default();
        cfg.validate()?;
        assert_eq!(cfg.field_axis, FieldAxis::Z);
        assert_eq!(cfg.scattering, ScatteringModel::Anisotropic);
        assert_eq!(cfg.radius(), 0.025);
        Ok(())
    }

    #[test]
    fn invalid_values_rejected() {
        let bad = [
            SimulationConfig {
                max_collisions: 0,
                ..Default::default()
            },
            SimulationConfig {
                num_electrons: 0,
                ..Default::default()
            },
            SimulationConfig {
                pressure: 0.0,
                ..Default::default()
            },
            SimulationConfig {
                distance: f64::NAN,
                ..Default::default()
            },
            SimulationConfig {
                reduced_field: -5.0,
                ..Default::default()
            },
            SimulationConfig {
                initial_energy_max: -1.0,
                ..Default::default()
            },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{cfg:?} should be rejected");
        }
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() -> Result<()> {
        let cfg = SimulationConfig::from_json_str(
            r#"{ "pressure": 5.0, "field_axis": "x", "scattering": "isotropic", "seed": 3 }"#,
        )?;
        assert_eq!(cfg.pressure, 5.0);
        assert_eq!(cfg.field_axis, FieldAxis::X);
        assert_eq!(cfg.scattering, ScatteringModel::Isotropic);
        assert_eq!(cfg.seed, 3);
        assert_eq!(cfg.num_electrons, 1000);
        Ok(())
    }

    #[test]
    fn json_with_invalid_values_fails_validation() {
        let err = SimulationConfig::from_json_str(r#"{ "diameter": 0.0 }"#).unwrap_err();
        assert!(err.to_string().contains("diameter"));
        assert!(SimulationConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn transverse_axes_exclude_field_axis() {
        for axis in [FieldAxis::X, FieldAxis::Y, FieldAxis::Z] {
            assert!(!axis.transverse().contains(&axis.index()));
        }
    }
}
