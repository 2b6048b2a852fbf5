use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One tabulated point: electron energy (eV) and cross-section (m²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossSectionSample {
    pub energy: f64,
    pub cross_section: f64,
}

impl CrossSectionSample {
    pub fn new(energy: f64, cross_section: f64) -> Self {
        Self {
            energy,
            cross_section,
        }
    }
}

/// Energy-ordered cross-section samples for a single collision channel.
///
/// Invariants (checked by [`CrossSectionTable::new`]):
/// - at least one sample
/// - all values finite and non-negative
/// - energies non-decreasing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSectionTable {
    samples: Vec<CrossSectionSample>,
}

impl CrossSectionTable {
    /// Build a table, validating the ordering and sign invariants.
    pub fn new(samples: Vec<CrossSectionSample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::InvalidParam(
                "cross-section table needs at least one sample".into(),
            ));
        }
        for s in &samples {
            if !s.energy.is_finite() || s.energy < 0.0 {
                return Err(Error::InvalidParam(format!(
                    "sample energy must be finite and >= 0, got {}",
                    s.energy
                )));
            }
            if !s.cross_section.is_finite() || s.cross_section < 0.0 {
                return Err(Error::InvalidParam(format!(
                    "cross-section must be finite and >= 0, got {}",
                    s.cross_section
                )));
            }
        }
        if samples.windows(2).any(|w| w[1].energy < w[0].energy) {
            return Err(Error::InvalidParam(
                "sample energies must be in ascending order".into(),
            ));
        }
        Ok(Self { samples })
    }

    /// Convenience constructor from `(energy, cross_section)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        Self::new(
            pairs
                .iter()
                .map(|&(e, s)| CrossSectionSample::new(e, s))
                .collect(),
        )
    }

    pub fn samples(&self) -> &[CrossSectionSample] {
        &self.samples
    }

    /// Lowest tabulated energy (eV).
    #[inline]
    pub fn min_energy(&self) -> f64 {
        self.samples[0].energy
    }

    /// Highest tabulated energy (eV).
    #[inline]
    pub fn max_energy(&self) -> f64 {
        self.samples[self.samples.len() - 1].energy
    }

    /// Linearly interpolated cross-section at `energy`; exactly 0 outside
    /// `[min_energy, max_energy]`.
    ///
    /// A bracket whose two energies coincide yields its lower sample instead of
    /// dividing by zero.
    pub fn interpolate(&self, energy: f64) -> f64 {
        if !(energy >= self.min_energy() && energy <= self.max_energy()) {
            return 0.0;
        }
        // First sample strictly above `energy`; the bracket is (idx - 1, idx).
        let idx = self.samples.partition_point(|s| s.energy <= energy);
        if idx == self.samples.len() {
            // energy == max_energy
            return self.samples[idx - 1].cross_section;
        }
        let lo = self.samples[idx - 1];
        let hi = self.samples[idx];
        let width = hi.energy - lo.energy;
        if width <= 0.0 {
            return lo.cross_section;
        }
        lo.cross_section + (hi.cross_section - lo.cross_section) * (energy - lo.energy) / width
    }
}
