use crate::config::SimulationConfig;
use crate::constants::{EV_TO_J, E_CHARGE, M_ELECTRON, NUM_ENERGY_BINS, N_A, PA_PER_TORR, R_GAS, TOWNSEND};
use crate::core::catalog::CollisionCatalog;
use crate::error::{Error, Result};

/// Ideal-gas number density (m⁻³) at `pressure` Torr and `temperature` K.
#[inline]
pub fn density(pressure: f64, temperature: f64) -> f64 {
    pressure * PA_PER_TORR * N_A / (R_GAS * temperature)
}

/// Field strength (V/m) from a reduced field in Td and a number density (m⁻³).
#[inline]
pub fn field_strength(reduced_field: f64, density: f64) -> f64 {
    reduced_field * TOWNSEND * density
}

/// Electron speed (m/s) at kinetic energy `energy` (eV).
#[inline]
pub fn velocity(energy: f64) -> f64 {
    (2.0 * energy.max(0.0) * EV_TO_J / M_ELECTRON).sqrt()
}

/// Kinetic energy (eV) of an electron with squared speed `speed_sq` (m²/s²).
#[inline]
pub fn kinetic_energy(speed_sq: f64) -> f64 {
    0.5 * M_ELECTRON * speed_sq / EV_TO_J
}

/// Gas and field scalars of a run plus the null-collision ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateModel {
    density: f64,
    field_strength: f64,
    max_frequency: f64,
}

impl RateModel {
    /// Derive density and field from `config` and scan `catalog` for the ceiling.
    ///
    /// Errors: `Error::DegenerateRateModel` when the ceiling is zero or not finite.
    pub fn new(config: &SimulationConfig, catalog: &CollisionCatalog) -> Result<Self> {
        let n = density(config.pressure, config.temperature);
        let field = field_strength(config.reduced_field, n);
        let max_frequency = max_frequency(catalog, n);
        if !max_frequency.is_finite() || max_frequency <= 0.0 {
            return Err(Error::DegenerateRateModel(format!(
                "maximum collision frequency is {max_frequency} (density {n:.4e} m^-3, \
                 max tabulated energy {} eV)",
                catalog.max_energy()
            )));
        }
        Ok(Self {
            density: n,
            field_strength: field,
            max_frequency,
        })
    }

    /// Gas number density (m⁻³).
    #[inline]
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Electric field (V/m).
    #[inline]
    pub fn field_strength(&self) -> f64 {
        self.field_strength
    }

    /// Null-collision ceiling (1/s).
    #[inline]
    pub fn max_frequency(&self) -> f64 {
        self.max_frequency
    }

    /// Magnitude of the field-driven acceleration (m/s²).
    #[inline]
    pub fn acceleration(&self) -> f64 {
        E_CHARGE * self.field_strength / M_ELECTRON
    }

    /// Probability that an electron at `energy` undergoes a real collision in
    /// channel with cross-section `cross_section`, relative to the ceiling.
    #[inline]
    pub fn acceptance(&self, cross_section: f64, energy: f64) -> f64 {
        self.density * cross_section * velocity(energy) / self.max_frequency
    }
}

/// Largest `density · σ_total(E) · v(E)` over `NUM_ENERGY_BINS` energies
/// `i · E_max / NUM_ENERGY_BINS`.
pub fn max_frequency(catalog: &CollisionCatalog, density: f64) -> f64 {
    let e_max = catalog.max_energy();
    (0..NUM_ENERGY_BINS)
        .map(|i| {
            let energy = i as f64 * e_max / NUM_ENERGY_BINS as f64;
            density * catalog.total_cross_section(energy) * velocity(energy)
        })
        .fold(0.0, f64::max)
}
