//! Physical constants and fixed model parameters (SI unless noted).

/// Elementary charge (C)
pub const E_CHARGE: f64 = 1.602_176_634e-19;

/// Electron mass (kg)
pub const M_ELECTRON: f64 = 9.109_383_7e-31;

/// Joules per electron-volt
pub const EV_TO_J: f64 = E_CHARGE;

/// Avogadro number (1/mol)
pub const N_A: f64 = 6.022_140_76e23;

/// Molar gas constant (J/(mol·K))
pub const R_GAS: f64 = 8.314_462_618;

/// Pascals per Torr
pub const PA_PER_TORR: f64 = 133.322_368;

/// One Townsend in V·m²
pub const TOWNSEND: f64 = 1e-21;

/// Gas temperature used by the rate model unless configured otherwise (K)
pub const DEFAULT_TEMPERATURE: f64 = 300.0;

/// Points in the energy grid scanned for the null-collision ceiling
pub const NUM_ENERGY_BINS: usize = 1000;
