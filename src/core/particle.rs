use crate::core::rate::{kinetic_energy, velocity};
use crate::error::{Error, Result};

/// Fixed spatial dimension (3D).
pub const DIM: usize = 3;

/// A free electron in flight.
///
/// Kinetic energy is always derived from `v`; there is no separately stored energy.
/// Electrons are plain values moved through the driver's queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Electron {
    /// Run-unique identifier assigned by the driver.
    pub id: u64,
    /// Identifier of the ionizing parent; `None` for primaries.
    pub parent: Option<u64>,
    /// Position (m).
    pub r: [f64; DIM],
    /// Velocity (m/s).
    pub v: [f64; DIM],
    /// Elapsed simulation time (s).
    pub time: f64,
    /// Number of ionization ancestors.
    pub order: u32,
}

impl Electron {
    /// Create a primary electron after validating that the state is finite.
    pub fn primary(id: u64, r: [f64; DIM], v: [f64; DIM]) -> Result<Self> {
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            id,
            parent: None,
            r,
            v,
            time: 0.0,
            order: 0,
        })
    }

    /// A secondary released by this electron: same place and time, one order higher.
    pub fn secondary(&self, id: u64, v: [f64; DIM]) -> Self {
        Self {
            id,
            parent: Some(self.id),
            r: self.r,
            v,
            time: self.time,
            order: self.order + 1,
        }
    }

    #[inline]
    pub fn speed_sq(&self) -> f64 {
        self.v.iter().map(|&c| c * c).sum()
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed_sq().sqrt()
    }

    /// Kinetic energy in eV.
    #[inline]
    pub fn energy(&self) -> f64 {
        kinetic_energy(self.speed_sq())
    }

    /// Replace the velocity with `speed(energy) · direction`.
    #[inline]
    pub fn set_energy_along(&mut self, energy: f64, direction: [f64; DIM]) {
        let s = velocity(energy);
        for (vk, dk) in self.v.iter_mut().zip(direction) {
            *vk = s * dk;
        }
    }

    /// Unit vector along the velocity, or `None` at rest.
    pub fn direction(&self) -> Option<[f64; DIM]> {
        let s = self.speed();
        if s <= 0.0 || !s.is_finite() {
            return None;
        }
        Some(self.v.map(|c| c / s))
    }

    /// Squared distance from the field axis given the two transverse components.
    #[inline]
    pub fn transverse_sq(&self, transverse: [usize; 2]) -> f64 {
        transverse.iter().map(|&k| self.r[k] * self.r[k]).sum()
    }
}
