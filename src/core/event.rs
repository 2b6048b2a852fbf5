use crate::core::catalog::CollisionKind;
use crate::core::particle::DIM;
use crate::error::{Error, Result};
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A real (accepted) collision, captured just before the collision changes the electron.
///
/// Events have a total order: by time, then electron id, then channel, so a
/// log can be sorted deterministically for time-sliced consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// Position (m).
    pub r: [f64; DIM],
    /// Simulation time (s); finite, non-NaN.
    pub time: NotNan<f64>,
    /// Electron kinetic energy on arrival (eV).
    pub energy: f64,
    /// Generation order of the colliding electron.
    pub order: u32,
    pub electron_id: u64,
    pub parent_id: Option<u64>,
    /// Index of the channel in the catalog.
    pub channel: usize,
    pub kind: CollisionKind,
}

impl CollisionEvent {
    /// Create a new event, validating that time is finite and non-NaN.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        r: [f64; DIM],
        time: f64,
        energy: f64,
        order: u32,
        electron_id: u64,
        parent_id: Option<u64>,
        channel: usize,
        kind: CollisionKind,
    ) -> Result<Self> {
        if !time.is_finite() {
            return Err(Error::InvalidParam(format!(
                "event time must be finite, got {time}"
            )));
        }
        let time =
            NotNan::new(time).map_err(|_| Error::InvalidParam("event time cannot be NaN".into()))?;
        Ok(Self {
            r,
            time,
            energy,
            order,
            electron_id,
            parent_id,
            channel,
            kind,
        })
    }

    /// Returns the raw f64 event time.
    #[inline]
    pub fn time_f64(&self) -> f64 {
        self.time.into_inner()
    }

    #[inline]
    pub fn is_ionization(&self) -> bool {
        self.kind.is_ionization()
    }
}

impl Eq for CollisionEvent {}

impl Ord for CollisionEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then(self.electron_id.cmp(&other.electron_id))
            .then(self.channel.cmp(&other.channel))
            .then_with(|| {
                // Remaining fields only matter for exact duplicates; NaN-free by construction.
                self.energy
                    .total_cmp(&other.energy)
                    .then(self.order.cmp(&other.order))
                    .then(self.parent_id.cmp(&other.parent_id))
                    .then(self.kind.cmp(&other.kind))
                    .then_with(|| {
                        self.r
                            .iter()
                            .zip(other.r.iter())
                            .map(|(a, b)| a.total_cmp(b))
                            .find(|o| o.is_ne())
                            .unwrap_or(Ordering::Equal)
                    })
            })
    }
}

impl PartialOrd for CollisionEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
