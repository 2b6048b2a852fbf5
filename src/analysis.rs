//! Aggregations over a finished event log: axial histograms, density grids,
//! time slices and swarm summary figures.
//!
//! Everything here reads `&[CollisionEvent]` and never touches engine state.

use crate::config::FieldAxis;
use crate::core::event::CollisionEvent;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Count events in `bins` equal-width bins over `[0, distance]` along `axis`.
///
/// Events on the far plate land in the last bin; events outside the gap are ignored.
pub fn axial_histogram(
    events: &[CollisionEvent],
    axis: FieldAxis,
    distance: f64,
    bins: usize,
) -> Result<Vec<u64>> {
    if bins == 0 {
        return Err(Error::InvalidParam("bins must be > 0".into()));
    }
    if !distance.is_finite() || distance <= 0.0 {
        return Err(Error::InvalidParam("distance must be finite and > 0".into()));
    }
    let k = axis.index();
    let mut counts = vec![0u64; bins];
    for ev in events {
        let z = ev.r[k];
        if !(0.0..=distance).contains(&z) {
            continue;
        }
        let idx = ((z / distance * bins as f64) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Ok(counts)
}

/// Collision density on a node grid spanning one transverse coordinate
/// (`[-radius, radius]`) and the field axis (`[0, distance]`).
///
/// Each event is shared between its four surrounding nodes with bilinear
/// (cloud-in-cell) weights, so every deposited event adds exactly 1 to the total.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    nx: usize,
    nz: usize,
    /// Row-major, `values[iz * nx + ix]`.
    values: Vec<f64>,
}

impl DensityGrid {
    pub fn deposit(
        events: &[CollisionEvent],
        axis: FieldAxis,
        radius: f64,
        distance: f64,
        nx: usize,
        nz: usize,
    ) -> Result<Self> {
        if nx < 2 || nz < 2 {
            return Err(Error::InvalidParam(
                "density grid needs at least 2 nodes per direction".into(),
            ));
        }
        if !(radius.is_finite() && radius > 0.0 && distance.is_finite() && distance > 0.0) {
            return Err(Error::InvalidParam(
                "grid radius and distance must be finite and > 0".into(),
            ));
        }
        let k = axis.index();
        let t = axis.transverse()[0];
        let mut values = vec![0.0; nx * nz];

        for ev in events {
            let s = ev.r[t];
            let z = ev.r[k];
            if !(-radius..=radius).contains(&s) || !(0.0..=distance).contains(&z) {
                continue;
            }
            let gx = (s + radius) / (2.0 * radius) * (nx - 1) as f64;
            let gz = z / distance * (nz - 1) as f64;
            let ix = (gx.floor() as usize).min(nx - 2);
            let iz = (gz.floor() as usize).min(nz - 2);
            let dx = gx - ix as f64;
            let dz = gz - iz as f64;

            values[iz * nx + ix] += (1.0 - dx) * (1.0 - dz);
            values[iz * nx + ix + 1] += dx * (1.0 - dz);
            values[(iz + 1) * nx + ix] += (1.0 - dx) * dz;
            values[(iz + 1) * nx + ix + 1] += dx * dz;
        }
        Ok(Self { nx, nz, values })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.nz)
    }

    /// Value at transverse node `ix`, axial node `iz`.
    pub fn get(&self, ix: usize, iz: usize) -> Option<f64> {
        if ix >= self.nx || iz >= self.nz {
            return None;
        }
        Some(self.values[iz * self.nx + ix])
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Copy scaled so the largest node is 1; an empty grid stays all zero.
    pub fn normalized(&self) -> Self {
        let m = self.max();
        let values = if m > 0.0 {
            self.values.iter().map(|v| v / m).collect()
        } else {
            self.values.clone()
        };
        Self {
            nx: self.nx,
            nz: self.nz,
            values,
        }
    }
}

/// Sort events by time and split `[0, t_last]` into `n` equal windows.
///
/// The last window is closed so the final event is always included.
pub fn time_slices(events: &[CollisionEvent], n: usize) -> Result<Vec<Vec<CollisionEvent>>> {
    if n == 0 {
        return Err(Error::InvalidParam("number of slices must be > 0".into()));
    }
    let mut sorted = events.to_vec();
    sorted.sort();
    let mut slices = vec![Vec::new(); n];
    let t_last = sorted.last().map_or(0.0, CollisionEvent::time_f64);
    for ev in sorted {
        let idx = if t_last > 0.0 {
            ((ev.time_f64() / t_last * n as f64) as usize).min(n - 1)
        } else {
            0
        };
        slices[idx].push(ev);
    }
    Ok(slices)
}

/// Headline numbers of a swarm run.
#[derive(Debug, Clone, PartialEq)]
pub struct SwarmSummary {
    pub total: usize,
    pub ionizations: usize,
    /// Event count per generation order.
    pub by_order: BTreeMap<u32, usize>,
    /// Mean electron energy at collision (eV); 0 for an empty log.
    pub mean_energy: f64,
    /// Least-squares slope of axial position against time (m/s), when defined.
    pub drift_velocity: Option<f64>,
}

impl SwarmSummary {
    pub fn from_events(events: &[CollisionEvent], axis: FieldAxis) -> Self {
        let k = axis.index();
        let total = events.len();
        let ionizations = events.iter().filter(|e| e.is_ionization()).count();
        let mut by_order = BTreeMap::new();
        for ev in events {
            *by_order.entry(ev.order).or_insert(0) += 1;
        }
        let mean_energy = if total > 0 {
            events.iter().map(|e| e.energy).sum::<f64>() / total as f64
        } else {
            0.0
        };

        let drift_velocity = if total >= 2 {
            let nf = total as f64;
            let mean_t = events.iter().map(CollisionEvent::time_f64).sum::<f64>() / nf;
            let mean_z = events.iter().map(|e| e.r[k]).sum::<f64>() / nf;
            let (mut sxy, mut sxx) = (0.0, 0.0);
            for ev in events {
                let dt = ev.time_f64() - mean_t;
                sxy += dt * (ev.r[k] - mean_z);
                sxx += dt * dt;
            }
            (sxx > 0.0).then(|| sxy / sxx)
        } else {
            None
        };

        Self {
            total,
            ionizations,
            by_order,
            mean_energy,
            drift_velocity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CollisionKind;

    fn at(r: [f64; 3], time: f64, order: u32, kind: CollisionKind) -> CollisionEvent {
        CollisionEvent::new(r, time, 10.0 + order as f64, order, 0, None, 0, kind).unwrap()
    }

    #[test]
    fn histogram_bins_along_field_axis() -> Result<()> {
        let evs = vec![
            at([0.0, 0.0, 0.0], 0.0, 0, CollisionKind::Elastic),
            at([0.0, 0.0, 0.0049], 1.0, 0, CollisionKind::Elastic),
            at([0.0, 0.0, 0.0051], 2.0, 0, CollisionKind::Elastic),
            at([0.0, 0.0, 0.01], 3.0, 0, CollisionKind::Elastic),
            at([0.0, 0.0, 0.02], 4.0, 0, CollisionKind::Elastic),
        ];
        let h = axial_histogram(&evs, FieldAxis::Z, 0.01, 2)?;
        assert_eq!(h, vec![2, 2]);
        assert!(axial_histogram(&evs, FieldAxis::Z, 0.01, 0).is_err());
        Ok(())
    }

    #[test]
    fn grid_deposit_conserves_count() -> Result<()> {
        let evs = vec![
            at([0.0, 0.0, 0.005], 0.0, 0, CollisionKind::Elastic),
            at([0.01, 0.0, 0.002], 0.0, 0, CollisionKind::Elastic),
            at([-0.025, 0.0, 0.01], 0.0, 0, CollisionKind::Elastic),
            at([0.5, 0.0, 0.005], 0.0, 0, CollisionKind::Elastic),
        ];
        let grid = DensityGrid::deposit(&evs, FieldAxis::Z, 0.025, 0.01, 11, 5)?;
        assert_eq!(grid.shape(), (11, 5));
        assert!((grid.total() - 3.0).abs() < 1e-12);
        // Centre of the gap sits exactly on node (5, 2).
        assert!((grid.get(5, 2).unwrap() - 1.0).abs() < 1e-12);
        // Corner event lands on node (0, 4).
        assert!((grid.get(0, 4).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(grid.get(11, 0), None);
        let n = grid.normalized();
        assert!((n.max() - 1.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn slices_partition_by_time() -> Result<()> {
        let evs = vec![
            at([0.0; 3], 4.0, 0, CollisionKind::Elastic),
            at([0.0; 3], 0.5, 0, CollisionKind::Elastic),
            at([0.0; 3], 2.5, 0, CollisionKind::Elastic),
        ];
        let s = time_slices(&evs, 2)?;
        assert_eq!(s[0].len(), 1);
        assert_eq!(s[1].len(), 2);
        assert!(s[1][0].time_f64() <= s[1][1].time_f64());
        assert!(time_slices(&evs, 0).is_err());
        assert_eq!(time_slices(&[], 3)?.iter().map(Vec::len).sum::<usize>(), 0);
        Ok(())
    }

    #[test]
    fn summary_recovers_linear_drift() {
        let evs: Vec<_> = (0..10)
            .map(|i| {
                let t = i as f64 * 1e-9;
                let kind = if i % 3 == 0 {
                    CollisionKind::Ionization
                } else {
                    CollisionKind::Elastic
                };
                at([0.0, 0.0, 2e5 * t], t, (i % 2) as u32, kind)
            })
            .collect();
        let s = SwarmSummary::from_events(&evs, FieldAxis::Z);
        assert_eq!(s.total, 10);
        assert_eq!(s.ionizations, 4);
        assert_eq!(s.by_order.get(&0), Some(&5));
        assert_eq!(s.by_order.get(&1), Some(&5));
        assert!((s.mean_energy - 10.5).abs() < 1e-12);
        let v = s.drift_velocity.expect("defined");
        assert!((v / 2e5 - 1.0).abs() < 1e-9);

        let empty = SwarmSummary::from_events(&[], FieldAxis::Z);
        assert_eq!(empty.drift_velocity, None);
        assert_eq!(empty.mean_energy, 0.0);
    }
}
