use crate::config::{FieldAxis, ScatteringModel, SimulationConfig};
use crate::core::catalog::{CollisionCatalog, CollisionKind};
use crate::core::event::CollisionEvent;
use crate::core::particle::{Electron, DIM};
use crate::core::rate::RateModel;
use crate::core::rng::Pcg;
use crate::error::Result;
use std::collections::VecDeque;
use std::f64::consts::PI;

/// Real-collision allowance shared by every electron of one primary tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionBudget {
    limit: u64,
    used: u64,
}

impl CollisionBudget {
    pub fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }

    #[inline]
    pub fn consume(&mut self) {
        self.used = self.used.saturating_add(1);
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }
}

/// Counters accumulated over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub primaries: u64,
    pub secondaries: u64,
    /// Electrons dropped at a plate or the cylinder wall.
    pub exited: u64,
    /// Electrons (in flight or still queued) dropped because their tree ran out of budget.
    pub budget_dropped: u64,
    /// Trees that ran out of budget.
    pub budget_exhausted_trees: u64,
    pub null_collisions: u64,
    pub elastic: u64,
    pub excitation: u64,
    pub ionization: u64,
}

impl RunStats {
    pub fn real_collisions(&self) -> u64 {
        self.elastic + self.excitation + self.ionization
    }

    fn count(&mut self, kind: CollisionKind) {
        match kind {
            CollisionKind::Elastic => self.elastic += 1,
            CollisionKind::Excitation => self.excitation += 1,
            CollisionKind::Ionization => self.ionization += 1,
        }
    }
}

/// Mutable state the engine writes into while tracking electrons.
#[derive(Debug)]
pub struct SwarmState {
    /// FIFO of electrons waiting to be tracked.
    pub queue: VecDeque<Electron>,
    /// Output log, append-only.
    pub events: Vec<CollisionEvent>,
    pub stats: RunStats,
    /// Budget of the tree currently being processed.
    pub budget: CollisionBudget,
    next_id: u64,
    ceiling_warned: bool,
}

impl SwarmState {
    pub fn new(budget: u64) -> Self {
        Self {
            queue: VecDeque::new(),
            events: Vec::new(),
            stats: RunStats::default(),
            budget: CollisionBudget::new(budget),
            next_id: 0,
            ceiling_warned: false,
        }
    }

    /// Hand out the next run-unique electron id.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Terminal state of a tracked electron.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Exited,
    BudgetExhausted,
}

/// Result of one free flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Left the drift region; nothing is recorded.
    Exited,
    /// Rejected by the acceptance test.
    Null,
    /// Accepted collision in the catalog channel with this index.
    Collision(usize),
}

/// Null-collision transport of single electrons through the drift gap.
#[derive(Debug, Clone)]
pub struct TransportEngine<'a> {
    catalog: &'a CollisionCatalog,
    rates: RateModel,
    axis: FieldAxis,
    distance: f64,
    /// Squared cylinder radius when the wall is modelled.
    radius_sq: Option<f64>,
    scattering: ScatteringModel,
    acceleration: f64,
}

impl<'a> TransportEngine<'a> {
    pub fn new(config: &SimulationConfig, catalog: &'a CollisionCatalog, rates: RateModel) -> Self {
        let r = config.radius();
        Self {
            catalog,
            rates,
            axis: config.field_axis,
            distance: config.distance,
            radius_sq: config.radial_boundary.then_some(r * r),
            scattering: config.scattering,
            acceleration: rates.acceleration(),
        }
    }

    pub fn rates(&self) -> &RateModel {
        &self.rates
    }

    /// Track `electron` until it leaves the gap or the tree budget is spent.
    ///
    /// Real collisions are appended to `state.events`; ionization secondaries go
    /// to the back of `state.queue`.
    pub fn track(&self, mut electron: Electron, rng: &mut Pcg, state: &mut SwarmState) -> Result<Fate> {
        while !state.budget.is_exhausted() {
            match self.step(&mut electron, rng, state)? {
                Step::Exited => {
                    state.stats.exited += 1;
                    return Ok(Fate::Exited);
                }
                Step::Null => state.stats.null_collisions += 1,
                Step::Collision(j) => self.collide(&mut electron, j, rng, state)?,
            }
        }
        state.stats.budget_dropped += 1;
        Ok(Fate::BudgetExhausted)
    }

    /// Free flight, boundary test and acceptance test for one null-collision interval.
    pub fn step(&self, e: &mut Electron, rng: &mut Pcg, state: &mut SwarmState) -> Result<Step> {
        let u = rng.uniform();
        let dt = -(1.0 - u).max(f64::MIN_POSITIVE).ln() / self.rates.max_frequency();
        self.advance(e, dt);

        if self.outside(e) {
            return Ok(Step::Exited);
        }

        let energy = e.energy();
        let u2 = rng.uniform();
        let mut cumulative = 0.0;
        for (j, channel) in self.catalog.channels().iter().enumerate() {
            if channel.threshold() > energy {
                continue;
            }
            cumulative += self.rates.acceptance(channel.cross_section(energy), energy);
            if cumulative > u2 {
                if cumulative > 1.0 && !state.ceiling_warned {
                    state.ceiling_warned = true;
                    log::warn!(
                        "acceptance probability {cumulative:.4} exceeds 1 at {energy:.3} eV; \
                         the collision-frequency ceiling undershoots between grid points"
                    );
                }
                return Ok(Step::Collision(j));
            }
        }
        Ok(Step::Null)
    }

    /// Constant-acceleration motion for `dt` seconds.
    pub fn advance(&self, e: &mut Electron, dt: f64) {
        let k = self.axis.index();
        for (rk, vk) in e.r.iter_mut().zip(e.v.iter()) {
            *rk += vk * dt;
        }
        e.r[k] += 0.5 * self.acceleration * dt * dt;
        e.v[k] += self.acceleration * dt;
        e.time += dt;
    }

    /// Outside `[0, distance]` along the field or beyond the cylinder wall.
    pub fn outside(&self, e: &Electron) -> bool {
        let z = e.r[self.axis.index()];
        if !(0.0..=self.distance).contains(&z) {
            return true;
        }
        match self.radius_sq {
            Some(r2) => e.transverse_sq(self.axis.transverse()) > r2,
            None => false,
        }
    }

    /// Record the collision in channel `j` and apply its energy loss and scattering.
    fn collide(&self, e: &mut Electron, j: usize, rng: &mut Pcg, state: &mut SwarmState) -> Result<()> {
        let channel = &self.catalog.channels()[j];
        let energy = e.energy();
        state.budget.consume();
        state.stats.count(channel.kind());
        state.events.push(CollisionEvent::new(
            e.r,
            e.time,
            energy,
            e.order,
            e.id,
            e.parent,
            j,
            channel.kind(),
        )?);

        let remaining = (energy - channel.threshold()).max(0.0);
        if channel.is_ionization() {
            let id = state.allocate_id();
            let secondary = ionize(e, remaining, id, rng);
            state.stats.secondaries += 1;
            state.queue.push_back(secondary);
        } else {
            scatter(e, remaining, self.scattering, rng);
        }
        Ok(())
    }
}

/// Direction drawn uniformly over the sphere in the lab frame: `cosθ = 1 - 2u`, `φ = 2πu'`.
pub fn isotropic_direction(rng: &mut Pcg) -> [f64; DIM] {
    let cos_theta = 1.0 - 2.0 * rng.uniform();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * rng.uniform();
    [sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta]
}

/// Rotate unit vector `dir` by polar angle χ (given as `cos_chi`) about itself,
/// with azimuth `eta` around the incoming direction.
pub fn rotate_direction(dir: [f64; DIM], cos_chi: f64, eta: f64) -> [f64; DIM] {
    let [gx, gy, gz] = dir;
    // Euler angles of the incoming direction, polar axis x.
    let theta = (gy * gy + gz * gz).sqrt().atan2(gx);
    let phi = gz.atan2(gy);
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    let cc = cos_chi;
    let sc = (1.0 - cc * cc).max(0.0).sqrt();
    let (se, ce) = eta.sin_cos();
    [
        ct * cc - st * sc * ce,
        st * cp * cc + ct * cp * sc * ce - sp * sc * se,
        st * sp * cc + ct * sp * sc * ce + cp * sc * se,
    ]
}

/// Re-orient `e` after a non-ionizing collision and set its speed from `energy` (eV).
pub fn scatter(e: &mut Electron, energy: f64, model: ScatteringModel, rng: &mut Pcg) {
    let direction = match (model, e.direction()) {
        (ScatteringModel::Anisotropic, Some(incoming)) => {
            let cos_chi = 1.0 - 2.0 * rng.uniform();
            let eta = 2.0 * PI * rng.uniform();
            rotate_direction(incoming, cos_chi, eta)
        }
        // An electron at rest has no frame to rotate from.
        _ => isotropic_direction(rng),
    };
    e.set_energy_along(energy, direction);
}

/// Split `remaining` eV between `e` and a new secondary with id `id`.
///
/// One draw `r` gives the secondary `r · remaining` and the primary the rest;
/// both then get fresh isotropic directions, primary first.
pub fn ionize(e: &mut Electron, remaining: f64, id: u64, rng: &mut Pcg) -> Electron {
    let r = rng.uniform();
    let secondary_energy = r * remaining;
    let primary_energy = remaining - secondary_energy;

    let primary_dir = isotropic_direction(rng);
    e.set_energy_along(primary_energy, primary_dir);

    let mut secondary = e.secondary(id, [0.0; DIM]);
    let secondary_dir = isotropic_direction(rng);
    secondary.set_energy_along(secondary_energy, secondary_dir);
    secondary
}
