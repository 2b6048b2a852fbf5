use crate::config::SimulationConfig;
use crate::core::catalog::CollisionCatalog;
use crate::core::event::CollisionEvent;
use crate::core::particle::{Electron, DIM};
use crate::core::rate::{velocity, RateModel};
use crate::core::rng::Pcg;
use crate::core::transport::{
    isotropic_direction, CollisionBudget, Fate, RunStats, SwarmState, TransportEngine,
};
use crate::error::Result;
use std::f64::consts::PI;

/// Everything a run hands back to its caller.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    /// Real collisions in the order they happened.
    pub events: Vec<CollisionEvent>,
    /// Gas number density (m⁻³).
    pub density: f64,
    /// Electric field (V/m).
    pub field_strength: f64,
    /// Null-collision ceiling (1/s).
    pub max_frequency: f64,
    pub stats: RunStats,
}

/// Drives primaries and their ionization descendants through the drift gap.
///
/// Each primary's whole tree is drained from a FIFO queue before the next
/// primary is launched. The collision budget is shared by the tree and reset
/// for every primary.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    catalog: CollisionCatalog,
    rates: RateModel,
    rng: Pcg,
}

impl Simulation {
    /// Validate `config` and build the rate model for `catalog`.
    ///
    /// Errors: `Error::InvalidParam` for bad configuration,
    /// `Error::DegenerateRateModel` when the collision ceiling is zero.
    pub fn new(config: SimulationConfig, catalog: CollisionCatalog) -> Result<Self> {
        config.validate()?;
        let rates = RateModel::new(&config, &catalog)?;
        let rng = Pcg::new(config.seed);
        Ok(Self {
            config,
            catalog,
            rates,
            rng,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CollisionCatalog {
        &self.catalog
    }

    pub fn rates(&self) -> &RateModel {
        &self.rates
    }

    /// Run every primary to completion and return the event log.
    ///
    /// Consumes the simulation: the random stream is single-use, so a second
    /// run needs a fresh `Simulation`.
    pub fn run(mut self) -> Result<SimulationOutput> {
        log::info!(
            "running {} primaries: n = {:.4e} m^-3, E = {:.4e} V/m, nu_max = {:.4e} 1/s",
            self.config.num_electrons,
            self.rates.density(),
            self.rates.field_strength(),
            self.rates.max_frequency()
        );
        let engine = TransportEngine::new(&self.config, &self.catalog, self.rates);
        let mut state = SwarmState::new(self.config.max_collisions);

        for _ in 0..self.config.num_electrons {
            let id = state.allocate_id();
            let primary = launch_primary(&self.config, id, &mut self.rng)?;
            state.stats.primaries += 1;
            state.budget = CollisionBudget::new(self.config.max_collisions);
            state.queue.push_back(primary);
            drain_tree(&engine, &mut self.rng, &mut state)?;
        }

        log::info!(
            "run finished: {} events, {} ionizations, {} secondaries",
            state.events.len(),
            state.stats.ionization,
            state.stats.secondaries
        );
        Ok(SimulationOutput {
            events: state.events,
            density: self.rates.density(),
            field_strength: self.rates.field_strength(),
            max_frequency: self.rates.max_frequency(),
            stats: state.stats,
        })
    }
}

/// Track queued electrons until the queue empties or the tree budget runs out,
/// in which case the rest of the queue is dropped.
fn drain_tree(engine: &TransportEngine<'_>, rng: &mut Pcg, state: &mut SwarmState) -> Result<()> {
    let start = state.events.len();
    while let Some(electron) = state.queue.pop_front() {
        if engine.track(electron, rng, state)? == Fate::BudgetExhausted {
            let dropped = state.queue.len() as u64;
            state.queue.clear();
            state.stats.budget_dropped += dropped;
            state.stats.budget_exhausted_trees += 1;
            break;
        }
    }
    log::debug!(
        "tree finished after {} collisions ({} budget left)",
        state.events.len() - start,
        state.budget.remaining()
    );
    Ok(())
}

/// New primary on the cathode plane: uniform over the drift-region disk, a
/// uniform energy below `initial_energy_max`, direction uniform over the
/// hemisphere facing along the field.
pub fn launch_primary(config: &SimulationConfig, id: u64, rng: &mut Pcg) -> Result<Electron> {
    let radius = config.radius() * rng.uniform().sqrt();
    let angle = 2.0 * PI * rng.uniform();
    let energy = config.initial_energy_max * rng.uniform();
    let mut direction = isotropic_direction(rng);

    let axis = config.field_axis.index();
    let [t0, t1] = config.field_axis.transverse();
    let mut r = [0.0_f64; DIM];
    r[t0] = radius * angle.cos();
    r[t1] = radius * angle.sin();

    // `isotropic_direction` uses z as polar axis; map it onto the field axis.
    direction.swap(2, axis);
    direction[axis] = direction[axis].abs();
    let speed = velocity(energy);
    Electron::primary(id, r, direction.map(|d| d * speed))
}
