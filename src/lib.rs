//! swarmsim: Monte Carlo transport of electron swarms through a neutral gas.
//!
//! Electrons drift between two plane electrodes under a uniform field. Free
//! flights are drawn with the null-collision method against a constant
//! ceiling frequency; accepted collisions are elastic, excitation or
//! ionization events taken from tabulated cross-sections. Ionization spawns
//! secondaries that are tracked in FIFO order within the primary's tree.
//!
//! ```no_run
//! use swarmsim::{run, CollisionCatalog, SimulationConfig};
//!
//! let catalog = CollisionCatalog::from_file("cross_sections.txt")?;
//! let config = SimulationConfig { num_electrons: 10, ..Default::default() };
//! let output = run(config, catalog)?;
//! println!("{} collisions", output.events.len());
//! # Ok::<(), swarmsim::error::Error>(())
//! ```

pub mod analysis;
pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod export;

#[cfg(feature = "python")]
mod python;

pub use crate::config::{FieldAxis, ScatteringModel, SimulationConfig};
pub use crate::core::{
    Channel, CollisionCatalog, CollisionEvent, CollisionKind, CrossSectionTable, Simulation,
    SimulationOutput,
};

/// Run a complete simulation: validate, build the rate model, track every
/// primary tree and return the event log with the run scalars.
pub fn run(config: SimulationConfig, catalog: CollisionCatalog) -> error::Result<SimulationOutput> {
    Simulation::new(config, catalog)?.run()
}
