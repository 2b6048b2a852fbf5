//! Transport engine: cross-section data, rate model, random source, electron
//! kinematics and the simulation driver.

pub mod catalog;
pub mod cross_section;
pub mod event;
pub mod particle;
pub mod rate;
pub mod rng;
pub mod sim;
pub mod transport;

pub use catalog::{Channel, CollisionCatalog, CollisionKind};
pub use cross_section::{CrossSectionSample, CrossSectionTable};
pub use event::CollisionEvent;
pub use particle::Electron;
pub use rate::RateModel;
pub use rng::Pcg;
pub use sim::{Simulation, SimulationOutput};
pub use transport::{Fate, RunStats, TransportEngine};
