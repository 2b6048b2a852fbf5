#![allow(dead_code)]

use swarmsim::{CollisionCatalog, SimulationConfig};

pub const TWO_CHANNEL: &str = include_str!("../data/two_channel.txt");

pub fn two_channel_catalog() -> CollisionCatalog {
    CollisionCatalog::parse(TWO_CHANNEL).expect("fixture parses")
}

/// The reference scenario: 10 Torr, 100 Td, 1 cm gap, 5 cm diameter, seed 10.
pub fn reference_config(num_electrons: usize, max_collisions: u64) -> SimulationConfig {
    SimulationConfig {
        pressure: 10.0,
        reduced_field: 100.0,
        distance: 0.01,
        diameter: 0.05,
        num_electrons,
        seed: 10,
        max_collisions,
        ..Default::default()
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
