mod common;

use common::{reference_config, two_channel_catalog};
use std::collections::HashMap;
use swarmsim::analysis::{axial_histogram, SwarmSummary};
use swarmsim::error::{Error, Result};
use swarmsim::{run, CollisionKind, FieldAxis, ScatteringModel, Simulation, SimulationConfig};

/// Reference scenario: one primary, budget 10.
#[test]
fn reference_scenario_small_budget() -> Result<()> {
    common::init_logging();
    let out = run(reference_config(1, 10), two_channel_catalog())?;
    assert!(!out.events.is_empty());
    assert!(out.events.len() <= 10);
    assert_eq!(out.events[0].order, 0);
    assert_eq!(out.events[0].electron_id, 0);
    assert_eq!(out.stats.primaries, 1);
    assert!((out.density / 3.2189e23 - 1.0).abs() < 1e-3);
    assert!((out.field_strength / (100.0e-21 * out.density) - 1.0).abs() < 1e-12);

    let again = run(reference_config(1, 10), two_channel_catalog())?;
    assert_eq!(out.events, again.events);
    Ok(())
}

/// The first collision of the reference scenario is pinned, so any change to
/// the launch or free-flight draw order shows up here.
#[test]
fn reference_scenario_first_collision() -> Result<()> {
    let out = run(reference_config(1, 10), two_channel_catalog())?;
    let first = &out.events[0];
    let close = |got: f64, want: f64| (got / want - 1.0).abs() < 1e-9;
    assert!(close(first.time_f64(), 2.134_569_622_966_038e-10), "t = {}", first.time_f64());
    assert!(close(first.r[0], 1.617_320_174_482_085e-2), "x = {}", first.r[0]);
    assert!(close(first.r[1], -4.158_622_658_105_245e-3), "y = {}", first.r[1]);
    assert!(close(first.r[2], 1.491_575_991_810_626e-4), "z = {}", first.r[2]);
    assert!(close(first.energy, 5.031_193_744_499_637), "E = {}", first.energy);
    assert_eq!(first.kind, CollisionKind::Elastic);
    assert_eq!(first.channel, 0);
    assert_eq!(first.parent_id, None);
    Ok(())
}

/// Secondaries are tracked first-in first-out: every electron's collisions
/// form one contiguous run in the log, and those runs appear in id order.
#[test]
fn secondaries_are_tracked_in_fifo_order() -> Result<()> {
    let cfg = SimulationConfig {
        reduced_field: 600.0,
        ..reference_config(1, 2_000)
    };
    let out = run(cfg, two_channel_catalog())?;
    assert!(out.stats.secondaries > 0, "no ionization at 600 Td");

    let mut runs: Vec<u64> = Vec::new();
    for ev in &out.events {
        if runs.last() != Some(&ev.electron_id) {
            runs.push(ev.electron_id);
        }
    }
    assert!(runs.len() > 1);
    assert!(
        runs.windows(2).all(|w| w[0] < w[1]),
        "electrons interleaved or out of queue order: {runs:?}"
    );
    Ok(())
}

/// Generation orders grow only through ionization: every secondary's parent
/// ionized earlier in the log, and order = parent order + 1.
#[test]
fn orders_increase_only_through_ionization() -> Result<()> {
    let cfg = SimulationConfig {
        reduced_field: 600.0,
        ..reference_config(3, 2_000)
    };
    let out = run(cfg, two_channel_catalog())?;
    let mut order_of: HashMap<u64, u32> = HashMap::new();
    let mut ionized: HashMap<u64, usize> = HashMap::new();
    for ev in &out.events {
        order_of.insert(ev.electron_id, ev.order);
        match ev.parent_id {
            None => assert_eq!(ev.order, 0),
            Some(p) => {
                assert!(ionized.get(&p).copied().unwrap_or(0) > 0, "parent {p} never ionized");
                assert_eq!(ev.order, order_of[&p] + 1);
            }
        }
        if ev.kind == CollisionKind::Ionization {
            *ionized.entry(ev.electron_id).or_default() += 1;
        }
    }
    assert_eq!(
        out.stats.ionization as usize,
        out.events.iter().filter(|e| e.is_ionization()).count()
    );
    assert!(out.stats.secondaries <= out.stats.ionization);
    Ok(())
}

/// Per-electron event times never go backwards.
#[test]
fn event_times_monotonic_per_electron() -> Result<()> {
    let out = run(reference_config(10, 500), two_channel_catalog())?;
    let mut last: HashMap<u64, f64> = HashMap::new();
    for ev in &out.events {
        let t = ev.time_f64();
        if let Some(prev) = last.insert(ev.electron_id, t) {
            assert!(t >= prev, "electron {} went back in time", ev.electron_id);
        }
    }
    Ok(())
}

/// Every event lies inside the drift region and carries a non-negative energy.
#[test]
fn events_stay_inside_gap() -> Result<()> {
    let cfg = reference_config(10, 300);
    let out = run(cfg.clone(), two_channel_catalog())?;
    let r2 = cfg.radius() * cfg.radius();
    for ev in &out.events {
        assert!((0.0..=cfg.distance).contains(&ev.r[2]));
        assert!(ev.r[0] * ev.r[0] + ev.r[1] * ev.r[1] <= r2);
        assert!(ev.energy >= 0.0);
        // Ionization only above its threshold.
        if ev.is_ionization() {
            assert!(ev.energy >= 21.0);
        }
    }
    let hist = axial_histogram(&out.events, FieldAxis::Z, cfg.distance, 10)?;
    assert_eq!(hist.iter().sum::<u64>() as usize, out.events.len());
    Ok(())
}

/// The field axis is a parameter: along x, collisions spread along x.
#[test]
fn field_along_x_axis() -> Result<()> {
    let cfg = SimulationConfig {
        field_axis: FieldAxis::X,
        scattering: ScatteringModel::Isotropic,
        ..reference_config(5, 300)
    };
    let out = run(cfg.clone(), two_channel_catalog())?;
    assert!(!out.events.is_empty());
    for ev in &out.events {
        assert!((0.0..=cfg.distance).contains(&ev.r[0]));
    }
    let summary = SwarmSummary::from_events(&out.events, FieldAxis::X);
    assert_eq!(summary.total, out.events.len());
    Ok(())
}

#[test]
fn invalid_configuration_is_rejected_before_running() {
    let cfg = SimulationConfig {
        num_electrons: 0,
        ..Default::default()
    };
    let err = Simulation::new(cfg, two_channel_catalog()).unwrap_err();
    assert!(matches!(err, Error::InvalidParam(_)));
}

#[test]
fn data_file_loads_from_disk() -> Result<()> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/two_channel.txt");
    let cat = swarmsim::CollisionCatalog::from_file(path)?;
    assert_eq!(cat.len(), 2);
    assert_eq!(cat.channels()[1].threshold(), 21.0);
    assert_eq!(cat.max_energy(), 200.0);
    assert!(swarmsim::CollisionCatalog::from_file("does/not/exist.txt").is_err());
    Ok(())
}
