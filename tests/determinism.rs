mod common;

use common::{reference_config, two_channel_catalog};
use swarmsim::core::Pcg;
use swarmsim::error::Result;
use swarmsim::export::{write_events_csv, CsvOptions};
use swarmsim::run;

/// Identical seed and configuration give byte-identical event logs.
#[test]
fn same_seed_same_log() -> Result<()> {
    common::init_logging();
    let cfg = reference_config(20, 200);
    let a = run(cfg.clone(), two_channel_catalog())?;
    let b = run(cfg, two_channel_catalog())?;
    assert_eq!(a.events, b.events);
    assert_eq!(a.stats, b.stats);

    let mut csv_a = Vec::new();
    let mut csv_b = Vec::new();
    let opts = CsvOptions::default().precision(16);
    write_events_csv(&mut csv_a, &a.events, &opts)?;
    write_events_csv(&mut csv_b, &b.events, &opts)?;
    assert_eq!(csv_a, csv_b);
    Ok(())
}

#[test]
fn different_seed_different_log() -> Result<()> {
    let mut cfg = reference_config(5, 50);
    let a = run(cfg.clone(), two_channel_catalog())?;
    cfg.seed = 11;
    let b = run(cfg, two_channel_catalog())?;
    assert_ne!(a.events, b.events);
    Ok(())
}

/// Seed 10 pins the generator to a fixed output stream.
#[test]
fn seed_ten_stream_is_pinned() {
    let mut rng = Pcg::new(10);
    let first: Vec<u32> = (0..4).map(|_| rng.next_word()).collect();
    assert_eq!(first, vec![1_913_559_896, 4_125_220_191, 988_097_253, 1_433_778_069]);
}
