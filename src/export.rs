//! CSV export of collision event logs.
//!
//! Output always uses `.` as decimal separator and scientific notation, so
//! files read back identically regardless of host locale.
//!
//! ```csv
//! # swarmsim collision events
//! # reduced_field_td: 100
//! time_s,x_m,y_m,z_m,energy_ev,order,electron_id,parent_id,channel,kind
//! 1.234567e-10,1.000000e-3,...
//! ```

use crate::config::SimulationConfig;
use crate::core::event::CollisionEvent;
use crate::core::sim::SimulationOutput;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const COLUMNS: [&str; 10] = [
    "time_s",
    "x_m",
    "y_m",
    "z_m",
    "energy_ev",
    "order",
    "electron_id",
    "parent_id",
    "channel",
    "kind",
];

/// Formatting options for [`write_events_csv`].
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Column delimiter (default: ',')
    pub delimiter: char,
    /// Digits after the decimal point in scientific notation (default: 6)
    pub precision: usize,
    /// `# key: value` lines written before the header
    pub metadata: Vec<(String, String)>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            precision: 6,
            metadata: Vec::new(),
        }
    }
}

impl CsvOptions {
    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Record the run configuration and derived scalars as metadata lines.
    pub fn with_run_metadata(mut self, config: &SimulationConfig, output: &SimulationOutput) -> Self {
        let entries = [
            ("reduced_field_td", config.reduced_field.to_string()),
            ("pressure_torr", config.pressure.to_string()),
            ("distance_m", config.distance.to_string()),
            ("diameter_m", config.diameter.to_string()),
            ("seed", config.seed.to_string()),
            ("density_m3", format!("{:e}", output.density)),
            ("field_v_per_m", format!("{:e}", output.field_strength)),
            ("max_frequency_hz", format!("{:e}", output.max_frequency)),
        ];
        self.metadata
            .extend(entries.into_iter().map(|(k, v)| (k.to_string(), v)));
        self
    }
}

/// Write `events` as CSV to any writer.
pub fn write_events_csv<W: Write>(
    mut out: W,
    events: &[CollisionEvent],
    options: &CsvOptions,
) -> Result<()> {
    if options.delimiter == '.' || options.delimiter == '-' || options.delimiter.is_ascii_digit() {
        return Err(Error::InvalidParam(format!(
            "delimiter {:?} collides with number formatting",
            options.delimiter
        )));
    }
    let d = options.delimiter.to_string();
    let p = options.precision;

    writeln!(out, "# swarmsim collision events")?;
    for (key, value) in &options.metadata {
        writeln!(out, "# {key}: {value}")?;
    }
    writeln!(out, "{}", COLUMNS.join(&d))?;

    for ev in events {
        let parent = ev.parent_id.map(|p| p.to_string()).unwrap_or_default();
        let row = [
            format!("{:.p$e}", ev.time_f64()),
            format!("{:.p$e}", ev.r[0]),
            format!("{:.p$e}", ev.r[1]),
            format!("{:.p$e}", ev.r[2]),
            format!("{:.p$e}", ev.energy),
            ev.order.to_string(),
            ev.electron_id.to_string(),
            parent,
            ev.channel.to_string(),
            ev.kind.tag().to_string(),
        ];
        writeln!(out, "{}", row.join(&d))?;
    }
    out.flush()?;
    Ok(())
}

/// Write `events` to a CSV file at `path`, creating or truncating it.
pub fn export_events_csv(
    path: impl AsRef<Path>,
    events: &[CollisionEvent],
    options: &CsvOptions,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_events_csv(BufWriter::new(file), events, options)?;
    log::info!("wrote {} events to {}", events.len(), path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CollisionKind;

    fn sample() -> Vec<CollisionEvent> {
        vec![
            CollisionEvent::new([1e-3, -2e-3, 5e-3], 1.5e-9, 12.25, 0, 0, None, 0, CollisionKind::Elastic)
                .unwrap(),
            CollisionEvent::new([1e-3, -2e-3, 6e-3], 2.0e-9, 30.0, 1, 3, Some(0), 1, CollisionKind::Ionization)
                .unwrap(),
        ]
    }

    #[test]
    fn writes_header_and_rows() -> Result<()> {
        let mut buf = Vec::new();
        write_events_csv(&mut buf, &sample(), &CsvOptions::default().precision(3))?;
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# swarmsim collision events");
        assert_eq!(lines[1], COLUMNS.join(","));
        assert_eq!(
            lines[2],
            "1.500e-9,1.000e-3,-2.000e-3,5.000e-3,1.225e1,0,0,,0,ELASTIC"
        );
        assert!(lines[3].ends_with(",1,3,0,1,IONIZATION"));
        assert_eq!(lines.len(), 4);
        Ok(())
    }

    #[test]
    fn metadata_and_delimiter() -> Result<()> {
        let mut buf = Vec::new();
        let opts = CsvOptions {
            metadata: vec![("seed".into(), "10".into())],
            ..Default::default()
        }
        .delimiter(';');
        write_events_csv(&mut buf, &sample(), &opts)?;
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("# seed: 10\n"));
        assert!(text.contains("time_s;x_m;"));
        Ok(())
    }

    #[test]
    fn rejects_numeric_delimiter() {
        let opts = CsvOptions::default().delimiter('.');
        assert!(write_events_csv(Vec::new(), &sample(), &opts).is_err());
    }
}
