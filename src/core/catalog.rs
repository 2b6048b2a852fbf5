use crate::core::cross_section::{CrossSectionSample, CrossSectionTable};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Delimiter that opens and closes the table of a channel block.
const DELIMITER: &str = "-----";

/// Collision process class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CollisionKind {
    Elastic,
    Excitation,
    Ionization,
}

impl CollisionKind {
    /// Block tag used in cross-section files.
    pub fn tag(self) -> &'static str {
        match self {
            CollisionKind::Elastic => "ELASTIC",
            CollisionKind::Excitation => "EXCITATION",
            CollisionKind::Ionization => "IONIZATION",
        }
    }

    fn from_line(line: &str) -> Option<Self> {
        [
            CollisionKind::Elastic,
            CollisionKind::Excitation,
            CollisionKind::Ionization,
        ]
        .into_iter()
        .find(|k| line.starts_with(k.tag()))
    }

    #[inline]
    pub fn is_ionization(self) -> bool {
        matches!(self, CollisionKind::Ionization)
    }
}

impl fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One collision channel: its class, threshold energy (eV) and cross-section curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    kind: CollisionKind,
    threshold: f64,
    table: CrossSectionTable,
}

impl Channel {
    pub fn new(kind: CollisionKind, threshold: f64, table: CrossSectionTable) -> Result<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::InvalidParam(format!(
                "{kind} threshold must be finite and >= 0, got {threshold}"
            )));
        }
        Ok(Self {
            kind,
            threshold,
            table,
        })
    }

    #[inline]
    pub fn kind(&self) -> CollisionKind {
        self.kind
    }

    /// Energy (eV) lost by the electron when this channel fires; also the
    /// minimum energy at which it is considered.
    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[inline]
    pub fn is_ionization(&self) -> bool {
        self.kind.is_ionization()
    }

    pub fn table(&self) -> &CrossSectionTable {
        &self.table
    }

    /// Cross-section (m²) at `energy` (eV).
    #[inline]
    pub fn cross_section(&self, energy: f64) -> f64 {
        self.table.interpolate(energy)
    }
}

/// The ordered set of channels for one gas. Channel order is the order the
/// acceptance test walks them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionCatalog {
    channels: Vec<Channel>,
}

impl CollisionCatalog {
    pub fn new(channels: Vec<Channel>) -> Result<Self> {
        if channels.is_empty() {
            return Err(Error::InvalidParam(
                "collision catalog needs at least one channel".into(),
            ));
        }
        Ok(Self { channels })
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channels of the given kind, with their catalog indices.
    pub fn of_kind(&self, kind: CollisionKind) -> impl Iterator<Item = (usize, &Channel)> {
        self.channels
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.kind() == kind)
    }

    /// Highest tabulated energy over all channels (eV).
    pub fn max_energy(&self) -> f64 {
        self.channels
            .iter()
            .map(|c| c.table().max_energy())
            .fold(0.0, f64::max)
    }

    /// Sum of all channel cross-sections at `energy` (m²).
    pub fn total_cross_section(&self, energy: f64) -> f64 {
        self.channels.iter().map(|c| c.cross_section(energy)).sum()
    }

    /// Read and parse a cross-section file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse the block format:
    ///
    /// ```text
    /// ELASTIC
    /// any free text
    /// -----
    /// 0.0	1.6e-20
    /// 1.0	2.0e-20
    /// -----
    /// IONIZATION
    /// -----
    /// 21.56	0.0
    /// 100.0	7.5e-21
    /// -----
    /// ```
    ///
    /// Rows are tab-separated (other whitespace is accepted) and use `.` as the
    /// decimal separator. Text outside channel blocks is ignored. Excitation and
    /// ionization thresholds are the first tabulated energy; elastic channels
    /// have no threshold.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim_end()));
        let mut channels = Vec::new();
        let mut last_line = 0usize;

        while let Some((line_no, line)) = lines.next() {
            last_line = line_no;
            let Some(kind) = CollisionKind::from_line(line.trim_start()) else {
                continue;
            };
            let name = format!("{} #{}", kind.tag(), channels.len() + 1);

            // Skip the free-form header up to the opening delimiter.
            loop {
                match lines.next() {
                    Some((n, l)) => {
                        last_line = n;
                        if l.trim_start().starts_with(DELIMITER) {
                            break;
                        }
                    }
                    None => {
                        return Err(Error::data_format(
                            last_line,
                            Some(&name),
                            "missing opening delimiter line",
                        ));
                    }
                }
            }

            let mut samples: Vec<CrossSectionSample> = Vec::new();
            loop {
                let Some((n, l)) = lines.next() else {
                    return Err(Error::data_format(
                        last_line,
                        Some(&name),
                        "missing closing delimiter line",
                    ));
                };
                last_line = n;
                let row = l.trim();
                if row.starts_with(DELIMITER) {
                    break;
                }
                if row.is_empty() {
                    continue;
                }
                let sample = parse_row(row, n, &name)?;
                if let Some(prev) = samples.last() {
                    if sample.energy < prev.energy {
                        return Err(Error::data_format(
                            n,
                            Some(&name),
                            format!(
                                "energies must ascend ({} after {})",
                                sample.energy, prev.energy
                            ),
                        ));
                    }
                }
                samples.push(sample);
            }

            if samples.is_empty() {
                return Err(Error::data_format(
                    last_line,
                    Some(&name),
                    "channel has no cross-section rows",
                ));
            }
            let threshold = match kind {
                CollisionKind::Elastic => 0.0,
                CollisionKind::Excitation | CollisionKind::Ionization => samples[0].energy,
            };
            let table = CrossSectionTable::new(samples)
                .map_err(|e| Error::data_format(last_line, Some(&name), e.to_string()))?;
            channels.push(Channel::new(kind, threshold, table)?);
        }

        if channels.is_empty() {
            return Err(Error::data_format(
                last_line,
                None,
                "no ELASTIC, EXCITATION or IONIZATION blocks found",
            ));
        }
        log::debug!("parsed {} collision channels", channels.len());
        Self::new(channels)
    }
}

fn parse_row(row: &str, line: usize, channel: &str) -> Result<CrossSectionSample> {
    let mut fields: Vec<&str> = row.split('\t').map(str::trim).filter(|f| !f.is_empty()).collect();
    if fields.len() < 2 {
        fields = row.split_whitespace().collect();
    }
    if fields.len() < 2 {
        return Err(Error::data_format(
            line,
            Some(channel),
            format!("expected `energy<TAB>cross_section`, got {row:?}"),
        ));
    }
    let number = |field: &str, what: &str| -> Result<f64> {
        let v: f64 = field.parse().map_err(|_| {
            Error::data_format(line, Some(channel), format!("unparsable {what} {field:?}"))
        })?;
        if !v.is_finite() || v < 0.0 {
            return Err(Error::data_format(
                line,
                Some(channel),
                format!("{what} must be finite and >= 0, got {field}"),
            ));
        }
        Ok(v)
    };
    Ok(CrossSectionSample::new(
        number(fields[0], "energy")?,
        number(fields[1], "cross-section")?,
    ))
}
