// Series construction from parsed sensor-export rows
use super::columns::{CellValue, ColumnRules};
use super::telemetry::{SamplePoint, SeriesMap, TimeBounds};
use super::timestamp;
use serde::Serialize;

/// One parsed table row: column name to cell text, in header order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell.as_str())
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Counts of what one ingestion cycle accepted and dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub tables: usize,
    pub rows_accepted: usize,
    pub rows_skipped: usize,
    pub samples: usize,
    pub cells_unparseable: usize,
}

/// Output of one ingestion cycle. Replaced wholesale on re-ingestion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestedData {
    pub series: SeriesMap,
    pub bounds: TimeBounds,
    pub report: IngestReport,
}

pub struct SeriesBuilder {
    rules: ColumnRules,
}

impl Default for SeriesBuilder {
    fn default() -> Self {
        Self::new(ColumnRules::default())
    }
}

impl SeriesBuilder {
    pub fn new(rules: ColumnRules) -> Self {
        Self { rules }
    }

    /// Build one sorted series per machine from the union of all tables.
    ///
    /// Rows whose timestamp cannot be resolved are dropped whole; single
    /// unparseable cells are dropped without affecting their siblings.
    pub fn build(&self, tables: &[Vec<RawRow>]) -> IngestedData {
        let mut series = SeriesMap::new();
        let mut bounds = TimeBounds::EMPTY;
        let mut report = IngestReport {
            tables: tables.len(),
            ..IngestReport::default()
        };

        for row in tables.iter().flatten() {
            let date = self.rules.find_date(|k| row.get(k)).unwrap_or_default();
            let time = self.rules.find_time(|k| row.get(k)).unwrap_or_default();
            let t = match timestamp::resolve(date, time) {
                Ok(t) => t,
                Err(e) => {
                    tracing::debug!("Skipping row: {}", e);
                    report.rows_skipped += 1;
                    continue;
                }
            };
            report.rows_accepted += 1;
            bounds.include(t);

            for (column, cell) in row.cells() {
                if self.rules.is_temporal(column) || cell.trim().is_empty() {
                    continue;
                }
                let Some(id) = self.rules.machine_id(column) else {
                    continue;
                };
                match CellValue::parse(cell) {
                    CellValue::Number(value) => {
                        series.entry(id).or_default().push(SamplePoint::new(t, value));
                        report.samples += 1;
                    }
                    CellValue::Unparseable => {
                        tracing::debug!("Skipping cell {:?} in column {}", cell, column);
                        report.cells_unparseable += 1;
                    }
                }
            }
        }

        for s in series.values_mut() {
            s.sort();
        }

        IngestedData {
            series,
            bounds,
            report,
        }
    }
}
