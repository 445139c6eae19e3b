// Column classification rules for sensor-export tables
use super::telemetry::MachineId;

/// Ordered alias lists and the machine-id marker used to classify columns.
///
/// Alias matching is exact and case-sensitive; the first alias present in a
/// row wins.
#[derive(Debug, Clone, Copy)]
pub struct ColumnRules {
    pub date_aliases: &'static [&'static str],
    pub time_aliases: &'static [&'static str],
    pub machine_marker: &'static str,
}

pub const DEFAULT_RULES: ColumnRules = ColumnRules {
    date_aliases: &["Date", "Datum", "date", "datum"],
    time_aliases: &["Time", "Zeit", "Uhrzeit", "time", "zeit"],
    machine_marker: "Machine ",
};

const MACHINE_CODE_DIGITS: usize = 2;

impl Default for ColumnRules {
    fn default() -> Self {
        DEFAULT_RULES
    }
}

impl ColumnRules {
    pub fn is_temporal(&self, column: &str) -> bool {
        self.date_aliases.contains(&column) || self.time_aliases.contains(&column)
    }

    /// First date alias that is present in the row, and its cell
    pub fn find_date<'a, F>(&self, lookup: F) -> Option<&'a str>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        self.date_aliases.iter().find_map(|alias| lookup(alias))
    }

    pub fn find_time<'a, F>(&self, lookup: F) -> Option<&'a str>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        self.time_aliases.iter().find_map(|alias| lookup(alias))
    }

    /// Extract the machine id from e.g. "Machine 07 [°C]".
    /// The marker must be followed by exactly two digits; "00" is not an id.
    pub fn machine_id(&self, column: &str) -> Option<MachineId> {
        let start = column.find(self.machine_marker)? + self.machine_marker.len();
        let rest = &column[start..];
        let code = rest.get(..MACHINE_CODE_DIGITS)?;
        if !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if rest[MACHINE_CODE_DIGITS..].starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        code.parse().ok().filter(|id| *id > 0)
    }
}

/// A value cell after decimal-separator normalisation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    Number(f64),
    Unparseable,
}

impl CellValue {
    pub fn parse(cell: &str) -> Self {
        let normalized = cell.trim().replace(',', ".");
        match normalized.parse::<f64>() {
            Ok(v) if v.is_finite() => CellValue::Number(v),
            _ => CellValue::Unparseable,
        }
    }
}
