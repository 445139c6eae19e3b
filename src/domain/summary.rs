// Cross-machine summary totals
use super::metrics::{self, FuelRates};
use super::telemetry::{MachineId, SeriesMap, Window};
use serde::Serialize;
use std::collections::HashMap;

pub type HeatingFlags = HashMap<MachineId, bool>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub heating_machine_ids: Vec<MachineId>,
    pub total_saved_liters: f64,
    pub total_saved_currency: f64,
    pub total_projected_monthly: f64,
}

/// Sum per-machine metrics across the fleet.
///
/// Litres and currency are summed over flagged machines that have any data;
/// the monthly projection is summed over every machine that has any data.
pub fn summarize(
    series: &SeriesMap,
    window: Window,
    flags: &HeatingFlags,
    rates: FuelRates,
) -> FleetSummary {
    let mut summary = FleetSummary::default();

    for (&id, machine) in series.iter().filter(|(_, s)| !s.is_empty()) {
        let result = metrics::compute(machine, window, rates);
        summary.total_projected_monthly += result.projected_monthly_currency;

        if flags.get(&id).copied().unwrap_or(false) {
            summary.heating_machine_ids.push(id);
            summary.total_saved_liters += result.saved_liters;
            summary.total_saved_currency += result.saved_currency;
        }
    }

    summary
}
