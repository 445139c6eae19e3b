// Windowed availability and fuel-saving metrics
use super::telemetry::{MachineSeries, Window};
use serde::{Serialize, Serializer};

/// Both endpoints of an interval above this count as "running"
pub const AVAILABILITY_THRESHOLD: f64 = 50.0;
/// Both endpoints of an interval above this count towards fuel savings
pub const SAVINGS_THRESHOLD: f64 = 40.0;
/// Monthly projection is the windowed figure times this, whatever the window length
pub const MONTHLY_FACTOR: f64 = 30.0;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Price per litre and litres per hour used for savings figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRates {
    pub diesel_price: f64,
    pub diesel_consumption: f64,
}

impl FuelRates {
    pub const DEFAULT_PRICE: f64 = 5.30;
    pub const DEFAULT_CONSUMPTION: f64 = 6.30;
}

impl Default for FuelRates {
    fn default() -> Self {
        Self {
            diesel_price: Self::DEFAULT_PRICE,
            diesel_consumption: Self::DEFAULT_CONSUMPTION,
        }
    }
}

/// Accumulated time in milliseconds, shown as "HH:MM"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Uptime(pub i64);

impl Uptime {
    pub fn hours(&self) -> f64 {
        self.0 as f64 / MS_PER_HOUR
    }

    /// Whole hours and floored whole minutes. Integer maths so that
    /// 25h05m does not come out as 25h04m.
    pub fn hours_minutes(&self) -> (i64, i64) {
        let minutes = self.0.max(0) / 60_000;
        (minutes / 60, minutes % 60)
    }
}

impl std::fmt::Display for Uptime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (h, m) = self.hours_minutes();
        write!(f, "{:02}:{:02}", h, m)
    }
}

impl Serialize for Uptime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    pub availability_duration: Uptime,
    pub saved_liters: f64,
    pub saved_currency: f64,
    pub projected_monthly_currency: f64,
    pub last_value: Option<f64>,
}

/// Compute metrics for one machine over an inclusive window.
///
/// An interval between consecutive in-window readings counts only when both
/// of its endpoints are above the relevant threshold.
pub fn compute(series: &MachineSeries, window: Window, rates: FuelRates) -> MetricsResult {
    let points = series.in_window(window);
    let Some(last) = points.last() else {
        return MetricsResult::default();
    };

    let mut available_ms = 0i64;
    let mut eligible_ms = 0i64;
    for pair in points.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let dt = curr.t - prev.t;
        if prev.value > AVAILABILITY_THRESHOLD && curr.value > AVAILABILITY_THRESHOLD {
            available_ms += dt;
        }
        if prev.value > SAVINGS_THRESHOLD && curr.value > SAVINGS_THRESHOLD {
            eligible_ms += dt;
        }
    }

    let saved_liters = Uptime(eligible_ms).hours() * rates.diesel_consumption;
    let saved_currency = saved_liters * rates.diesel_price;

    MetricsResult {
        availability_duration: Uptime(available_ms),
        saved_liters,
        saved_currency,
        projected_monthly_currency: saved_currency * MONTHLY_FACTOR,
        last_value: Some(last.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::SamplePoint;

    const HOUR: i64 = 3_600_000;

    fn series(points: &[(i64, f64)]) -> MachineSeries {
        points.iter().map(|&(t, v)| SamplePoint::new(t, v)).collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_series() {
        let result = compute(&MachineSeries::default(), Window::new(0, HOUR), FuelRates::default());
        assert_eq!(result.availability_duration.to_string(), "00:00");
        assert_eq!(result.saved_liters, 0.0);
        assert_eq!(result.saved_currency, 0.0);
        assert_eq!(result.projected_monthly_currency, 0.0);
        assert_eq!(result.last_value, None);
    }

    #[test]
    fn test_one_hour_above_both_thresholds() {
        let s = series(&[(0, 60.0), (HOUR, 70.0)]);
        let result = compute(&s, Window::new(0, HOUR), FuelRates::default());

        assert_eq!(result.availability_duration, Uptime(HOUR));
        assert_eq!(result.availability_duration.to_string(), "01:00");
        assert!(close(result.saved_liters, 6.30));
        assert!(close(result.saved_currency, 33.39));
        assert!(close(result.projected_monthly_currency, 1001.70));
        assert_eq!(result.last_value, Some(70.0));
    }

    #[test]
    fn test_low_endpoint_breaks_interval() {
        // 60 -> 45 counts for savings only, 45 -> 30 counts for nothing
        let s = series(&[(0, 60.0), (HOUR, 45.0), (2 * HOUR, 30.0), (3 * HOUR, 55.0)]);
        let result = compute(&s, Window::new(0, 3 * HOUR), FuelRates::default());

        assert_eq!(result.availability_duration, Uptime(0));
        assert!(close(result.saved_liters, 6.30));
        assert_eq!(result.last_value, Some(55.0));
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let s = series(&[(0, 60.0), (HOUR, 60.0), (2 * HOUR, 60.0)]);

        let result = compute(&s, Window::new(HOUR, 2 * HOUR), FuelRates::default());
        assert_eq!(result.availability_duration, Uptime(HOUR));
        assert_eq!(result.last_value, Some(60.0));

        let result = compute(&s, Window::new(HOUR + 1, 2 * HOUR - 1), FuelRates::default());
        assert_eq!(result, MetricsResult::default());
    }

    #[test]
    fn test_single_point_contributes_nothing() {
        let s = series(&[(HOUR, 90.0)]);
        let result = compute(&s, Window::new(0, 2 * HOUR), FuelRates::default());

        assert_eq!(result.availability_duration, Uptime(0));
        assert_eq!(result.saved_currency, 0.0);
        assert_eq!(result.last_value, Some(90.0));
    }

    #[test]
    fn test_uptime_formatting_floors_minutes() {
        assert_eq!(Uptime(90 * 60_000 + 59_999).to_string(), "01:30");
        assert_eq!(Uptime(25 * HOUR + 5 * 60_000).to_string(), "25:05");
        assert_eq!(serde_json::to_string(&Uptime(HOUR / 2)).unwrap(), "\"00:30\"");
    }

    #[test]
    fn test_projection_ignores_window_length() {
        let s = series(&[(0, 60.0), (2 * HOUR, 60.0)]);
        let rates = FuelRates {
            diesel_price: 2.0,
            diesel_consumption: 1.0,
        };
        let result = compute(&s, Window::new(-10 * 24 * HOUR, 10 * 24 * HOUR), rates);

        assert!(close(result.saved_currency, 4.0));
        assert!(close(result.projected_monthly_currency, 120.0));
    }
}
