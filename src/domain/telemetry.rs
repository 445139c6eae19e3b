// Telemetry data domain models
use super::timestamp::Instant;
use serde::Serialize;
use std::collections::BTreeMap;

/// Machine identifier extracted from a sensor column name
pub type MachineId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplePoint {
    pub t: Instant,
    pub value: f64,
}

impl SamplePoint {
    pub fn new(t: Instant, value: f64) -> Self {
        Self { t, value }
    }
}

/// Readings of one machine, sorted by `t` once construction finishes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MachineSeries {
    points: Vec<SamplePoint>,
}

impl MachineSeries {
    pub(crate) fn push(&mut self, point: SamplePoint) {
        self.points.push(point);
    }

    /// Stable, so equal instants keep first-seen order.
    pub(crate) fn sort(&mut self) {
        self.points.sort_by_key(|p| p.t);
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points inside the inclusive window, in series order
    pub fn in_window(&self, window: Window) -> &[SamplePoint] {
        let from = self.points.partition_point(|p| p.t < window.start);
        let to = self.points.partition_point(|p| p.t <= window.end);
        if from >= to { &[] } else { &self.points[from..to] }
    }
}

impl FromIterator<SamplePoint> for MachineSeries {
    fn from_iter<I: IntoIterator<Item = SamplePoint>>(iter: I) -> Self {
        let mut series = Self {
            points: iter.into_iter().collect(),
        };
        series.sort();
        series
    }
}

pub type SeriesMap = BTreeMap<MachineId, MachineSeries>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBounds {
    pub min: Instant,
    pub max: Instant,
}

impl TimeBounds {
    /// Sentinel for "no samples": min above max.
    pub const EMPTY: Self = Self {
        min: Instant::MAX,
        max: Instant::MIN,
    };

    pub fn include(&mut self, t: Instant) {
        self.min = self.min.min(t);
        self.max = self.max.max(t);
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// The whole ingested range as a window, if anything was ingested
    pub fn as_window(&self) -> Option<Window> {
        (!self.is_empty()).then(|| Window::new(self.min, self.max))
    }
}

impl Default for TimeBounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Serialize for TimeBounds {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_window().serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: Instant,
    pub end: Instant,
}

impl Window {
    pub fn new(start: Instant, end: Instant) -> Self {
        Self { start, end }
    }
}
