// Dashboard domain model
use super::metrics::MetricsResult;
use super::summary::FleetSummary;
use super::telemetry::{MachineId, SamplePoint, TimeBounds, Window};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachinePanel {
    pub id: MachineId,
    pub heating: bool,
    pub points: Vec<SamplePoint>,
    pub metrics: MetricsResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub window: Window,
    pub bounds: TimeBounds,
    pub machines: Vec<MachinePanel>,
    pub summary: FleetSummary,
}

impl Dashboard {
    pub fn new(
        window: Window,
        bounds: TimeBounds,
        machines: Vec<MachinePanel>,
        summary: FleetSummary,
    ) -> Self {
        Self {
            window,
            bounds,
            machines,
            summary,
        }
    }
}

/// Downsample points for drawing using bucket averaging
pub fn downsample_points(points: &[SamplePoint], max_points: usize) -> Vec<SamplePoint> {
    if max_points == 0 || points.len() <= max_points {
        return points.to_vec();
    }

    let bucket_size = points.len().div_ceil(max_points);

    points
        .chunks(bucket_size)
        .map(|chunk| {
            // Use middle point's timestamp and average value
            let mid = chunk[chunk.len() / 2];
            let avg = chunk.iter().map(|p| p.value).sum::<f64>() / chunk.len() as f64;
            SamplePoint::new(mid.t, avg)
        })
        .collect()
}
