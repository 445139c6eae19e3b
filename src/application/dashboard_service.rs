// Dashboard service - Use cases for per-machine metrics and fleet summaries
use crate::application::pipeline::PipelineContext;
use crate::domain::dashboard::{downsample_points, Dashboard, MachinePanel};
use crate::domain::metrics::{self, MetricsResult};
use crate::domain::summary::{self, FleetSummary};
use crate::domain::telemetry::{MachineId, TimeBounds, Window};
use crate::domain::timestamp::Instant;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("window start {start} is after end {end}")]
    InvertedWindow { start: Instant, end: Instant },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Caller-selected window; missing ends default to the ingested bounds
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowRequest {
    pub start: Option<Instant>,
    pub end: Option<Instant>,
}

impl WindowRequest {
    pub fn resolve(self, bounds: TimeBounds) -> Result<Window, DashboardError> {
        let full = bounds.as_window().unwrap_or(Window::new(0, 0));
        let start = self.start.unwrap_or(full.start);
        let end = self.end.unwrap_or(full.end);
        if start > end {
            return Err(DashboardError::InvertedWindow { start, end });
        }
        Ok(Window::new(start, end))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineOverview {
    pub id: MachineId,
    pub samples: usize,
    pub first: Option<Instant>,
    pub last: Option<Instant>,
    pub heating: bool,
}

#[derive(Clone)]
pub struct DashboardService {
    context: Arc<PipelineContext>,
    max_chart_points: usize,
}

impl DashboardService {
    pub fn new(context: Arc<PipelineContext>, max_chart_points: usize) -> Self {
        Self {
            context,
            max_chart_points,
        }
    }

    pub async fn list_machines(&self) -> Result<Vec<MachineOverview>, DashboardError> {
        let data = self.context.snapshot().await;
        let flags = self.context.heating_flags().await?;

        Ok(data
            .series
            .iter()
            .map(|(&id, series)| MachineOverview {
                id,
                samples: series.len(),
                first: series.points().first().map(|p| p.t),
                last: series.points().last().map(|p| p.t),
                heating: flags.get(&id).copied().unwrap_or(false),
            })
            .collect())
    }

    pub async fn get_dashboard(&self, request: WindowRequest) -> Result<Dashboard, DashboardError> {
        let data = self.context.snapshot().await;
        let window = request.resolve(data.bounds)?;
        let flags = self.context.heating_flags().await?;
        let rates = self.context.fuel_rates().await?;

        let machines = data
            .series
            .iter()
            .map(|(&id, series)| MachinePanel {
                id,
                heating: flags.get(&id).copied().unwrap_or(false),
                points: downsample_points(series.in_window(window), self.max_chart_points),
                metrics: metrics::compute(series, window, rates),
            })
            .collect();
        let summary = summary::summarize(&data.series, window, &flags, rates);

        Ok(Dashboard::new(window, data.bounds, machines, summary))
    }

    pub async fn machine_metrics(
        &self,
        id: MachineId,
        request: WindowRequest,
    ) -> Result<MetricsResult, DashboardError> {
        let data = self.context.snapshot().await;
        let window = request.resolve(data.bounds)?;
        // a machine with no samples simply has nothing to report
        let Some(series) = data.series.get(&id) else {
            return Ok(MetricsResult::default());
        };
        let rates = self.context.fuel_rates().await?;

        Ok(metrics::compute(series, window, rates))
    }

    pub async fn summary(&self, request: WindowRequest) -> Result<FleetSummary, DashboardError> {
        let data = self.context.snapshot().await;
        let window = request.resolve(data.bounds)?;
        let flags = self.context.heating_flags().await?;
        let rates = self.context.fuel_rates().await?;

        Ok(summary::summarize(&data.series, window, &flags, rates))
    }
}
