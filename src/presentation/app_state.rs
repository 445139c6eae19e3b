// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::pipeline::PipelineContext;
use crate::application::settings_service::SettingsService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PipelineContext>,
    pub dashboard_service: DashboardService,
    pub settings_service: SettingsService,
}
