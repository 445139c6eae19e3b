// Application layer - Pipeline context, store port and use cases
pub mod dashboard_service;
pub mod pipeline;
pub mod settings_service;
pub mod store;
