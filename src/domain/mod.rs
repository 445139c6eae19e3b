// Domain layer - Pure data normalisation and metrics
pub mod columns;
pub mod dashboard;
pub mod metrics;
pub mod series;
pub mod summary;
pub mod telemetry;
pub mod timestamp;
