// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod csv_table;
pub mod file_store;
pub mod http_response;
#[cfg(test)]
pub mod memory_store;
