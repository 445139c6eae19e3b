use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Directory for the file-backed store
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// CSV exports loaded into the store at startup
    #[serde(default)]
    pub seed_files: Vec<PathBuf>,
    #[serde(default = "default_max_chart_points")]
    pub max_chart_points: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_chart_points() -> usize {
    500
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            store_dir: default_store_dir(),
            log_level: default_log_level(),
            seed_files: Vec::new(),
            max_chart_points: default_max_chart_points(),
        }
    }
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/server").required(false))
        .add_source(
            config::Environment::with_prefix("MACHINE_TELEMETRY")
                .prefix_separator("__")
                .list_separator(",")
                .with_list_parse_key("seed_files")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
