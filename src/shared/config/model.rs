use serde::Deserialize;
use std::env;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodecConfig {
    /// Max rows per row group; unset writes the whole span as one row group
    #[serde(default)]
    pub row_group_size: Option<usize>,
    #[serde(default = "default_data_page_size")]
    pub data_page_size: usize,
    /// One of "uncompressed", "snappy", "zstd", "lz4_raw"
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_compression_level")]
    pub compression_level: i32,
    #[serde(default = "default_true")]
    pub statistics: bool,
    #[serde(default)]
    pub dictionary: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            row_group_size: None,
            data_page_size: default_data_page_size(),
            compression: default_compression(),
            compression_level: default_compression_level(),
            statistics: true,
            dictionary: false,
        }
    }
}

fn default_data_page_size() -> usize {
    1024 * 1024
}

fn default_compression() -> String {
    "uncompressed".to_string()
}

fn default_compression_level() -> i32 {
    3
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_stdout_level")]
    pub stdout_level: String,
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            stdout_level: default_stdout_level(),
            file_level: default_file_level(),
        }
    }
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_stdout_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path =
        env::var("PARTITION_CODEC_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

/// Loads `path` (any extension the `config` crate knows, optional) and
/// applies `PARTITION_CODEC__SECTION__KEY` environment overrides.
pub fn load_settings_from(path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(config::Environment::with_prefix("PARTITION_CODEC").separator("__"))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
