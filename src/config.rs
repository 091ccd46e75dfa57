use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub recommendation: RecommendationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Allowed CORS origins; empty means permissive
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            api_prefix: default_api_prefix(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_api_prefix() -> String { "/api/v1".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_locations_path")]
    pub locations_path: PathBuf,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            locations_path: default_locations_path(),
            model_path: default_model_path(),
        }
    }
}

fn default_locations_path() -> PathBuf { PathBuf::from("data/locations_metadata.csv") }
fn default_model_path() -> PathBuf { PathBuf::from("models/enjoyment_model.json") }

/// Defaults applied when a recommend request omits its search parameters
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_max_distance_km")]
    pub default_max_distance_km: f64,
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_max_distance_km: default_max_distance_km(),
            default_top_n: default_top_n(),
        }
    }
}

fn default_max_distance_km() -> f64 { 50.0 }
fn default_top_n() -> usize { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TOURISM_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., TOURISM__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject defaults that the request validator would refuse
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.workers == Some(0) {
            return Err(ConfigError::Message(
                "server.workers must be at least 1".to_string(),
            ));
        }

        let radius = self.recommendation.default_max_distance_km;
        if !(radius > 0.0 && radius <= 500.0) {
            return Err(ConfigError::Message(format!(
                "recommendation.default_max_distance_km must be in (0, 500], got {}",
                radius
            )));
        }

        let top_n = self.recommendation.default_top_n;
        if !(1..=20).contains(&top_n) {
            return Err(ConfigError::Message(format!(
                "recommendation.default_top_n must be in [1, 20], got {}",
                top_n
            )));
        }

        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("TOURISM")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("server.allowed_origins")
        .try_parsing(true)
}
