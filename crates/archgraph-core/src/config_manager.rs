use crate::{AggregationLevel, LayerConfig, ViewConfiguration};
use globset::Glob;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration for ArchGraph
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArchGraphConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Defaults applied to analyze and validate requests
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Rendering settings for graph exports
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origin; "*" allows any origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Module granularity when the request does not name one
    #[serde(default)]
    pub aggregation_level: AggregationLevel,

    #[serde(default)]
    pub include_tests: bool,

    /// Glob patterns of root-relative paths to leave out of projections
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// File extensions picked up by the graph loader
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Layer map used by validate when the request carries none
    #[serde(default)]
    pub layers: LayerConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            aggregation_level: AggregationLevel::default(),
            include_tests: false,
            exclude_patterns: Vec::new(),
            source_extensions: default_source_extensions(),
            layers: LayerConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn view_configuration(&self) -> ViewConfiguration {
        ViewConfiguration {
            aggregation_level: self.aggregation_level,
            include_tests: self.include_tests,
            exclude_patterns: self.exclude_patterns.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_svg_width")]
    pub width: u32,

    #[serde(default = "default_svg_height")]
    pub height: u32,

    #[serde(default = "default_svg_padding")]
    pub padding: u32,

    #[serde(default = "default_true")]
    pub show_labels: bool,

    /// Pretty-print JSON graph exports
    #[serde(default = "default_true")]
    pub pretty_json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: default_svg_width(),
            height: default_svg_height(),
            padding: default_svg_padding(),
            show_labels: true,
            pretty_json: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: pretty, compact
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3001
}
fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}
fn default_source_extensions() -> Vec<String> {
    ["ts", "tsx", "js", "jsx", "mjs", "cjs"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_svg_width() -> u32 {
    1200
}
fn default_svg_height() -> u32 {
    800
}
fn default_svg_padding() -> u32 {
    40
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

/// Configuration manager with layered sources
pub struct ConfigManager {
    config: ArchGraphConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with the following precedence:
    /// 1. Environment variables (.env file)
    /// 2. Config file (.archgraph.toml)
    /// 3. Sensible defaults
    pub fn load() -> Result<Self, ConfigError> {
        info!("Loading ArchGraph configuration...");

        Self::load_dotenv();

        let (config, config_path) = Self::load_config_file()?;
        let config = Self::apply_env_overrides(config);
        Self::validate_config(&config)?;

        match config_path {
            Some(ref path) => info!(config_file = %path.display(), "Configuration loaded"),
            None => info!("Configuration loaded (no config file, using defaults)"),
        }
        info!(
            host = %config.server.host,
            port = config.server.port,
            aggregation_level = %config.analysis.aggregation_level,
            "Server settings"
        );

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Wrap an in-memory configuration, validating it first
    pub fn from_config(config: ArchGraphConfig) -> Result<Self, ConfigError> {
        Self::validate_config(&config)?;
        Ok(Self {
            config,
            config_path: None,
        })
    }

    fn load_dotenv() {
        if Path::new(".env").exists() {
            if let Err(e) = dotenv::from_filename(".env") {
                warn!("Failed to load .env file: {}", e);
            } else {
                info!("Loaded .env file from current directory");
            }
        }
    }

    /// Search order:
    /// 1. ./.archgraph.toml (current directory)
    /// 2. ~/.archgraph/config.toml (user config)
    /// 3. Use defaults
    fn load_config_file() -> Result<(ArchGraphConfig, Option<PathBuf>), ConfigError> {
        let local_config = Path::new(".archgraph.toml");
        if local_config.exists() {
            let config = Self::read_toml_file(local_config)?;
            return Ok((config, Some(local_config.to_path_buf())));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".archgraph").join("config.toml");
            if user_config.exists() {
                let config = Self::read_toml_file(&user_config)?;
                return Ok((config, Some(user_config)));
            }
        }

        Ok((ArchGraphConfig::default(), None))
    }

    pub fn read_toml_file(path: &Path) -> Result<ArchGraphConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn apply_env_overrides(config: ArchGraphConfig) -> ArchGraphConfig {
        Self::apply_overrides(config, |key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup; prefixed names win over bare ones
    fn apply_overrides<F>(mut config: ArchGraphConfig, var: F) -> ArchGraphConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|k| var(*k));

        if let Some(host) = first(&["ARCHGRAPH_HOST", "HOST"]) {
            config.server.host = host;
        }
        if let Some(port) = first(&["ARCHGRAPH_PORT", "PORT"]) {
            match port.parse() {
                Ok(p) => config.server.port = p,
                Err(_) => warn!("Ignoring invalid port override: {}", port),
            }
        }
        if let Some(origin) = first(&["ARCHGRAPH_CORS_ORIGIN", "CORS_ORIGIN"]) {
            config.server.cors_origin = origin;
        }
        if let Some(level) = var("ARCHGRAPH_AGGREGATION_LEVEL") {
            match level.parse() {
                Ok(l) => config.analysis.aggregation_level = l,
                Err(_) => warn!("Ignoring invalid aggregation level override: {}", level),
            }
        }
        if let Some(include) = var("ARCHGRAPH_INCLUDE_TESTS") {
            config.analysis.include_tests = include.to_lowercase() == "true" || include == "1";
        }
        if let Some(level) = var("RUST_LOG") {
            config.logging.level = level;
        }
        if let Some(format) = var("ARCHGRAPH_LOG_FORMAT") {
            config.logging.format = format;
        }

        config
    }

    fn validate_config(config: &ArchGraphConfig) -> Result<(), ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if config.analysis.source_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "analysis.source_extensions must not be empty".to_string(),
            ));
        }

        for pattern in &config.analysis.exclude_patterns {
            Glob::new(pattern).map_err(|e| {
                ConfigError::ValidationError(format!(
                    "Invalid exclude pattern {}: {}",
                    pattern, e
                ))
            })?;
        }

        if config.export.width == 0 || config.export.height == 0 || config.export.padding == 0 {
            return Err(ConfigError::ValidationError(
                "export.width, export.height and export.padding must be greater than 0".to_string(),
            ));
        }

        // RUST_LOG may carry a full filter directive; only bare levels are checked
        let level = config.logging.level.as_str();
        if !level.contains('=') && !level.contains(',') {
            match level {
                "trace" | "debug" | "info" | "warn" | "error" => {}
                other => {
                    return Err(ConfigError::ValidationError(format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        other
                    )))
                }
            }
        }

        match config.logging.format.as_str() {
            "pretty" | "compact" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {}. Must be one of: pretty, compact",
                    other
                )))
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &ArchGraphConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Create a default config file
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        let config = ArchGraphConfig::default();
        let toml_str =
            toml::to_string_pretty(&config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::ReadError(e.to_string()))?;
        }

        std::fs::write(path, toml_str).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Ok(())
    }
}
