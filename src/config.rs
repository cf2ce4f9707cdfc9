use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::AnalyticsError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout: u64,
    /// Table holding the feedback documents
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    "feedbacks".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
    /// Allowed origins; empty means any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Requests slower than this are logged as warnings
    #[serde(default = "default_slow_request_ms")]
    pub slow_request_ms: u64,
}

fn default_enable_cors() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:4200".to_string()]
}

const fn default_slow_request_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_sentiment_capacity")]
    pub sentiment_capacity: usize,
    #[serde(default = "default_sentiment_capacity")]
    pub label_capacity: usize,
    #[serde(default = "default_keyword_capacity")]
    pub keyword_capacity: usize,
}

fn default_cache_enabled() -> bool {
    true
}

pub(crate) const fn default_sentiment_capacity() -> usize {
    1000
}

pub(crate) const fn default_keyword_capacity() -> usize {
    500
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sentiment_capacity: default_sentiment_capacity(),
            label_capacity: default_sentiment_capacity(),
            keyword_capacity: default_keyword_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Keywords returned per feedback document
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
    /// Keywords harvested per message when pooling across a service
    #[serde(default = "default_harvest_top_n")]
    pub harvest_top_n: usize,
    /// Keywords reported per service after pooling
    #[serde(default = "default_top_n")]
    pub service_top_keywords: usize,
    #[serde(default = "default_warm_up_on_start")]
    pub warm_up_on_start: bool,
    #[serde(default = "default_warm_up_batch_size")]
    pub warm_up_batch_size: i64,
}

pub(crate) const fn default_top_n() -> usize {
    5
}

pub(crate) const fn default_harvest_top_n() -> usize {
    10
}

fn default_warm_up_on_start() -> bool {
    true
}

pub(crate) const fn default_warm_up_batch_size() -> i64 {
    500
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            harvest_top_n: default_harvest_top_n(),
            service_top_keywords: default_top_n(),
            warm_up_on_start: true,
            warm_up_batch_size: default_warm_up_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from defaults, the config file (if any) and `FEEDBACK__*` env vars
    pub fn load() -> crate::Result<Self> {
        let file = if Path::new("config.toml").exists() {
            Some("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Some("config.example.toml")
        } else {
            None
        };
        Self::load_layered(file)
    }

    /// Layer defaults, an optional TOML file and environment overrides
    pub fn load_layered(file: Option<&str>) -> crate::Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = file {
            builder = builder.add_source(
                config::File::new(path, config::FileFormat::Toml).required(true),
            );
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix("FEEDBACK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would produce broken SQL or empty pages
    pub fn validate(&self) -> crate::Result<()> {
        let table = &self.database.table;
        let valid_identifier = !table.is_empty()
            && table
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_identifier {
            return Err(AnalyticsError::Config(format!(
                "database.table must be a plain SQL identifier, got {table:?}"
            )));
        }
        if self.analysis.warm_up_batch_size <= 0 {
            return Err(AnalyticsError::Config(
                "analysis.warm_up_batch_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Get database URL
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Get max connections for database pool
    pub fn max_connections(&self) -> u32 {
        self.database.max_connections
    }

    /// Get min connections for database pool
    pub fn min_connections(&self) -> u32 {
        self.database.min_connections
    }

    /// Get connection timeout in seconds
    pub fn connection_timeout(&self) -> u64 {
        self.database.connection_timeout
    }

    pub fn table(&self) -> &str {
        &self.database.table
    }

    /// Socket address the API server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost:5432/feedback".to_string(),
                max_connections: 50,
                min_connections: 5,
                connection_timeout: 30,
                table: default_table(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                enable_cors: true,
                cors_origins: default_cors_origins(),
                slow_request_ms: default_slow_request_ms(),
            },
            cache: CacheConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}
