//! TOML-based configuration for tablecraft.
//!
//! Supports a config file (tablecraft.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! sql_directory = "./sql"
//! design_directory = "./designs"
//!
//! [connections.warehouse]
//! driver = "redshift"
//! connection_string = "${WAREHOUSE_URL}"
//! default_schema = "analytics"
//!
//! [connections.local]
//! driver = "sqlite"
//! connection_string = "./data/dev.sqlite"
//! default_schema = "main"
//!
//! [materialize]
//! row_limit = 1        # 0 stages the full result
//! temp_prefix = "temp_"
//!
//! [aggregates]
//! replace_defaults = false
//!
//! [[aggregates.rules]]
//! prefix = "peak"
//! function = "MAX"
//!
//! [[aggregates.rules]]
//! prefix = "seen"
//! function = "BOOL_OR"
//! default = "false"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::connection::Driver;
use crate::aggregate::{AggregateFunction, AggregateRule, AggregateRules};
use crate::materialize::{DEFAULT_ROW_LIMIT, DEFAULT_TEMP_PREFIX};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to parse JSON document: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("Unsupported driver: {0}")]
    UnsupportedDriver(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Named database connections.
    pub connections: BTreeMap<String, ConnectionSettings>,

    /// Directory holding `<table>.sql` source queries.
    pub sql_directory: Option<PathBuf>,

    /// Directory holding `<table>.toml` / `<table>.json` table designs.
    pub design_directory: Option<PathBuf>,

    /// Materialization settings.
    pub materialize: MaterializeSettings,

    /// Aggregate rule configuration.
    pub aggregates: AggregateSettings,
}

/// Connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionSettings {
    /// Database driver (sqlite, redshift, postgres, snowflake, duckdb).
    pub driver: String,

    /// Connection string (supports ${ENV_VAR} expansion).
    pub connection_string: String,

    /// Default schema for this connection.
    #[serde(default)]
    pub default_schema: Option<String>,
}

impl ConnectionSettings {
    /// Get the driver type.
    pub fn driver_type(&self) -> Result<Driver, SettingsError> {
        self.driver
            .parse()
            .map_err(|_| SettingsError::UnsupportedDriver(self.driver.clone()))
    }

    /// Get the connection string with environment variables expanded.
    pub fn resolved_connection_string(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.connection_string)
    }
}

/// Materialization settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MaterializeSettings {
    /// Rows staged into the scratch table; 0 disables the cap.
    pub row_limit: u64,

    /// Prefix of the scratch table name.
    pub temp_prefix: String,
}

impl Default for MaterializeSettings {
    fn default() -> Self {
        Self {
            row_limit: DEFAULT_ROW_LIMIT,
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
        }
    }
}

impl MaterializeSettings {
    pub fn row_limit(&self) -> Option<u64> {
        (self.row_limit > 0).then_some(self.row_limit)
    }
}

/// Aggregate rule configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AggregateSettings {
    /// Drop the built-in rule table instead of appending it after `rules`.
    pub replace_defaults: bool,

    /// Extra rules, tried in order before the built-in table.
    pub rules: Vec<AggregateRuleSettings>,
}

/// One configured prefix rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AggregateRuleSettings {
    pub prefix: String,
    pub function: AggregateFunction,
    /// Literal outside the bucket; defaults to the function's canonical one.
    #[serde(default)]
    pub default: Option<String>,
}

impl AggregateSettings {
    /// Build the effective, ordered rule table.
    pub fn to_rules(&self) -> AggregateRules {
        let configured = self.rules.iter().map(|r| {
            let rule = match &r.default {
                Some(default) => AggregateRule::with_default(r.function, default.clone()),
                None => AggregateRule::new(r.function),
            };
            (r.prefix.clone(), rule)
        });

        if self.replace_defaults {
            return AggregateRules::new(configured);
        }
        let defaults = AggregateRules::default();
        AggregateRules::new(configured.chain(
            defaults
                .iter()
                .map(|(prefix, rule)| (prefix.to_string(), rule.clone())),
        ))
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `TABLECRAFT_CONFIG`
    /// 2. `./tablecraft.toml`
    /// 3. `~/.config/tablecraft/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        // Check environment variable first
        if let Ok(path) = env::var("TABLECRAFT_CONFIG") {
            return Self::from_file(&path);
        }

        // Check local directory
        let local_config = PathBuf::from("tablecraft.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        // Check user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tablecraft").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.materialize.temp_prefix.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "materialize.temp_prefix must not be empty; the scratch table would replace the target".into(),
            ));
        }
        if let Some(rule) = self.aggregates.rules.iter().find(|r| r.prefix.is_empty()) {
            return Err(SettingsError::InvalidConfig(format!(
                "aggregate rule for {} has an empty prefix",
                rule.function
            )));
        }
        Ok(())
    }

    /// Get a connection by name.
    pub fn get_connection(&self, name: &str) -> Result<&ConnectionSettings, SettingsError> {
        self.connections
            .get(name)
            .ok_or_else(|| SettingsError::ConnectionNotFound(name.to_string()))
    }

    /// Get the default connection: the one named "default", otherwise the
    /// first by name.
    pub fn default_connection(&self) -> Option<(&str, &ConnectionSettings)> {
        if let Some(conn) = self.connections.get("default") {
            return Some(("default", conn));
        }
        self.connections.iter().next().map(|(k, v)| (k.as_str(), v))
    }

    /// Path of the source query for `table`: `<sql_directory>/<table>.sql`.
    pub fn sql_path(&self, table: &str) -> PathBuf {
        self.sql_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("sql"))
            .join(format!("{table}.sql"))
    }

    /// Path of the design for `table`: `<design_directory>/<table>.toml`.
    pub fn design_path(&self, table: &str) -> PathBuf {
        self.design_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("designs"))
            .join(format!("{table}.toml"))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            let name = std::iter::from_fn(|| chars.next_if(|&ch| ch != '}')).collect();
            chars.next(); // consume '}'
            name
        } else {
            // $VAR ends at non-alphanumeric/underscore
            std::iter::from_fn(|| chars.next_if(|&ch| ch.is_alphanumeric() || ch == '_')).collect()
        };

        if var_name.is_empty() {
            // Just a lone $, keep it
            result.push('$');
            continue;
        }
        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
