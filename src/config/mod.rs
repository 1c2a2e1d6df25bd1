//! Configuration module for tablecraft.
//!
//! Handles connection configuration, environment variables, and settings.

mod connection;
mod settings;

pub use connection::Driver;
pub use settings::{
    expand_env_vars, AggregateRuleSettings, AggregateSettings, ConnectionSettings,
    MaterializeSettings, Settings, SettingsError,
};
