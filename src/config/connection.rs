//! Database drivers named by connection settings.

use std::fmt;
use std::str::FromStr;

use super::SettingsError;
use crate::sql::dialect::Dialect;

/// Supported database drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// SQLite file or `:memory:`; executed in-process.
    Sqlite,
    Redshift,
    Postgres,
    Snowflake,
    DuckDb,
}

impl Driver {
    /// Get the driver name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::Sqlite => "sqlite",
            Driver::Redshift => "redshift",
            Driver::Postgres => "postgres",
            Driver::Snowflake => "snowflake",
            Driver::DuckDb => "duckdb",
        }
    }

    /// SQL dialect spoken by this driver.
    pub fn dialect(&self) -> Dialect {
        match self {
            Driver::Sqlite => Dialect::Sqlite,
            Driver::Redshift => Dialect::Redshift,
            Driver::Postgres => Dialect::Postgres,
            Driver::Snowflake => Dialect::Snowflake,
            Driver::DuckDb => Dialect::DuckDb,
        }
    }

    /// Whether this crate ships an executor for the driver. Other engines
    /// are reached by implementing `Executor` for their client.
    pub fn has_builtin_executor(&self) -> bool {
        matches!(self, Driver::Sqlite)
    }

    /// Dialect for a run over this driver, honouring an explicit request.
    ///
    /// The built-in executor only understands its own engine's catalog and
    /// staging SQL, so a different dialect is rejected for those drivers.
    pub fn resolve_dialect(&self, requested: Option<Dialect>) -> Result<Dialect, SettingsError> {
        match requested {
            Some(dialect) if self.has_builtin_executor() && dialect != self.dialect() => {
                Err(SettingsError::InvalidConfig(format!(
                    "dialect '{dialect}' cannot run over the built-in {self} executor"
                )))
            }
            Some(dialect) => Ok(dialect),
            None => Ok(self.dialect()),
        }
    }
}

impl FromStr for Driver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Driver::Sqlite),
            "redshift" => Ok(Driver::Redshift),
            "postgres" | "postgresql" => Ok(Driver::Postgres),
            "snowflake" => Ok(Driver::Snowflake),
            "duckdb" | "duck" => Ok(Driver::DuckDb),
            other => Err(format!("unsupported driver: {other}")),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
