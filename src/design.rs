//! Table design: keys and physical-layout hints for a materialized table.
//!
//! A design is external configuration, never inferred. It is read once per
//! materialization and is read-only afterwards. Documents are TOML or JSON:
//!
//! ```toml
//! primary_key = ["user_id"]
//! diststyle = "key"
//! distkey = "user_id"
//! sortkey = ["user_id", "month"]
//!
//! [[foreign_keys]]
//! columns = "user_id"
//! references = "public.users"
//! reference_columns = "id"
//! ```
//!
//! A missing document is the empty design: no keys and no distribution hints.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::SettingsError;
use crate::error::{Error, Result};

/// One column or an ordered list of columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Columns {
    One(String),
    Many(Vec<String>),
}

impl Columns {
    pub fn names(&self) -> &[String] {
        match self {
            Columns::One(name) => std::slice::from_ref(name),
            Columns::Many(names) => names,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }
}

impl From<&str> for Columns {
    fn from(name: &str) -> Self {
        Columns::One(name.to_string())
    }
}

impl From<Vec<&str>> for Columns {
    fn from(names: Vec<&str>) -> Self {
        Columns::Many(names.into_iter().map(String::from).collect())
    }
}

/// Sort key: a single column emits `SORTKEY`, several emit `COMPOUND SORTKEY`.
pub type SortKey = Columns;

/// A foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForeignKey {
    pub columns: Columns,
    /// Referenced table, optionally schema-qualified (`schema.table`).
    pub references: String,
    pub reference_columns: Columns,
}

/// Row distribution style for column stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DistStyle {
    Auto,
    Even,
    Key,
    All,
}

impl FromStr for DistStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AUTO" => Ok(DistStyle::Auto),
            "EVEN" => Ok(DistStyle::Even),
            "KEY" => Ok(DistStyle::Key),
            "ALL" => Ok(DistStyle::All),
            _ => Err(format!("unknown diststyle: {s}")),
        }
    }
}

impl TryFrom<String> for DistStyle {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DistStyle> for String {
    fn from(style: DistStyle) -> Self {
        style.to_string()
    }
}

impl fmt::Display for DistStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DistStyle::Auto => "AUTO",
            DistStyle::Even => "EVEN",
            DistStyle::Key => "KEY",
            DistStyle::All => "ALL",
        })
    }
}

/// Keys and layout hints applied when a table is (re-)created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableDesign {
    pub primary_key: Option<Columns>,
    pub foreign_keys: Vec<ForeignKey>,
    pub diststyle: Option<DistStyle>,
    pub distkey: Option<String>,
    pub sortkey: Option<SortKey>,
}

impl TableDesign {
    /// Parse a TOML design document.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a JSON design document.
    pub fn from_json_str(content: &str) -> std::result::Result<Self, SettingsError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a design document; `.json` files are JSON, anything else TOML.
    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Load a design document, treating a missing file as the empty design.
    pub fn load_optional<P: AsRef<Path>>(path: P) -> std::result::Result<Self, SettingsError> {
        match Self::load(path) {
            Err(SettingsError::FileNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn primary_key(&self) -> &[String] {
        self.primary_key.as_ref().map(Columns::names).unwrap_or(&[])
    }

    /// Whether any constraint lines follow the column list.
    pub fn has_constraints(&self) -> bool {
        !self.primary_key().is_empty() || !self.foreign_keys.is_empty()
    }

    /// Check the design is self-consistent and only names existing columns.
    pub fn validate(&self, columns: &[String]) -> Result<()> {
        if self.primary_key.as_ref().is_some_and(Columns::is_empty) {
            return Err(Error::invalid("primary_key lists no columns"));
        }
        if self.sortkey.as_ref().is_some_and(Columns::is_empty) {
            return Err(Error::invalid("sortkey lists no columns"));
        }
        for fk in &self.foreign_keys {
            if fk.references.is_empty() {
                return Err(Error::invalid("foreign key references no table"));
            }
            if fk.columns.is_empty() || fk.reference_columns.is_empty() {
                return Err(Error::invalid(format!(
                    "foreign key to {} lists no columns",
                    fk.references
                )));
            }
        }

        if let (Some(style), Some(key)) = (self.diststyle, &self.distkey) {
            if style != DistStyle::Key {
                return Err(Error::invalid(format!(
                    "distkey `{key}` requires diststyle KEY, got {style}"
                )));
            }
        }

        let referenced = self
            .primary_key()
            .iter()
            .chain(self.foreign_keys.iter().flat_map(|fk| fk.columns.names()))
            .chain(self.distkey.iter())
            .chain(self.sortkey.iter().flat_map(Columns::names));
        for name in referenced {
            if !columns.contains(name) {
                return Err(Error::invalid(format!(
                    "table design names unknown column `{name}`"
                )));
            }
        }

        for fk in &self.foreign_keys {
            if fk.columns.names().len() != fk.reference_columns.names().len() {
                return Err(Error::invalid(format!(
                    "foreign key to {} has {} columns but references {}",
                    fk.references,
                    fk.columns.names().len(),
                    fk.reference_columns.names().len()
                )));
            }
        }
        Ok(())
    }
}
