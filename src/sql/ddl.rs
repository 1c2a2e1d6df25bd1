//! DDL (Data Definition Language) support.
//!
//! This module provides the builders used to (re-)create materialized tables:
//! `CREATE TABLE` from introspected columns plus an external [`TableDesign`],
//! and `DROP TABLE IF EXISTS`.
//!
//! # Examples
//!
//! ```ignore
//! use tablecraft::ddl::{ColumnSpec, CreateTable};
//! use tablecraft::dialect::Dialect;
//!
//! let table = CreateTable::new("logins")
//!     .schema("analytics")
//!     .column(ColumnSpec::new("user_id", "bigint"))
//!     .column(ColumnSpec::new("num_logins", "bigint"));
//!
//! println!("{}", table.to_sql(Dialect::Redshift));
//! ```
//!
//! Layout of the generated statement:
//!
//! ```text
//! CREATE TABLE "analytics"."logins" (
//!     "user_id" bigint,
//!     "num_logins" bigint,
//!     PRIMARY KEY("user_id")
//! )
//! DISTSTYLE KEY
//! DISTKEY("user_id")
//! SORTKEY("user_id")
//! ```

use serde::{Deserialize, Serialize};

use super::dialect::{Dialect, SqlDialect};
use super::token::{Token, TokenStream};
use crate::design::{ForeignKey, TableDesign};

// ============================================================================
// Column Specification
// ============================================================================

/// A column name and its engine type spelling, as read back from the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub sql_type: String,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
        }
    }

    /// Convert to token stream: `"name" type`.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.name.clone()));
        // SQLite allows typeless columns; keep them typeless.
        if !self.sql_type.is_empty() {
            ts.space().push(Token::Raw(self.sql_type.clone()));
        }
        ts
    }
}

// ============================================================================
// CREATE TABLE
// ============================================================================

/// CREATE TABLE statement.
#[derive(Debug, Clone)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct CreateTable {
    pub schema: Option<String>,
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    pub design: TableDesign,
}

impl CreateTable {
    /// Create a new CREATE TABLE statement.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            columns: Vec::new(),
            design: TableDesign::default(),
        }
    }

    /// Set the schema.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Add a column definition.
    pub fn column(mut self, col: ColumnSpec) -> Self {
        self.columns.push(col);
        self
    }

    /// Add multiple column definitions.
    pub fn columns(mut self, cols: impl IntoIterator<Item = ColumnSpec>) -> Self {
        self.columns.extend(cols);
        self
    }

    /// Apply keys and layout hints.
    pub fn design(mut self, design: TableDesign) -> Self {
        self.design = design;
        self
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens(dialect).serialize(dialect)
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Create)
            .space()
            .push(Token::Table)
            .space()
            .push(Token::QualifiedIdent {
                schema: self.schema.clone(),
                name: self.name.clone(),
            })
            .space()
            .lparen()
            .newline();

        let mut lines: Vec<TokenStream> = self.columns.iter().map(ColumnSpec::to_tokens).collect();

        if dialect.supports_table_constraints() {
            let primary_key = self.design.primary_key();
            if !primary_key.is_empty() {
                let mut pk = TokenStream::new();
                pk.push(Token::Primary)
                    .space()
                    .push(Token::Key)
                    .lparen()
                    .ident_list(primary_key)
                    .rparen();
                lines.push(pk);
            }
            lines.extend(self.design.foreign_keys.iter().map(foreign_key_tokens));
        }

        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                ts.comma().newline();
            }
            ts.indent(1).append(line);
        }

        ts.newline().rparen();
        ts.append(&dialect.emit_table_options(&self.design));
        ts
    }
}

fn foreign_key_tokens(fk: &ForeignKey) -> TokenStream {
    let target = match fk.references.split_once('.') {
        Some((schema, name)) => Token::QualifiedIdent {
            schema: Some(schema.to_string()),
            name: name.to_string(),
        },
        None => Token::Ident(fk.references.clone()),
    };

    let mut ts = TokenStream::new();
    ts.push(Token::Foreign)
        .space()
        .push(Token::Key)
        .lparen()
        .ident_list(fk.columns.names())
        .rparen()
        .space()
        .push(Token::References)
        .space()
        .push(target)
        .lparen()
        .ident_list(fk.reference_columns.names())
        .rparen();
    ts
}

// ============================================================================
// DROP TABLE
// ============================================================================

/// DROP TABLE statement.
#[derive(Debug, Clone)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct DropTable {
    pub if_exists: bool,
    pub schema: Option<String>,
    pub name: String,
}

impl DropTable {
    /// Create a new DROP TABLE statement.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            if_exists: false,
            schema: None,
            name: name.into(),
        }
    }

    /// Set the schema.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Add IF EXISTS clause.
    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens(dialect).serialize(dialect)
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Drop).space().push(Token::Table);

        if self.if_exists && dialect.supports_if_exists() {
            ts.space().push(Token::If).space().push(Token::Exists);
        }

        ts.space().push(Token::QualifiedIdent {
            schema: self.schema.clone(),
            name: self.name.clone(),
        });

        ts
    }
}
