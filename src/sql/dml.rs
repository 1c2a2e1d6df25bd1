//! DML (Data Manipulation Language) support.
//!
//! Materialization moves a caller-supplied SELECT into tables twice: once into
//! a scratch table for type discovery ([`StageQuery`]) and once into the final
//! table ([`InsertSelect`]). The query text is spliced, never reparsed into an
//! AST, so whatever the engine accepts passes through untouched.
//!
//! # Examples
//!
//! ```ignore
//! use tablecraft::dml::{InsertSelect, StageQuery};
//! use tablecraft::dialect::Dialect;
//!
//! let stage = StageQuery::new("SELECT a FROM t", "temp_logins")
//!     .schema("analytics")
//!     .row_limit(1);
//! // SELECT a INTO "analytics"."temp_logins"
//! // FROM t
//! // LIMIT 1
//! println!("{}", stage.to_sql(Dialect::Redshift)?);
//!
//! let insert = InsertSelect::into("logins").schema("analytics").query("SELECT a FROM t");
//! ```

use super::dialect::{Dialect, SqlDialect, StagingStrategy};
use super::lexer;
use super::token::{Token, TokenStream};
use crate::error::{Error, Result};

// ============================================================================
// INSERT ... SELECT
// ============================================================================

/// `INSERT INTO <table>` followed by an arbitrary query.
#[derive(Debug, Clone)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct InsertSelect {
    pub schema: Option<String>,
    pub table: String,
    pub query: String,
}

impl InsertSelect {
    /// Create a new INSERT statement.
    pub fn into(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
            query: String::new(),
        }
    }

    /// Set the schema.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Set the source query. Trailing terminators and comments are dropped.
    pub fn query(mut self, query: &str) -> Self {
        self.query = lexer::trim_statement(query).to_string();
        self
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }

    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Insert)
            .space()
            .push(Token::Into)
            .space()
            .push(Token::QualifiedIdent {
                schema: self.schema.clone(),
                name: self.table.clone(),
            })
            .newline()
            .push(Token::Raw(self.query.clone()));
        ts
    }
}

// ============================================================================
// Staging
// ============================================================================

/// Redirects a query's result set into a new scratch table.
///
/// Depending on [`SqlDialect::staging_strategy`] this is either
/// `SELECT <list> INTO <table> FROM ...` or `CREATE TABLE <table> AS <query>`.
/// An optional row cap is appended unless the query already has a top-level
/// `LIMIT`.
#[derive(Debug, Clone)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct StageQuery {
    pub query: String,
    pub schema: Option<String>,
    pub table: String,
    pub row_limit: Option<u64>,
}

impl StageQuery {
    pub fn new(query: &str, table: impl Into<String>) -> Self {
        Self {
            query: lexer::trim_statement(query).to_string(),
            schema: None,
            table: table.into(),
            row_limit: None,
        }
    }

    /// Set the schema.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Cap the number of staged rows.
    pub fn row_limit(mut self, limit: u64) -> Self {
        self.row_limit = Some(limit);
        self
    }

    /// Convert to SQL for the given dialect.
    ///
    /// Fails with [`Error::InvalidArgument`] when the dialect stages with
    /// `SELECT ... INTO` and the query has no top-level `FROM` to splice before.
    pub fn to_sql(&self, dialect: Dialect) -> Result<String> {
        let target = Token::QualifiedIdent {
            schema: self.schema.clone(),
            name: self.table.clone(),
        }
        .serialize(dialect);

        let mut sql = match dialect.staging_strategy() {
            StagingStrategy::SelectInto => {
                let pos = lexer::select_from_position(&self.query).ok_or_else(|| {
                    Error::invalid(format!(
                        "query for {target} has no top-level FROM clause to stage from"
                    ))
                })?;
                let (head, tail) = self.query.split_at(pos);
                let sep = if head.ends_with(char::is_whitespace) { "" } else { " " };
                format!("{head}{sep}INTO {target}\n{tail}")
            }
            StagingStrategy::CreateTableAs => {
                format!("CREATE TABLE {target} AS\n{}", self.query)
            }
        };

        if let Some(limit) = self.row_limit {
            if !lexer::has_top_level_limit(&self.query) {
                // Own line, so a trailing line comment in the query cannot swallow it.
                sql.push('\n');
                sql.push_str(&dialect.emit_limit(limit).serialize(dialect));
            }
        }

        Ok(sql)
    }
}
