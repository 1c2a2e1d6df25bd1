//! SQLite-backed executor.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::types::{Value as SqliteValue, ValueRef};
use rusqlite::{params_from_iter, Connection};

use super::{ExecutionError, Executor};
use crate::value::{Row, Value};

/// Executes statements on a single SQLite connection.
///
/// Statements run on the calling task; the connection is guarded by a mutex so
/// the executor can be shared, but statements are never interleaved.
pub struct SqliteExecutor {
    conn: Mutex<Connection>,
}

impl SqliteExecutor {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> rusqlite::Result<Self> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn run(&self, statement: &str, params: &[Value]) -> Result<Vec<Row>, ExecutionError> {
        let fail = |e: rusqlite::Error| ExecutionError::new(e.to_string(), statement);

        let conn = self
            .conn
            .lock()
            .map_err(|_| ExecutionError::new("sqlite connection lock poisoned", statement))?;
        let mut stmt = conn.prepare(statement).map_err(fail)?;
        let bound = params_from_iter(params.iter().map(to_sqlite));

        let width = stmt.column_count();
        if width == 0 {
            stmt.execute(bound).map_err(fail)?;
            return Ok(Vec::new());
        }

        let mut rows = stmt.query(bound).map_err(fail)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(fail)? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                let value = row.get_ref(i).map_err(fail)?;
                values.push(from_sqlite(value, statement)?);
            }
            out.push(values);
        }
        Ok(out)
    }
}

impl std::fmt::Debug for SqliteExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteExecutor").finish_non_exhaustive()
    }
}

#[async_trait]
impl Executor for SqliteExecutor {
    async fn execute(&self, statement: &str, params: &[Value]) -> Result<Vec<Row>, ExecutionError> {
        tracing::trace!(statement, params = params.len(), "sqlite execute");
        self.run(statement, params)
    }
}

fn to_sqlite(value: &Value) -> SqliteValue {
    match value {
        Value::Null => SqliteValue::Null,
        Value::Int(n) => SqliteValue::Integer(*n),
        Value::Float(x) => SqliteValue::Real(*x),
        Value::Text(s) => SqliteValue::Text(s.clone()),
    }
}

fn from_sqlite(value: ValueRef<'_>, statement: &str) -> Result<Value, ExecutionError> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(n) => Ok(Value::Int(n)),
        ValueRef::Real(x) => Ok(Value::Float(x)),
        ValueRef::Text(bytes) => Ok(Value::Text(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Blob(_) => Err(ExecutionError::new(
            "blob values are not supported",
            statement,
        )),
    }
}
