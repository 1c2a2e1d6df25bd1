//! Reading table shapes back from the database.

use tracing::debug;

use super::Executor;
use crate::error::{Error, Result};
use crate::sql::ddl::ColumnSpec;
use crate::sql::dialect::{Dialect, SqlDialect};
use crate::value::Value;

/// Columns of `schema.table` with their engine type spelling, in ordinal order.
///
/// An empty result means the table does not exist (or has no columns); the
/// caller decides which error that is.
pub async fn table_columns<E: Executor + ?Sized>(
    executor: &E,
    dialect: Dialect,
    schema: &str,
    table: &str,
) -> Result<Vec<ColumnSpec>> {
    let query = dialect.columns_query();
    let rows = executor
        .execute(&query, &[Value::from(schema), Value::from(table)])
        .await?;

    let columns = rows
        .into_iter()
        .map(|row| {
            let mut values = row.into_iter();
            match (values.next(), values.next()) {
                (Some(Value::Text(name)), Some(sql_type)) => Ok(ColumnSpec {
                    name,
                    sql_type: match sql_type {
                        Value::Null => String::new(),
                        other => other.to_string(),
                    },
                }),
                _ => Err(Error::invalid(format!(
                    "column introspection for {schema}.{table} returned an unexpected row shape"
                ))),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(schema, table, columns = columns.len(), "introspected table");
    Ok(columns)
}
