//! Tests materializing into a real SQLite database.

use tablecraft::design::{Columns, TableDesign};
use tablecraft::executor::{table_columns, Executor, SqliteExecutor};
use tablecraft::materialize::{MaterializeState, Materializer};
use tablecraft::pivot::PivotRequest;
use tablecraft::value::Value;
use tablecraft::workflow::Workflow;
use tablecraft::{Dialect, Error};

const QUERY: &str = "SELECT user_id, month, num_logins FROM logins";

async fn seeded() -> SqliteExecutor {
    let executor = SqliteExecutor::open_in_memory().unwrap();
    executor
        .execute(
            "CREATE TABLE logins (user_id INTEGER, month TEXT, num_logins INTEGER)",
            &[],
        )
        .await
        .unwrap();
    executor
        .execute(
            "INSERT INTO logins VALUES (1, '2023-01', 3), (1, '2023-02', 4), (2, '2023-01', 5)",
            &[],
        )
        .await
        .unwrap();
    executor
}

async fn scalar(executor: &SqliteExecutor, sql: &str) -> Value {
    executor.execute(sql, &[]).await.unwrap().remove(0).remove(0)
}

#[tokio::test]
async fn test_final_table_matches_introspected_shape() {
    let executor = seeded().await;
    let report = Materializer::new(Dialect::Sqlite)
        .materialize(&executor, QUERY, "main", "daily", &TableDesign::default())
        .await
        .unwrap();

    let names: Vec<&str> = report.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["user_id", "month", "num_logins"]);

    let final_columns = table_columns(&executor, Dialect::Sqlite, "main", "daily")
        .await
        .unwrap();
    assert_eq!(final_columns, report.columns);

    // every row inserted, not just the staged sample
    assert_eq!(scalar(&executor, "SELECT COUNT(*) FROM main.daily").await, Value::Int(3));
    assert_eq!(
        scalar(
            &executor,
            "SELECT COUNT(*) FROM sqlite_master WHERE name = 'temp_daily'"
        )
        .await,
        Value::Int(0)
    );
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let executor = seeded().await;
    let materializer = Materializer::new(Dialect::Sqlite);
    let design = TableDesign {
        primary_key: Some(Columns::from(vec!["user_id", "month"])),
        ..Default::default()
    };

    let first = materializer
        .materialize(&executor, QUERY, "main", "daily", &design)
        .await
        .unwrap();
    let second = materializer
        .materialize(&executor, QUERY, "main", "daily", &design)
        .await
        .unwrap();

    assert_eq!(first.columns, second.columns);
    assert_eq!(first.statements, second.statements);
    assert_eq!(scalar(&executor, "SELECT COUNT(*) FROM main.daily").await, Value::Int(3));

    let ddl = scalar(
        &executor,
        "SELECT sql FROM sqlite_master WHERE name = 'daily'",
    )
    .await;
    assert!(ddl.as_str().unwrap().contains("PRIMARY KEY(\"user_id\", \"month\")"));
}

#[tokio::test]
async fn test_rerun_after_interrupted_run() {
    let executor = seeded().await;
    // leftovers of a run that stopped after staging
    executor
        .execute("CREATE TABLE temp_daily AS SELECT 1 AS stale", &[])
        .await
        .unwrap();

    let report = Materializer::new(Dialect::Sqlite)
        .materialize(&executor, QUERY, "main", "daily", &TableDesign::default())
        .await
        .unwrap();
    assert_eq!(report.columns.len(), 3);
}

#[tokio::test]
async fn test_engine_error_is_wrapped() {
    let executor = seeded().await;
    let err = Materializer::new(Dialect::Sqlite)
        .materialize(
            &executor,
            "SELECT missing_column FROM logins",
            "main",
            "daily",
            &TableDesign::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Materialize { state: MaterializeState::TempDropped, .. }
    ));
    assert!(err.failing_statement().unwrap().contains("missing_column"));
}

#[tokio::test]
async fn test_pivot_table_end_to_end() {
    let executor = seeded().await;
    let request = PivotRequest::new("main", "logins")
        .base_columns(["user_id"])
        .pivot_columns(["month"]);
    let design = TableDesign {
        primary_key: Some(Columns::from("user_id")),
        ..Default::default()
    };

    let report = Workflow::new(Dialect::Sqlite)
        .create_pivot_table(&executor, &request, "main", "logins_by_month", &design)
        .await
        .unwrap();
    assert_eq!(report.columns.len(), 4);

    let rows = executor
        .execute(
            "SELECT user_id, num_logins_month_2023_01, num_logins_month_2023_02, num_logins \
             FROM main.logins_by_month ORDER BY user_id",
            &[],
        )
        .await
        .unwrap();
    assert_eq!(
        rows,
        vec![
            vec![Value::Int(1), Value::Int(3), Value::Int(4), Value::Int(7)],
            vec![Value::Int(2), Value::Int(5), Value::Int(0), Value::Int(5)],
        ]
    );
}
