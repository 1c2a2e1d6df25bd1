//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use tablecraft::executor::{ExecutionError, Executor};
use tablecraft::value::{Row, Value};

type Matcher = Box<dyn Fn(&str, &[Value]) -> bool + Send + Sync>;

/// Executor that records every statement and answers from a script.
///
/// Responses are matched in registration order; unmatched statements return
/// no rows.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
    responses: Vec<(Matcher, Vec<Row>)>,
    failures: Vec<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer statements containing `needle` with `rows`.
    pub fn respond(self, needle: &str, rows: Vec<Row>) -> Self {
        let needle = needle.to_string();
        self.respond_when(move |statement, _| statement.contains(&needle), rows)
    }

    /// Answer the columns query for one table.
    pub fn columns(self, table: &str, columns: &[(&str, &str)]) -> Self {
        let table = table.to_string();
        let rows = columns
            .iter()
            .map(|(name, ty)| vec![Value::from(*name), Value::from(*ty)])
            .collect();
        self.respond_when(
            move |_, params| params.get(1).and_then(Value::as_str) == Some(table.as_str()),
            rows,
        )
    }

    pub fn respond_when(
        mut self,
        matcher: impl Fn(&str, &[Value]) -> bool + Send + Sync + 'static,
        rows: Vec<Row>,
    ) -> Self {
        self.responses.push((Box::new(matcher), rows));
        self
    }

    /// Reject statements containing `needle`.
    pub fn fail_on(mut self, needle: &str) -> Self {
        self.failures.push(needle.to_string());
        self
    }

    pub fn statements(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(s, _)| s.clone())
            .collect()
    }

    pub fn params(&self) -> Vec<Vec<Value>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    async fn execute(&self, statement: &str, params: &[Value]) -> Result<Vec<Row>, ExecutionError> {
        self.calls
            .lock()
            .unwrap()
            .push((statement.to_string(), params.to_vec()));

        if self.failures.iter().any(|f| statement.contains(f.as_str())) {
            return Err(ExecutionError::new("rejected by test executor", statement));
        }

        Ok(self
            .responses
            .iter()
            .find(|(matcher, _)| matcher(statement, params))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
