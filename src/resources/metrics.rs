//! Rows of `kubectl top pods`

use serde::Serialize;

use crate::k8s::parse::Table;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsRow {
    pub name: String,
    pub cpu: String,
    pub memory: String,
}

impl MetricsRow {
    /// First three columns; missing cells become empty strings
    pub fn from_row(row: &[String]) -> Self {
        let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
        Self {
            name: cell(0),
            cpu: cell(1),
            memory: cell(2),
        }
    }
}

pub fn metrics_rows(table: &Table) -> Vec<MetricsRow> {
    table.rows.iter().map(|row| MetricsRow::from_row(row)).collect()
}
