//! Decoding of kubectl output: JSON documents and whitespace-aligned tables

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::utils::errors::{InspectError, Result};

/// Whether a JSON document holds one object or a `.items` list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Single,
    List,
}

impl Shape {
    /// A named query returns the object itself
    pub fn for_name(name: Option<&str>) -> Self {
        if name.is_some() { Shape::Single } else { Shape::List }
    }
}

#[derive(Deserialize)]
struct ItemList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// Decode one JSON document
pub fn parse_json<T: DeserializeOwned>(stdout: &str) -> Result<T> {
    serde_json::from_str(stdout).map_err(|e| InspectError::ParseError(e.to_string()))
}

/// Decode into a sequence regardless of shape. A single object becomes a
/// one-element sequence so normalization never branches on shape.
pub fn parse_items<T: DeserializeOwned>(stdout: &str, shape: Shape) -> Result<Vec<T>> {
    match shape {
        Shape::Single => parse_json::<T>(stdout).map(|item| vec![item]),
        Shape::List => parse_json::<ItemList<T>>(stdout).map(|list| list.items),
    }
}

/// Columnar output such as `kubectl top` or `get -o wide`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Whole document with surrounding whitespace trimmed
    pub text: String,
    /// Newline-delimited line count of `text`, 0 when empty
    pub line_count: usize,
    /// Data rows split on runs of whitespace
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// First column of every row
    pub fn first_column(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.first().cloned())
            .collect()
    }
}

/// Trimmed document and its newline-delimited line count, 0 when empty
pub fn parse_lines(stdout: &str) -> (String, usize) {
    let text = stdout.trim();
    let count = if text.is_empty() {
        0
    } else {
        text.split('\n').count()
    };
    (text.to_string(), count)
}

/// Split text output into rows. With `has_header` the first line is dropped
/// from `rows` (it still counts toward `line_count`).
pub fn parse_table(stdout: &str, has_header: bool) -> Table {
    let text = stdout.trim();
    if text.is_empty() {
        return Table::default();
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let skip = usize::from(has_header);

    let rows = lines
        .iter()
        .skip(skip)
        .map(|line| {
            line.split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect();

    Table {
        text: text.to_string(),
        line_count: lines.len(),
        rows,
    }
}
