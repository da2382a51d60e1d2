//! Core energy-breakdown chart library implemented in Rust.
//!
//! Turns a labeled CSV matrix (rows = energy metrics, columns = plant
//! configurations) into a declarative dual-axis chart specification:
//! stacked energy bars on the primary axis, an emissions scatter on the
//! secondary axis, limited to a bounded set of selected columns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod chart;
pub mod classify;
pub mod config;
pub mod selection;
pub mod series;

pub use chart::{assemble, bottom_margin_for, rotation_for, ChartSpec};
pub use classify::{classify, row_kind, Classified, RowKind};
pub use config::ChartConfig;
pub use selection::{filter_columns, Selection, MAX_SELECTED};
pub use series::{build_series, SeriesSet, StackedSeries};

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("failed to parse CSV table: {0}")]
    CsvParse(String),
    #[error("source table has no recognizable header row")]
    MissingHeader,
}

/// One data row: a metric label plus its cell text per configuration column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub label: String,
    pub cells: HashMap<String, String>,
}

/// Parsed source table. `columns` preserves header order and excludes the
/// reserved label column (the first header field).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub label_column: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Parse CSV bytes into a [`Table`].
///
/// The first header field is the reserved label column; the remaining
/// non-empty, first-seen header fields become configuration columns. Rows
/// with an empty label are dropped. Cell text is kept verbatim (no
/// normalization) so row identification stays an exact string match.
pub fn parse_table(input: &[u8]) -> Result<Table, ChartError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| ChartError::CsvParse(e.to_string()))?
        .clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ChartError::MissingHeader);
    }

    let label_column = headers.get(0).unwrap_or_default().to_string();
    let mut columns: Vec<String> = Vec::new();
    let mut column_index: Vec<(usize, String)> = Vec::new();
    for (idx, name) in headers.iter().enumerate().skip(1) {
        if name.is_empty() || columns.iter().any(|c| c == name) {
            continue;
        }
        columns.push(name.to_string());
        column_index.push((idx, name.to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ChartError::CsvParse(e.to_string()))?;
        let label = record.get(0).unwrap_or_default().to_string();
        if label.is_empty() {
            continue;
        }
        let mut cells = HashMap::with_capacity(column_index.len());
        for (idx, name) in &column_index {
            if let Some(value) = record.get(*idx) {
                cells.insert(name.clone(), value.to_string());
            }
        }
        rows.push(Row { label, cells });
    }

    Ok(Table {
        label_column,
        columns,
        rows,
    })
}

/// Coerce arbitrary cell text into a number.
///
/// Missing values, values that are empty after trimming and stripping
/// thousands separators, and anything that fails to parse as a finite
/// decimal all degrade silently to zero. Series built on top of this can
/// never carry a NaN into the chart.
pub fn coerce_value(cell: Option<&str>) -> f64 {
    let Some(text) = cell else { return 0.0 };
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Run the full pipeline for one table and selection: classify rows, build
/// the aligned series, derive the label layout, and assemble the spec.
pub fn chart_spec_for(table: &Table, selection: &[String], config: &ChartConfig) -> ChartSpec {
    let classified = classify(table, config);
    let series = build_series(&classified, selection, config);
    let rotation = rotation_for(selection.len());
    let margin = bottom_margin_for(rotation);
    assemble(&series, selection, rotation, margin, config)
}
