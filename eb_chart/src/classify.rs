//! Row classification: partition table rows into ordered component rows,
//! the emissions row, and a label -> row lookup.

use std::collections::HashMap;

use crate::config::ChartConfig;
use crate::{Row, Table};

/// What a row label means to the pipeline. Labels are matched exactly
/// against the config; anything unmatched is an explicit `Extra` rather
/// than silently disappearing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    /// The total-energy row, excluded from output.
    Total,
    /// The emissions row, plotted as points on the secondary axis.
    Emissions,
    /// A component row named in the canonical stack order.
    Recognized,
    /// Present in the table but unknown to the config; stacked after all
    /// recognized components.
    Extra,
}

pub fn row_kind(label: &str, config: &ChartConfig) -> RowKind {
    if label == config.total_row {
        RowKind::Total
    } else if label == config.emissions_row {
        RowKind::Emissions
    } else if config.stack_order.iter().any(|name| name == label) {
        RowKind::Recognized
    } else {
        RowKind::Extra
    }
}

/// Classifier output. `component_rows` is the final stack order: canonical
/// entries that are present, then extras in table order, total and
/// emissions rows excluded, no duplicates.
#[derive(Clone, Debug, Default)]
pub struct Classified {
    pub component_rows: Vec<String>,
    pub emissions_row: Option<String>,
    pub rows: HashMap<String, Row>,
    /// Labels that matched nothing in the config; callers surface these as
    /// diagnostics so a typo in the source never silently drops a row.
    pub extras: Vec<String>,
}

pub fn classify(table: &Table, config: &ChartConfig) -> Classified {
    let mut rows: HashMap<String, Row> = HashMap::new();
    let mut labels: Vec<String> = Vec::new();
    for row in &table.rows {
        if row.label.is_empty() {
            continue;
        }
        // First occurrence is the row's identity; repeats are ignored.
        if !rows.contains_key(&row.label) {
            labels.push(row.label.clone());
            rows.insert(row.label.clone(), row.clone());
        }
    }

    let mut component_rows: Vec<String> = config
        .stack_order
        .iter()
        .filter(|name| rows.contains_key(*name))
        .cloned()
        .collect();

    let mut extras = Vec::new();
    for label in &labels {
        if row_kind(label, config) == RowKind::Extra {
            extras.push(label.clone());
            component_rows.push(label.clone());
        }
    }

    let emissions_row = rows
        .contains_key(&config.emissions_row)
        .then(|| config.emissions_row.clone());

    Classified {
        component_rows,
        emissions_row,
        rows,
        extras,
    }
}
