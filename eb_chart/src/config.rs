//! Immutable domain configuration for the breakdown pipeline.
//!
//! Everything the pipeline knows about a particular dataset lives here:
//! which row labels are reserved, the canonical stack order, the color
//! assignment, and which rows are sign-forced. Passing a different config
//! repoints the same pipeline at a different domain.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Fallback color for component rows without an explicit assignment.
pub const DEFAULT_SERIES_COLOR: &str = "#ca8622";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Label of the total-energy row, dropped entirely from output.
    pub total_row: String,
    /// Label of the emissions row, rendered as points on the secondary axis.
    pub emissions_row: String,
    /// Canonical stacking order for recognized component rows.
    pub stack_order: Vec<String>,
    /// Per-row display colors; unmapped rows fall back to the default.
    pub colors: HashMap<String, String>,
    /// Rows whose values are forced to `-abs(v)` so recovered quantities
    /// always render below the zero baseline.
    pub sign_forced: HashSet<String>,
}

impl ChartConfig {
    pub fn color_for(&self, row: &str) -> &str {
        self.colors
            .get(row)
            .map(String::as_str)
            .unwrap_or(DEFAULT_SERIES_COLOR)
    }

    pub fn is_sign_forced(&self, row: &str) -> bool {
        self.sign_forced.contains(row)
    }
}

impl Default for ChartConfig {
    /// Clinker energy-breakdown defaults. Row labels are matched exactly,
    /// case- and whitespace-sensitive, against the source table.
    fn default() -> Self {
        let stack_order: Vec<String> = [
            "Fuel Demand Process",
            "P-ASU",
            "P-CPU",
            "P-Fans",
            "P-Auxiliary",
            "Electricity Recovery",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let colors: HashMap<String, String> = [
            ("Fuel Demand Process", "#c23531"),
            ("P-ASU", "#2f4554"),
            ("P-CPU", "#61a0a8"),
            ("P-Fans", "#d48265"),
            ("P-Auxiliary", "#91c7ae"),
            ("Electricity Recovery", "#749f83"),
            ("Emissions Impact (right y-axis)", "#303030"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let sign_forced: HashSet<String> =
            ["Electricity Recovery"].iter().map(|s| s.to_string()).collect();

        Self {
            total_row: "total energy".to_string(),
            emissions_row: "Emissions Impact (right y-axis)".to_string(),
            stack_order,
            colors,
            sign_forced,
        }
    }
}
