//! Selected-column state for the breakdown chart.
//!
//! The selection is the only mutable entity in the pipeline: an ordered
//! subset of the available configuration columns, bounded at
//! [`MAX_SELECTED`] entries. Order is interaction order, never sorted.

/// Hard ceiling on how many columns can be plotted at once.
pub const MAX_SELECTED: usize = 32;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    columns: Vec<String>,
}

impl Selection {
    /// Initial selection on data load: every available column, in table
    /// order, truncated at the cap.
    pub fn all_of(available: &[String]) -> Self {
        Self {
            columns: available.iter().take(MAX_SELECTED).cloned().collect(),
        }
    }

    /// Build from an explicit column list, preserving its order, dropping
    /// repeats, truncating at the cap.
    pub fn from_columns<I>(columns: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut selection = Self::default();
        for column in columns {
            if selection.columns.len() == MAX_SELECTED {
                break;
            }
            if !selection.contains(&column) {
                selection.columns.push(column);
            }
        }
        selection
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Remove `column` if selected; otherwise add it at the end, unless the
    /// selection is already at the cap, in which case the add is a silent
    /// no-op.
    pub fn toggle(&mut self, column: &str) {
        if let Some(pos) = self.columns.iter().position(|c| c == column) {
            self.columns.remove(pos);
        } else if self.columns.len() < MAX_SELECTED {
            self.columns.push(column.to_string());
        }
    }

    /// Toggle-style select-all: if every available column is already
    /// selected (and there is at least one), clear; otherwise select the
    /// first [`MAX_SELECTED`] available columns in their table order.
    ///
    /// Contract: with more than [`MAX_SELECTED`] columns available this
    /// always yields exactly the first [`MAX_SELECTED`], never an error.
    pub fn select_all(&mut self, available: &[String]) {
        if !available.is_empty() && self.columns.len() == available.len() {
            self.columns.clear();
        } else {
            self.columns = available.iter().take(MAX_SELECTED).cloned().collect();
        }
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }
}

/// Case-insensitive substring filter over the offered column names. Affects
/// only what a picker displays, never the selection itself.
pub fn filter_columns(available: &[String], query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return available.to_vec();
    }
    available
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
