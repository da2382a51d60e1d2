//! Series building: classified rows + selection -> aligned numeric arrays.

use serde::Serialize;

use crate::classify::Classified;
use crate::coerce_value;
use crate::config::ChartConfig;

/// One stacked bar series, positionally aligned to the selected columns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StackedSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// The full series payload for one recomputation. Every `values` vector and
/// `emissions` have length equal to the selection, so the renderer can rely
/// on 1:1 stacking alignment.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SeriesSet {
    pub stacked: Vec<StackedSeries>,
    pub emissions: Vec<f64>,
}

/// Build one series per component row (already in final stack order) plus
/// the emissions scatter values.
///
/// A selected column absent from a row's data coerces to 0, not an
/// omission. Sign-forced rows are replaced by `-abs(v)` so recovered
/// quantities always land below the baseline; the emissions series is never
/// sign-forced.
pub fn build_series(
    classified: &Classified,
    selection: &[String],
    config: &ChartConfig,
) -> SeriesSet {
    let values_for = |row_label: &str, force_negative: bool| -> Vec<f64> {
        let row = classified.rows.get(row_label);
        selection
            .iter()
            .map(|column| {
                let cell = row.and_then(|r| r.cells.get(column)).map(String::as_str);
                let value = coerce_value(cell);
                if force_negative {
                    -value.abs()
                } else {
                    value
                }
            })
            .collect()
    };

    let stacked = classified
        .component_rows
        .iter()
        .map(|name| StackedSeries {
            name: name.clone(),
            values: values_for(name, config.is_sign_forced(name)),
        })
        .collect();

    let emissions = match classified.emissions_row.as_deref() {
        Some(name) => values_for(name, false),
        None => vec![0.0; selection.len()],
    };

    SeriesSet { stacked, emissions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::parse_table;

    fn setup() -> (Classified, ChartConfig) {
        let csv = b"Technology,Base,Alt1,Alt2\n\
Fuel Demand Process,2.0,3.0,2.5\n\
P-ASU,1.0,0.5,\n\
Electricity Recovery,0.8,-0.6,0\n\
Emissions Impact (right y-axis),0.4,0.35,0.2\n\
total energy,3.8,3.5,2.5\n";
        let table = parse_table(csv).unwrap();
        let config = ChartConfig::default();
        (classify(&table, &config), config)
    }

    fn selection(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_series_aligned_to_selection() {
        let (classified, config) = setup();
        let sel = selection(&["Alt1", "Base"]);
        let set = build_series(&classified, &sel, &config);
        assert_eq!(set.stacked.len(), 3);
        for series in &set.stacked {
            assert_eq!(series.values.len(), sel.len());
        }
        assert_eq!(set.emissions.len(), sel.len());
        // Selection order, not table order, drives positions.
        assert_eq!(set.stacked[0].name, "Fuel Demand Process");
        assert_eq!(set.stacked[0].values, vec![3.0, 2.0]);
        assert_eq!(set.emissions, vec![0.35, 0.4]);
    }

    #[test]
    fn test_missing_cells_coerce_to_zero() {
        let (classified, config) = setup();
        let sel = selection(&["Alt2", "Nonexistent"]);
        let set = build_series(&classified, &sel, &config);
        let asu = set.stacked.iter().find(|s| s.name == "P-ASU").unwrap();
        assert_eq!(asu.values, vec![0.0, 0.0]);
    }

    #[test]
    fn test_sign_forced_row_is_negated_abs() {
        let (classified, config) = setup();
        let sel = selection(&["Base", "Alt1", "Alt2"]);
        let set = build_series(&classified, &sel, &config);
        let recovery = set
            .stacked
            .iter()
            .find(|s| s.name == "Electricity Recovery")
            .unwrap();
        // Positive, negative, and zero inputs all come out as -abs(v).
        assert_eq!(recovery.values, vec![-0.8, -0.6, 0.0]);
    }

    #[test]
    fn test_emissions_not_sign_forced() {
        let (classified, config) = setup();
        let set = build_series(&classified, &selection(&["Base"]), &config);
        assert_eq!(set.emissions, vec![0.4]);
    }

    #[test]
    fn test_empty_selection_yields_empty_values() {
        let (classified, config) = setup();
        let set = build_series(&classified, &[], &config);
        assert!(set.stacked.iter().all(|s| s.values.is_empty()));
        assert!(set.emissions.is_empty());
    }

    #[test]
    fn test_missing_emissions_row_yields_zeros() {
        let table = parse_table(b"Technology,Base\nP-ASU,1.0\n").unwrap();
        let config = ChartConfig::default();
        let classified = classify(&table, &config);
        let set = build_series(&classified, &selection(&["Base"]), &config);
        assert_eq!(set.emissions, vec![0.0]);
    }
}
