//! Declarative chart assembly: label layout policy plus the Plotly-shaped
//! spec the rendering boundary consumes. Composition only; every number
//! here is a direct mapping of its inputs.

use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::config::ChartConfig;
use crate::series::SeriesSet;

/// Primary (energy) axis bounds, fixed by the domain, never auto-scaled.
/// Out-of-range data clips visually rather than rescaling the chart.
pub const PRIMARY_AXIS_RANGE: (f64, f64) = (-3.0, 9.0);
/// Secondary (emissions) axis bounds, same fixed-clamp policy.
pub const SECONDARY_AXIS_RANGE: (f64, f64) = (-0.3, 0.9);

pub const ENERGY_UNIT: &str = "GJ per tonne clinker";
pub const EMISSIONS_UNIT: &str = "tCO\u{2082} per tonne clinker";

const FONT_SIZE: u32 = 12;
const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";
const AXIS_TITLE_FONT_FAMILY: &str = "Georgia, serif";

/// Category-label rotation as a step function of selected-column count.
/// The last step stops just short of vertical so labels stay renderable.
pub fn rotation_for(selected: usize) -> f64 {
    match selected {
        0..=6 => 0.0,
        7..=10 => 25.0,
        11..=14 => 45.0,
        15..=20 => 60.0,
        21..=26 => 75.0,
        _ => 89.5,
    }
}

/// Bottom plot margin for a given label rotation. Flat labels need 30
/// units; every non-zero rotation shares one 50-unit margin.
pub fn bottom_margin_for(angle: f64) -> f64 {
    if angle == 0.0 {
        30.0
    } else {
        50.0
    }
}

/// The fully composed chart description handed to the rendering engine.
/// Rebuilt whole on every recomputation; the renderer replaces, never
/// patches.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSpec {
    pub traces: Vec<JsonValue>,
    pub layout: JsonValue,
}

/// Compose the series payload, selection, and layout numbers into one
/// declarative spec. An empty selection produces an empty trace list while
/// the axes still carry their fixed ranges against an empty category list.
pub fn assemble(
    series: &SeriesSet,
    selection: &[String],
    rotation: f64,
    bottom_margin: f64,
    config: &ChartConfig,
) -> ChartSpec {
    let mut traces = Vec::new();
    if !selection.is_empty() {
        for stacked in &series.stacked {
            traces.push(json!({
                "type": "bar",
                "name": stacked.name,
                "x": selection,
                "y": stacked.values,
                "marker": { "color": config.color_for(&stacked.name) },
                "hovertemplate": format!(
                    "%{{x}}<br>{}: %{{y:.3f}} {}<extra></extra>",
                    stacked.name, ENERGY_UNIT
                )
            }));
        }
        // Appended last so the points draw above the bars.
        traces.push(json!({
            "type": "scatter",
            "mode": "markers",
            "name": config.emissions_row,
            "x": selection,
            "y": series.emissions,
            "yaxis": "y2",
            "marker": { "size": 9, "color": config.color_for(&config.emissions_row) },
            "hovertemplate": format!("%{{x}}<br>%{{y:.3f}} {}<extra></extra>", EMISSIONS_UNIT)
        }));
    }

    let layout = json!({
        "barmode": "relative",
        "font": { "size": FONT_SIZE, "family": FONT_FAMILY },
        "margin": { "b": bottom_margin },
        "xaxis": {
            "type": "category",
            "categoryorder": "array",
            "categoryarray": selection,
            "tickangle": rotation
        },
        "yaxis": {
            "title": { "text": ENERGY_UNIT, "font": { "family": AXIS_TITLE_FONT_FAMILY } },
            "range": [PRIMARY_AXIS_RANGE.0, PRIMARY_AXIS_RANGE.1],
            "dtick": 1.0,
            "autorange": false
        },
        "yaxis2": {
            "title": { "text": EMISSIONS_UNIT, "font": { "family": AXIS_TITLE_FONT_FAMILY } },
            "range": [SECONDARY_AXIS_RANGE.0, SECONDARY_AXIS_RANGE.1],
            "dtick": 0.1,
            "autorange": false,
            "overlaying": "y",
            "side": "right"
        },
        "legend": { "orientation": "h" }
    });

    ChartSpec { traces, layout }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::StackedSeries;

    fn series_set() -> SeriesSet {
        SeriesSet {
            stacked: vec![
                StackedSeries {
                    name: "Fuel Demand Process".to_string(),
                    values: vec![2.0, 3.0],
                },
                StackedSeries {
                    name: "P-ASU".to_string(),
                    values: vec![1.0, 0.5],
                },
            ],
            emissions: vec![0.4, 0.35],
        }
    }

    #[test]
    fn test_rotation_boundaries() {
        let cases = [
            (6, 0.0),
            (7, 25.0),
            (10, 25.0),
            (11, 45.0),
            (14, 45.0),
            (15, 60.0),
            (20, 60.0),
            (21, 75.0),
            (26, 75.0),
            (27, 89.5),
            (100, 89.5),
        ];
        for (selected, expected) in cases {
            assert_eq!(rotation_for(selected), expected, "n = {selected}");
        }
    }

    #[test]
    fn test_bottom_margin_step() {
        assert_eq!(bottom_margin_for(0.0), 30.0);
        assert_eq!(bottom_margin_for(25.0), 50.0);
        assert_eq!(bottom_margin_for(89.5), 50.0);
    }

    #[test]
    fn test_assemble_traces_and_axes() {
        let selection = vec!["Base".to_string(), "Alt1".to_string()];
        let config = ChartConfig::default();
        let spec = assemble(&series_set(), &selection, 0.0, 30.0, &config);

        // Two bars plus the emissions scatter, scatter last.
        assert_eq!(spec.traces.len(), 3);
        assert_eq!(spec.traces[0]["type"], "bar");
        assert_eq!(spec.traces[0]["name"], "Fuel Demand Process");
        assert_eq!(spec.traces[0]["y"], json!([2.0, 3.0]));
        assert_eq!(spec.traces[0]["x"], json!(["Base", "Alt1"]));

        let scatter = spec.traces.last().unwrap();
        assert_eq!(scatter["type"], "scatter");
        assert_eq!(scatter["yaxis"], "y2");
        assert_eq!(scatter["y"], json!([0.4, 0.35]));

        assert_eq!(spec.layout["barmode"], "relative");
        assert_eq!(spec.layout["xaxis"]["categoryarray"], json!(["Base", "Alt1"]));
        assert_eq!(spec.layout["xaxis"]["tickangle"], json!(0.0));
        assert_eq!(spec.layout["margin"]["b"], json!(30.0));
        assert_eq!(spec.layout["yaxis"]["range"], json!([-3.0, 9.0]));
        assert_eq!(spec.layout["yaxis2"]["range"], json!([-0.3, 0.9]));
        assert_eq!(spec.layout["yaxis2"]["overlaying"], "y");
    }

    #[test]
    fn test_assemble_tooltip_units() {
        let selection = vec!["Base".to_string()];
        let config = ChartConfig::default();
        let spec = assemble(&series_set(), &selection, 0.0, 30.0, &config);
        let bar_template = spec.traces[0]["hovertemplate"].as_str().unwrap();
        assert!(bar_template.contains("%{y:.3f} GJ per tonne clinker"));
        let scatter_template = spec.traces.last().unwrap()["hovertemplate"]
            .as_str()
            .unwrap();
        assert!(scatter_template.contains("%{y:.3f} tCO\u{2082} per tonne clinker"));
    }

    #[test]
    fn test_assemble_empty_selection_has_no_traces() {
        let config = ChartConfig::default();
        let empty = SeriesSet::default();
        let spec = assemble(&empty, &[], 0.0, 30.0, &config);
        assert!(spec.traces.is_empty());
        // Axes still render against an empty category list.
        assert_eq!(spec.layout["xaxis"]["categoryarray"], json!([]));
        assert_eq!(spec.layout["yaxis"]["range"], json!([-3.0, 9.0]));
    }

    #[test]
    fn test_axis_title_font_family_distinct_from_body() {
        let config = ChartConfig::default();
        let spec = assemble(&series_set(), &["Base".to_string()], 0.0, 30.0, &config);
        let body = spec.layout["font"]["family"].as_str().unwrap();
        let title = spec.layout["yaxis"]["title"]["font"]["family"]
            .as_str()
            .unwrap();
        assert_ne!(body, title);
    }
}
