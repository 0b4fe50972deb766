//! Dashboard payload types and Plotly figure composition.
//!
//! Figures are complete Plotly JSON (`{data, layout}`); the served page
//! only passes them to `Plotly.newPlot`. Every chart slot carries either a
//! figure or an informational placeholder string, never an empty chart.

use serde::Serialize;
use serde_json::{Value, json};

/// Bar/marker red used across the dashboard.
pub const RED: &str = "#FC3030";
/// Secondary orange.
pub const ORANGE: &str = "#ff7f0e";
/// Secondary green.
pub const GREEN: &str = "#2ca02c";
/// Secondary blue.
pub const BLUE: &str = "#1f77b4";

/// One rendered dashboard view: headline tiles plus chart slots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    /// View heading.
    pub title: String,
    /// Headline metric tiles, in display order.
    pub metrics: Vec<MetricTile>,
    /// Chart slots, in display order.
    pub charts: Vec<ChartSlot>,
}

/// A headline metric tile with a preformatted value and optional delta.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTile {
    /// Tile label.
    pub label: String,
    /// Preformatted value (thousands separators applied server-side).
    pub value: String,
    /// Preformatted rate shown under the value; a leading `-` marks a
    /// negative delta (e.g., the bounce rate).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

impl MetricTile {
    /// Creates a tile without a delta.
    #[must_use]
    pub fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_owned(),
            value,
            delta: None,
        }
    }

    /// Creates a tile with a delta.
    #[must_use]
    pub fn with_delta(label: &str, value: String, delta: String) -> Self {
        Self {
            label: label.to_owned(),
            value,
            delta: Some(delta),
        }
    }
}

/// One chart slot: a complete Plotly figure, or a placeholder message when
/// the chart's input is missing or all-zero.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSlot {
    /// Stable slot identifier (used as the page element id).
    pub id: String,
    /// Chart heading.
    pub title: String,
    /// Complete Plotly figure JSON (`{data, layout}`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figure: Option<Value>,
    /// Informational message shown instead of a chart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl ChartSlot {
    /// Creates a slot holding a figure.
    #[must_use]
    pub fn figure(id: &str, title: &str, figure: Value) -> Self {
        Self {
            id: id.to_owned(),
            title: title.to_owned(),
            figure: Some(figure),
            placeholder: None,
        }
    }

    /// Creates a slot holding a placeholder message.
    #[must_use]
    pub fn placeholder(id: &str, title: &str, message: &str) -> Self {
        Self {
            id: id.to_owned(),
            title: title.to_owned(),
            figure: None,
            placeholder: Some(message.to_owned()),
        }
    }
}

/// Grouped vertical bar chart: one trace per series, one bar group per
/// campaign.
#[must_use]
pub fn grouped_bar(categories: &[String], series: &[(&str, &str, Vec<u64>)]) -> Value {
    let traces: Vec<Value> = series
        .iter()
        .map(|(name, color, values)| {
            json!({
                "type": "bar",
                "name": name,
                "x": categories,
                "y": values,
                "text": values,
                "textposition": "auto",
                "marker": { "color": color },
            })
        })
        .collect();

    json!({
        "data": traces,
        "layout": {
            "barmode": "group",
            "margin": { "t": 10 },
            "legend": { "orientation": "h" },
        },
    })
}

/// Donut chart (pie with a hole) with fixed slice colors.
#[must_use]
pub fn donut(labels: &[&str], values: &[u64], colors: &[&str]) -> Value {
    json!({
        "data": [{
            "type": "pie",
            "labels": labels,
            "values": values,
            "hole": 0.4,
            "marker": { "colors": colors },
        }],
        "layout": { "margin": { "t": 10 } },
    })
}

/// Horizontal bar chart of per-campaign rates, labelled as percentages.
///
/// `rows` must already be in display order (bottom to top in Plotly's
/// horizontal orientation).
#[must_use]
pub fn rate_bar(rows: &[(String, f64)]) -> Value {
    let names: Vec<&str> = rows.iter().map(|(name, _)| name.as_str()).collect();
    let rates: Vec<f64> = rows.iter().map(|(_, rate)| *rate).collect();
    let labels: Vec<String> = rates.iter().map(|r| crate::rates::format_percent(*r)).collect();

    json!({
        "data": [{
            "type": "bar",
            "orientation": "h",
            "x": rates,
            "y": names,
            "text": labels,
            "textposition": "auto",
            "marker": { "color": RED },
        }],
        "layout": {
            "margin": { "t": 10 },
            "xaxis": { "tickformat": ".0%" },
        },
    })
}

/// Geographic bubble map of opens summed by country.
///
/// Uses Plotly's `country names` location mode, so country strings pass
/// through exactly as extracted.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn geo_bubble(rows: &[(String, u64)]) -> Value {
    let countries: Vec<&str> = rows.iter().map(|(country, _)| country.as_str()).collect();
    let opens: Vec<u64> = rows.iter().map(|(_, opens)| *opens).collect();
    let max_opens = opens.iter().copied().max().unwrap_or(1).max(1);
    // Plotly area-scaling: largest bubble renders at ~40px diameter.
    let sizeref = 2.0 * max_opens as f64 / f64::powi(40.0, 2);

    json!({
        "data": [{
            "type": "scattergeo",
            "locationmode": "country names",
            "locations": countries,
            "hovertext": countries,
            "marker": {
                "size": opens,
                "sizemode": "area",
                "sizeref": sizeref,
                "sizemin": 4,
                "color": RED,
            },
        }],
        "layout": {
            "title": { "text": "Email Opens by Country" },
            "geo": { "projection": { "type": "natural earth" } },
            "margin": { "l": 0, "r": 0, "t": 40, "b": 0 },
        },
    })
}

/// Funnel chart over the given `(stage, count)` sequence.
#[must_use]
pub fn funnel(stages: &[(&str, u64)]) -> Value {
    let names: Vec<&str> = stages.iter().map(|(name, _)| *name).collect();
    let values: Vec<u64> = stages.iter().map(|(_, value)| *value).collect();

    json!({
        "data": [{
            "type": "funnel",
            "y": names,
            "x": values,
            "textinfo": "value+percent initial",
            "marker": { "color": RED },
        }],
        "layout": { "margin": { "t": 10 } },
    })
}

/// Single-value gauge on a 0–100 scale.
#[must_use]
pub fn gauge(value: f64, title: &str) -> Value {
    json!({
        "data": [{
            "type": "indicator",
            "mode": "gauge+number",
            "value": value,
            "title": { "text": title },
            "gauge": {
                "axis": { "range": [serde_json::Value::Null, 100] },
                "bar": { "color": RED },
            },
        }],
        "layout": { "margin": { "t": 40 } },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_slot_serializes_exactly_one_of_figure_or_placeholder() {
        let slot = ChartSlot::placeholder("x", "X", "nothing here");
        let json = serde_json::to_value(&slot).unwrap();
        assert!(json.get("figure").is_none());
        assert_eq!(json["placeholder"], "nothing here");

        let slot = ChartSlot::figure("y", "Y", json!({ "data": [], "layout": {} }));
        let json = serde_json::to_value(&slot).unwrap();
        assert!(json.get("placeholder").is_none());
        assert!(json.get("figure").is_some());
    }

    #[test]
    fn funnel_preserves_stage_order() {
        let fig = funnel(&[("Emails Sent", 1000), ("Delivered", 980), ("Unique Opens", 400)]);
        assert_eq!(fig["data"][0]["y"][0], "Emails Sent");
        assert_eq!(fig["data"][0]["x"][2], 400);
        assert_eq!(fig["data"][0]["textinfo"], "value+percent initial");
    }

    #[test]
    fn geo_bubble_uses_country_names_mode() {
        let fig = geo_bubble(&[("Canada".to_owned(), 50)]);
        assert_eq!(fig["data"][0]["locationmode"], "country names");
        assert_eq!(fig["layout"]["geo"]["projection"]["type"], "natural earth");
    }
}
