//! Chart.js configuration objects.
//!
//! Field names serialize to the camelCase keys Chart.js and
//! chartjs-plugin-annotation expect; absent options are omitted so the
//! library defaults apply.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::color::{serialize_css, Rgba};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

impl ChartKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "line" => Some(Self::Line),
            "bar" => Some(Self::Bar),
            _ => None,
        }
    }

    /// A missing name means `Line`; an unknown one is `None`.
    pub fn from_name(name: Option<&str>) -> Option<Self> {
        name.map_or(Some(Self::default()), Self::parse)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfiguration {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(serialize_with = "serialize_css")]
    pub border_color: Rgba,
    #[serde(serialize_with = "serialize_css")]
    pub background_color: Rgba,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(rename = "yAxisID", skip_serializing_if = "Option::is_none")]
    pub y_axis_id: Option<String>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: Vec<f64>, border: Rgba, background: Rgba) -> Self {
        Self {
            label: label.into(),
            data,
            border_color: border,
            background_color: background,
            border_width: None,
            fill: None,
            tension: None,
            y_axis_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction: Option<Interaction>,
    pub plugins: Plugins,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub scales: BTreeMap<String, Scale>,
}

impl ChartOptions {
    /// Options every dashboard chart starts from.
    pub fn base() -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            interaction: None,
            plugins: Plugins {
                legend: Legend {
                    display: true,
                    position: Position::Top,
                },
                tooltip: Tooltip {
                    mode: InteractionMode::Index,
                    intersect: false,
                },
                annotation: None,
            },
            scales: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Left,
    Right,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interaction {
    pub mode: InteractionMode,
    pub intersect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: Legend,
    pub tooltip: Tooltip,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<AnnotationPlugin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub display: bool,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub mode: InteractionMode,
    pub intersect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationPlugin {
    pub annotations: BTreeMap<String, Annotation>,
}

/// Horizontal line annotation between `y_min` and `y_max`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub y_min: f64,
    pub y_max: f64,
    #[serde(serialize_with = "serialize_css")]
    pub border_color: Rgba,
    pub border_width: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub border_dash: Vec<u32>,
    pub label: AnnotationLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationLabel {
    pub display: bool,
    pub content: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scale {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ScaleKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<ScaleTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    Linear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleTitle {
    pub display: bool,
    pub text: String,
}

impl ScaleTitle {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            display: true,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub draw_on_chart_area: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_chart_type_defaults_to_line() {
        assert_eq!(ChartKind::from_name(None), Some(ChartKind::Line));
        assert_eq!(ChartKind::from_name(Some(" Bar ")), Some(ChartKind::Bar));
        assert_eq!(ChartKind::from_name(Some("radar")), None);
    }
}
