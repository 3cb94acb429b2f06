use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use super::color::{colors, Rgba};
use super::config::{
    Annotation, AnnotationKind, AnnotationLabel, AnnotationPlugin, ChartConfiguration, ChartData,
    ChartKind, ChartOptions, Dataset, Grid, Interaction, InteractionMode, Position, Scale,
    ScaleKind, ScaleTitle,
};
use super::series::{BarSeries, DashboardData, DataError};
use crate::domain::Metric;

pub const RISK_AXIS_MAX: f64 = 50.0;
pub const HIGH_RISK_THRESHOLD: f64 = 30.0;
pub const HIGH_RISK_LABEL: &str = "High Risk Threshold";
const LINE_TENSION: f64 = 0.4;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("canvas `{0}` not found")]
    CanvasNotFound(String),
    #[error("chart library rejected the configuration: {0}")]
    Instantiate(String),
    #[error(transparent)]
    Data(#[from] DataError),
}

/// The charting library boundary: resolves a drawing surface by element id
/// and binds a configuration to it.
pub trait ChartSurface {
    type Canvas;
    type Handle;

    fn canvas(&mut self, canvas_id: &str) -> Option<Self::Canvas>;

    fn instantiate(
        &mut self,
        canvas: Self::Canvas,
        config: ChartConfiguration,
    ) -> Result<Self::Handle, ChartError>;
}

fn resolve<S: ChartSurface>(surface: &mut S, canvas_id: &str) -> Result<S::Canvas, ChartError> {
    surface.canvas(canvas_id).ok_or_else(|| {
        log::error!("chart canvas `{canvas_id}` is missing from the page");
        ChartError::CanvasNotFound(canvas_id.to_string())
    })
}

/// Single-series filled line of risk scores with the high-risk threshold line.
pub fn risk_trend_config(data: &DashboardData) -> ChartConfiguration {
    let palette = colors();
    let mut dataset = Dataset::new(
        Metric::RiskScore.label(),
        data.series(Metric::RiskScore).unwrap_or_default().to_vec(),
        palette.danger,
        palette.danger_light,
    );
    dataset.border_width = Some(2);
    dataset.fill = Some(true);
    dataset.tension = Some(LINE_TENSION);

    let mut options = ChartOptions::base();
    options.scales.insert(
        "y".to_string(),
        Scale {
            begin_at_zero: Some(true),
            max: Some(RISK_AXIS_MAX),
            title: Some(ScaleTitle::new(Metric::RiskScore.label())),
            ..Scale::default()
        },
    );
    options.plugins.annotation = Some(AnnotationPlugin {
        annotations: BTreeMap::from([(
            "threshold".to_string(),
            Annotation {
                kind: AnnotationKind::Line,
                y_min: HIGH_RISK_THRESHOLD,
                y_max: HIGH_RISK_THRESHOLD,
                border_color: palette.warning.with_alpha(1.0),
                border_width: 2,
                border_dash: vec![5, 5],
                label: AnnotationLabel {
                    display: true,
                    content: HIGH_RISK_LABEL.to_string(),
                    position: Position::End,
                },
            },
        )]),
    });

    ChartConfiguration {
        kind: ChartKind::Line,
        data: ChartData {
            labels: data.labels.clone(),
            datasets: vec![dataset],
        },
        options,
    }
}

/// Blood pressure on the left axis and glucose on an independent right axis;
/// each series appears only when the page supplied it.
pub fn vital_signs_config(data: &DashboardData, kind: ChartKind) -> ChartConfiguration {
    let palette = colors();
    let mut datasets = Vec::new();
    let mut options = ChartOptions::base();
    options.interaction = Some(Interaction {
        mode: InteractionMode::Index,
        intersect: false,
    });

    if let Some(values) = data.series(Metric::BloodPressure) {
        let mut dataset = Dataset::new(
            Metric::BloodPressure.label(),
            values.to_vec(),
            palette.primary,
            palette.primary_light,
        );
        dataset.tension = Some(LINE_TENSION);
        dataset.y_axis_id = Some("y".to_string());
        datasets.push(dataset);

        options.scales.insert(
            "y".to_string(),
            Scale {
                kind: Some(ScaleKind::Linear),
                display: Some(true),
                position: Some(Position::Left),
                title: Some(ScaleTitle::new("Blood Pressure (mmHg)")),
                ..Scale::default()
            },
        );
    }

    if let Some(values) = data.series(Metric::Glucose) {
        let mut dataset = Dataset::new(
            Metric::Glucose.label(),
            values.to_vec(),
            palette.success,
            palette.success_light,
        );
        dataset.tension = Some(LINE_TENSION);
        dataset.y_axis_id = Some("y1".to_string());
        datasets.push(dataset);

        options.scales.insert(
            "y1".to_string(),
            Scale {
                kind: Some(ScaleKind::Linear),
                display: Some(true),
                position: Some(Position::Right),
                title: Some(ScaleTitle::new(Metric::Glucose.label())),
                grid: Some(Grid {
                    draw_on_chart_area: false,
                }),
                ..Scale::default()
            },
        );
    }

    ChartConfiguration {
        kind,
        data: ChartData {
            labels: data.labels.clone(),
            datasets,
        },
        options,
    }
}

/// Single-series bar chart; the border is the fill color made opaque.
pub fn bar_config(series: &BarSeries, label: &str, color: Rgba) -> ChartConfiguration {
    let mut dataset = Dataset::new(label, series.values.clone(), color.with_alpha(1.0), color);
    dataset.border_width = Some(1);

    let mut options = ChartOptions::base();
    options.scales.insert(
        "y".to_string(),
        Scale {
            begin_at_zero: Some(true),
            ..Scale::default()
        },
    );

    ChartConfiguration {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: series.labels.clone(),
            datasets: vec![dataset],
        },
        options,
    }
}

pub fn create_risk_trend_chart<S: ChartSurface>(
    surface: &mut S,
    canvas_id: &str,
    data: &DashboardData,
) -> Result<S::Handle, ChartError> {
    let canvas = resolve(surface, canvas_id)?;
    data.validate()?;
    surface.instantiate(canvas, risk_trend_config(data))
}

pub fn create_vital_signs_chart<S: ChartSurface>(
    surface: &mut S,
    canvas_id: &str,
    data: &DashboardData,
    kind: ChartKind,
) -> Result<S::Handle, ChartError> {
    let canvas = resolve(surface, canvas_id)?;
    data.validate()?;
    surface.instantiate(canvas, vital_signs_config(data, kind))
}

pub fn create_bar_chart<S: ChartSurface>(
    surface: &mut S,
    canvas_id: &str,
    series: &BarSeries,
    label: &str,
    color: Rgba,
) -> Result<S::Handle, ChartError> {
    let canvas = resolve(surface, canvas_id)?;
    series.validate()?;
    surface.instantiate(canvas, bar_config(series, label, color))
}

/// Canvas ids used by the dashboard page.
pub const RISK_CANVAS: &str = "riskChart";
pub const VITALS_CANVAS: &str = "vitalsChart";
pub const WEIGHT_CANVAS: &str = "weightChart";

/// Draws the standard dashboard charts onto whichever of the page canvases
/// exist. Returns the handles in drawing order.
pub fn render_dashboard<S: ChartSurface>(
    surface: &mut S,
    data: &DashboardData,
) -> Result<Vec<S::Handle>, ChartError> {
    let mut handles = Vec::new();
    if surface.canvas(RISK_CANVAS).is_some() && data.series(Metric::RiskScore).is_some() {
        handles.push(create_risk_trend_chart(surface, RISK_CANVAS, data)?);
    }
    if surface.canvas(VITALS_CANVAS).is_some() {
        handles.push(create_vital_signs_chart(
            surface,
            VITALS_CANVAS,
            data,
            ChartKind::Line,
        )?);
    }
    if surface.canvas(WEIGHT_CANVAS).is_some() {
        if let Some(series) = data.bar_series(Metric::WeightGain) {
            handles.push(create_bar_chart(
                surface,
                WEIGHT_CANVAS,
                &series,
                Metric::WeightGain.label(),
                colors().info,
            )?);
        }
    }
    Ok(handles)
}

/// A surface that keeps configurations instead of drawing them. Used for JSON
/// export and by the terminal preview.
#[derive(Debug, Default)]
pub struct RecordedCharts {
    canvases: BTreeSet<String>,
    charts: Vec<(String, ChartConfiguration)>,
}

impl RecordedCharts {
    pub fn with_canvases<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            canvases: ids.into_iter().map(Into::into).collect(),
            charts: Vec::new(),
        }
    }

    pub fn charts(&self) -> &[(String, ChartConfiguration)] {
        &self.charts
    }

    pub fn get(&self, canvas_id: &str) -> Option<&ChartConfiguration> {
        self.charts
            .iter()
            .rev()
            .find(|(id, _)| id == canvas_id)
            .map(|(_, config)| config)
    }

    pub fn into_charts(self) -> Vec<(String, ChartConfiguration)> {
        self.charts
    }
}

impl ChartSurface for RecordedCharts {
    type Canvas = String;
    type Handle = usize;

    fn canvas(&mut self, canvas_id: &str) -> Option<String> {
        self.canvases.get(canvas_id).cloned()
    }

    fn instantiate(
        &mut self,
        canvas: String,
        config: ChartConfiguration,
    ) -> Result<usize, ChartError> {
        self.charts.push((canvas, config));
        Ok(self.charts.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_data() -> DashboardData {
        DashboardData {
            labels: vec!["Week 4".into(), "Week 8".into(), "Week 12".into()],
            risk_scores: Some(vec![22.0, 28.0, 33.0]),
            blood_pressure: Some(vec![120.0, 125.0, 131.0]),
            glucose_levels: Some(vec![92.0, 99.0, 104.0]),
            ..DashboardData::default()
        }
    }

    fn surface() -> RecordedCharts {
        RecordedCharts::with_canvases(["riskChart", "vitalsChart", "barChart"])
    }

    #[test]
    fn risk_trend_has_threshold_and_fixed_max() {
        let mut surface = surface();
        create_risk_trend_chart(&mut surface, "riskChart", &sample_data()).unwrap();

        let value = serde_json::to_value(surface.get("riskChart").unwrap()).unwrap();
        assert_eq!(value["type"], "line");
        assert_eq!(value["data"]["datasets"][0]["data"], json!([22.0, 28.0, 33.0]));
        assert_eq!(value["data"]["datasets"][0]["fill"], true);
        assert_eq!(value["options"]["scales"]["y"]["max"], 50.0);

        let threshold = &value["options"]["plugins"]["annotation"]["annotations"]["threshold"];
        assert_eq!(threshold["type"], "line");
        assert_eq!(threshold["yMin"], 30.0);
        assert_eq!(threshold["yMax"], 30.0);
        assert_eq!(threshold["label"]["content"], "High Risk Threshold");
    }

    #[test]
    fn vital_signs_uses_independent_axes() {
        let mut surface = surface();
        create_vital_signs_chart(&mut surface, "vitalsChart", &sample_data(), ChartKind::Line)
            .unwrap();

        let value = serde_json::to_value(surface.get("vitalsChart").unwrap()).unwrap();
        let datasets = value["data"]["datasets"].as_array().unwrap();
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0]["yAxisID"], "y");
        assert_eq!(datasets[1]["yAxisID"], "y1");
        assert_eq!(value["options"]["scales"]["y"]["position"], "left");
        assert_eq!(value["options"]["scales"]["y1"]["position"], "right");
        assert_eq!(value["options"]["scales"]["y1"]["grid"]["drawOnChartArea"], false);
        assert_eq!(value["data"]["labels"], json!(["Week 4", "Week 8", "Week 12"]));
    }

    #[test]
    fn vital_signs_skips_absent_series() {
        let data = DashboardData {
            glucose_levels: None,
            ..sample_data()
        };
        let config = vital_signs_config(&data, ChartKind::Bar);

        assert_eq!(config.kind, ChartKind::Bar);
        assert_eq!(config.data.datasets.len(), 1);
        assert!(config.options.scales.contains_key("y"));
        assert!(!config.options.scales.contains_key("y1"));
    }

    #[test]
    fn bar_chart_renders_the_named_values() {
        let series = BarSeries {
            labels: vec!["a".into(), "b".into(), "c".into()],
            values: vec![1.0, 2.0, 3.0],
        };
        let mut surface = surface();
        create_bar_chart(&mut surface, "barChart", &series, "Visits", colors().info).unwrap();

        let config = surface.get("barChart").unwrap();
        assert_eq!(config.kind, ChartKind::Bar);
        assert_eq!(config.data.datasets[0].data, vec![1.0, 2.0, 3.0]);
        assert_eq!(config.data.datasets[0].label, "Visits");
    }

    #[test]
    fn bar_border_is_opaque_fill_for_any_alpha() {
        let fill = Rgba::new(200, 100, 50, 0.45);
        let config = bar_config(&BarSeries::default(), "x", fill);
        let dataset = &config.data.datasets[0];

        assert_eq!(dataset.background_color, fill);
        assert_eq!(dataset.border_color, Rgba::new(200, 100, 50, 1.0));
    }

    #[test]
    fn missing_canvas_is_a_hard_failure() {
        let mut surface = RecordedCharts::default();
        let error = create_risk_trend_chart(&mut surface, "nope", &sample_data()).unwrap_err();

        assert!(matches!(error, ChartError::CanvasNotFound(id) if id == "nope"));
        assert!(surface.charts().is_empty());
    }

    #[test]
    fn ragged_input_is_rejected() {
        let data = DashboardData {
            risk_scores: Some(vec![1.0]),
            ..sample_data()
        };
        let error = create_risk_trend_chart(&mut surface(), "riskChart", &data).unwrap_err();
        assert!(matches!(error, ChartError::Data(_)));
    }

    #[test]
    fn dashboard_renders_only_present_canvases() {
        let mut surface = RecordedCharts::with_canvases([RISK_CANVAS, WEIGHT_CANVAS]);
        let data = DashboardData {
            weight_gain: Some(vec![1.0, 2.0, 2.0]),
            ..sample_data()
        };

        let handles = render_dashboard(&mut surface, &data).unwrap();

        assert_eq!(handles, vec![0, 1]);
        assert!(surface.get(VITALS_CANVAS).is_none());
        let bar = surface.get(WEIGHT_CANVAS).unwrap();
        assert_eq!(bar.kind, ChartKind::Bar);
        assert_eq!(bar.data.datasets[0].data, vec![1.0, 2.0, 2.0]);
    }

    #[test]
    fn dashboard_skips_bar_without_weight_series() {
        let mut surface = RecordedCharts::with_canvases([RISK_CANVAS, VITALS_CANVAS, WEIGHT_CANVAS]);

        let handles = render_dashboard(&mut surface, &sample_data()).unwrap();

        assert_eq!(handles.len(), 2);
        assert!(surface.get(WEIGHT_CANVAS).is_none());
    }

    #[test]
    fn palette_color_from_json_drives_a_bar_chart() {
        let palette = serde_json::to_value(colors()).unwrap();
        let color: Rgba = serde_json::from_value(palette["success"].clone()).unwrap();
        let series = BarSeries {
            labels: vec!["Mon".into(), "Tue".into()],
            values: vec![3.0, 5.0],
        };

        let mut surface = surface();
        create_bar_chart(&mut surface, "barChart", &series, "Visits", color).unwrap();

        let value = serde_json::to_value(surface.get("barChart").unwrap()).unwrap();
        let dataset = &value["data"]["datasets"][0];
        assert_eq!(dataset["backgroundColor"], "rgba(25, 135, 84, 0.8)");
        assert_eq!(dataset["borderColor"], "rgba(25, 135, 84, 1)");
    }
}
