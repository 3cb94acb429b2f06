pub mod color;
pub mod config;
pub mod demo;
pub mod renderer;
pub mod series;

pub use color::{colors, Palette, Rgba};
pub use config::{ChartConfiguration, ChartKind};
pub use demo::{generate_demo_data, generate_demo_data_with, DEFAULT_WEEKS};
pub use renderer::{
    create_bar_chart, create_risk_trend_chart, create_vital_signs_chart, render_dashboard,
    ChartError, ChartSurface, RecordedCharts, RISK_CANVAS, VITALS_CANVAS, WEIGHT_CANVAS,
};
pub use series::{BarSeries, DashboardData, DataError};
