// Platform-independent pieces of the dashboard front end: chart
// configuration, demo data, layout state and notifications.
pub mod charts;
pub mod domain;
pub mod ui;

pub use charts::{
    colors, create_bar_chart, create_risk_trend_chart, create_vital_signs_chart,
    generate_demo_data, BarSeries, ChartConfiguration, ChartError, ChartKind, ChartSurface,
    DashboardData, Rgba,
};
pub use domain::{Metric, Severity, WalkParams};
pub use ui::{validate_form, Document, LayoutController, Notifier, Scheduler, UiToolkit};
