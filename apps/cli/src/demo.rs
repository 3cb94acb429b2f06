use medical_dashboard_core::charts::{
    generate_demo_data, generate_demo_data_with, render_dashboard, ChartConfiguration,
    ChartError, DashboardData, RecordedCharts, RISK_CANVAS, VITALS_CANVAS, WEIGHT_CANVAS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Demo data and the chart configurations a dashboard page would receive.
#[derive(Debug, Clone, Serialize)]
pub struct DemoDashboard {
    pub data: DashboardData,
    pub charts: Vec<ExportedChart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedChart {
    pub canvas: String,
    pub config: ChartConfiguration,
}

pub fn demo_data(weeks: usize, seed: Option<u64>) -> DashboardData {
    seed.map_or_else(
        || generate_demo_data(weeks),
        |seed| generate_demo_data_with(&mut StdRng::seed_from_u64(seed), weeks),
    )
}

pub fn build_demo(weeks: usize, seed: Option<u64>) -> Result<DemoDashboard, ChartError> {
    let data = demo_data(weeks, seed);
    let mut surface = RecordedCharts::with_canvases([RISK_CANVAS, VITALS_CANVAS, WEIGHT_CANVAS]);
    render_dashboard(&mut surface, &data)?;

    let charts = surface
        .into_charts()
        .into_iter()
        .map(|(canvas, config)| ExportedChart { canvas, config })
        .collect();
    Ok(DemoDashboard { data, charts })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_demo_is_reproducible() {
        let first = serde_json::to_value(build_demo(7, Some(11)).unwrap()).unwrap();
        let second = serde_json::to_value(build_demo(7, Some(11)).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn demo_exports_all_three_charts() {
        let demo = build_demo(5, Some(1)).unwrap();
        let canvases: Vec<_> = demo.charts.iter().map(|c| c.canvas.as_str()).collect();
        assert_eq!(canvases, [RISK_CANVAS, VITALS_CANVAS, WEIGHT_CANVAS]);

        let value = serde_json::to_value(&demo).unwrap();
        assert_eq!(value["data"]["labels"][4], "Week 20");
        assert_eq!(value["charts"][0]["config"]["type"], "line");
        assert_eq!(value["charts"][2]["config"]["type"], "bar");
        assert_eq!(
            value["charts"][2]["config"]["data"]["datasets"][0]["data"],
            value["data"]["weightGain"]
        );
    }
}
