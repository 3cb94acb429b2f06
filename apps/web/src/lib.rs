//! Browser entry points of the medical dashboard.
//!
//! Page scripts construct a [`Dashboard`] once per page load and call into it;
//! nothing is registered globally.

mod chartjs;
mod dom;
mod listeners;
mod timers;

use medical_dashboard_core::charts::{self, BarSeries, ChartKind, DashboardData, Rgba};
use medical_dashboard_core::ui::{validate_form as validate, Notifier};
use medical_dashboard_core::Severity;
use wasm_bindgen::prelude::*;
use web_sys::Element;

pub use chartjs::{Chart, ChartJsSurface};
pub use dom::WebDocument;
pub use listeners::MountedLayout;
pub use timers::BrowserTimers;

use chartjs::{describe, to_js};

fn chart_error(error: &charts::ChartError) -> JsValue {
    web_sys::console::error_1(&format!("Chart rendering failed: {error}").into());
    JsError::new(&error.to_string()).into()
}

fn parse_data(data: JsValue) -> Result<DashboardData, JsValue> {
    serde_wasm_bindgen::from_value(data)
        .map_err(|error| JsError::new(&format!("invalid chart data: {error}")).into())
}

#[wasm_bindgen]
pub struct Dashboard {
    host: WebDocument,
    timers: BrowserTimers,
    charts: ChartJsSurface,
    notifier: Notifier,
    layout: Option<MountedLayout>,
}

#[wasm_bindgen]
impl Dashboard {
    /// Attaches the layout controller to the current page.
    #[wasm_bindgen(constructor)]
    pub fn mount() -> Result<Dashboard, JsValue> {
        let host = WebDocument::new()?;
        let layout = MountedLayout::mount(&host)?;
        web_sys::console::log_1(&"Dashboard mounted".into());

        Ok(Self {
            timers: BrowserTimers::new(host.clone()),
            charts: ChartJsSurface::new(host.document().clone()),
            notifier: Notifier::new(),
            layout: Some(layout),
            host,
        })
    }

    /// Detaches the page listeners; later calls are no-ops.
    pub fn unmount(&mut self) {
        if let Some(layout) = self.layout.take() {
            layout.unmount();
        }
    }

    #[wasm_bindgen(js_name = isSidebarOpen)]
    pub fn is_sidebar_open(&self) -> bool {
        self.layout
            .as_ref()
            .is_some_and(|layout| layout.is_sidebar_open(&self.host))
    }

    /// Unknown severities fall back to `info`.
    pub fn show(&mut self, message: &str, severity: &str, duration: Option<i32>) -> Option<Element> {
        let severity = Severity::parse_or_info(severity);
        let duration = duration.map_or(
            medical_dashboard_core::ui::notification::DEFAULT_DURATION_MS,
            i64::from,
        );
        self.notifier
            .show(&mut self.host, &mut self.timers, message, severity, duration)
            .map(|notification| notification.element)
    }

    pub fn success(&mut self, message: &str) -> Option<Element> {
        self.notifier
            .success(&mut self.host, &mut self.timers, message)
            .map(|notification| notification.element)
    }

    pub fn error(&mut self, message: &str) -> Option<Element> {
        self.notifier
            .error(&mut self.host, &mut self.timers, message)
            .map(|notification| notification.element)
    }

    pub fn info(&mut self, message: &str) -> Option<Element> {
        self.notifier
            .info(&mut self.host, &mut self.timers, message)
            .map(|notification| notification.element)
    }

    pub fn warning(&mut self, message: &str) -> Option<Element> {
        self.notifier
            .warning(&mut self.host, &mut self.timers, message)
            .map(|notification| notification.element)
    }

    #[wasm_bindgen(js_name = validateForm)]
    pub fn validate_form(&mut self, form_id: &str) -> bool {
        validate(&mut self.host, form_id)
    }

    #[wasm_bindgen(js_name = createRiskTrendChart)]
    pub fn create_risk_trend_chart(&mut self, canvas_id: &str, data: JsValue) -> Result<Chart, JsValue> {
        let data = parse_data(data)?;
        charts::create_risk_trend_chart(&mut self.charts, canvas_id, &data)
            .map_err(|error| chart_error(&error))
    }

    /// `chart_type` defaults to `line`.
    #[wasm_bindgen(js_name = createVitalSignsChart)]
    pub fn create_vital_signs_chart(
        &mut self,
        canvas_id: &str,
        data: JsValue,
        chart_type: Option<String>,
    ) -> Result<Chart, JsValue> {
        let data = parse_data(data)?;
        let kind = ChartKind::from_name(chart_type.as_deref()).ok_or_else(|| {
            JsError::new(&format!("unsupported chart type `{}`", chart_type.unwrap_or_default()))
        })?;
        charts::create_vital_signs_chart(&mut self.charts, canvas_id, &data, kind)
            .map_err(|error| chart_error(&error))
    }

    /// `series` is `{ labels, values }` and `color` a palette entry
    /// `{ red, green, blue, alpha }`; the border is the fill made opaque.
    #[wasm_bindgen(js_name = createBarChart)]
    pub fn create_bar_chart(
        &mut self,
        canvas_id: &str,
        series: JsValue,
        label: &str,
        color: JsValue,
    ) -> Result<Chart, JsValue> {
        let series: BarSeries = serde_wasm_bindgen::from_value(series)
            .map_err(|error| JsError::new(&format!("invalid bar series: {error}")))?;
        let color: Rgba = serde_wasm_bindgen::from_value(color)
            .map_err(|error| JsError::new(&format!("invalid color: {error}")))?;
        charts::create_bar_chart(&mut self.charts, canvas_id, &series, label, color)
            .map_err(|error| chart_error(&error))
    }

    /// Reads the JSON embedded in `<script type="application/json" id=...>`
    /// and draws every chart whose canvas is on the page.
    #[wasm_bindgen(js_name = renderEmbeddedCharts)]
    pub fn render_embedded_charts(&mut self, data_element_id: &str) -> Result<u32, JsValue> {
        let Some(text) = self
            .host
            .document()
            .get_element_by_id(data_element_id)
            .and_then(|element| element.text_content())
        else {
            return Ok(0);
        };
        let data: DashboardData = serde_json::from_str(&text)
            .map_err(|error| JsError::new(&format!("invalid embedded data: {error}")))?;
        self.render_page_charts(&data)
    }

    /// Fills the page charts with synthetic data.
    #[wasm_bindgen(js_name = renderDemoCharts)]
    pub fn render_demo_charts(&mut self, weeks: Option<u32>) -> Result<u32, JsValue> {
        let weeks = weeks.map_or(charts::DEFAULT_WEEKS, |weeks| weeks as usize);
        let data = charts::generate_demo_data(weeks);
        self.render_page_charts(&data)
    }
}

impl Dashboard {
    fn render_page_charts(&mut self, data: &DashboardData) -> Result<u32, JsValue> {
        let handles = charts::render_dashboard(&mut self.charts, data)
            .map_err(|error| chart_error(&error))?;
        Ok(u32::try_from(handles.len()).unwrap_or(u32::MAX))
    }
}

#[wasm_bindgen(js_name = generateDemoData)]
pub fn generate_demo_data(weeks: Option<u32>) -> Result<JsValue, JsValue> {
    let weeks = weeks.map_or(charts::DEFAULT_WEEKS, |weeks| weeks as usize);
    to_js(&charts::generate_demo_data(weeks))
}

#[wasm_bindgen]
pub fn colors() -> Result<JsValue, JsValue> {
    to_js(&charts::colors())
}

/// Standalone form check for pages that do not mount a dashboard.
#[wasm_bindgen(js_name = validateForm)]
pub fn validate_form(form_id: &str) -> bool {
    match WebDocument::new() {
        Ok(mut host) => validate(&mut host, form_id),
        Err(error) => {
            web_sys::console::error_1(&describe(&error).into());
            true
        }
    }
}
