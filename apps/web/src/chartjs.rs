use medical_dashboard_core::charts::{ChartConfiguration, ChartError, ChartSurface};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

#[wasm_bindgen]
extern "C" {
    /// Chart.js, loaded as a global script
    #[derive(Debug, Clone)]
    pub type Chart;

    #[wasm_bindgen(constructor, catch)]
    fn new(context: &CanvasRenderingContext2d, config: &JsValue) -> Result<Chart, JsValue>;
}

/// Draws configurations onto `<canvas>` elements of the page with Chart.js.
#[derive(Debug, Clone)]
pub struct ChartJsSurface {
    document: web_sys::Document,
}

impl ChartJsSurface {
    pub const fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

/// Maps become plain objects, which is what Chart.js reads options from.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.serialize(&serializer).map_err(JsValue::from)
}

impl ChartSurface for ChartJsSurface {
    type Canvas = CanvasRenderingContext2d;
    type Handle = Chart;

    fn canvas(&mut self, canvas_id: &str) -> Option<CanvasRenderingContext2d> {
        self.document
            .get_element_by_id(canvas_id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()
    }

    fn instantiate(
        &mut self,
        canvas: CanvasRenderingContext2d,
        config: ChartConfiguration,
    ) -> Result<Chart, ChartError> {
        let config = to_js(&config).map_err(|error| ChartError::Instantiate(describe(&error)))?;
        Chart::new(&canvas, &config).map_err(|error| ChartError::Instantiate(describe(&error)))
    }
}

pub fn describe(error: &JsValue) -> String {
    error
        .as_string()
        .or_else(|| {
            error
                .dyn_ref::<js_sys::Error>()
                .map(|error| String::from(error.message()))
        })
        .unwrap_or_else(|| format!("{error:?}"))
}
