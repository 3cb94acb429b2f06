use medical_dashboard_core::ui::{Banner, Document, Selector, UiToolkit};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, NodeList,
    Window,
};

/// The live page, seen through the dashboard's document boundary.
#[derive(Debug, Clone)]
pub struct WebDocument {
    window: Window,
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self { window, document })
    }

    pub const fn window(&self) -> &Window {
        &self.window
    }

    pub const fn document(&self) -> &web_sys::Document {
        &self.document
    }
}

fn elements(list: Result<NodeList, JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|index| list.get(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

// Bootstrap is loaded as a global; a missing library leaves `None`.
fn bootstrap_component(name: &str) -> Option<JsValue> {
    let bootstrap = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("bootstrap")).ok()?;
    if bootstrap.is_undefined() {
        return None;
    }
    js_sys::Reflect::get(&bootstrap, &JsValue::from_str(name))
        .ok()
        .filter(|component| !component.is_undefined())
}

fn component_instance(name: &str, element: &Element) -> Result<JsValue, JsValue> {
    let component =
        bootstrap_component(name).ok_or_else(|| JsValue::from_str("bootstrap is not loaded"))?;
    let factory: js_sys::Function =
        js_sys::Reflect::get(&component, &JsValue::from_str("getOrCreateInstance"))?
            .dyn_into()?;
    factory.call1(&component, element)
}

impl Document for WebDocument {
    type Element = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn select_all(&self, selector: &Selector<'_>) -> Vec<Element> {
        elements(self.document.query_selector_all(&selector.css()))
    }

    fn select_within(&self, root: &Element, selector: &Selector<'_>) -> Vec<Element> {
        elements(root.query_selector_all(&selector.css()))
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn add_class(&mut self, element: &Element, class: &str) {
        let _ = element.class_list().add_1(class);
    }

    fn remove_class(&mut self, element: &Element, class: &str) {
        let _ = element.class_list().remove_1(class);
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn value(&self, element: &Element) -> Option<String> {
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            return Some(area.value());
        }
        element.dyn_ref::<HtmlSelectElement>().map(HtmlSelectElement::value)
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn is_connected(&self, element: &Element) -> bool {
        element.is_connected()
    }

    fn check_validity(&self, form: &Element) -> bool {
        form.dyn_ref::<HtmlFormElement>()
            .map_or(true, HtmlFormElement::check_validity)
    }

    fn viewport_width(&self) -> u32 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .map_or(0, |width| width.max(0.0) as u32)
    }

    fn current_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn append_banner(&mut self, banner: &Banner) -> Option<Element> {
        let element = self.document.create_element("div").ok()?;
        element.set_class_name(&banner.class_name());
        let _ = element.set_attribute("role", "alert");
        let _ = element.set_attribute("style", Banner::STYLE);
        element.set_text_content(Some(&banner.message));

        if let Ok(close) = self.document.create_element("button") {
            close.set_class_name("btn-close");
            let _ = close.set_attribute("type", "button");
            let _ = close.set_attribute("data-bs-dismiss", "alert");
            let _ = close.set_attribute("aria-label", "Close");
            let _ = element.append_child(&close);
        }

        self.document.body()?.append_child(&element).ok()?;
        Some(element)
    }
}

impl UiToolkit for WebDocument {
    fn init_tooltip(&mut self, element: &Element) {
        let _ = component_instance("Tooltip", element);
    }

    fn close_alert(&mut self, element: &Element) {
        let closed = component_instance("Alert", element).and_then(|alert| {
            let close: js_sys::Function =
                js_sys::Reflect::get(&alert, &JsValue::from_str("close"))?.dyn_into()?;
            close.call0(&alert)
        });
        if closed.is_err() {
            element.remove();
        }
    }
}
