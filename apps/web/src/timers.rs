use std::time::Duration;

use medical_dashboard_core::ui::{dismiss, Scheduler};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::dom::WebDocument;

/// `setTimeout`-backed dismissals. No handle is kept, so timers run to
/// completion even if the element was closed by hand.
#[derive(Debug, Clone)]
pub struct BrowserTimers {
    host: WebDocument,
}

impl BrowserTimers {
    pub const fn new(host: WebDocument) -> Self {
        Self { host }
    }
}

impl Scheduler<Element> for BrowserTimers {
    fn schedule_dismissal(&mut self, delay: Duration, element: Element) {
        let mut host = self.host.clone();
        let callback = Closure::once_into_js(move || {
            dismiss(&mut host, &element);
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        if let Err(error) = self
            .host
            .window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                millis,
            )
        {
            web_sys::console::error_2(&"Failed to schedule dismissal".into(), &error);
        }
    }
}
