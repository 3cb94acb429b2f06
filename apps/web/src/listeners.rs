use std::cell::RefCell;
use std::rc::Rc;

use medical_dashboard_core::ui::{Bindings, LayoutController};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{BeforeUnloadEvent, Element, Event, EventTarget};

use crate::dom::WebDocument;
use crate::timers::BrowserTimers;

/// An attached event listener, removed again when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// The layout controller of the current page together with its listeners.
pub struct MountedLayout {
    controller: Rc<RefCell<LayoutController<Element>>>,
    listeners: Vec<Listener>,
}

impl MountedLayout {
    pub fn mount(host: &WebDocument) -> Result<Self, JsValue> {
        let mut page = host.clone();
        let mut timers = BrowserTimers::new(host.clone());
        let (controller, bindings) = LayoutController::mount(&mut page, &mut timers);
        let controller = Rc::new(RefCell::new(controller));
        let listeners = attach(host, &controller, bindings)?;

        Ok(Self {
            controller,
            listeners,
        })
    }

    pub fn is_sidebar_open(&self, host: &WebDocument) -> bool {
        self.controller.borrow().is_sidebar_open(host)
    }

    /// Detaches every listener registered by [`MountedLayout::mount`].
    pub fn unmount(mut self) {
        self.controller.borrow_mut().unmount();
        self.listeners.clear();
    }
}

fn attach(
    host: &WebDocument,
    controller: &Rc<RefCell<LayoutController<Element>>>,
    bindings: Bindings<Element>,
) -> Result<Vec<Listener>, JsValue> {
    let mut listeners = Vec::new();

    if let Some(toggle) = bindings.toggle {
        let controller = controller.clone();
        let mut page = host.clone();
        listeners.push(Listener::attach(toggle.into(), "click", move |_| {
            controller.borrow_mut().on_toggle(&mut page);
        })?);
    }

    if bindings.document_click {
        let controller = controller.clone();
        let mut page = host.clone();
        listeners.push(Listener::attach(
            host.document().clone().into(),
            "click",
            move |event| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok())
                else {
                    return;
                };
                controller.borrow_mut().on_document_click(&mut page, &target);
            },
        )?);
    }

    if bindings.before_unload {
        let controller = controller.clone();
        let page = host.clone();
        listeners.push(Listener::attach(
            host.window().clone().into(),
            "beforeunload",
            move |event| {
                if controller.borrow().on_before_unload(&page) {
                    event.prevent_default();
                    if let Some(event) = event.dyn_ref::<BeforeUnloadEvent>() {
                        event.set_return_value("");
                    }
                }
            },
        )?);
    }

    Ok(listeners)
}
