use std::time::Duration;

use super::dom::{Scheduler, Selector, UiToolkit};
use super::forms::has_unsaved_changes;

pub const SIDEBAR_ID: &str = "sidebar";
pub const SIDEBAR_TOGGLE_ID: &str = "sidebarToggle";
pub const OPEN_CLASS: &str = "show";
pub const ACTIVE_CLASS: &str = "active";
pub const NAV_LINK_CLASS: &str = "nav-link";
pub const ALERT_CLASS: &str = "alert";
pub const PERMANENT_ALERT_CLASS: &str = "alert-permanent";
/// Viewports narrower than this close the sidebar on outside clicks.
pub const MOBILE_BREAKPOINT: u32 = 768;
pub const ALERT_DISMISS_DELAY: Duration = Duration::from_millis(5000);

const TOOLTIP_TRIGGER: Selector<'static> = Selector::Attribute {
    name: "data-bs-toggle",
    value: Some("tooltip"),
};

/// Listeners the host attaches on mount and detaches on unmount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings<E> {
    /// Click on this element calls [`LayoutController::on_toggle`]
    pub toggle: Option<E>,
    /// Document-wide click calls [`LayoutController::on_document_click`]
    pub document_click: bool,
    /// `beforeunload` calls [`LayoutController::on_before_unload`]
    pub before_unload: bool,
}

/// Per-page chrome state: sidebar, navigation highlight, tooltips, alerts.
#[derive(Debug, Clone)]
pub struct LayoutController<E> {
    sidebar: Option<E>,
    toggle: Option<E>,
    mounted: bool,
}

impl<E: Clone + PartialEq> LayoutController<E> {
    /// Runs the page-load initialisation and returns the controller together
    /// with the listeners the host must attach.
    pub fn mount<H, S>(host: &mut H, timers: &mut S) -> (Self, Bindings<E>)
    where
        H: UiToolkit<Element = E>,
        S: Scheduler<E>,
    {
        let sidebar = host.element_by_id(SIDEBAR_ID);
        let toggle = host.element_by_id(SIDEBAR_TOGGLE_ID);

        for element in host.select_all(&TOOLTIP_TRIGGER) {
            host.init_tooltip(&element);
        }

        let mut scheduled = 0_usize;
        for alert in host.select_all(&Selector::Class(ALERT_CLASS)) {
            if !host.has_class(&alert, PERMANENT_ALERT_CLASS) {
                timers.schedule_dismissal(ALERT_DISMISS_DELAY, alert);
                scheduled += 1;
            }
        }

        highlight_navigation(host);

        log::debug!(
            "layout mounted (sidebar: {}, toggle: {}, alerts scheduled: {scheduled})",
            sidebar.is_some(),
            toggle.is_some()
        );

        let bindings = Bindings {
            toggle: toggle.clone().filter(|_| sidebar.is_some()),
            document_click: sidebar.is_some(),
            before_unload: true,
        };

        (
            Self {
                sidebar,
                toggle,
                mounted: true,
            },
            bindings,
        )
    }

    /// Stops reacting to events; the host detaches its listeners.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn is_sidebar_open<H: UiToolkit<Element = E>>(&self, host: &H) -> bool {
        self.sidebar
            .as_ref()
            .is_some_and(|sidebar| host.has_class(sidebar, OPEN_CLASS))
    }

    /// Flips the sidebar and returns whether it is now open.
    pub fn on_toggle<H: UiToolkit<Element = E>>(&mut self, host: &mut H) -> bool {
        if !self.mounted {
            return self.is_sidebar_open(host);
        }
        let Some(sidebar) = self.sidebar.as_ref() else {
            return false;
        };

        if host.has_class(sidebar, OPEN_CLASS) {
            host.remove_class(sidebar, OPEN_CLASS);
            false
        } else {
            host.add_class(sidebar, OPEN_CLASS);
            true
        }
    }

    /// Closes an open sidebar on narrow viewports when the click landed
    /// outside both the sidebar and its toggle. Returns whether it closed.
    pub fn on_document_click<H: UiToolkit<Element = E>>(&mut self, host: &mut H, target: &E) -> bool {
        if !self.mounted || host.viewport_width() >= MOBILE_BREAKPOINT {
            return false;
        }
        let Some(sidebar) = self.sidebar.as_ref() else {
            return false;
        };
        if !host.has_class(sidebar, OPEN_CLASS) || host.contains(sidebar, target) {
            return false;
        }
        if let Some(toggle) = self.toggle.as_ref() {
            if host.contains(toggle, target) {
                return false;
            }
        }

        host.remove_class(sidebar, OPEN_CLASS);
        true
    }

    /// Whether leaving the page should be interrupted.
    pub fn on_before_unload<H: UiToolkit<Element = E>>(&self, host: &H) -> bool {
        self.mounted && has_unsaved_changes(host)
    }
}

/// Marks the nav link whose target occurs in the current path; only `#`
/// links are exempt, so an empty `href` matches every path.
pub fn highlight_navigation<H: UiToolkit>(host: &mut H) {
    let path = host.current_path();
    for link in host.select_all(&Selector::Class(NAV_LINK_CLASS)) {
        let active = host
            .attribute(&link, "href")
            .is_some_and(|href| href != "#" && path.contains(href.as_str()));
        if active {
            host.add_class(&link, ACTIVE_CLASS);
        } else {
            host.remove_class(&link, ACTIVE_CLASS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::forms::VALIDATED_CLASS;
    use crate::ui::{dismiss, Document, MemoryDocument, NodeId, TimerQueue};

    struct Page {
        doc: MemoryDocument,
        sidebar: NodeId,
        toggle: NodeId,
        toggle_icon: NodeId,
        sidebar_link: NodeId,
        content: NodeId,
    }

    fn page(width: u32) -> Page {
        let mut doc = MemoryDocument::new(width, "/patients/123");
        let body = doc.body();
        let toggle = doc.append(body, "button");
        doc.set_id(toggle, SIDEBAR_TOGGLE_ID);
        let toggle_icon = doc.append(toggle, "i");
        let sidebar = doc.append(body, "nav");
        doc.set_id(sidebar, SIDEBAR_ID);
        let sidebar_link = doc.append(sidebar, "a");
        let content = doc.append(body, "main");
        Page {
            doc,
            sidebar,
            toggle,
            toggle_icon,
            sidebar_link,
            content,
        }
    }

    fn mount(doc: &mut MemoryDocument) -> (LayoutController<NodeId>, Bindings<NodeId>, TimerQueue<NodeId>) {
        let mut timers = TimerQueue::new();
        let (controller, bindings) = LayoutController::mount(doc, &mut timers);
        (controller, bindings, timers)
    }

    #[test]
    fn toggle_flips_the_open_class() {
        let mut page = page(1280);
        let (mut controller, bindings, _) = mount(&mut page.doc);

        assert_eq!(bindings.toggle, Some(page.toggle));
        assert!(controller.on_toggle(&mut page.doc));
        assert!(page.doc.has_class(&page.sidebar, OPEN_CLASS));
        assert!(!controller.on_toggle(&mut page.doc));
        assert!(!page.doc.has_class(&page.sidebar, OPEN_CLASS));
    }

    #[test]
    fn outside_click_closes_sidebar_on_narrow_viewport() {
        let mut page = page(500);
        let (mut controller, _, _) = mount(&mut page.doc);
        controller.on_toggle(&mut page.doc);

        assert!(controller.on_document_click(&mut page.doc, &page.content));
        assert!(!page.doc.has_class(&page.sidebar, OPEN_CLASS));
    }

    #[test]
    fn clicks_inside_sidebar_or_toggle_keep_it_open() {
        let mut page = page(500);
        let (mut controller, _, _) = mount(&mut page.doc);
        controller.on_toggle(&mut page.doc);

        assert!(!controller.on_document_click(&mut page.doc, &page.sidebar_link));
        assert!(!controller.on_document_click(&mut page.doc, &page.toggle));
        assert!(!controller.on_document_click(&mut page.doc, &page.toggle_icon));
        assert!(controller.is_sidebar_open(&page.doc));
    }

    #[test]
    fn wide_viewport_ignores_outside_clicks() {
        let mut page = page(MOBILE_BREAKPOINT);
        let (mut controller, _, _) = mount(&mut page.doc);
        controller.on_toggle(&mut page.doc);

        assert!(!controller.on_document_click(&mut page.doc, &page.content));
        assert!(controller.is_sidebar_open(&page.doc));
    }

    #[test]
    fn missing_sidebar_skips_registration() {
        let mut doc = MemoryDocument::new(500, "/");
        let body = doc.body();
        let stray = doc.append(body, "div");
        let (mut controller, bindings, _) = mount(&mut doc);

        assert_eq!(bindings.toggle, None);
        assert!(!bindings.document_click);
        assert!(!controller.on_toggle(&mut doc));
        assert!(!controller.on_document_click(&mut doc, &stray));
    }

    #[test]
    fn unmounted_controller_ignores_events() {
        let mut page = page(500);
        let (mut controller, _, _) = mount(&mut page.doc);
        controller.unmount();

        assert!(!controller.on_toggle(&mut page.doc));
        assert!(!page.doc.has_class(&page.sidebar, OPEN_CLASS));
    }

    #[test]
    fn navigation_highlight_matches_path_substring() {
        let mut doc = MemoryDocument::new(1280, "/patients/123");
        let body = doc.body();
        let patients = doc.append(body, "a");
        doc.add_class(&patients, NAV_LINK_CLASS);
        doc.set_attribute(patients, "href", "/patients");
        let hash = doc.append(body, "a");
        doc.add_class(&hash, NAV_LINK_CLASS);
        doc.add_class(&hash, ACTIVE_CLASS);
        doc.set_attribute(hash, "href", "#");
        let settings = doc.append(body, "a");
        doc.add_class(&settings, NAV_LINK_CLASS);
        doc.add_class(&settings, ACTIVE_CLASS);
        doc.set_attribute(settings, "href", "/settings");

        mount(&mut doc);

        assert!(doc.has_class(&patients, ACTIVE_CLASS));
        assert!(!doc.has_class(&hash, ACTIVE_CLASS));
        assert!(!doc.has_class(&settings, ACTIVE_CLASS));

        for path in ["#", "/#", "/patients#", ""] {
            doc.set_path(path);
            highlight_navigation(&mut doc);
            assert!(!doc.has_class(&hash, ACTIVE_CLASS), "path {path:?}");
        }
    }

    #[test]
    fn empty_href_is_a_substring_of_every_path() {
        let mut doc = MemoryDocument::new(1280, "/dashboard");
        let body = doc.body();
        let home = doc.append(body, "a");
        doc.add_class(&home, NAV_LINK_CLASS);
        doc.set_attribute(home, "href", "");
        let bare = doc.append(body, "a");
        doc.add_class(&bare, NAV_LINK_CLASS);

        mount(&mut doc);

        assert!(doc.has_class(&home, ACTIVE_CLASS));
        assert!(!doc.has_class(&bare, ACTIVE_CLASS));
    }

    #[test]
    fn tooltips_are_initialised_per_trigger() {
        let mut doc = MemoryDocument::new(1280, "/");
        let body = doc.body();
        let with_tip = doc.append(body, "span");
        doc.set_attribute(with_tip, "data-bs-toggle", "tooltip");
        let dropdown = doc.append(body, "span");
        doc.set_attribute(dropdown, "data-bs-toggle", "dropdown");

        mount(&mut doc);

        assert!(doc.has_tooltip(with_tip));
        assert!(!doc.has_tooltip(dropdown));
    }

    #[test]
    fn transient_alerts_are_dismissed_after_delay() {
        let mut doc = MemoryDocument::new(1280, "/");
        let body = doc.body();
        let flash = doc.append(body, "div");
        doc.add_class(&flash, ALERT_CLASS);
        let permanent = doc.append(body, "div");
        doc.add_class(&permanent, ALERT_CLASS);
        doc.add_class(&permanent, PERMANENT_ALERT_CLASS);

        let (_, _, mut timers) = mount(&mut doc);
        assert_eq!(timers.pending(), 1);

        for element in timers.advance(ALERT_DISMISS_DELAY) {
            dismiss(&mut doc, &element);
        }
        assert!(!doc.is_connected(&flash));
        assert!(doc.is_connected(&permanent));
    }

    #[test]
    fn unload_guard_follows_form_heuristic() {
        let mut doc = MemoryDocument::new(1280, "/add-patient");
        let body = doc.body();
        let form = doc.append(body, "form");
        let input = doc.append(form, "input");
        doc.set_value(input, "555-0100");
        let (controller, bindings, _) = mount(&mut doc);

        assert!(bindings.before_unload);
        assert!(!controller.on_before_unload(&doc));
        doc.add_class(&form, VALIDATED_CLASS);
        assert!(controller.on_before_unload(&doc));
    }
}
