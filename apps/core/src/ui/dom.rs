//! The document and UI-library boundary. The browser binding lives in the
//! web crate; `MemoryDocument` implements it for headless use and tests.

use std::fmt;
use std::time::Duration;

use crate::domain::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    Tag(&'a str),
    Class(&'a str),
    Attribute {
        name: &'a str,
        value: Option<&'a str>,
    },
}

impl Selector<'_> {
    /// CSS form of the selector
    pub fn css(&self) -> String {
        match self {
            Self::Tag(tag) => (*tag).to_string(),
            Self::Class(class) => format!(".{class}"),
            Self::Attribute { name, value: None } => format!("[{name}]"),
            Self::Attribute {
                name,
                value: Some(value),
            } => format!("[{name}=\"{value}\"]"),
        }
    }
}

impl fmt::Display for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

/// A banner about to be appended to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub severity: Severity,
}

impl Banner {
    /// Fixed to the top-right corner, above everything else.
    pub const STYLE: &'static str = "top: 20px; right: 20px; z-index: 9999; min-width: 300px;";

    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn classes(&self) -> [&'static str; 6] {
        [
            "alert",
            self.severity.alert_class(),
            "alert-dismissible",
            "fade",
            "show",
            "position-fixed",
        ]
    }

    pub fn class_name(&self) -> String {
        self.classes().join(" ")
    }
}

pub trait Document {
    type Element: Clone + PartialEq + fmt::Debug;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// All matching elements in document order
    fn select_all(&self, selector: &Selector<'_>) -> Vec<Self::Element>;

    /// Matching descendants of `root`
    fn select_within(&self, root: &Self::Element, selector: &Selector<'_>) -> Vec<Self::Element>;

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;
    fn add_class(&mut self, element: &Self::Element, class: &str);
    fn remove_class(&mut self, element: &Self::Element, class: &str);

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Current value of a form control
    fn value(&self, element: &Self::Element) -> Option<String>;

    /// Inclusive: an element contains itself.
    fn contains(&self, ancestor: &Self::Element, node: &Self::Element) -> bool;

    fn is_connected(&self, element: &Self::Element) -> bool;

    fn check_validity(&self, form: &Self::Element) -> bool;

    fn viewport_width(&self) -> u32;

    fn current_path(&self) -> String;

    /// Builds the banner with a close button and appends it to the body;
    /// `None` when the page has no body to attach to.
    fn append_banner(&mut self, banner: &Banner) -> Option<Self::Element>;
}

/// Tooltip and alert primitives of the UI library (Bootstrap in the browser).
pub trait UiToolkit: Document {
    /// Best-effort; failures are not reported.
    fn init_tooltip(&mut self, element: &Self::Element);

    fn close_alert(&mut self, element: &Self::Element);
}

/// Delayed dismissal. Scheduled timers cannot be cancelled.
pub trait Scheduler<E> {
    fn schedule_dismissal(&mut self, delay: Duration, element: E);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_render_as_css() {
        assert_eq!(Selector::Class("nav-link").css(), ".nav-link");
        assert_eq!(Selector::Tag("form").css(), "form");
        assert_eq!(
            Selector::Attribute {
                name: "data-bs-toggle",
                value: Some("tooltip")
            }
            .css(),
            "[data-bs-toggle=\"tooltip\"]"
        );
    }

    #[test]
    fn error_banners_use_danger_styling() {
        let banner = Banner::new("boom", Severity::Error);
        assert_eq!(
            banner.class_name(),
            "alert alert-danger alert-dismissible fade show position-fixed"
        );
    }
}
