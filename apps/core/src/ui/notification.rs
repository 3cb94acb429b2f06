use std::time::Duration;

use super::dom::{Banner, Scheduler, UiToolkit};
use crate::domain::Severity;

pub const DEFAULT_DURATION_MS: i64 = 5000;

/// A banner that was put on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification<E> {
    pub element: E,
    pub severity: Severity,
    /// `None` for a banner that stays until closed by hand
    pub auto_dismiss: Option<Duration>,
}

/// Shows transient banners. Concurrent banners are not stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notifier {
    default_duration_ms: i64,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub const fn new() -> Self {
        Self {
            default_duration_ms: DEFAULT_DURATION_MS,
        }
    }

    pub const fn with_default_duration(duration_ms: i64) -> Self {
        Self {
            default_duration_ms: duration_ms,
        }
    }

    /// Appends a banner; a positive `duration_ms` schedules its dismissal.
    pub fn show<H, S>(
        &self,
        host: &mut H,
        timers: &mut S,
        message: &str,
        severity: Severity,
        duration_ms: i64,
    ) -> Option<Notification<H::Element>>
    where
        H: UiToolkit,
        S: Scheduler<H::Element>,
    {
        let Some(element) = host.append_banner(&Banner::new(message, severity)) else {
            log::warn!("notification dropped, page has no body: {message}");
            return None;
        };

        let auto_dismiss = u64::try_from(duration_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);
        if let Some(delay) = auto_dismiss {
            timers.schedule_dismissal(delay, element.clone());
        }

        log::debug!(
            "{} notification shown ({duration_ms} ms): {message}",
            severity.label()
        );

        Some(Notification {
            element,
            severity,
            auto_dismiss,
        })
    }

    pub fn success<H, S>(
        &self,
        host: &mut H,
        timers: &mut S,
        message: &str,
    ) -> Option<Notification<H::Element>>
    where
        H: UiToolkit,
        S: Scheduler<H::Element>,
    {
        self.show(host, timers, message, Severity::Success, self.default_duration_ms)
    }

    pub fn error<H, S>(
        &self,
        host: &mut H,
        timers: &mut S,
        message: &str,
    ) -> Option<Notification<H::Element>>
    where
        H: UiToolkit,
        S: Scheduler<H::Element>,
    {
        self.show(host, timers, message, Severity::Error, self.default_duration_ms)
    }

    pub fn info<H, S>(
        &self,
        host: &mut H,
        timers: &mut S,
        message: &str,
    ) -> Option<Notification<H::Element>>
    where
        H: UiToolkit,
        S: Scheduler<H::Element>,
    {
        self.show(host, timers, message, Severity::Info, self.default_duration_ms)
    }

    pub fn warning<H, S>(
        &self,
        host: &mut H,
        timers: &mut S,
        message: &str,
    ) -> Option<Notification<H::Element>>
    where
        H: UiToolkit,
        S: Scheduler<H::Element>,
    {
        self.show(host, timers, message, Severity::Warning, self.default_duration_ms)
    }
}
