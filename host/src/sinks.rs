//! Terminal implementations of the navigation and notification capabilities.

use portal_core::{Navigator, Notification, NotificationLevel, Notifier};

/// Prints notifications to stdout and keeps them for the exit status.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    shown: Vec<Notification>,
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records without printing.
    pub fn quiet() -> Self {
        Self {
            shown: Vec::new(),
            quiet: true,
        }
    }

    pub fn shown(&self) -> &[Notification] {
        &self.shown
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => tracing::info!(message = %notification.message, "notification"),
            NotificationLevel::Error => tracing::warn!(message = %notification.message, "notification"),
        }
        if !self.quiet {
            let mark = match notification.level {
                NotificationLevel::Success => "ok",
                NotificationLevel::Error => "error",
            };
            println!("[{mark}] {}", notification.message);
        }
        self.shown.push(notification);
    }
}

/// Tracks the route the form asked to show next.
#[derive(Debug, Default)]
pub struct RouteNavigator {
    history: Vec<String>,
}

impl RouteNavigator {
    pub fn current(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }
}

impl Navigator for RouteNavigator {
    fn navigate(&mut self, route: &str) {
        tracing::debug!(route, "navigate");
        self.history.push(route.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifier_keeps_history() {
        let mut notifier = ConsoleNotifier::quiet();
        notifier.notify(Notification::error("first"));
        notifier.notify(Notification::success("second"));
        assert_eq!(
            notifier.shown(),
            &[Notification::error("first"), Notification::success("second")]
        );
    }

    #[test]
    fn navigator_reports_latest_route() {
        let mut navigator = RouteNavigator::default();
        assert!(navigator.current().is_none());
        navigator.navigate("/a");
        navigator.navigate("/b");
        assert_eq!(navigator.current(), Some("/b"));
    }
}
