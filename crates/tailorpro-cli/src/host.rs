//! Terminal implementations of the navigator and notifier.
//!
//! Both queue what they receive while a flow runs. The command prints the
//! queue with [`TerminalHost::flush`] once the spinner is cleared.

use std::sync::{Arc, Mutex, PoisonError};

use tailorpro_auth::{
    AuthFlows, LocalBackend, NavigateOptions, Navigator, Notice, Notifier, Severity,
};
use tailorpro_core::config::SiteConfig;
use tailorpro_core::{Config, RouteTarget};

use crate::ui;

/// Records the last navigation.
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    last: Mutex<Option<(RouteTarget, NavigateOptions)>>,
}

impl ConsoleNavigator {
    fn take(&self) -> Option<(RouteTarget, NavigateOptions)> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Navigator for ConsoleNavigator {
    fn go_to(&self, target: RouteTarget, options: NavigateOptions) {
        tracing::debug!(
            target = %target,
            replace = options.replace_history,
            "Navigation requested"
        );
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some((target, options));
    }
}

/// Queues notices for printing.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    pending: Mutex<Vec<Notice>>,
}

impl ConsoleNotifier {
    fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for ConsoleNotifier {
    fn show(&self, notice: Notice) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

/// Terminal collaborators for one command invocation.
#[derive(Debug)]
pub struct TerminalHost {
    navigator: Arc<ConsoleNavigator>,
    notifier: Arc<ConsoleNotifier>,
    site: SiteConfig,
}

impl TerminalHost {
    /// Create a host that prints URLs under the configured origin.
    pub fn new(config: &Config) -> Self {
        Self {
            navigator: Arc::new(ConsoleNavigator::default()),
            notifier: Arc::new(ConsoleNotifier::default()),
            site: config.site.clone(),
        }
    }

    /// Wire the local backend and this host into the auth flows.
    pub fn flows(&self, backend: &LocalBackend, config: &Config) -> Arc<AuthFlows> {
        Arc::new(AuthFlows::new(
            backend.provider.clone(),
            backend.directory.clone(),
            self.navigator.clone(),
            self.notifier.clone(),
            config,
        ))
    }

    /// Print queued notices, then the destination if one was requested.
    ///
    /// Returns the destination.
    pub fn flush(&self) -> Option<RouteTarget> {
        for notice in self.notifier.drain() {
            print_notice(&notice);
        }

        let (target, _) = self.navigator.take()?;
        ui::kv("Destination", target.title());
        ui::kv("URL", &self.site.url_for(target));
        Some(target)
    }
}

fn print_notice(notice: &Notice) {
    let line = if notice.severity == Severity::Destructive {
        notice.description.clone()
    } else {
        format!("{}: {}", notice.title, notice.description)
    };

    match notice.severity {
        Severity::Success => ui::success(&line),
        Severity::Warning => ui::warning(&line),
        Severity::Destructive => ui::error(&line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigator_keeps_last_destination() {
        let navigator = ConsoleNavigator::default();
        navigator.go_to(RouteTarget::CustomerPortal, NavigateOptions::PUSH);
        navigator.go_to(RouteTarget::AdminConsole, NavigateOptions::REPLACE);

        assert_eq!(
            navigator.take(),
            Some((RouteTarget::AdminConsole, NavigateOptions::REPLACE))
        );
        assert_eq!(navigator.take(), None);
    }

    #[test]
    fn test_notifier_drains_in_order() {
        let notifier = ConsoleNotifier::default();
        notifier.show(Notice::error("first"));
        notifier.show(Notice::warning("Heads up", "second"));

        let drained = notifier.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].description, "first");
        assert!(notifier.drain().is_empty());
    }
}
