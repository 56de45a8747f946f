//! Session bootstrap, sign-in, and sign-up flows.
//!
//! Each flow is a sequence of awaited provider and directory calls ending
//! in at most one navigation. Flows never run concurrently on one page;
//! see [`crate::pages`].

mod bootstrap;
mod sign_in;
mod sign_up;

pub use bootstrap::BootstrapOutcome;
pub use sign_up::{RoleAssignmentStatus, SignUpOutcome};

use std::sync::Arc;

use tailorpro_core::config::SiteConfig;
use tailorpro_core::{Config, RoleAssignment};

use crate::traits::{AuthProvider, Navigator, Notice, Notifier, RoleDirectory};

/// The collaborators and settings shared by every flow.
pub struct AuthFlows {
    provider: Arc<dyn AuthProvider>,
    directory: Arc<dyn RoleDirectory>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    site: SiteConfig,
    role_assignment: RoleAssignment,
}

impl AuthFlows {
    /// Create the flows over a set of collaborators.
    #[must_use]
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        directory: Arc<dyn RoleDirectory>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        config: &Config,
    ) -> Self {
        Self {
            provider,
            directory,
            navigator,
            notifier,
            site: config.site.clone(),
            role_assignment: config.signup.role_assignment,
        }
    }

    /// Show a failure through the notification channel.
    pub fn report_failure(&self, err: &crate::FlowError) {
        self.notifier.show(Notice::error(err.to_string()));
    }

    /// Best-effort sign-out; failures are logged and otherwise ignored.
    async fn discard_session(&self) {
        if let Err(e) = self.provider.sign_out().await {
            tracing::warn!(error = %e, "Sign-out failed");
        }
    }
}

impl std::fmt::Debug for AuthFlows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthFlows")
            .field("site", &self.site)
            .field("role_assignment", &self.role_assignment)
            .finish_non_exhaustive()
    }
}
