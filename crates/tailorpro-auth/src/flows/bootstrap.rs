//! Silent redirect for users who already have a session.

use tailorpro_core::RouteTarget;

use super::AuthFlows;
use crate::traits::NavigateOptions;

/// Result of the session check run before the login form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No session; show the form.
    Unauthenticated,
    /// Session with a known role; the user was sent away.
    Redirected(RouteTarget),
    /// Session exists but no usable role was found; show the form.
    NoRecognizedRole,
}

impl AuthFlows {
    /// Check for an existing session and redirect it to its area.
    ///
    /// Redirects replace the current history entry so the user cannot
    /// navigate back to the login screen. Lookup failures leave the user on
    /// the login surface rather than surfacing an error.
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        let session = match self.provider.get_session().await {
            Ok(Some(session)) => session,
            Ok(None) => return BootstrapOutcome::Unauthenticated,
            Err(e) => {
                tracing::warn!(error = %e, "Session check failed; treating as signed out");
                return BootstrapOutcome::Unauthenticated;
            }
        };

        match self.directory.get_role(&session.user_id).await {
            Ok(record) => {
                let target = record.role.route_target();
                tracing::info!(
                    user_id = %session.user_id,
                    role = %record.role,
                    target = %target,
                    "Restoring session"
                );
                self.navigator.go_to(target, NavigateOptions::REPLACE);
                BootstrapOutcome::Redirected(target)
            }
            // Fail open: stay on the login form.
            Err(e) => {
                tracing::warn!(
                    user_id = %session.user_id,
                    error = %e,
                    "Session has no recognized role; staying on login"
                );
                BootstrapOutcome::NoRecognizedRole
            }
        }
    }
}
