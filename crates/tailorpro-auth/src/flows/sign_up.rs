//! Self-registration for customers and staff.

use tailorpro_core::{
    RegistrationProfile, RoleAssignment, RouteTarget, SignUpChannel, UserId,
    validate_registration,
};

use super::AuthFlows;
use crate::error::{DirectoryError, FlowError};
use crate::traits::{NavigateOptions, Notice};

const SUCCESS_TITLE: &str = "Registration successful!";
const SUCCESS_BODY: &str = "Please check your email to verify your account.";
const WARNING_TITLE: &str = "Registration incomplete";
const WARNING_BODY: &str = "Your account was created but its role could not be recorded. \
     Please check your email, then contact the shop before signing in.";

/// What happened to the role record of a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleAssignmentStatus {
    /// Role record written.
    Assigned,
    /// Provider returned no identity; nothing to assign yet.
    NoIdentity,
    /// Role record insert failed.
    Failed(DirectoryError),
}

/// Result of a completed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    /// New identity, if the provider returned one.
    pub user_id: Option<UserId>,
    /// Area the user was sent to.
    pub target: RouteTarget,
    /// Role record status.
    pub role: RoleAssignmentStatus,
}

impl AuthFlows {
    /// Register an account through a sign-up channel.
    ///
    /// The channel is the authority for the new account's role: the role
    /// record is written directly, without a gate check. The redirect to the
    /// channel's area is optimistic; the account may still await email
    /// verification.
    ///
    /// # Errors
    ///
    /// - `FlowError::Validation` if the profile is malformed (no provider call)
    /// - `FlowError::Auth` if the provider rejects the registration
    /// - `FlowError::RoleAssignment` if the role insert fails under the strict policy
    pub async fn sign_up(
        &self,
        profile: &RegistrationProfile,
        channel: SignUpChannel,
    ) -> Result<SignUpOutcome, FlowError> {
        validate_registration(profile)?;

        let target = channel.route_target();
        let redirect_to = self.site.url_for(target);

        tracing::debug!(channel = %channel, redirect_to = %redirect_to, "Registering account");
        let user_id = self.provider.sign_up(profile, &redirect_to).await?;

        let role = match &user_id {
            Some(id) => match self.directory.insert_role(id, channel.assigned_role()).await {
                Ok(()) => RoleAssignmentStatus::Assigned,
                Err(e) => {
                    tracing::warn!(user_id = %id, error = %e, "Role record insert failed");
                    RoleAssignmentStatus::Failed(e)
                }
            },
            None => RoleAssignmentStatus::NoIdentity,
        };

        match (&role, self.role_assignment) {
            (RoleAssignmentStatus::Failed(e), RoleAssignment::Strict) => {
                return Err(FlowError::RoleAssignment(e.clone()));
            }
            (RoleAssignmentStatus::Failed(_), RoleAssignment::Warn) => {
                self.notifier.show(Notice::warning(WARNING_TITLE, WARNING_BODY));
            }
            _ => self.notifier.show(Notice::success(SUCCESS_TITLE, SUCCESS_BODY)),
        }

        tracing::info!(channel = %channel, target = %target, "Registration complete");
        self.navigator.go_to(target, NavigateOptions::PUSH);

        Ok(SignUpOutcome {
            user_id,
            target,
            role,
        })
    }
}
