//! Collaborator traits consumed by the flows.

use async_trait::async_trait;

use tailorpro_core::{
    Credentials, RegistrationProfile, Role, RoleRecord, RouteTarget, Session, UserId,
};

use crate::error::{AuthError, DirectoryError, RoleLookupError};

/// Credential store and session owner.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Current session, if one exists.
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    /// Authenticate and establish a session.
    async fn sign_in(&self, credentials: &Credentials) -> Result<UserId, AuthError>;

    /// Create an account.
    ///
    /// `redirect_to` is the absolute URL placed in the verification email.
    /// Providers that defer identity creation return `None`.
    async fn sign_up(
        &self,
        profile: &RegistrationProfile,
        redirect_to: &str,
    ) -> Result<Option<UserId>, AuthError>;

    /// Discard the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Role records keyed by user identity.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// The single role record of an identity.
    async fn get_role(&self, user_id: &UserId) -> Result<RoleRecord, RoleLookupError>;

    /// Create the role record of a new identity.
    async fn insert_role(&self, user_id: &UserId, role: Role) -> Result<(), DirectoryError>;
}

/// Navigation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace_history: bool,
}

impl NavigateOptions {
    /// Push a new history entry.
    pub const PUSH: Self = Self {
        replace_history: false,
    };

    /// Replace the current history entry.
    pub const REPLACE: Self = Self {
        replace_history: true,
    };
}

/// Moves the user to an application area.
pub trait Navigator: Send + Sync {
    /// Navigate to a target.
    fn go_to(&self, target: RouteTarget, options: NavigateOptions);
}

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Plain success message.
    Success,
    /// Completed with a caveat.
    Warning,
    /// Failure.
    Destructive,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Short title.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Presentation.
    pub severity: Severity,
}

impl Notice {
    /// Error notice with the standard title.
    #[must_use]
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    /// Success notice.
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Success,
        }
    }

    /// Warning notice.
    #[must_use]
    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Warning,
        }
    }
}

/// Shows notices to the user.
pub trait Notifier: Send + Sync {
    /// Display a notice.
    fn show(&self, notice: Notice);
}
