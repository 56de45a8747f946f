//! Core types shared by the authentication flows.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a channel, role, or route name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: {value}")]
pub struct ParseError {
    /// What was being parsed ("channel", "role", ...).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Unique identifier for a user identity issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new user ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Server-recorded authorization level of a user identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Shop administrator.
    #[serde(rename = "admin")]
    Administrator,
    /// Shop staff member.
    Staff,
    /// Customer.
    Customer,
    /// Delivery driver.
    Deliverer,
}

impl Role {
    /// Every role, in tab order.
    pub const ALL: [Self; 4] = [
        Self::Administrator,
        Self::Staff,
        Self::Deliverer,
        Self::Customer,
    ];

    /// The area this role is entitled to reach.
    #[must_use]
    pub const fn route_target(self) -> RouteTarget {
        match self {
            Self::Administrator | Self::Staff => RouteTarget::AdminConsole,
            Self::Deliverer => RouteTarget::DeliveryConsole,
            Self::Customer => RouteTarget::CustomerPortal,
        }
    }

    /// Stored form of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "admin",
            Self::Staff => "staff",
            Self::Customer => "customer",
            Self::Deliverer => "deliverer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" | "administrator" => Ok(Self::Administrator),
            "staff" => Ok(Self::Staff),
            "customer" => Ok(Self::Customer),
            "deliverer" => Ok(Self::Deliverer),
            _ => Err(ParseError::new("role", s)),
        }
    }
}

/// Login surface the user selected, asserting an intended role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Administrator login tab.
    #[default]
    #[serde(rename = "admin")]
    Administrator,
    /// Staff login tab.
    Staff,
    /// Customer login tab.
    Customer,
    /// Deliverer login tab.
    Deliverer,
}

impl Channel {
    /// Every sign-in channel, in tab order.
    pub const ALL: [Self; 4] = [
        Self::Administrator,
        Self::Staff,
        Self::Deliverer,
        Self::Customer,
    ];

    /// The role a user must hold to sign in through this channel.
    #[must_use]
    pub const fn required_role(self) -> Role {
        match self {
            Self::Administrator => Role::Administrator,
            Self::Staff => Role::Staff,
            Self::Customer => Role::Customer,
            Self::Deliverer => Role::Deliverer,
        }
    }

    /// Message shown when a user with another role signs in here.
    #[must_use]
    pub const fn mismatch_message(self) -> &'static str {
        match self {
            Self::Administrator => "This login is for administrators only.",
            Self::Staff => "This login is for staff only. Please use the appropriate tab.",
            Self::Deliverer => {
                "This login is for deliverers only. Please use the appropriate tab."
            }
            Self::Customer => {
                "This login is for customers only. Please use the Staff tab for staff login."
            }
        }
    }

    /// Tab label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Administrator => "Admin",
            Self::Staff => "Staff",
            Self::Customer => "Customer",
            Self::Deliverer => "Deliverer",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.required_role().as_str())
    }
}

impl FromStr for Channel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" | "administrator" => Ok(Self::Administrator),
            "staff" => Ok(Self::Staff),
            "customer" => Ok(Self::Customer),
            "deliverer" => Ok(Self::Deliverer),
            _ => Err(ParseError::new("channel", s)),
        }
    }
}

/// Channels open to self-registration.
///
/// Administrator and deliverer accounts are provisioned by an operator and
/// cannot be created through sign-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignUpChannel {
    /// Customer registration tab.
    #[default]
    Customer,
    /// Staff registration tab.
    Staff,
}

impl SignUpChannel {
    /// Every sign-up channel, in tab order.
    pub const ALL: [Self; 2] = [Self::Customer, Self::Staff];

    /// Role assigned to an account created through this channel.
    #[must_use]
    pub const fn assigned_role(self) -> Role {
        match self {
            Self::Customer => Role::Customer,
            Self::Staff => Role::Staff,
        }
    }

    /// Where a freshly registered account is sent.
    #[must_use]
    pub const fn route_target(self) -> RouteTarget {
        self.assigned_role().route_target()
    }
}

impl From<SignUpChannel> for Channel {
    fn from(channel: SignUpChannel) -> Self {
        match channel {
            SignUpChannel::Customer => Self::Customer,
            SignUpChannel::Staff => Self::Staff,
        }
    }
}

impl fmt::Display for SignUpChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.assigned_role().as_str())
    }
}

impl FromStr for SignUpChannel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "staff" => Ok(Self::Staff),
            _ => Err(ParseError::new("sign-up channel", s)),
        }
    }
}

/// Post-authentication destination area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteTarget {
    /// Shared administrator/staff console.
    AdminConsole,
    /// Deliverer console.
    DeliveryConsole,
    /// Customer portal.
    CustomerPortal,
}

impl RouteTarget {
    /// Application path of this area.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::AdminConsole => "/dashboard",
            Self::DeliveryConsole => "/deliverer/dashboard",
            Self::CustomerPortal => "/user/dashboard",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::AdminConsole => "Admin console",
            Self::DeliveryConsole => "Delivery console",
            Self::CustomerPortal => "Customer portal",
        }
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// An authenticated session as reported by the auth provider.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque provider token.
    pub token: SecretString,
    /// Identity the session belongs to.
    pub user_id: UserId,
}

/// The one role record of a user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    /// Identity the role belongs to.
    pub user_id: UserId,
    /// Recorded role.
    pub role: Role,
}

/// Email and password entered on the login form.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Password (redacted in debug output).
    pub password: SecretString,
}

impl Credentials {
    /// Create credentials from form input.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::new(password.into().into_boxed_str()),
        }
    }
}

/// Fields entered on the registration form.
#[derive(Debug, Clone)]
pub struct RegistrationProfile {
    /// Email address.
    pub email: String,
    /// Password (redacted in debug output).
    pub password: SecretString,
    /// Full name.
    pub full_name: String,
    /// Optional phone number, format unchecked.
    pub phone: Option<String>,
}

impl RegistrationProfile {
    /// Create a profile from form input.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
        phone: Option<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: SecretString::new(password.into().into_boxed_str()),
            full_name: full_name.into(),
            phone: phone.filter(|p| !p.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_role_routes() {
        assert_eq!(Role::Administrator.route_target(), RouteTarget::AdminConsole);
        assert_eq!(Role::Staff.route_target(), RouteTarget::AdminConsole);
        assert_eq!(Role::Deliverer.route_target(), RouteTarget::DeliveryConsole);
        assert_eq!(Role::Customer.route_target(), RouteTarget::CustomerPortal);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Administrator);
        assert_eq!("STAFF".parse::<Role>().unwrap(), Role::Staff);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_uses_stored_names() {
        let json = serde_json::to_string(&Role::Administrator).unwrap();
        assert_eq!(json, "\"admin\"");
        let role: Role = serde_json::from_str("\"deliverer\"").unwrap();
        assert_eq!(role, Role::Deliverer);
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("admin".parse::<Channel>().unwrap(), Channel::Administrator);
        assert_eq!("deliverer".parse::<Channel>().unwrap(), Channel::Deliverer);
        let err = "superuser".parse::<Channel>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown channel: superuser");
    }

    #[test]
    fn test_signup_channel_excludes_provisioned_roles() {
        assert!("admin".parse::<SignUpChannel>().is_err());
        assert!("deliverer".parse::<SignUpChannel>().is_err());
        assert_eq!(SignUpChannel::Staff.assigned_role(), Role::Staff);
        assert_eq!(Channel::from(SignUpChannel::Customer), Channel::Customer);
    }

    #[test]
    fn test_mismatch_messages_name_channel() {
        assert!(Channel::Administrator
            .mismatch_message()
            .contains("administrators only"));
        assert!(Channel::Staff.mismatch_message().contains("staff only"));
        assert!(Channel::Deliverer.mismatch_message().contains("deliverers only"));
        assert!(Channel::Customer.mismatch_message().contains("customers only"));
    }

    #[test]
    fn test_credentials_redacted() {
        let creds = Credentials::new("a@b.com", "secret1");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret1"));
        assert_eq!(creds.password.expose_secret(), "secret1");
    }

    #[test]
    fn test_empty_phone_is_none() {
        let profile = RegistrationProfile::new("a@b.com", "secret1", "Ada", Some(String::new()));
        assert!(profile.phone.is_none());
    }
}
