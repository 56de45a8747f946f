//! # TailorPro Auth
//!
//! Role-gated authentication and routing.
//!
//! This crate provides:
//! - Collaborator traits for the auth provider, role directory, navigator, and notifier
//! - Session bootstrap, sign-in, and sign-up flows
//! - Login and signup page state with a loading flag
//! - A local sled-backed provider and role directory

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod flows;
pub mod local;
pub mod pages;
pub mod traits;

pub use error::{AuthError, DirectoryError, FlowError, RoleLookupError};
pub use flows::{AuthFlows, BootstrapOutcome, RoleAssignmentStatus, SignUpOutcome};
pub use local::LocalBackend;
pub use pages::{LoginPage, PagePhase, SignupPage};
pub use traits::{
    AuthProvider, NavigateOptions, Navigator, Notice, Notifier, RoleDirectory, Severity,
};
