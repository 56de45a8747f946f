//! # TailorPro Core
//!
//! Core types, configuration, and the channel/role gate for TailorPro.
//!
//! This crate provides:
//! - Closed channel, role, and route enumerations
//! - Structural validation of login and registration input
//! - The pure channel/role gate
//! - Configuration loading and validation (JSON5 format)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod gate;
pub mod types;
pub mod validation;

pub use config::{Config, ConfigError, RoleAssignment};
pub use gate::{GateDecision, gate};
pub use types::{
    Channel, Credentials, ParseError, RegistrationProfile, Role, RoleRecord, RouteTarget,
    Session, SignUpChannel, UserId,
};
pub use validation::{ValidationError, validate_credentials, validate_registration};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::gate::{GateDecision, gate};
    pub use crate::types::*;
}
