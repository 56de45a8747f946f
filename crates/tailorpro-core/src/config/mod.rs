//! Configuration loading and validation.
//!
//! JSON5 format. Config location: `~/.tailorpro/tailorpro.json`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::types::RouteTarget;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON5 parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] json5::Error),

    /// Config validation error.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Public site settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Session settings for the local auth provider.
    #[serde(default)]
    pub session: SessionConfig,

    /// Registration settings.
    #[serde(default)]
    pub signup: SignupConfig,

    /// Global settings.
    #[serde(default)]
    pub settings: GlobalSettings,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// # Errors
    ///
    /// Returns error if config cannot be loaded or parsed.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = json5::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save configuration to a path.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(secret) = std::env::var("TAILORPRO_JWT_SECRET") {
            self.session.jwt_secret = Some(secret);
        }
        if let Ok(origin) = std::env::var("TAILORPRO_SITE_ORIGIN") {
            self.site.origin = origin;
        }
        self
    }

    /// Get the default config file path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        Self::state_dir().join("tailorpro.json")
    }

    /// Get the `TailorPro` state directory.
    ///
    /// Uses `TAILORPRO_STATE_DIR` env var if set, otherwise `~/.tailorpro`.
    #[must_use]
    pub fn state_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("TAILORPRO_STATE_DIR") {
            PathBuf::from(dir)
        } else if let Some(home) = dirs::home_dir() {
            home.join(".tailorpro")
        } else {
            PathBuf::from(".tailorpro")
        }
    }

    /// Get the data directory holding the account and role stores.
    #[must_use]
    pub fn data_dir() -> PathBuf {
        Self::state_dir().join("data")
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns error describing the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = self.site.origin.as_str();
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "site.origin must be an http(s) URL, got '{origin}'"
            )));
        }

        if self.session.token_expiry_hours == 0 {
            return Err(ConfigError::Validation(
                "session.tokenExpiryHours cannot be 0".to_string(),
            ));
        }
        if self.session.token_expiry_hours > MAX_TOKEN_EXPIRY_HOURS {
            return Err(ConfigError::Validation(format!(
                "session.tokenExpiryHours cannot exceed {MAX_TOKEN_EXPIRY_HOURS}"
            )));
        }

        if let Some(secret) = &self.session.jwt_secret {
            if secret.len() < 32 || !secret.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::Validation(
                    "session.jwtSecret must be at least 16 hex-encoded bytes".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Public site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Origin used to build links in verification emails.
    #[serde(default = "default_origin")]
    pub origin: String,
}

impl SiteConfig {
    /// Absolute URL of an application area.
    #[must_use]
    pub fn url_for(&self, target: RouteTarget) -> String {
        format!("{}{}", self.origin.trim_end_matches('/'), target.path())
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
        }
    }
}

fn default_origin() -> String {
    "http://localhost:8080".to_string()
}

/// Session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// JWT secret (hex-encoded). Generated and persisted if not set.
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Session token expiry in hours.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_hours: u64,
}

impl SessionConfig {
    /// Get token expiry as Duration.
    ///
    /// Saturates for values that `Config::validate` would reject.
    #[must_use]
    pub const fn token_expiry(&self) -> Duration {
        Duration::from_secs(self.token_expiry_hours.saturating_mul(3600))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_expiry_hours: default_token_expiry(),
        }
    }
}

/// Longest accepted session lifetime (ten years).
pub const MAX_TOKEN_EXPIRY_HOURS: u64 = 24 * 365 * 10;

const fn default_token_expiry() -> u64 {
    24
}

/// Registration configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupConfig {
    /// What to do when the role record cannot be written after sign-up.
    #[serde(default)]
    pub role_assignment: RoleAssignment,
}

/// Policy for a failed role record insert after account creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleAssignment {
    /// Finish registration but show a warning instead of plain success.
    #[default]
    Warn,
    /// Fail the registration flow before redirecting.
    Strict,
}

/// Global settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// Enable debug logging.
    #[serde(default)]
    pub debug: bool,

    /// Log format.
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format.
    #[default]
    Pretty,
    /// JSON format.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.site.origin, "http://localhost:8080");
        assert_eq!(config.session.token_expiry_hours, 24);
        assert_eq!(config.signup.role_assignment, RoleAssignment::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tailorpro.json");

        let mut config = Config::default();
        config.site.origin = "https://shop.example".to_string();
        config.signup.role_assignment = RoleAssignment::Strict;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.site.origin, "https://shop.example");
        assert_eq!(loaded.signup.role_assignment, RoleAssignment::Strict);
    }

    #[test]
    fn test_json5_parsing() {
        let content = r#"{
            // verification links point here
            site: { origin: "https://tailor.example/" },
            signup: { roleAssignment: "strict", },
            settings: { logFormat: "json" },
        }"#;

        let config: Config = json5::from_str(content).unwrap();
        assert_eq!(config.signup.role_assignment, RoleAssignment::Strict);
        assert_eq!(config.settings.log_format, LogFormat::Json);
        assert_eq!(
            config.site.url_for(RouteTarget::AdminConsole),
            "https://tailor.example/dashboard"
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.site.origin = "ftp://nope".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.session.token_expiry_hours = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.session.jwt_secret = Some("not-hex".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_expiry_capped() {
        let config: Config =
            json5::from_str("{ session: { tokenExpiryHours: 18446744073709551615 } }").unwrap();
        assert!(config.validate().is_err());
        assert_eq!(config.session.token_expiry(), Duration::from_secs(u64::MAX));

        let mut config = Config::default();
        config.session.token_expiry_hours = MAX_TOKEN_EXPIRY_HOURS;
        assert!(config.validate().is_ok());
        config.session.token_expiry_hours += 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_url_for() {
        let site = SiteConfig::default();
        assert_eq!(
            site.url_for(RouteTarget::CustomerPortal),
            "http://localhost:8080/user/dashboard"
        );
    }
}
