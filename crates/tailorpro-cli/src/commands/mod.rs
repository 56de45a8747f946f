//! CLI command implementations.

pub mod config;
pub mod login;
pub mod logout;
pub mod roles;
pub mod session;
pub mod signup;
pub mod verify;

pub use config::run_config;
pub use login::run_login;
pub use logout::run_logout;
pub use roles::run_roles;
pub use session::run_session;
pub use signup::run_signup;
pub use verify::run_verify;

use anyhow::Result;
use tailorpro_auth::LocalBackend;
use tailorpro_core::Config;

/// Load the configuration file with environment overrides applied.
fn load_config() -> Result<Config> {
    let config = Config::load_default()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?
        .with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Open the local account and role stores.
fn open_backend(config: &Config) -> Result<LocalBackend> {
    let data_dir = Config::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    LocalBackend::open(&data_dir, &config.session)
        .map_err(|e| anyhow::anyhow!("Failed to open auth store: {e}"))
}
