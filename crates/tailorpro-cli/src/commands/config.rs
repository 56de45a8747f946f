//! Config command.

use anyhow::Result;
use tailorpro_core::Config;

use crate::ui;

/// Config actions.
#[derive(Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Print the configuration file path.
    Path,
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        force: bool,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns error if the file cannot be read or written.
pub fn run_config(action: ConfigAction) -> Result<()> {
    let config_path = Config::default_path();

    match action {
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
        ConfigAction::Show => {
            if !config_path.exists() {
                ui::info(&format!(
                    "No config file at {}, showing defaults",
                    config_path.display()
                ));
            }
            let mut config = super::load_config()?;
            if config.session.jwt_secret.is_some() {
                config.session.jwt_secret = Some("********".to_string());
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {} (use --force to overwrite)",
                    config_path.display()
                );
            }
            Config::default().save(&config_path)?;
            ui::success(&format!("Wrote {}", config_path.display()));
        }
    }

    Ok(())
}
