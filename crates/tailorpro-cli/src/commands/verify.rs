//! Verify command - confirm an account's email address.

use anyhow::Result;

use crate::ui;

/// Run the verify command.
///
/// # Errors
///
/// Returns error if the account does not exist.
pub fn run_verify(email: &str) -> Result<()> {
    let config = super::load_config()?;
    let backend = super::open_backend(&config)?;

    let redirect = backend.provider.confirm_email(email)?;
    ui::success(&format!("Confirmed {email}"));
    ui::kv("Continue at", &redirect);
    Ok(())
}
