//! Logout command.

use anyhow::Result;
use tailorpro_auth::AuthProvider;

use crate::ui;

/// Run the logout command.
///
/// # Errors
///
/// Returns error if the session cannot be cleared.
pub async fn run_logout() -> Result<()> {
    let config = super::load_config()?;
    let backend = super::open_backend(&config)?;

    if backend.provider.get_session().await?.is_none() {
        ui::info("No active session");
        return Ok(());
    }

    backend.provider.sign_out().await?;
    ui::success("Signed out");
    Ok(())
}
