//! Session command - report where the current session leads.

use anyhow::Result;
use tailorpro_auth::{BootstrapOutcome, LoginPage};

use crate::host::TerminalHost;
use crate::ui;

/// Run the session command.
///
/// # Errors
///
/// Returns error if the stores cannot be opened.
pub async fn run_session() -> Result<()> {
    let config = super::load_config()?;
    let backend = super::open_backend(&config)?;
    let host = TerminalHost::new(&config);
    let mut page = LoginPage::new(host.flows(&backend, &config));

    ui::header("Session");
    match page.open().await {
        BootstrapOutcome::Redirected(_) => {
            ui::success("Signed in");
        }
        BootstrapOutcome::NoRecognizedRole => {
            ui::warning("Signed in, but the account has no recognized role");
            ui::info("Run 'tailorpro roles list' to inspect role records");
        }
        BootstrapOutcome::Unauthenticated => {
            ui::info("Not signed in");
        }
    }
    host.flush();

    Ok(())
}
