//! Login command.

use anyhow::Result;
use tailorpro_auth::{BootstrapOutcome, LoginPage};
use tailorpro_core::Channel;

use crate::host::TerminalHost;
use crate::ui::{self, prompts};

/// Login command arguments.
#[derive(Debug, Clone)]
pub struct LoginArgs {
    /// Channel to sign in through.
    pub channel: Channel,
    /// Account email.
    pub email: Option<String>,
    /// Account password.
    pub password: Option<String>,
}

/// Run the login command.
///
/// An existing session is routed first. Otherwise the credentials are
/// prompted for where missing and submitted through the chosen channel.
///
/// # Errors
///
/// Returns error if the stores cannot be opened or sign-in fails.
pub async fn run_login(args: LoginArgs) -> Result<()> {
    let config = super::load_config()?;
    let backend = super::open_backend(&config)?;
    let host = TerminalHost::new(&config);
    let mut page = LoginPage::new(host.flows(&backend, &config));

    if let BootstrapOutcome::Redirected(_) = page.open().await {
        ui::info("Already signed in");
        host.flush();
        return Ok(());
    }

    ui::header(&format!("{} login", args.channel.label()));
    page.select_channel(args.channel);
    page.set_email(prompts::or_input(args.email, "Email")?);
    page.set_password(prompts::or_password(args.password, "Password")?);

    let spinner = ui::spinner("Signing in...");
    let result = page.submit().await;
    spinner.finish_and_clear();
    host.flush();

    match result {
        Ok(target) => {
            ui::success(&format!("Signed in to the {}", target.title()));
            Ok(())
        }
        Err(_) => anyhow::bail!("Sign-in through the {} tab failed", args.channel.label()),
    }
}
