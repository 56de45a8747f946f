//! Signup command.

use anyhow::Result;
use tailorpro_auth::{RoleAssignmentStatus, SignupPage};
use tailorpro_core::SignUpChannel;

use crate::host::TerminalHost;
use crate::ui::{self, prompts};

/// Signup command arguments.
#[derive(Debug, Clone)]
pub struct SignupArgs {
    /// Registration tab.
    pub channel: SignUpChannel,
    /// Account email.
    pub email: Option<String>,
    /// Account password.
    pub password: Option<String>,
    /// Full name.
    pub full_name: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
}

/// Run the signup command.
///
/// # Errors
///
/// Returns error if the stores cannot be opened or registration fails.
pub async fn run_signup(args: SignupArgs) -> Result<()> {
    let config = super::load_config()?;
    let backend = super::open_backend(&config)?;
    let host = TerminalHost::new(&config);
    let mut page = SignupPage::new(host.flows(&backend, &config));

    ui::header(&format!("Register as {}", args.channel));
    page.select_channel(args.channel);
    page.set_full_name(prompts::or_input(args.full_name, "Full name")?);
    let interactive = args.email.is_none();
    page.set_email(prompts::or_input(args.email, "Email")?);
    let phone = match args.phone {
        Some(phone) => Some(phone),
        None if interactive => prompts::input_optional("Phone (optional)")?,
        None => None,
    };
    if let Some(phone) = phone {
        page.set_phone(phone);
    }
    page.set_password(prompts::or_password(args.password, "Password")?);

    let spinner = ui::spinner("Creating account...");
    let result = page.submit().await;
    spinner.finish_and_clear();
    host.flush();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(_) => anyhow::bail!("Registration failed"),
    };

    match (&outcome.user_id, &outcome.role) {
        (Some(id), RoleAssignmentStatus::Assigned) => {
            ui::kv("Account", id.as_ref());
            ui::info("Run 'tailorpro verify --email <email>' to confirm the address");
        }
        (Some(id), RoleAssignmentStatus::Failed(e)) => {
            ui::kv("Account", id.as_ref());
            ui::warning(&format!("Role record not written: {e}"));
            ui::info("Run 'tailorpro roles repair' to assign it");
        }
        _ => {}
    }

    Ok(())
}
