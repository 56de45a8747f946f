//! Role record management commands.

use std::collections::HashMap;

use anyhow::Result;
use tailorpro_core::{Role, UserId};

use crate::ui;

/// Role actions.
#[derive(Debug, Clone)]
pub enum RolesAction {
    /// List accounts and their role records.
    List,
    /// Overwrite the role record of an account.
    Repair {
        /// Account email.
        email: String,
        /// Role to store.
        role: Role,
    },
}

/// Run the roles command.
///
/// # Errors
///
/// Returns error if the stores cannot be read or the account is unknown.
pub fn run_roles(action: RolesAction) -> Result<()> {
    let config = super::load_config()?;
    let backend = super::open_backend(&config)?;

    match action {
        RolesAction::List => list_roles(&backend),
        RolesAction::Repair { email, role } => repair_role(&backend, &email, role),
    }
}

fn list_roles(backend: &tailorpro_auth::LocalBackend) -> Result<()> {
    let mut roles: HashMap<UserId, String> = backend.directory.list()?.into_iter().collect();
    let accounts = backend.provider.list()?;

    if accounts.is_empty() && roles.is_empty() {
        ui::info("No accounts found");
        return Ok(());
    }

    ui::header("Accounts");
    println!();
    ui::table_row(&[("EMAIL", 32), ("ROLE", 14), ("CONFIRMED", 12), ("LAST SIGN-IN", 20)]);
    println!("{}", "-".repeat(78));

    for account in &accounts {
        let role = roles
            .remove(&UserId::new(account.id.as_str()))
            .unwrap_or_else(|| "(none)".to_string());
        let confirmed = if account.email_confirmed_at.is_some() {
            "yes"
        } else {
            "no"
        };
        let last_sign_in = account.last_sign_in_at.map_or_else(
            || "never".to_string(),
            |t| t.format("%Y-%m-%d %H:%M").to_string(),
        );

        ui::table_row(&[
            (account.email.as_str(), 32),
            (role.as_str(), 14),
            (confirmed, 12),
            (last_sign_in.as_str(), 20),
        ]);
    }

    for (user_id, role) in &roles {
        ui::warning(&format!("Role record '{role}' for unknown account {user_id}"));
    }

    println!();
    ui::info(&format!("Total: {} account(s)", accounts.len()));
    Ok(())
}

fn repair_role(backend: &tailorpro_auth::LocalBackend, email: &str, role: Role) -> Result<()> {
    let account = backend
        .provider
        .get_by_email(email)?
        .ok_or_else(|| anyhow::anyhow!("No account for {email}"))?;

    let previous = backend
        .directory
        .repair(&UserId::new(account.id), role)?;

    match previous {
        Some(previous) if previous == role.as_str() => {
            ui::info(&format!("{email} already has role '{role}'"));
        }
        Some(previous) => {
            ui::success(&format!("Changed role of {email} from '{previous}' to '{role}'"));
        }
        None => ui::success(&format!("Assigned role '{role}' to {email}")),
    }

    Ok(())
}
