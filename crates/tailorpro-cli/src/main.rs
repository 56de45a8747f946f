//! TailorPro CLI - sign in, register, and route by role from the terminal.

mod commands;
mod host;
mod ui;

use clap::{Parser, Subcommand};
use tailorpro_core::config::LogFormat;
use tailorpro_core::{Channel, Config, Role, SignUpChannel};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "tailorpro")]
#[command(about = "TailorPro - role-gated sign-in and registration")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in through a channel
    Login {
        /// Channel: admin, staff, customer, or deliverer
        #[arg(short, long, default_value_t = Channel::default())]
        channel: Channel,

        /// Account email (prompted if omitted)
        #[arg(long)]
        email: Option<String>,

        /// Account password (prompted if omitted)
        #[arg(long, env = "TAILORPRO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Register a customer or staff account
    Signup {
        /// Channel: customer or staff
        #[arg(short, long, default_value_t = SignUpChannel::default())]
        channel: SignUpChannel,

        /// Account email (prompted if omitted)
        #[arg(long)]
        email: Option<String>,

        /// Account password (prompted if omitted)
        #[arg(long, env = "TAILORPRO_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Full name (prompted if omitted)
        #[arg(long)]
        full_name: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,
    },

    /// Check the current session and report where it leads
    Session,

    /// Discard the current session
    Logout,

    /// Confirm an account's email address
    Verify {
        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Role record management
    Roles {
        #[command(subcommand)]
        action: RolesCommands,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum RolesCommands {
    /// List every account with its role record
    List,

    /// Overwrite the role record of an account
    Repair {
        /// Account email
        #[arg(long)]
        email: String,

        /// Role: admin, staff, customer, or deliverer
        #[arg(long)]
        role: Role,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging settings come from the config file when it parses
    let settings = Config::load_default()
        .map(|c| c.settings)
        .unwrap_or_default();

    let filter = if cli.verbose || settings.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    match settings.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_target(false))
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .init(),
    }

    match cli.command {
        Commands::Login {
            channel,
            email,
            password,
        } => {
            let args = commands::login::LoginArgs {
                channel,
                email,
                password,
            };
            commands::run_login(args).await?;
        }

        Commands::Signup {
            channel,
            email,
            password,
            full_name,
            phone,
        } => {
            let args = commands::signup::SignupArgs {
                channel,
                email,
                password,
                full_name,
                phone,
            };
            commands::run_signup(args).await?;
        }

        Commands::Session => commands::run_session().await?,

        Commands::Logout => commands::run_logout().await?,

        Commands::Verify { email } => commands::run_verify(&email)?,

        Commands::Roles { action } => {
            let action = match action {
                RolesCommands::List => commands::roles::RolesAction::List,
                RolesCommands::Repair { email, role } => {
                    commands::roles::RolesAction::Repair { email, role }
                }
            };
            commands::run_roles(action)?;
        }

        Commands::Config { action } => {
            let action = match action {
                Some(ConfigCommands::Show) | None => commands::config::ConfigAction::Show,
                Some(ConfigCommands::Path) => commands::config::ConfigAction::Path,
                Some(ConfigCommands::Init { force }) => {
                    commands::config::ConfigAction::Init { force }
                }
            };
            commands::run_config(action)?;
        }
    }

    Ok(())
}
