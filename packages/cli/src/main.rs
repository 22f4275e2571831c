// Terminal front end for the garrison client

use std::path::PathBuf;
use std::process::ExitCode;

use app::{AppContext, Settings};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "garrison")]
#[command(about = "Missions, appointments and notifications for enlisted personnel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to ./garrison.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether a session is stored and which screens are reachable
    Status,

    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// List missions
    Missions,

    /// List your appointments
    Appointments,

    /// List notifications
    Notifications,

    /// Mark a notification as read
    Read { id: String },

    /// Delete a notification
    Delete { id: String },

    /// Show your department and its members
    Department,

    /// Show the cached profile
    Profile,

    /// Edit profile fields; omitted fields keep their current value
    UpdateProfile {
        #[arg(long)]
        firstname: Option<String>,

        #[arg(long)]
        lastname: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        address: Option<String>,
    },

    /// Change your password
    ChangePassword {
        #[arg(long)]
        old: String,

        #[arg(long)]
        new: String,

        #[arg(long)]
        confirm: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load(cli.config.as_deref())?;
    tracing::debug!(base_url = %settings.api.base_url, "settings loaded");
    let ctx = AppContext::from_settings(settings).await?;
    let mut shell = ctx.shell().await;

    let outcome = match cli.command {
        Commands::Status => {
            commands::status(&ctx, &shell).await;
            Ok(())
        }
        Commands::Login { email, password } => {
            commands::login(&ctx, &mut shell, &email, &password).await
        }
        Commands::Logout => commands::logout(&ctx, &mut shell).await,
        Commands::Missions => commands::missions(&ctx, &mut shell).await,
        Commands::Appointments => commands::appointments(&ctx, &mut shell).await,
        Commands::Notifications => commands::notifications(&ctx, &mut shell).await,
        Commands::Read { id } => commands::mark_read(&ctx, &mut shell, &id).await,
        Commands::Delete { id } => commands::delete(&ctx, &mut shell, &id).await,
        Commands::Department => commands::department(&ctx, &mut shell).await,
        Commands::Profile => commands::profile(&ctx, &mut shell).await,
        Commands::UpdateProfile {
            firstname,
            lastname,
            email,
            phone,
            address,
        } => {
            let edits = commands::ProfileEdits {
                firstname,
                lastname,
                email,
                phone,
                address,
            };
            commands::update_profile(&ctx, &mut shell, edits).await
        }
        Commands::ChangePassword { old, new, confirm } => {
            commands::change_password(&ctx, &mut shell, old, new, confirm).await
        }
    };

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
