//! Guava CLI - earn coins for the images you contribute

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{config, credit, gallery, get_logger, log_event, logs, session, upload, wallet};
use guava_core::{Error, LogEvent, OperationResult};

/// Guava - contribute images, vote and earn coins
#[derive(Parser)]
#[command(name = "gv", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with the demo identity
    Login {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out and clear the saved session
    Logout {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show who is signed in and their balance
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add coins to the signed-in balance
    Credit {
        /// Number of coins to add
        amount: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse the community gallery
    Gallery {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Vote on a gallery image
    Vote {
        /// Image ID (see `gv gallery`)
        image_id: String,
        /// Vote direction: up or down
        direction: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload an image and earn a coin
    Upload {
        /// Path to a JPEG or PNG image (max 5MB)
        file: PathBuf,
        /// Name of the image
        #[arg(long)]
        name: String,
        /// Category, e.g. "Food & Cuisine" or food-cuisine
        #[arg(long)]
        category: Option<String>,
        /// Short description
        #[arg(long)]
        description: Option<String>,
        /// Where the image was taken
        #[arg(long)]
        location: Option<String>,
        /// Confirm you own the image and agree to the terms
        #[arg(long)]
        agree: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show upload history
    Uploads {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show wallet balance and earnings
    Wallet {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Request a mobile money withdrawal
    Withdraw {
        /// Mobile money number
        mobile_number: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Login { .. } => "login",
            Commands::Logout { .. } => "logout",
            Commands::Whoami { .. } => "whoami",
            Commands::Credit { .. } => "credit",
            Commands::Gallery { .. } => "gallery",
            Commands::Vote { .. } => "vote",
            Commands::Upload { .. } => "upload",
            Commands::Uploads { .. } => "uploads",
            Commands::Wallet { .. } => "wallet",
            Commands::Withdraw { .. } => "withdraw",
            Commands::Config { .. } => "config",
            Commands::Logs { .. } => "logs",
        }
    }

    /// Whether output was requested as JSON
    fn json(&self) -> bool {
        match self {
            Commands::Login { json }
            | Commands::Logout { json, .. }
            | Commands::Whoami { json }
            | Commands::Credit { json, .. }
            | Commands::Gallery { json }
            | Commands::Vote { json, .. }
            | Commands::Upload { json, .. }
            | Commands::Uploads { json }
            | Commands::Wallet { json }
            | Commands::Withdraw { json, .. } => *json,
            Commands::Config {
                command: config::ConfigCommands::Show { json },
            } => *json,
            Commands::Config { .. } | Commands::Logs { .. } => false,
        }
    }

    /// Image id the command acts on, if any
    fn subject(&self) -> Option<&str> {
        match self {
            Commands::Vote { image_id, .. } => Some(image_id.as_str()),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let name = cli.command.name();

    // The logs command opens the log database itself
    let logger = match cli.command {
        Commands::Logs { .. } => None,
        _ => get_logger(),
    };
    let mut event = LogEvent::new("command_executed").with_command(name);
    if let Some(subject) = cli.command.subject() {
        event = event.with_subject(subject);
    }
    log_event(&logger, event);

    let json = cli.command.json();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Core errors are logged by kind only; their messages can carry balances
            let core_error = e.downcast_ref::<Error>();
            let failure = match core_error {
                Some(core) => LogEvent::new("command_failed")
                    .with_command(name)
                    .with_error(core.kind()),
                None => LogEvent::new("command_failed")
                    .with_command(name)
                    .with_error(e.to_string())
                    .with_error_details(format!("{:#}", e)),
            };
            log_event(&logger, failure);

            if json {
                let result = OperationResult::<()>::fail(format!("{:#}", e));
                if let Ok(body) = serde_json::to_string_pretty(&result) {
                    println!("{}", body);
                }
            } else {
                output::error(&format!("{:#}", e));
                if matches!(core_error, Some(Error::NotSignedIn)) {
                    output::info("Run `gv login` to sign in.");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { json } => session::login(json),
        Commands::Logout { force, json } => session::logout(force, json),
        Commands::Whoami { json } => session::whoami(json),
        Commands::Credit { amount, json } => credit::run(amount, json),
        Commands::Gallery { json } => gallery::list(json),
        Commands::Vote {
            image_id,
            direction,
            json,
        } => gallery::vote(&image_id, &direction, json),
        Commands::Upload {
            file,
            name,
            category,
            description,
            location,
            agree,
            json,
        } => upload::submit(
            upload::UploadArgs {
                file: &file,
                name: &name,
                category: category.as_deref(),
                description: description.as_deref(),
                location: location.as_deref(),
                consent: agree,
            },
            json,
        ),
        Commands::Uploads { json } => upload::history(json),
        Commands::Wallet { json } => wallet::summary(json),
        Commands::Withdraw {
            mobile_number,
            force,
            json,
        } => wallet::withdraw(&mobile_number, force, json),
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
