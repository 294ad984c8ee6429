//! Helpdesk CLI
//!
//! Command-line front end for the helpdesk API.
//!
//! # Usage
//!
//! ```bash
//! helpdesk login --email ana@example.com
//! helpdesk dashboard
//! helpdesk tickets status 42 --to resolved --solution "Router restarted"
//! helpdesk tickets history --search vpn --format json
//! helpdesk users toggle-role bia@example.com Atendente
//! ```

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use helpdesk_domain::{Id, Priority, Role, TicketStatus};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(author = "Helpdesk")]
#[command(version)]
#[command(about = "Helpdesk Command Line Interface", long_about = None)]
struct Cli {
    /// API endpoint URL
    #[arg(long, env = "HELPDESK_API_URL", global = true)]
    api_url: Option<String>,

    /// Output format
    #[arg(long, short, global = true)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short, global = true)]
    profile: Option<String>,

    /// Message language (pt-BR, en)
    #[arg(long, global = true)]
    locale: Option<String>,

    /// More log output on stderr (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and keep the session for later commands
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted. Stdin input is echoed on a terminal;
        /// set HELPDESK_PASSWORD to keep it off screen
        #[arg(long, env = "HELPDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    /// End the session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Request a password reset link
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password from a reset link
    ResetPassword {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
    },
    /// Summary and active tickets
    Dashboard,
    /// Work with tickets
    Tickets {
        #[command(subcommand)]
        action: TicketCommands,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryCommands,
    },
    /// Manage subcategories
    Subcategories {
        #[command(subcommand)]
        action: SubcategoryCommands,
    },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum TicketCommands {
    /// Active tickets
    List,
    /// Resolved and canceled tickets
    History {
        /// Matches id, title and description
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<TicketStatus>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Ticket details, deadlines and comments
    Show { id: Id },
    /// Open a ticket
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: Id,
        #[arg(long)]
        subcategory: Id,
        #[arg(long)]
        priority: Priority,
    },
    /// Edit title, description, category or priority
    Edit {
        id: Id,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Changing category requires a new subcategory
        #[arg(long)]
        category: Option<Id>,
        #[arg(long)]
        subcategory: Option<Id>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Add a comment
    Comment {
        id: Id,
        #[arg(long)]
        content: String,
    },
    /// Change status
    Status {
        id: Id,
        #[arg(long)]
        to: TicketStatus,
        /// Required for resolved
        #[arg(long)]
        solution: Option<String>,
        /// Required for canceled
        #[arg(long)]
        reason: Option<String>,
    },
    /// Hand the ticket to another attendant
    Transfer {
        id: Id,
        #[arg(long)]
        to: Option<String>,
    },
    /// List transfer targets
    Attendants,
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories
    List,
    /// Create a category
    Create { name: String },
    /// Rename a category
    Rename { id: Id, name: String },
    /// Delete a category
    Delete { id: Id },
}

#[derive(Subcommand)]
enum SubcategoryCommands {
    /// List subcategories
    List,
    /// Create a subcategory
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: Id,
        /// HH:MM:SS
        #[arg(long)]
        response: Option<String>,
        /// HH:MM:SS
        #[arg(long)]
        resolution: Option<String>,
    },
    /// Rename a subcategory
    Rename { id: Id, name: String },
    /// Delete a subcategory
    Delete { id: Id },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List users
    List {
        #[arg(long)]
        role: Option<Role>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        per_page: Option<usize>,
    },
    /// Add the role if missing, remove it if present
    ToggleRole { email: String, role: Role },
    /// Lock a user out
    Block {
        id: String,
        #[arg(long, conflicts_with = "permanent")]
        minutes: Option<u32>,
        #[arg(long)]
        permanent: bool,
    },
    /// Lift a lockout
    Unblock { id: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info,helpdesk_sdk=debug",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            output::error(&format!("cannot start runtime: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let verbose = cli.verbose > 0;
    match runtime.block_on(commands::run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if commands::is_cancelled(&e) => {
            output::warn("Cancelled");
            ExitCode::from(130)
        }
        Err(e) => {
            if verbose {
                output::error(&format!("{:#}", e));
            } else {
                output::error(&e.to_string());
            }
            ExitCode::FAILURE
        }
    }
}
