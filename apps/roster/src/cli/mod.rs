//! # Roster CLI Module
//!
//! The presentation layer: every command loads the collection through the
//! Roster service and renders a view of it.
//!
//! ## Available Commands
//!
//! - `login` / `register` / `logout` / `whoami` - Session management
//! - `list` - Paged, searchable, sortable table
//! - `dashboard` - Summary cards and per-student performance
//! - `courses` - Course filter options
//! - `show` - One student in full
//! - `add` / `edit` / `delete` - Mutations
//! - `export` - Write the current view (or a selection) as CSV

mod commands;

use crate::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Roster - student records client
///
/// Manage student records, marks and grades on a remote backend.
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (default: ./roster.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend API root, overriding config and ROSTER_URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Search, course filter and sort options shared by the table views.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Case-insensitive search term
    #[arg(short, long)]
    pub search: Option<String>,

    /// Course to show, or "all"
    #[arg(short = 'C', long)]
    pub course: Option<String>,

    /// Sort key (name, email, course, batch, performance)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long)]
    pub desc: bool,
}

/// Student fields as typed on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct FormArgs {
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub email: Option<String>,

    #[arg(long)]
    pub course: Option<String>,

    /// Batch year as "YYYY-YYYY"
    #[arg(short, long)]
    pub batch: Option<String>,

    /// Subject as "NAME=MARKS" (repeatable; replaces all subjects on edit)
    #[arg(short = 'S', long = "subject")]
    pub subjects: Vec<String>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        email: String,

        /// Password (falls back to ROSTER_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account and store the session
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Password (falls back to ROSTER_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,

        #[arg(short, long, default_value = "teacher")]
        role: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show the student table
    List {
        #[command(flatten)]
        view: ViewArgs,

        /// One-based page number
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Rows per page (5, 10, 25, 50; default from config)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show the dashboard summary and student cards
    Dashboard {
        /// Search by name or email
        #[arg(short, long)]
        search: Option<String>,

        /// Course to show (empty for all)
        #[arg(short = 'C', long)]
        course: Option<String>,
    },

    /// List course filter options
    Courses,

    /// Show one student
    Show {
        /// Student identifier
        id: String,

        /// Read straight from the backend instead of the loaded collection
        #[arg(long)]
        remote: bool,
    },

    /// Add a student
    Add {
        #[command(flatten)]
        fields: FormArgs,
    },

    /// Edit a student (unspecified fields keep their values)
    Edit {
        /// Student identifier
        id: String,

        #[command(flatten)]
        fields: FormArgs,
    },

    /// Delete a student
    Delete {
        /// Student identifier
        id: String,

        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },

    /// Export students as CSV
    Export {
        /// Output file path
        #[arg(short, long, default_value = roster_core::primitives::EXPORT_FILE_NAME)]
        output: PathBuf,

        #[command(flatten)]
        view: ViewArgs,

        /// Export only these student ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let config = crate::config::RosterConfig::load(cli.config.as_deref(), cli.url)?;
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Login { email, password } => {
            cmd_login(&config, json_mode, &email, password).await
        }
        Commands::Register {
            name,
            email,
            password,
            role,
        } => cmd_register(&config, json_mode, name, email, password, role).await,
        Commands::Logout => cmd_logout(&config, json_mode),
        Commands::Whoami => cmd_whoami(&config, json_mode).await,
        Commands::List {
            view,
            page,
            page_size,
        } => cmd_list(&config, json_mode, &view, page, page_size).await,
        Commands::Dashboard { search, course } => {
            cmd_dashboard(&config, json_mode, search, course).await
        }
        Commands::Courses => cmd_courses(&config, json_mode).await,
        Commands::Show { id, remote } => cmd_show(&config, json_mode, &id, remote).await,
        Commands::Add { fields } => cmd_add(&config, json_mode, &fields).await,
        Commands::Edit { id, fields } => cmd_edit(&config, json_mode, &id, &fields).await,
        Commands::Delete { id, yes } => cmd_delete(&config, json_mode, &id, yes).await,
        Commands::Export {
            output,
            view,
            select,
        } => cmd_export(&config, json_mode, &output, &view, &select).await,
    }
}

// =============================================================================
// TESTS
// =============================================================================
