//! # Roster - Student Records Client
//!
//! Command-line client for a student-records backend.
//!
//! ## Usage
//!
//! ```bash
//! # Sign in (the session is kept in ~/.roster/session.json)
//! roster login -e ada@uni.edu -p secret
//!
//! # Browse
//! roster list --course CS --sort name -p 1
//! roster dashboard --search ada
//!
//! # Change
//! roster add -n "Ada" -e ada@uni.edu --course CS -b 2022-2026 -S Math=90
//! roster delete 65f1c0ffee --yes
//!
//! # Export the filtered view
//! roster export --course CS -o cs.csv
//! ```

use clap::Parser;
use roster::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // ROSTER_LOG_FORMAT=json enables machine-parseable output. Logs go to
    // stderr so stdout stays clean for --json-mode.
    let log_format = std::env::var("ROSTER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose {
        "roster=debug,roster_core=debug"
    } else {
        "roster=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Print the Roster startup banner.
fn print_banner() {
    eprintln!("Roster v{} - student records client\n", env!("CARGO_PKG_VERSION"));
}
