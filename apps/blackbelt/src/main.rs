//! # Blackbelt
//!
//! The main binary for the academy client.
//!
//! ## Usage
//!
//! ```bash
//! # Create an account
//! blackbelt register
//!
//! # Academy screens
//! blackbelt dashboard
//! blackbelt athletes --json-mode
//! blackbelt athlete --id 7
//! blackbelt class-create --time 19:30 --description "Guard passing" -s 3 -s 8
//!
//! # Offline form check
//! blackbelt validate --form athlete --file athlete.json
//! ```

use blackbelt::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing; BLACKBELT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("BLACKBELT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose {
        "blackbelt=debug,blackbelt_core=debug"
    } else {
        "blackbelt=info,blackbelt_core=info"
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

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Blackbelt startup banner.
fn print_banner() {
    println!(
        r#"
  ╔╗ ╦  ╔═╗╔═╗╦╔═╔╗ ╔═╗╦ ╔╦╗
  ╠╩╗║  ╠═╣║  ╠╩╗╠╩╗║╣ ║  ║
  ╚═╝╩═╝╩ ╩╚═╝╩ ╩╚═╝╚═╝╩═╝╩

  Academy client v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
