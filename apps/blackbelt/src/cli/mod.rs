//! # Blackbelt CLI Module
//!
//! This module implements the CLI interface for the academy client.
//!
//! ## Available Commands
//!
//! - `register` - Create an account through the interactive wizard
//! - `dashboard` - Athlete count and belt distribution
//! - `athletes` - List athletes
//! - `athlete` - Show one athlete
//! - `athlete-update` - Edit an athlete from a JSON file
//! - `athlete-delete` - Remove an athlete
//! - `championships` - List championships
//! - `class-create` - Schedule a class
//! - `validate` - Check a form file against its schema

mod commands;
pub mod prompt;

use crate::client::AcademyClient;
use crate::config::Config;
use crate::error::CliError;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Blackbelt - martial-arts academy client
///
/// Registration, athletes, classes and championships from the terminal.
#[derive(Parser, Debug)]
#[command(name = "blackbelt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Academy API base URL (overrides config and environment)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Forms that can be checked offline.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Registration,
    Athlete,
    Class,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account step by step
    Register,

    /// Show athlete count and belt distribution
    Dashboard,

    /// List every athlete
    Athletes,

    /// Show one athlete's profile
    Athlete {
        /// Athlete ID
        #[arg(long)]
        id: u64,
    },

    /// Update an athlete with values from a JSON file
    AthleteUpdate {
        /// Athlete ID
        #[arg(long)]
        id: u64,

        /// JSON object of field values; missing fields keep their current value
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Remove an athlete
    AthleteDelete {
        /// Athlete ID
        #[arg(long)]
        id: u64,
    },

    /// List championships
    Championships,

    /// Schedule a class
    ClassCreate {
        /// Class date (YYYY-MM-DD), today when omitted
        #[arg(short, long)]
        date: Option<String>,

        /// Start time (HH:MM)
        #[arg(short, long)]
        time: String,

        /// What the class covers
        #[arg(long)]
        description: String,

        /// Student ID to enrol (repeatable)
        #[arg(short, long = "student")]
        students: Vec<u64>,

        /// Master running the class (defaults to `master_id` from config)
        #[arg(long)]
        master_id: Option<u64>,
    },

    /// Validate a JSON form file without contacting the API
    Validate {
        /// Which form the file holds
        #[arg(long, value_enum)]
        form: FormKind,

        /// JSON object of field values
        #[arg(short, long)]
        file: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CliError> {
    let json_mode = cli.json_mode;
    let config = Config::load(cli.config.as_deref(), cli.api_url.as_deref())?;
    let client = AcademyClient::new(config.api_url.clone(), config.api_token.clone());
    tracing::debug!(api_url = %config.api_url, "configuration resolved");

    match cli.command {
        Some(Commands::Register) => cmd_register(&client, &config).await,
        Some(Commands::Dashboard) | None => cmd_dashboard(&client, json_mode).await,
        Some(Commands::Athletes) => cmd_athletes(&client, json_mode).await,
        Some(Commands::Athlete { id }) => cmd_athlete(&client, json_mode, id).await,
        Some(Commands::AthleteUpdate { id, file }) => {
            cmd_athlete_update(&client, json_mode, id, &file).await
        }
        Some(Commands::AthleteDelete { id }) => cmd_athlete_delete(&client, json_mode, id).await,
        Some(Commands::Championships) => cmd_championships(&client, json_mode).await,
        Some(Commands::ClassCreate {
            date,
            time,
            description,
            students,
            master_id,
        }) => {
            let master_id = master_id.or(config.master_id).ok_or_else(|| {
                CliError::Input("no master: pass --master-id or set master_id in the config".into())
            })?;
            let request = ClassRequest {
                date,
                time,
                description,
                students,
                master_id,
            };
            cmd_class_create(&client, json_mode, request).await
        }
        Some(Commands::Validate { form, file }) => cmd_validate(json_mode, form, &file),
    }
}
