//! # Blackbelt - Academy Client
//!
//! Terminal front-end for the academy REST API, built on `blackbelt-core`.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  apps/blackbelt (THE BINARY)              │
//! │                                                           │
//! │  ┌──────────┐   ┌──────────────┐   ┌──────────────────┐  │
//! │  │   CLI    │   │  Submission  │   │  HTTP client     │  │
//! │  │  (clap)  │──▶│  flow        │──▶│  (reqwest)       │  │
//! │  └────┬─────┘   └──────┬───────┘   └──────────────────┘  │
//! │       │                ▼                                  │
//! │       │        ┌────────────────┐   ┌──────────────────┐  │
//! │       └───────▶│ blackbelt-core │──▶│  Session file    │  │
//! │                │  (THE WIZARD)  │   │  (toml)          │  │
//! │                └────────────────┘   └──────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod flow;
pub mod session;

pub use client::{AcademyClient, ClientError};
pub use config::Config;
pub use error::CliError;
pub use session::{SessionFile, SessionRecord};
