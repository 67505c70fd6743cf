// src/cli/mod.rs
// Command-line entry points that run without opening the console window

pub mod ping;
pub mod render_schema;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::api::ApiError;
use crate::forms::FormError;
use crate::settings::ConfigError;

#[derive(Parser)]
#[command(name = "hunch_admin")]
#[command(about = "Hunch Club admin console with schema-driven forms", long_about = None)]
pub struct Cli {
    /// API base URL; overrides API_SERVER_ADDRESS
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Bearer token; overrides API_TOKEN and the keyring
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Short cache TTLs and a one-minute time-picker step
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the widget tree inferred for a JSON schema file
    RenderSchema {
        /// Path to a JSON object holding defaults and hint keys
        path: PathBuf,
    },

    /// Check that the API server answers
    Ping,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Could not read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Server did not answer the ping")]
    Offline,
}
