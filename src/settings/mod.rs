// src/settings/mod.rs
//! Connection config (environment, `.env`, keyring) and persisted console
//! preferences.

pub mod io;

use bevy::log::{error, info, warn};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_SERVER_ADDRESS: &str = "API_SERVER_ADDRESS";
pub const ENV_TOKEN: &str = "API_TOKEN";
pub const ENV_DEBUG: &str = "DEBUG";

pub const KEYRING_SERVICE_NAME: &str = "hunch_admin";
pub const KEYRING_TOKEN_USERNAME: &str = "api_token";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingServerAddress(&'static str),
    #[error("No API token in {0} or in the keyring")]
    MissingToken(&'static str),
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct AdminConfig {
    pub server_address: String,
    pub token: String,
    pub debug: bool,
}

impl AdminConfig {
    /// Reads `.env` (when present) and the process environment. Command-line
    /// values win over both; a missing token falls back to the OS keyring.
    pub fn from_env(server: Option<&str>, token: Option<&str>, debug: bool) -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!("Could not read .env: {}", e);
            }
        }
        let lookup = |key: &str| match key {
            ENV_SERVER_ADDRESS if server.is_some() => server.map(str::to_string),
            ENV_TOKEN if token.is_some() => token.map(str::to_string),
            _ => std::env::var(key).ok(),
        };
        let mut config = Self::from_lookup(lookup, token_from_keyring)?;
        config.debug |= debug;
        Ok(config)
    }

    pub fn from_lookup<L, K>(lookup: L, keyring_token: K) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
        K: FnOnce() -> Option<String>,
    {
        let server_address = lookup(ENV_SERVER_ADDRESS)
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingServerAddress(ENV_SERVER_ADDRESS))?;
        let token = lookup(ENV_TOKEN)
            .filter(|t| !t.trim().is_empty())
            .or_else(keyring_token)
            .ok_or(ConfigError::MissingToken(ENV_TOKEN))?;
        let debug = lookup(ENV_DEBUG).is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
        Ok(Self {
            server_address,
            token,
            debug,
        })
    }
}

pub fn token_from_keyring() -> Option<String> {
    match keyring::Entry::new(KEYRING_SERVICE_NAME, KEYRING_TOKEN_USERNAME) {
        Ok(entry) => match entry.get_password() {
            Ok(token) => {
                info!("API token found in keyring.");
                Some(token)
            }
            Err(keyring::Error::NoEntry) => {
                info!("No API token found in keyring.");
                None
            }
            Err(e) => {
                error!("Error accessing keyring: {}", e);
                None
            }
        },
        Err(e) => {
            error!("Error creating keyring entry: {}", e);
            None
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsolePage {
    #[default]
    Platforms,
    Tips,
}

impl ConsolePage {
    pub const ALL: [ConsolePage; 2] = [ConsolePage::Platforms, ConsolePage::Tips];

    pub fn title(&self) -> &'static str {
        match self {
            ConsolePage::Platforms => "Platforms",
            ConsolePage::Tips => "Tips",
        }
    }
}

#[derive(Resource, Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ConsoleSettings {
    pub last_page: ConsolePage,
    pub last_platform: Option<String>,
}
