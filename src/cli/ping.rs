// src/cli/ping.rs
use super::CliError;
use crate::api::{ApiBackend, ApiClient};
use crate::settings::AdminConfig;

pub fn run(config: &AdminConfig) -> Result<(), CliError> {
    let client = ApiClient::new(&config.server_address, &config.token)?;
    println!("Pinging {} ...", client.base_url());
    if client.ping() {
        println!("Server is online.");
        Ok(())
    } else {
        Err(CliError::Offline)
    }
}
