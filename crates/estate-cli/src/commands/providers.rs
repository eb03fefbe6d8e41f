//! Generation backend status command

use anyhow::Result;
use estate_gen::clients;
use estate_gen::{ClientStatus, EstateConfig};

pub fn run() -> Result<()> {
    let config = EstateConfig::load()?;

    for name in clients::available_clients() {
        let status = match clients::create_client(name, &config) {
            Ok(client) => match client.health_check() {
                Ok(ClientStatus::Available) => "available".to_string(),
                Ok(ClientStatus::NoApiKey) => "no API key".to_string(),
                Ok(ClientStatus::Unavailable(reason)) => format!("unavailable: {}", reason),
                Err(e) => format!("error: {}", e),
            },
            Err(e) => format!("not configured: {}", e),
        };

        let enabled = if config.is_enabled(name) {
            ""
        } else {
            " (disabled)"
        };
        println!("{:<8} {}{}", name, status, enabled);
    }

    Ok(())
}
