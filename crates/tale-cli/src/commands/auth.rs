//! Account commands: login, register, logout.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use tale_core::Gateway;

use crate::config::Config;

fn gateway(config: &Config) -> Result<Gateway> {
    Gateway::with_timeout(&config.base_url, Duration::from_secs(config.timeout_secs))
        .context("Failed to create the story gateway")
}

/// Execute the login command.
pub async fn cmd_login(config: &mut Config, email: &str, password: &str) -> Result<()> {
    let result = gateway(config)?.login(email, password).await;
    if result.error {
        bail!("{}", result.message);
    }

    let Some(token) = result.token else {
        bail!("Login succeeded but the backend returned no token");
    };

    config.token = Some(token);
    config.save()?;

    let name = result.name.unwrap_or_else(|| email.to_string());
    println!("Logged in as {name}");

    Ok(())
}

/// Execute the register command.
pub async fn cmd_register(config: &Config, name: &str, email: &str, password: &str) -> Result<()> {
    let result = gateway(config)?.register(name, email, password).await;
    if result.error {
        bail!("{}", result.message);
    }

    println!("{}", result.message);
    println!("Use 'tale login' to start submitting as {name}.");

    Ok(())
}

/// Execute the logout command.
pub fn cmd_logout(config: &mut Config) -> Result<()> {
    if config.token.take().is_some() {
        config.save()?;
        println!("Logged out; future calls are anonymous.");
    } else {
        println!("Not logged in.");
    }

    Ok(())
}
