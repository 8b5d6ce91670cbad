//! Configuration commands.
//!
//! - `config show`: effective configuration, env overrides applied
//! - `config get`/`config set`: a single key in the config file
//! - `config path`: where the file lives

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{CONFIG_KEYS, Config, ENV_BASE_URL, ENV_TIMEOUT_MS};
use crate::error::Result;
use crate::logging::log_file_path;
use crate::remote::TokenStorage;

fn overridden(var: &str) -> bool {
    std::env::var(var).is_ok_and(|v| !v.trim().is_empty())
}

/// Show the effective configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::effective()?;
    let storage = TokenStorage::default_location();

    let json_output = json!({
        "base_url": config.base_url,
        "timeout_ms": config.timeout_ms,
        "notification_ms": config.notification_ms,
        "config_file": Config::config_path().to_string_lossy(),
        "token_storage": storage.path().to_string_lossy(),
        "log_file": log_file_path().to_string_lossy(),
    });

    let env_note = |var: &str| {
        if overridden(var) {
            format!(" {}", format!("(from {var})").dimmed())
        } else {
            String::new()
        }
    };

    let mut text = format!("{}\n\n", "Configuration:".cyan().bold());
    text.push_str(&format!(
        "{}: {}{}\n",
        "base_url".cyan(),
        config.base_url,
        env_note(ENV_BASE_URL)
    ));
    text.push_str(&format!(
        "{}: {}{}\n",
        "timeout_ms".cyan(),
        config.timeout_ms,
        env_note(ENV_TIMEOUT_MS)
    ));
    text.push_str(&format!(
        "{}: {}\n\n",
        "notification_ms".cyan(),
        config.notification_ms
    ));
    text.push_str(&format!(
        "{}\n{}\n{}",
        format!("Config file: {}", Config::config_path().display()).dimmed(),
        format!("Token storage: {}", storage.path().display()).dimmed(),
        format!("Log file: {}", log_file_path().display()).dimmed(),
    ));

    CommandOutput::new(json_output).with_text(text).print(output)
}

/// Get a value from the config file
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;

    CommandOutput::new(json!({ "key": key, "value": value }))
        .with_text(value)
        .print(output)
}

/// Set a value in the config file
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let stored = config.get(key)?;
    tracing::info!(key, value = %stored, "config updated");

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": stored,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), stored))
    .print(output)
}

/// Print the config file path
pub fn cmd_config_path() -> Result<()> {
    println!("{}", Config::config_path().display());
    Ok(())
}
