//! Access token management.
//!
//! - `token set`: store the token sent as `X-Auth-Token`
//! - `token clear`: forget it
//! - `token status`: report whether a token is available

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::error::{BachesError, Result};
use crate::remote::token::{ENV_TOKEN, TOKEN_KEY, TokenSource, mask_token};
use crate::remote::{StoredTokenProvider, TokenStorage};

/// Store the access token
pub fn cmd_token_set(token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(BachesError::Other("token cannot be empty".to_string()));
    }

    let storage = TokenStorage::default_location();
    storage.set(TOKEN_KEY, token)?;
    tracing::info!(path = %storage.path().display(), "token stored");

    println!(
        "Stored token {} in {}",
        mask_token(token).cyan(),
        storage.path().display().to_string().dimmed()
    );
    if std::env::var(ENV_TOKEN).is_ok_and(|v| !v.trim().is_empty()) {
        eprintln!(
            "{} {ENV_TOKEN} is set and takes precedence over the stored token",
            "note:".yellow()
        );
    }
    Ok(())
}

/// Remove the stored access token
pub fn cmd_token_clear() -> Result<()> {
    let storage = TokenStorage::default_location();
    if storage.remove(TOKEN_KEY)? {
        println!("Removed stored token");
    } else {
        println!("{}", "No token stored".dimmed());
    }
    Ok(())
}

/// Report where the active token comes from, without revealing it
pub fn cmd_token_status(output: OutputOptions) -> Result<()> {
    let storage = TokenStorage::default_location();
    let provider = StoredTokenProvider::new(storage.clone());

    let (json_output, text) = match provider.lookup() {
        Some((token, source)) => {
            let masked = mask_token(&token);
            let source_key = match source {
                TokenSource::Environment => "environment",
                TokenSource::Storage => "storage",
            };
            (
                json!({
                    "configured": true,
                    "source": source_key,
                    "value": masked,
                    "masked": true,
                    "storage_file": storage.path().to_string_lossy(),
                }),
                format!(
                    "Token: {} (from {})",
                    masked.cyan(),
                    source.to_string().dimmed()
                ),
            )
        }
        None => (
            json!({
                "configured": false,
                "storage_file": storage.path().to_string_lossy(),
            }),
            format!(
                "Token: {}\nSet one with: baches token set <token>",
                "not configured".yellow()
            ),
        ),
    };

    CommandOutput::new(json_output).with_text(text).print(output)
}
