use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;

use baches::cli::{Cli, Commands, ConfigAction, OutputOptions, TokenAction};
use baches::commands::{
    AssignOptions, cmd_assign, cmd_catalogs, cmd_config_get, cmd_config_path, cmd_config_set,
    cmd_config_show, cmd_repair, cmd_show, cmd_token_clear, cmd_token_set, cmd_token_status,
    cmd_unassign,
};
use baches::logging::{LogTarget, init_logging};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The TUI owns the terminal, so its logs go to a file
    let target = match cli.command {
        Commands::Repair { .. } => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    init_logging(target);

    let result = match cli.command {
        Commands::Repair { id } => cmd_repair(id).await,

        Commands::Catalogs { json } => cmd_catalogs(OutputOptions::json(json)).await,
        Commands::Show { id, json } => cmd_show(id, OutputOptions::json(json)).await,
        Commands::Assign {
            id,
            squad,
            start,
            end,
            status,
            clear,
            json,
        } => {
            cmd_assign(
                id,
                AssignOptions {
                    squad,
                    start,
                    end,
                    status,
                    clear,
                },
                OutputOptions::json(json),
            )
            .await
        }
        Commands::Unassign { id, yes, json } => {
            cmd_unassign(id, yes, OutputOptions::json(json)).await
        }

        Commands::Token { action } => match action {
            TokenAction::Set { token } => cmd_token_set(&token),
            TokenAction::Clear => cmd_token_clear(),
            TokenAction::Status { json } => cmd_token_status(OutputOptions::json(json)),
        },

        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(OutputOptions::json(json)),
            ConfigAction::Get { key, json } => cmd_config_get(&key, OutputOptions::json(json)),
            ConfigAction::Set { key, value, json } => {
                cmd_config_set(&key, &value, OutputOptions::json(json))
            }
            ConfigAction::Path => cmd_config_path(),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
