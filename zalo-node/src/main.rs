//! # Zalo Bridge CLI
//!
//! Drives the bridge core against a running gateway: health checks, QR login,
//! event streaming and one-shot sends.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use zalo_core::{BridgeConfig, ConfigLoader};

mod commands;
mod host;

/// CLI structure
#[derive(Parser, Debug)]
#[command(name = "zalo-bridge")]
#[command(about = "Zalo bridge remote-session manager")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the gateway is reachable
    Health,

    /// Log in by scanning a QR code
    Login {
        /// Write the login metadata to this file instead of stdout
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Connect a saved login and print remote events as JSON lines
    Run {
        /// Login metadata file written by `login --save`
        #[arg(long)]
        login: PathBuf,
        /// Where re-hosted media is stored
        #[arg(long, default_value = "./media")]
        media_dir: PathBuf,
    },

    /// Send a text message to a portal (`<thread-id>:<0|1>`)
    Send {
        portal: String,
        text: String,
        /// Login metadata file
        #[arg(long)]
        login: Option<PathBuf>,
    },

    /// Print the example configuration
    Config,
}

fn load_config(path: Option<PathBuf>) -> Result<BridgeConfig> {
    let loader = match path {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    Ok(loader.load()?)
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, config: BridgeConfig) -> Result<()> {
    match cli.command {
        Commands::Health => commands::health::execute(&config, cli.json).await,
        Commands::Login { save } => commands::login::execute(&config, save, cli.json).await,
        Commands::Run { login, media_dir } => {
            commands::run::execute(&config, &login, &media_dir).await
        }
        Commands::Send {
            portal,
            text,
            login,
        } => commands::send::execute(&config, &portal, &text, login.as_deref(), cli.json).await,
        Commands::Config => commands::config_cmd::execute(&config, cli.json),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };
    init_tracing(&config.logging.level);
    debug!(command = ?cli.command, "Running command");

    if let Err(e) = run(cli, config).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_commands() {
        let cli = Cli::try_parse_from(["zalo-bridge", "--json", "send", "123:1", "hello"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Send {
                portal,
                text,
                login,
            } => {
                assert_eq!(portal, "123:1");
                assert_eq!(text, "hello");
                assert!(login.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["zalo-bridge", "run", "--login", "me.json"]).unwrap();
        match cli.command {
            Commands::Run { login, media_dir } => {
                assert_eq!(login, PathBuf::from("me.json"));
                assert_eq!(media_dir, PathBuf::from("./media"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_run_requires_login() {
        assert!(Cli::try_parse_from(["zalo-bridge", "run"]).is_err());
    }
}
