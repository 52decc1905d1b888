//! `parkcard` command-line entry point.

mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};

#[derive(Debug, Parser)]
#[command(name = "parkcard", version, about = "Parking access card reader service")]
struct Cli {
    /// Config file name, with or without extension.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the reader reconnection worker until Ctrl-C.
    Serve,

    /// List serial ports and whether they can be opened.
    Ports,

    /// Show or change the reader serial port.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Show or change the Mifare sector key and sector number.
    Mifare {
        #[command(subcommand)]
        action: MifareAction,
    },

    /// Decode a 48-byte sector dump and print the card record.
    Decode {
        /// Card UID as 8 hex digits.
        #[arg(long)]
        uid: String,

        /// Sector bytes as hex; whitespace is ignored.
        #[arg(long)]
        sector: String,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        port: String,

        #[arg(long, default_value_t = parkcard_core::constants::DEFAULT_PORT_SPEED)]
        speed: i32,
    },
}

#[derive(Debug, Subcommand)]
enum MifareAction {
    Show,
    Set {
        /// Key as six colon-separated hex octets, e.g. FF:FF:FF:FF:FF:FF.
        #[arg(long)]
        key: String,

        #[arg(long)]
        sector: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config).context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Command::Serve => commands::serve(&config).await,
        Command::Ports => commands::ports(),
        Command::Settings { action } => match action {
            SettingsAction::Show => commands::settings_show(&config).await,
            SettingsAction::Set { port, speed } => {
                commands::settings_set(&config, &port, speed).await
            }
        },
        Command::Mifare { action } => match action {
            MifareAction::Show => commands::mifare_show(&config).await,
            MifareAction::Set { key, sector } => {
                commands::mifare_set(&config, &key, sector).await
            }
        },
        Command::Decode { uid, sector } => commands::decode(&uid, &sector),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_settings_set() {
        let cli = Cli::parse_from(["parkcard", "settings", "set", "--port", "COM3"]);
        match cli.command {
            Command::Settings {
                action: SettingsAction::Set { port, speed },
            } => {
                assert_eq!(port, "COM3");
                assert_eq!(speed, 9600);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.config, "parkcard");
    }

    #[test]
    fn test_parse_decode_with_config() {
        let cli = Cli::parse_from([
            "parkcard",
            "decode",
            "--uid",
            "ABCD65E8",
            "--sector",
            "00",
            "--config",
            "/etc/parkcard",
        ]);
        assert!(matches!(cli.command, Command::Decode { .. }));
        assert_eq!(cli.config, "/etc/parkcard");
    }
}
