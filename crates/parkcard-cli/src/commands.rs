//! Subcommand implementations.

use anyhow::{Context, bail};
use parkcard_core::{CardUid, MifareKey, SectorNumber};
use parkcard_hardware::{AnySerialConnection, SerialPortConnection, available_ports};
use parkcard_protocol::decode_sector;
use parkcard_service::{ReconnectionWorker, SettingsWatcher};
use parkcard_storage::{
    Database, MifareSettingsRepository, ReaderSettingsResolver, SettingsRepository,
    SqliteMifareSettingsRepository, SqliteSettingsRepository,
};
use tracing::info;

use crate::config::AppConfig;

async fn open_database(config: &AppConfig) -> anyhow::Result<Database> {
    Database::new(config.database())
        .await
        .with_context(|| format!("failed to open database {}", config.database_path))
}

pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let db = open_database(config).await?;
    let resolver = ReaderSettingsResolver::new(SqliteSettingsRepository::new(db.pool().clone()));
    let connection = AnySerialConnection::Serial(SerialPortConnection::new());

    // Baseline first, so a save racing the worker start is reported again.
    let watcher = SettingsWatcher::new(resolver.clone(), config.settings_watch_interval()).await;
    let handle = ReconnectionWorker::spawn(connection, resolver, config.worker());
    let watching = watcher.spawn(handle.notifier());
    info!("parkcard {} serving, press Ctrl-C to stop", parkcard_core::VERSION);

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    info!("Shutting down");
    watching.shutdown().await?;
    handle.shutdown().await?;
    db.close().await;
    Ok(())
}

pub fn ports() -> anyhow::Result<()> {
    let ports = available_ports().context("failed to enumerate serial ports")?;
    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }

    for port in ports {
        let status = if port.available { "available" } else { "busy" };
        println!("{:<24} {}", port.name, status);
    }
    Ok(())
}

pub async fn settings_show(config: &AppConfig) -> anyhow::Result<()> {
    let db = open_database(config).await?;
    let repo = SqliteSettingsRepository::new(db.pool().clone());

    match repo.find_current().await? {
        Some(row) => println!("{}@{}", row.port_name(), row.serial_port_speed),
        None => println!("No serial setting found"),
    }
    Ok(())
}

pub async fn settings_set(config: &AppConfig, port: &str, speed: i32) -> anyhow::Result<()> {
    let db = open_database(config).await?;
    let resolver = ReaderSettingsResolver::new(SqliteSettingsRepository::new(db.pool().clone()));

    let saved = resolver.save(port, speed).await?;
    println!("Saved {}", saved);
    if saved.is_valid() {
        println!(
            "A running `parkcard serve` applies this within {}ms",
            config.settings_watch_ms
        );
    } else {
        println!("Warning: the reader will stay disconnected with these settings");
    }
    Ok(())
}

pub async fn mifare_show(config: &AppConfig) -> anyhow::Result<()> {
    let db = open_database(config).await?;
    let repo = SqliteMifareSettingsRepository::new(db.pool().clone());

    match repo.find_current().await? {
        Some(row) => println!("key {} sector {}", row.key()?, row.sector()?),
        None => println!("No Mifare setting found"),
    }
    Ok(())
}

pub async fn mifare_set(config: &AppConfig, key: &str, sector: i64) -> anyhow::Result<()> {
    let key: MifareKey = key.parse()?;
    let sector = SectorNumber::new(sector)?;

    let db = open_database(config).await?;
    let repo = SqliteMifareSettingsRepository::new(db.pool().clone());
    repo.upsert(&key, sector).await?;
    println!("Saved key {} sector {}", key, sector);
    Ok(())
}

pub fn decode(uid: &str, sector: &str) -> anyhow::Result<()> {
    let uid: CardUid = uid.parse()?;
    let bytes = parse_hex(sector)?;

    let record = decode_sector(uid, &bytes)?;
    println!("{record}");
    Ok(())
}

fn parse_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        bail!("sector dump is empty");
    }
    hex::decode(&cleaned).context("sector dump is not valid hex")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("00ff", vec![0x00, 0xFF])]
    #[case("00 FF\n10", vec![0x00, 0xFF, 0x10])]
    fn test_parse_hex(#[case] input: &str, #[case] expected: Vec<u8>) {
        assert_eq!(parse_hex(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("0")]
    #[case("zz")]
    fn test_parse_hex_rejects(#[case] input: &str) {
        assert!(parse_hex(input).is_err());
    }

    #[test]
    fn test_decode_rejects_short_sector() {
        assert!(decode("ABCD65E8", "0000").is_err());
    }

    #[test]
    fn test_decode_accepts_full_sector() {
        let dump = "00".repeat(48);
        assert!(decode("ABCD65E8", &dump).is_ok());
    }
}
