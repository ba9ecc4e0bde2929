use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod config;
mod feed;
mod geo;
mod model;
mod panel;
mod thingspeak;

use config::Config;
use geo::GeoPoint;
use thingspeak::Client;

#[derive(Debug, Parser)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch and print the latest reading of one locator
    Fetch {
        locator: String,
        /// Observer position as LAT,LON; overrides the config
        #[arg(long)]
        observer: Option<String>,
    },
    /// Poll all configured locators on an interval
    Watch {
        /// Seconds between polls
        #[arg(long)]
        interval: Option<u64>,
        #[arg(long)]
        observer: Option<String>,
    },
    /// Print the channel status of one locator
    Status { locator: String },
    /// Write one field value to a locator's channel
    Update {
        locator: String,
        field: u8,
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = match cli.config.as_deref() {
        Some(x) => x,
        None => Path::new("config.toml"),
    };
    let config = config::load(path)?;
    let client = Client::new(config.base_url());

    match cli.command {
        Command::Fetch { locator, observer } => {
            let observer = resolve_observer(&config, observer.as_deref())?;
            let (index, locator) = config.locator(&locator)?;
            match client.latest_feed(locator).await? {
                Some(entry) => {
                    let reading =
                        feed::normalize(&entry, &locator.field_mapping(index), &locator.id, &locator.name)
                            .with_observer(observer);
                    panel::print(&reading);
                }
                None => println!("{}: no feed entries yet", locator.name),
            }
        }

        Command::Watch { interval, observer } => {
            let observer = resolve_observer(&config, observer.as_deref())?;
            let secs = interval.unwrap_or_else(|| config.poll_interval_secs());
            watch(&config, &client, observer, secs).await;
        }

        Command::Status { locator } => {
            let (_, locator) = config.locator(&locator)?;
            let status = client.channel_status(locator).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }

        Command::Update {
            locator,
            field,
            value,
        } => {
            let (_, locator) = config.locator(&locator)?;
            let entry_id = client.update_field(locator, field, &value).await?;
            println!("entry {entry_id}");
        }
    }

    Ok(())
}

/// Poll every configured locator each tick; one locator failing does not
/// stop the loop or the others.
async fn watch(config: &Config, client: &Client, observer: Option<GeoPoint>, secs: u64) {
    if let Some(observer) = observer {
        println!(
            "Observer position: {:.6}, {:.6}",
            observer.latitude, observer.longitude
        );
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(secs));
    loop {
        ticker.tick().await;
        for (index, locator) in config.locators.iter().enumerate() {
            match client.latest_feed(locator).await {
                Ok(Some(entry)) => {
                    let reading = feed::normalize(
                        &entry,
                        &locator.field_mapping(index),
                        &locator.id,
                        &locator.name,
                    )
                    .with_observer(observer);
                    panel::print(&reading);
                }
                Ok(None) => println!("{}: no feed entries yet", locator.name),
                Err(e) => eprintln!("{}: {e:#}", locator.id),
            }
        }
        println!();
    }
}

fn resolve_observer(config: &Config, flag: Option<&str>) -> Result<Option<GeoPoint>> {
    match flag {
        Some(x) => parse_observer(x).map(Some),
        None => Ok(config.observer),
    }
}

fn parse_observer(s: &str) -> Result<GeoPoint> {
    let (lat, lon) = s
        .split_once(',')
        .context("observer must be LAT,LON")?;
    let latitude = lat.trim().parse().context("invalid observer latitude")?;
    let longitude = lon.trim().parse().context("invalid observer longitude")?;
    Ok(GeoPoint::new(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_observer_flag() {
        let p = parse_observer("6.90, 79.90").unwrap();
        assert_eq!(p, GeoPoint::new(6.90, 79.90));

        assert!(parse_observer("6.90").is_err());
        assert!(parse_observer("abc,79.90").is_err());
    }
}
