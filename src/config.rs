use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::feed::FieldMapping;
use crate::geo::GeoPoint;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub base_url: Option<String>,
    /// Fixed observer position used for distance and ETA enrichment; absent
    /// means readings are rendered without those rows.
    pub observer: Option<GeoPoint>,
    pub poll_interval_secs: Option<u64>,

    #[serde(rename = "locator")]
    pub locators: Vec<LocatorConfig>,
}

#[derive(Debug, Deserialize)]
pub struct LocatorConfig {
    pub id: String,
    pub name: String,
    pub channel: String,
    pub read_api_key: String,
    pub write_api_key: Option<String>,
    pub fields: Option<FieldMapping>,
}

impl Config {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or("https://api.thingspeak.com")
    }

    // the original system polled every 30 seconds
    pub fn poll_interval_secs(&self) -> u64 {
        self.poll_interval_secs.unwrap_or(30)
    }

    /// Locator entry by id, with its position in the list (the position
    /// decides the default slot layout).
    pub fn locator(&self, id: &str) -> Result<(usize, &LocatorConfig)> {
        match self.locators.iter().enumerate().find(|(_, x)| x.id == id) {
            Some(x) => Ok(x),
            None => bail!("no locator {id:?} in config"),
        }
    }
}

impl LocatorConfig {
    /// Explicit mapping from config, or the contiguous default layout: the
    /// first locator occupies slots 1..4, the second 5..8, and so on within
    /// the shared record shape.
    pub fn field_mapping(&self, index: usize) -> FieldMapping {
        match &self.fields {
            Some(x) => x.clone(),
            None => FieldMapping::slots(index as u8 * 4 + 1),
        }
    }
}

pub fn load(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path).context("Failed to read config")?;
    let config = toml::from_str(&data).context("Failed to parse config")?;
    Ok(config)
}
