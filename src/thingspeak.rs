//! ThingSpeak REST client.

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::config::LocatorConfig;
use crate::feed::{ChannelFeed, FeedEntry};

pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Newest feed entry of a locator's channel, or None when the channel
    /// has not received any data yet.
    pub async fn latest_feed(&self, locator: &LocatorConfig) -> Result<Option<FeedEntry>> {
        let url = format!("{}/channels/{}/feeds.json", self.base_url, locator.channel);
        let data: ChannelFeed = self
            .http
            .get(url)
            .query(&[("api_key", locator.read_api_key.as_str()), ("results", "1")])
            .send()
            .await
            .with_context(|| format!("Failed to fetch feed for {}", locator.id))?
            .error_for_status()
            .with_context(|| format!("Feed request for {} rejected", locator.id))?
            .json()
            .await
            .with_context(|| format!("Failed to decode feed for {}", locator.id))?;

        Ok(data.feeds.into_iter().next())
    }

    pub async fn channel_status(&self, locator: &LocatorConfig) -> Result<Value> {
        let url = format!("{}/channels/{}/status.json", self.base_url, locator.channel);
        let data = self
            .http
            .get(url)
            .query(&[("api_key", locator.read_api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to fetch status for {}", locator.id))?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("Failed to decode status for {}", locator.id))?;

        Ok(data)
    }

    /// Write one field value. ThingSpeak answers with the new entry id and
    /// uses 0 to signal a rejected update.
    pub async fn update_field(
        &self,
        locator: &LocatorConfig,
        field: u8,
        value: &str,
    ) -> Result<i64> {
        let Some(write_key) = locator.write_api_key.as_deref() else {
            bail!("locator {} has no write_api_key configured", locator.id);
        };

        let url = format!("{}/update", self.base_url);
        let field_param = format!("field{field}");
        let body = self
            .http
            .get(url)
            .query(&[("api_key", write_key), (field_param.as_str(), value)])
            .send()
            .await
            .with_context(|| format!("Failed to update field{field} for {}", locator.id))?
            .error_for_status()?
            .text()
            .await?;

        let entry_id: i64 = body
            .trim()
            .parse()
            .with_context(|| format!("Unexpected update response: {body:?}"))?;
        if entry_id == 0 {
            bail!("update rejected by ThingSpeak (rate limit or bad key)");
        }
        Ok(entry_id)
    }
}
