use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::{
    City, Config, WeatherRecord,
    error::FetchError,
    normalize::{normalize, parse_payload, provider_error_message},
    provider::WeatherSource,
};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";
/// Responses are always requested in Russian.
pub const LANG: &str = "ru";

/// Live adapter for the WeatherAPI.com `current.json` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherApiSource {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiSource {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Build from config. A missing key is not an error here: the provider
    /// will reject the request and the flow falls back.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client for WeatherAPI")?;

        Ok(Self {
            api_key: config.api_key.clone().unwrap_or_default(),
            base_url: config.base_url.clone(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn current_url(&self) -> String {
        format!("{}/v1/current.json", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl WeatherSource for WeatherApiSource {
    async fn fetch(&self, city: &City) -> Result<WeatherRecord, FetchError> {
        let res = self
            .http
            .get(self.current_url())
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", city.name.as_str()),
                ("lang", LANG),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, body = %truncate_body(&body), "WeatherAPI returned an error status");
            return Err(FetchError::http_status(status, provider_error_message(&body)));
        }

        let payload = parse_payload(&body)?;
        normalize(&payload)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
