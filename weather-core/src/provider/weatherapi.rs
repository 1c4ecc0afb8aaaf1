use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

#[derive(Debug)]
pub struct WeatherApiProviderBuilder {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl WeatherApiProviderBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<WeatherApiProvider> {
        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(WeatherApiProvider {
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            http: http.build().context("Failed to build HTTP client")?,
        })
    }
}

impl WeatherApiProvider {
    pub const DEFAULT_BASE_URL: &'static str = "http://api.weatherapi.com/v1";

    pub fn builder(api_key: String) -> WeatherApiProviderBuilder {
        WeatherApiProviderBuilder {
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    fn current_url(&self) -> String {
        format!("{}/current.json", self.base_url)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch_current(&self, city: &str) -> Result<Vec<u8>> {
        let url = self.current_url();
        info!("Requesting current weather for {city}");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city), ("aqi", "yes")])
            .send()
            .await
            .context("Failed to send request to WeatherAPI.com (current)")?;

        let status = res.status();
        let body = res.bytes().await.context("Failed to read WeatherAPI current response body")?;
        debug!("WeatherAPI responded with {status}, {} bytes", body.len());

        if !status.is_success() {
            return Err(anyhow!(
                "WeatherAPI current request failed with status {}: {}",
                status,
                truncate_body(&String::from_utf8_lossy(&body)),
            ));
        }

        Ok(body.to_vec())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
