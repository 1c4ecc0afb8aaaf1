use crate::{Config, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

/// Source of raw current-weather JSON.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Performs one request for `city` and returns the response body byte for byte.
    async fn fetch_current(&self, city: &str) -> anyhow::Result<Vec<u8>>;
}

/// Construct the weatherapi.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider = WeatherApiProvider::builder(api_key.to_owned())
        .base_url(config.api.base_url.clone())
        .timeout(config.api.timeout())
        .build()?;

    Ok(Box::new(provider))
}
