//! Core library for the `weather-report` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weatherapi.com fetcher behind a provider trait
//! - Extraction of a fixed report record from the raw JSON
//! - Report log writing and lookup
//! - The cold-weather mail alert
//!
//! It is used by `weather-report`, but the pipeline can be driven from any binary.

pub mod alert;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod model;
pub mod persist;
pub mod pipeline;
pub mod provider;
pub mod query;
pub mod report;

pub use alert::{Alert, AlertSender, SmtpAlertSender};
pub use config::{Config, MailConfig};
pub use model::WeatherRecord;
pub use pipeline::Pipeline;
pub use provider::WeatherProvider;
