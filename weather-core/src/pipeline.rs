use anyhow::{Context, Result};
use chrono::Local;
use log::{error, info, warn};

use crate::{
    alert::{AlertSender, check_cold},
    config::Config,
    extract,
    model::WeatherRecord,
    persist::{self, WriteMode},
    provider::WeatherProvider,
    report,
};

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One run: fetch, persist, extract, report, alert.
pub struct Pipeline<'a> {
    config: &'a Config,
    provider: &'a dyn WeatherProvider,
    alerter: Option<&'a dyn AlertSender>,
    echo: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, provider: &'a dyn WeatherProvider) -> Self {
        Self { config, provider, alerter: None, echo: true }
    }

    /// Without an alerter, cold readings are logged and no mail is sent.
    pub fn with_alerter(mut self, alerter: &'a dyn AlertSender) -> Self {
        self.alerter = Some(alerter);
        self
    }

    /// Whether to print the summary to stdout.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub async fn run(&self) -> Result<WeatherRecord> {
        let files = &self.config.files;

        let body = self.provider.fetch_current(&self.config.city).await?;

        persist::write(&files.raw_data, &body, WriteMode::Truncate)?;
        info!("Weather data saved to {}", files.raw_data.display());

        let raw = persist::read(&files.raw_data)?;
        let root = extract::parse(&raw)
            .with_context(|| format!("Failed to parse {}", files.raw_data.display()))?;

        persist::write_parsed(&files.parsed_data, &root)?;
        info!("Parsed data saved to {}", files.parsed_data.display());

        let time = Local::now().format(TIME_FORMAT).to_string();
        let record = extract::extract(&root, &time);

        report::append_report(&files.report_log, &record)?;
        info!("Report appended to {}", files.report_log.display());

        if self.echo {
            print!("{}", report::format_summary(&record));
        }

        self.alert(&record).await;

        Ok(record)
    }

    async fn alert(&self, record: &WeatherRecord) {
        let recipient =
            self.config.mail.as_ref().map(|m| m.recipient_name.as_str()).unwrap_or_default();
        let Some(alert) = check_cold(record, self.config.alert_threshold_c, recipient) else {
            return;
        };

        let Some(alerter) = self.alerter else {
            warn!(
                "Temperature {:.2}°C is below {:.2}°C but mail is not configured; alert skipped",
                record.temperature_c, self.config.alert_threshold_c
            );
            return;
        };

        match alerter.send(&alert).await {
            Ok(()) => info!("Cold weather alert sent"),
            Err(e) => error!("Cold weather alert failed: {e}"),
        }
    }
}
