use std::{
    io::{self, BufRead, IsTerminal},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, InquireError, Password, Text};
use log::{debug, info};
use weather_report_core::{
    Config, MailConfig, Pipeline, SmtpAlertSender,
    pipeline::TIME_FORMAT,
    provider::provider_from_config,
    query::query_report_log,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-report", version, about = "Weather report and cold alert")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch current weather, write the report, alert on cold, then query (default).
    Run {
        /// City to fetch instead of the configured one.
        #[arg(long)]
        city: Option<String>,

        /// Skip the lookup after the run.
        #[arg(long)]
        no_query: bool,

        /// Look up this time after the run instead of asking for one.
        #[arg(long)]
        time: Option<String>,
    },

    /// Print a past report whose time contains the given text.
    Query {
        /// Timestamp or part of one, e.g. "2024-01-06 09:54"; prompted for if absent.
        #[arg(long)]
        time: Option<String>,

        /// Report log to search instead of the configured one.
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Interactively write the configuration file.
    Configure,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    pub async fn run(self, mut config: Config) -> Result<()> {
        let command = self.command.unwrap_or(Command::Run { city: None, no_query: false, time: None });

        match command {
            Command::Run { city, no_query, time } => {
                if let Some(city) = city {
                    config.city = city;
                }
                run_pipeline(&config).await?;

                if !no_query {
                    print_banner();
                    query(&config.files.report_log, time)?;
                }
            }
            Command::Query { time, file } => {
                let path = file.unwrap_or_else(|| config.files.report_log.clone());
                query(&path, time)?;
            }
            Command::Configure => {
                let path = match self.config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };
                configure(config, &path)?;
            }
        }

        Ok(())
    }
}

async fn run_pipeline(config: &Config) -> Result<()> {
    let provider = provider_from_config(config)?;

    let sender = match &config.mail {
        Some(mail) => Some(SmtpAlertSender::new(mail).context("Invalid mail configuration")?),
        None => None,
    };

    let mut pipeline = Pipeline::new(config, provider.as_ref());
    if let Some(sender) = &sender {
        pipeline = pipeline.with_alerter(sender);
    }

    let record = pipeline.run().await?;
    info!("Run complete for {} at {}", record.location, record.time);
    Ok(())
}

fn print_banner() {
    println!();
    println!("{}", "*".repeat(86));
    println!(" {:-^85}", "| Weather Report |");
    println!("{}\n", "*".repeat(86));
}

/// First line of `reader` without its line ending, or `None` at end of input.
fn read_needle<R: BufRead>(mut reader: R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn query(path: &Path, time: Option<String>) -> Result<()> {
    let needle = match time {
        Some(time) => time,
        None if !io::stdin().is_terminal() => {
            match read_needle(io::stdin().lock()).context("Failed to read query")? {
                Some(needle) => needle,
                None => return Ok(()),
            }
        }
        None => {
            let example = Local::now().format(TIME_FORMAT).to_string();
            match Text::new("Enter time for which you want to know the weather conditions:")
                .with_placeholder(&example)
                .with_help_message("any part of a report's time, e.g. a date or HH:MM")
                .prompt()
            {
                Ok(needle) => needle,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(());
                }
                Err(e) => return Err(e).context("Failed to read query"),
            }
        }
    };

    match query_report_log(path, needle.trim())? {
        Some(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        None => debug!("No report found for '{}'", needle.trim()),
    }

    Ok(())
}

fn configure(mut config: Config, path: &Path) -> Result<()> {
    let city = Text::new("City:").with_default(&config.city).prompt()?;
    config.city = city;

    config.alert_threshold_c = CustomType::<f64>::new("Cold alert threshold (°C):")
        .with_default(config.alert_threshold_c)
        .with_error_message("Please type a number, e.g. -10.0")
        .prompt()?;

    let api_key = Password::new("WeatherAPI.com API key (empty keeps current):")
        .without_confirmation()
        .prompt()?;
    if !api_key.is_empty() {
        config.api.api_key = api_key;
    }

    if Confirm::new("Send cold alerts by mail?").with_default(config.mail.is_some()).prompt()? {
        config.mail = Some(configure_mail(config.mail.take())?);
    } else {
        config.mail = None;
    }

    config.save_to(path)?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn configure_mail(current: Option<MailConfig>) -> Result<MailConfig> {
    let current = current.unwrap_or_default();

    let smtp_host = Text::new("SMTP host:").with_default(&current.smtp_host).prompt()?;
    let smtp_port = CustomType::<u16>::new("SMTP port:").with_default(current.smtp_port).prompt()?;
    let username = Text::new("SMTP user:").with_default(&current.username).prompt()?;
    let password = Password::new("SMTP password (empty keeps current):")
        .without_confirmation()
        .prompt()?;
    let from = Text::new("From:").with_default(&current.from).prompt()?;
    let to = Text::new("To:").with_default(&current.to).prompt()?;
    let recipient_name =
        Text::new("Recipient name:").with_default(&current.recipient_name).prompt()?;

    Ok(MailConfig {
        smtp_host,
        smtp_port,
        username,
        password: if password.is_empty() { current.password } else { password },
        from,
        to,
        recipient_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn needle_is_first_line_without_newline() {
        let needle = read_needle(Cursor::new("2024-01-06 09:54\r\nignored\n")).unwrap();
        assert_eq!(needle.as_deref(), Some("2024-01-06 09:54"));
    }

    #[test]
    fn empty_input_yields_no_needle() {
        assert_eq!(read_needle(Cursor::new("")).unwrap(), None);
    }

    #[test]
    fn run_accepts_time() {
        let cli = Cli::try_parse_from(["weather-report", "run", "--time", "09:54"]).unwrap();

        match cli.command {
            Some(Command::Run { time, no_query, .. }) => {
                assert_eq!(time.as_deref(), Some("09:54"));
                assert!(!no_query);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
