//! Extreme-cold email alert.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use log::info;

use crate::{config::MailConfig, error::AlertError, model::WeatherRecord};

pub const DEFAULT_THRESHOLD_C: f64 = -10.0;

/// A composed alert mail, ready to submit.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub subject: String,
    pub body: String,
}

/// Strictly below: a reading equal to `threshold_c` does not alert.
pub fn should_alert(record: &WeatherRecord, threshold_c: f64) -> bool {
    record.temperature_c < threshold_c
}

pub fn compose_alert(record: &WeatherRecord, recipient_name: &str) -> Alert {
    let greeting = if recipient_name.is_empty() {
        "Hello,".to_string()
    } else {
        format!("Dear {recipient_name},")
    };

    let location = if record.location.is_empty() {
        String::new()
    } else {
        format!(" in {}", record.location)
    };

    Alert {
        subject: "Urgent Weather Alert - Extreme Cold Warning".to_string(),
        body: format!(
            "{greeting}\n\
             Warning: Temperature{location} is below threshold: {:.2}°C\n\
             Bundle up and stay warm, cold fever expected!\n\
             \n\
             Stay Safe,\n\
             Weather Alert\n",
            record.temperature_c
        ),
    }
}

/// Returns the alert to send for `record`, if any.
pub fn check_cold(
    record: &WeatherRecord,
    threshold_c: f64,
    recipient_name: &str,
) -> Option<Alert> {
    should_alert(record, threshold_c).then(|| compose_alert(record, recipient_name))
}

#[async_trait]
pub trait AlertSender: Send + Sync {
    async fn send(&self, alert: &Alert) -> Result<(), AlertError>;
}

/// Submits alerts over SMTP with implicit TLS.
pub struct SmtpAlertSender {
    from: Mailbox,
    to: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpAlertSender {
    pub fn new(config: &MailConfig) -> Result<Self, AlertError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(config.username.clone(), config.password.clone()))
            .build();

        Ok(Self {
            from: parse_mailbox(&config.from)?,
            to: parse_mailbox(&config.to)?,
            transport,
        })
    }

    fn build_message(&self, alert: &Alert) -> Result<Message, AlertError> {
        Ok(Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(alert.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body.clone())?)
    }
}

#[async_trait]
impl AlertSender for SmtpAlertSender {
    async fn send(&self, alert: &Alert) -> Result<(), AlertError> {
        let message = self.build_message(alert)?;
        self.transport.send(message).await?;
        info!("Alert mail accepted for {}", self.to);
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, AlertError> {
    address
        .parse::<Mailbox>()
        .map_err(|source| AlertError::Address { address: address.to_string(), source })
}
