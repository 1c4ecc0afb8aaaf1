use std::{path::Path, sync::Mutex};

use async_trait::async_trait;
use serde_json::Value;
use weather_report_core::{
    Alert, AlertSender, Config, Pipeline, WeatherProvider, error::AlertError, query,
};

#[derive(Debug)]
struct FixedProvider {
    body: Vec<u8>,
}

#[async_trait]
impl WeatherProvider for FixedProvider {
    async fn fetch_current(&self, _city: &str) -> anyhow::Result<Vec<u8>> {
        Ok(self.body.clone())
    }
}

#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<Alert>>,
}

#[async_trait]
impl AlertSender for RecordingSender {
    async fn send(&self, alert: &Alert) -> Result<(), AlertError> {
        self.sent.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

fn body_with_temperature(temp_c: f64) -> Vec<u8> {
    format!(
        r#"{{"location":{{"name":"Oslo","country":"Norway"}},
            "current":{{"last_updated":"2024-01-06 09:45","temp_c":{temp_c},
            "condition":{{"text":"Light snow"}},"wind_mph":8.1,"wind_dir":"NNW",
            "pressure_mb":1021.0,"humidity":86,"cloud":75,"feelslike_c":-18.7,
            "uv":1.0,"gust_mph":11.2}}}}"#
    )
    .into_bytes()
}

fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.files.raw_data = dir.join("weather_data.txt");
    config.files.parsed_data = dir.join("parsed_data.json");
    config.files.report_log = dir.join("weather_forecast.txt");
    config
}

#[tokio::test]
async fn run_writes_all_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let provider = FixedProvider { body: body_with_temperature(-3.5) };

    let record = Pipeline::new(&config, &provider).echo(false).run().await.unwrap();

    assert_eq!(record.location.as_str(), "Oslo, Norway");
    assert_eq!(record.temperature_c, -3.5);

    let raw = std::fs::read(&config.files.raw_data).unwrap();
    assert_eq!(raw, provider.body);

    let parsed: Value =
        serde_json::from_str(&std::fs::read_to_string(&config.files.parsed_data).unwrap()).unwrap();
    assert_eq!(parsed["parsed_data"]["current"]["wind_dir"], "NNW");

    let entry = query::query_report_log(&config.files.report_log, record.time.as_str())
        .unwrap()
        .expect("report entry must be queryable");
    assert_eq!(entry[0], format!("Time: {}", record.time));
    assert!(entry.contains(&"Temperature: -3.50°C".to_string()));
}

#[tokio::test]
async fn cold_reading_sends_alert() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let provider = FixedProvider { body: body_with_temperature(-12.0) };
    let sender = RecordingSender::default();

    Pipeline::new(&config, &provider).with_alerter(&sender).echo(false).run().await.unwrap();

    let sent = sender.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("-12.00°C"));
}

#[tokio::test]
async fn threshold_reading_does_not_alert() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let provider = FixedProvider { body: body_with_temperature(-10.0) };
    let sender = RecordingSender::default();

    Pipeline::new(&config, &provider).with_alerter(&sender).echo(false).run().await.unwrap();

    assert!(sender.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_body_stops_after_raw_write() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let provider = FixedProvider { body: b"<html>502 Bad Gateway</html>".to_vec() };
    let sender = RecordingSender::default();

    let err = Pipeline::new(&config, &provider)
        .with_alerter(&sender)
        .echo(false)
        .run()
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("JSON parsing error"));
    assert!(config.files.raw_data.exists());
    assert!(!config.files.parsed_data.exists());
    assert!(!config.files.report_log.exists());
    assert!(sender.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unwritable_parsed_file_ends_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.files.parsed_data = dir.path().join("no-such-dir").join("parsed_data.json");
    let provider = FixedProvider { body: body_with_temperature(-20.0) };
    let sender = RecordingSender::default();

    let err = Pipeline::new(&config, &provider)
        .with_alerter(&sender)
        .echo(false)
        .run()
        .await
        .unwrap_err();

    assert!(err.to_string().contains("no-such-dir"));
    assert!(config.files.raw_data.exists());
    assert!(!config.files.report_log.exists());
    assert!(sender.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn raw_file_keeps_non_utf8_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let provider = FixedProvider { body: b"{\"location\":{\"name\":\"Troms\xF8\"}}".to_vec() };

    let result = Pipeline::new(&config, &provider).echo(false).run().await;

    assert_eq!(std::fs::read(&config.files.raw_data).unwrap(), provider.body);
    assert!(result.is_err());
    assert!(!config.files.report_log.exists());
}

#[tokio::test]
async fn repeated_runs_append_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let provider = FixedProvider { body: body_with_temperature(1.0) };

    for _ in 0..3 {
        Pipeline::new(&config, &provider).echo(false).run().await.unwrap();
    }

    let log = std::fs::read_to_string(&config.files.report_log).unwrap();
    assert_eq!(log.matches("Weather Report").count(), 3);
    assert_eq!(log.lines().filter(|l| l.starts_with("Time: ")).count(), 3);
}
