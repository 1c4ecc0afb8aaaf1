use std::path::Path;

use crate::{
    error::PersistError,
    model::WeatherRecord,
    persist::{self, WriteMode},
};

const BANNER: &str = concat!(
    "******************************\n",
    "        Weather Report        \n",
    "******************************\n",
    "\n",
);
const SEPARATOR: &str = "--------------------------------\n";

/// Formats `record` as one report log entry, terminated by a blank line.
pub fn format_report(record: &WeatherRecord) -> String {
    format!("{BANNER}{}{SEPARATOR}{}\n", header(record), readings(record))
}

/// Same fields as [`format_report`] without the banner, for the terminal.
pub fn format_summary(record: &WeatherRecord) -> String {
    format!("{}{}\n", header(record), readings(record))
}

pub fn append_report(path: &Path, record: &WeatherRecord) -> Result<(), PersistError> {
    persist::write(path, format_report(record).as_bytes(), WriteMode::Append)
}

fn header(r: &WeatherRecord) -> String {
    format!("Time: {}\nLocation: {}\nLast Updated: {}\n", r.time, r.location, r.last_updated)
}

fn readings(r: &WeatherRecord) -> String {
    format!(
        "Temperature: {:.2}°C\n\
         Condition: {}\n\
         Wind: {:.2} mph, {}\n\
         Pressure: {:.2} mb\n\
         Humidity: {}%\n\
         Cloud Cover: {}%\n\
         Feels Like: {:.2}°C\n\
         UV Index: {:.2}\n\
         Wind Gust: {:.2} mph\n",
        r.temperature_c,
        r.condition,
        r.wind_mph,
        r.wind_dir,
        r.pressure_mb,
        r.humidity,
        r.cloud,
        r.feelslike_c,
        r.uv,
        r.gust_mph,
    )
}
