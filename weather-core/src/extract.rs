//! Turns a weatherapi.com `current.json` body into a [`WeatherRecord`].
//!
//! There is no schema: each field is looked up by path and anything missing
//! or of the wrong type becomes zero or the empty string.

use serde_json::Value;

use crate::{
    error::ExtractError,
    model::{BoundedText, WeatherRecord},
};

pub fn parse(raw: &[u8]) -> Result<Value, ExtractError> {
    Ok(serde_json::from_slice(raw)?)
}

/// Copies the fixed field set out of a parsed response.
pub fn extract(root: &Value, time: &str) -> WeatherRecord {
    let location = &root["location"];
    let current = &root["current"];

    WeatherRecord {
        time: BoundedText::new(time),
        location: BoundedText::new(join_location(
            text_at(&location["name"]),
            text_at(&location["country"]),
        )),
        last_updated: BoundedText::new(text_at(&current["last_updated"])),
        temperature_c: number_at(&current["temp_c"]),
        condition: BoundedText::new(text_at(&current["condition"]["text"])),
        wind_mph: number_at(&current["wind_mph"]),
        wind_dir: BoundedText::new(text_at(&current["wind_dir"])),
        pressure_mb: number_at(&current["pressure_mb"]),
        humidity: integer_at(&current["humidity"]),
        cloud: integer_at(&current["cloud"]),
        feelslike_c: number_at(&current["feelslike_c"]),
        uv: number_at(&current["uv"]),
        gust_mph: number_at(&current["gust_mph"]),
    }
}

/// [`parse`] followed by [`extract`].
pub fn extract_record(raw: &str, time: &str) -> Result<WeatherRecord, ExtractError> {
    let root = parse(raw.as_bytes())?;
    Ok(extract(&root, time))
}

fn text_at(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn number_at(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

fn integer_at(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| number_at(value) as i64),
        Value::String(_) => number_at(value) as i64,
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

fn join_location(name: String, country: String) -> String {
    match (name.is_empty(), country.is_empty()) {
        (false, false) => format!("{name}, {country}"),
        (false, true) => name,
        (true, _) => country,
    }
}
