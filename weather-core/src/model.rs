use std::{fmt, ops::Deref};

pub const TIME_CAPACITY: usize = 29;
pub const LOCATION_CAPACITY: usize = 99;
pub const LAST_UPDATED_CAPACITY: usize = 29;
pub const CONDITION_CAPACITY: usize = 49;
pub const WIND_DIR_CAPACITY: usize = 4;

/// Text capped at `N` bytes. Longer input is cut at the last char boundary
/// that fits, so the value is always valid UTF-8 and never exceeds `N` bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundedText<const N: usize>(String);

impl<const N: usize> BoundedText<N> {
    pub fn new(value: impl Into<String>) -> Self {
        let mut value = value.into();
        if value.len() > N {
            let mut end = N;
            while !value.is_char_boundary(end) {
                end -= 1;
            }
            value.truncate(end);
        }
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub const fn capacity() -> usize {
        N
    }
}

impl<const N: usize> From<String> for BoundedText<N> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<const N: usize> From<&str> for BoundedText<N> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<const N: usize> Deref for BoundedText<N> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> fmt::Display for BoundedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One weather snapshot, created once per run and never modified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherRecord {
    pub time: BoundedText<TIME_CAPACITY>,
    pub location: BoundedText<LOCATION_CAPACITY>,
    pub last_updated: BoundedText<LAST_UPDATED_CAPACITY>,
    pub temperature_c: f64,
    pub condition: BoundedText<CONDITION_CAPACITY>,
    pub wind_mph: f64,
    pub wind_dir: BoundedText<WIND_DIR_CAPACITY>,
    pub pressure_mb: f64,
    pub humidity: i64,
    pub cloud: i64,
    pub feelslike_c: f64,
    pub uv: f64,
    pub gust_mph: f64,
}

impl WeatherRecord {
    /// The all-zero record, stamped with `time`.
    pub fn empty(time: &str) -> Self {
        Self { time: BoundedText::new(time), ..Self::default() }
    }
}
