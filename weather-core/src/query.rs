//! Lookup of a past report by timestamp substring.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::error::PersistError;

const TIME_MARKER: &str = "Time:";

/// Returns the first entry whose `Time:` line contains `needle`: that line and
/// every following line up to the next blank line or end of input.
pub fn find_entry<R: BufRead>(reader: R, needle: &str) -> std::io::Result<Option<Vec<String>>> {
    let mut lines = reader.lines();

    while let Some(line) = lines.next() {
        let line = line?;
        if !(line.contains(TIME_MARKER) && line.contains(needle)) {
            continue;
        }

        let mut entry = vec![line];
        for next in lines.by_ref() {
            let next = next?;
            if next.is_empty() {
                break;
            }
            entry.push(next);
        }
        return Ok(Some(entry));
    }

    Ok(None)
}

pub fn query_report_log(path: &Path, needle: &str) -> Result<Option<Vec<String>>, PersistError> {
    let file = File::open(path)
        .map_err(|source| PersistError::Open { path: path.to_path_buf(), source })?;

    find_entry(BufReader::new(file), needle)
        .map_err(|source| PersistError::Read { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::WeatherRecord, report::append_report};
    use std::io::Cursor;

    fn record_at(time: &str, temperature_c: f64) -> WeatherRecord {
        WeatherRecord { temperature_c, ..WeatherRecord::empty(time) }
    }

    #[test]
    fn returns_exactly_the_matching_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather_forecast.txt");

        let times = ["2024-01-06 09:54:24", "2024-01-06 10:54:24", "2024-01-06 11:54:24"];
        for (i, time) in times.iter().enumerate() {
            append_report(&path, &record_at(time, i as f64)).unwrap();
        }

        let entry = query_report_log(&path, "10:54").unwrap().expect("entry must exist");

        assert_eq!(entry.len(), 13);
        assert_eq!(entry[0], "Time: 2024-01-06 10:54:24");
        assert_eq!(entry[4], "Temperature: 1.00°C");
        assert_eq!(entry[12], "Wind Gust: 0.00 mph");
    }

    #[test]
    fn stops_at_first_match() {
        let log = "Time: 2024-01-06 09:00:00\nTemperature: 1.00°C\n\n\
                   Time: 2024-01-06 09:30:00\nTemperature: 2.00°C\n\n";

        let entry = find_entry(Cursor::new(log), "2024-01-06").unwrap().unwrap();

        assert_eq!(entry, vec!["Time: 2024-01-06 09:00:00", "Temperature: 1.00°C"]);
    }

    #[test]
    fn absent_timestamp_yields_nothing() {
        let log = "Time: 2024-01-06 09:00:00\nTemperature: 1.00°C\n\n";
        assert_eq!(find_entry(Cursor::new(log), "1999-12-31").unwrap(), None);
    }

    #[test]
    fn needle_must_be_on_a_time_line() {
        let log = "Location: Oslo, Norway\nLast Updated: 2024-01-06 09:45\n\n";
        assert_eq!(find_entry(Cursor::new(log), "09:45").unwrap(), None);
    }

    #[test]
    fn entry_without_trailing_blank_line_runs_to_eof() {
        let log = "Time: 2024-01-06 09:00:00\nTemperature: 1.00°C";

        let entry = find_entry(Cursor::new(log), "09:00").unwrap().unwrap();
        assert_eq!(entry.len(), 2);
    }

    #[test]
    fn missing_log_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = query_report_log(&dir.path().join("absent.txt"), "x").unwrap_err();

        assert!(matches!(err, PersistError::Open { .. }));
    }
}
