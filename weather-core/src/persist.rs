//! File output for the pipeline: raw body, wrapped parsed JSON, report log.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

use serde_json::Value;

use crate::error::PersistError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the file's contents.
    Truncate,
    /// Add to the end of the file, creating it if needed.
    Append,
}

/// Writes `content` to `path`. Not atomic: a crash mid-write leaves a partial file.
pub fn write(path: &Path, content: &[u8], mode: WriteMode) -> Result<(), PersistError> {
    let mut options = OpenOptions::new();
    match mode {
        WriteMode::Truncate => options.write(true).create(true).truncate(true),
        WriteMode::Append => options.append(true).create(true),
    };

    let mut file = options
        .open(path)
        .map_err(|source| PersistError::Open { path: path.to_path_buf(), source })?;

    file.write_all(content)
        .and_then(|()| file.flush())
        .map_err(|source| PersistError::Write { path: path.to_path_buf(), source })
}

pub fn read(path: &Path) -> Result<Vec<u8>, PersistError> {
    fs::read(path).map_err(|source| PersistError::Read { path: path.to_path_buf(), source })
}

/// Writes `value` as compact JSON wrapped in a `parsed_data` object.
pub fn write_parsed(path: &Path, value: &Value) -> Result<(), PersistError> {
    let json = serde_json::to_string(value)
        .map_err(|source| PersistError::Serialize { path: path.to_path_buf(), source })?;

    write(path, wrap_parsed(&json).as_bytes(), WriteMode::Truncate)
}

fn wrap_parsed(json: &str) -> String {
    format!("{{\n\"parsed_data\": {json}\n}}")
}
