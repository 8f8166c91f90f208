//! JSON snapshot files read and written by the CLI.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json + "\n").with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mirra_core::types::{AppState, TimelineEntry};

    #[test]
    fn state_survives_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let created = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        let mut state = AppState::new(created);
        state
            .record_capture(TimelineEntry::new("p-1", created, 0.7))
            .unwrap();

        write_json(&path, &state).unwrap();
        let back: AppState = read_json(&path).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_json::<AppState>(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
