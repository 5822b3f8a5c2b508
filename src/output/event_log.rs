//! Append-only CSV log of presence sessions

use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::error::{FacecueError, LogError};

pub const HEADER: [&str; 3] = ["Timestamp", "Event", "Duration (seconds)"];

/// Kind of logged event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The face left the frame
    FaceLeft,
    /// Tracking stopped while a face was present
    TrackingEnded,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FaceLeft => "Face left",
            Self::TrackingEnded => "Tracking ended",
        }
    }
}

/// One row of the event log
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub event: EventKind,
    /// Whole seconds, truncated
    pub duration_secs: u64,
}

impl LogRecord {
    fn fields(&self) -> [String; 3] {
        [
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            self.event.label().to_string(),
            self.duration_secs.to_string(),
        ]
    }
}

/// Durable record of presence events
pub trait EventLog {
    fn append(&mut self, record: &LogRecord) -> Result<(), FacecueError>;
}

/// CSV file recreated at startup and reopened in append mode for every row
#[derive(Debug)]
pub struct CsvEventLog {
    path: PathBuf,
}

impl CsvEventLog {
    /// Truncate (or create) the file and write the header row
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, FacecueError> {
        let path = path.as_ref().to_path_buf();
        let create_err = |message: String| LogError::Create {
            path: path.display().to_string(),
            message,
        };

        let mut writer = csv::Writer::from_path(&path).map_err(|e| create_err(e.to_string()))?;
        writer
            .write_record(HEADER)
            .map_err(|e| create_err(e.to_string()))?;
        writer.flush().map_err(|e| create_err(e.to_string()))?;

        tracing::info!("Event log created at {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventLog for CsvEventLog {
    fn append(&mut self, record: &LogRecord) -> Result<(), FacecueError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| LogError::Append(format!("{}: {}", self.path.display(), e)))?;

        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(record.fields())
            .map_err(|e| LogError::Append(e.to_string()))?;
        writer.flush().map_err(|e| LogError::Append(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(event: EventKind, duration_secs: u64) -> LogRecord {
        LogRecord {
            timestamp: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
            event,
            duration_secs,
        }
    }

    #[test]
    fn test_header_then_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observer_log.csv");

        let mut log = CsvEventLog::create(&path).unwrap();
        log.append(&record(EventKind::FaceLeft, 12)).unwrap();
        log.append(&record(EventKind::TrackingEnded, 3)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Timestamp,Event,Duration (seconds)",
                "2024-03-09 14:05:07.000000,Face left,12",
                "2024-03-09 14:05:07.000000,Tracking ended,3",
            ]
        );
    }

    #[test]
    fn test_create_truncates_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observer_log.csv");
        std::fs::write(&path, "old,data,1\nmore,old,2\n").unwrap();

        CsvEventLog::create(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.lines().collect::<Vec<_>>(),
            vec!["Timestamp,Event,Duration (seconds)"]
        );
    }

    #[test]
    fn test_append_after_file_removed_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observer_log.csv");

        let mut log = CsvEventLog::create(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            log.append(&record(EventKind::FaceLeft, 1)),
            Err(FacecueError::Log(LogError::Append(_)))
        ));
    }

    #[test]
    fn test_create_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("log.csv");

        assert!(matches!(
            CsvEventLog::create(&path),
            Err(FacecueError::Log(LogError::Create { .. }))
        ));
    }
}
