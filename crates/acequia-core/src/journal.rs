use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io;

/// One line of the cycle audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub ts: DateTime<Utc>,
    pub cycle_id: String,
    pub instruction: String,
    pub executed: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

/// Append-only JSONL log of completed cycles.
pub struct CycleJournal {
    path: PathBuf,
}

impl CycleJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one record, creating the file (and parent directory) on
    /// first use.
    pub fn append(&self, record: &CycleRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                io::ensure_dir(parent)?;
            }
        }
        let line = serde_json::to_string(record)?;
        io::append_line(&self.path, &line)
    }

    /// All records in file order. A journal that was never written
    /// reads as empty; a torn trailing line is skipped.
    pub fn read_all(&self) -> Result<Vec<CycleRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        let mut records = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(error = %e, "skipping malformed journal line"),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(cycle_id: &str, executed: bool) -> CycleRecord {
        CycleRecord {
            ts: Utc::now(),
            cycle_id: cycle_id.to_string(),
            instruction: "water if dry".to_string(),
            executed,
            message: if executed {
                "irrigation started: area all, duration 10 minutes".to_string()
            } else {
                "no irrigation needed".to_string()
            },
            error: None,
            elapsed_ms: 12,
        }
    }

    #[test]
    fn missing_journal_reads_empty() {
        let dir = TempDir::new().unwrap();
        let journal = CycleJournal::new(dir.path().join("absent.jsonl"));
        assert!(journal.read_all().unwrap().is_empty());
    }

    #[test]
    fn append_then_read_roundtrips() {
        let dir = TempDir::new().unwrap();
        let journal = CycleJournal::new(dir.path().join("cycles.jsonl"));
        journal.append(&record("a", true)).unwrap();
        journal.append(&record("b", false)).unwrap();

        let records = journal.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].cycle_id, "a");
        assert!(records[0].executed);
        assert_eq!(records[1].cycle_id, "b");
        assert!(!records[1].executed);
    }

    #[test]
    fn append_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let journal = CycleJournal::new(dir.path().join("logs/cycles.jsonl"));
        journal.append(&record("a", true)).unwrap();
        assert_eq!(journal.read_all().unwrap().len(), 1);
    }

    #[test]
    fn torn_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cycles.jsonl");
        let journal = CycleJournal::new(&path);
        journal.append(&record("a", true)).unwrap();
        std::fs::write(
            &path,
            format!(
                "{}{}",
                std::fs::read_to_string(&path).unwrap(),
                "{\"ts\": \"2026-08-"
            ),
        )
        .unwrap();

        let records = journal.read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cycle_id, "a");
    }
}
