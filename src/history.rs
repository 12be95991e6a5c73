use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::GameResult;
use crate::level::LevelSummary;

/// One finished level, as written to `history.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: String,
    pub level: u32,
    pub outcome: String,
    pub points: u64,
    pub hits: usize,
    pub misses: usize,
    pub health: i32,
    pub accuracy: f64,
}

impl HistoryRecord {
    pub fn from_summary(summary: &LevelSummary) -> Self {
        Self {
            date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            level: summary.level,
            outcome: summary.outcome.to_string(),
            points: summary.points,
            hits: summary.hit_names.len(),
            misses: summary.missed_names.len(),
            health: summary.health,
            accuracy: summary.accuracy(),
        }
    }
}

/// Append-only csv log of finished levels.
#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &HistoryRecord) -> GameResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // header only when the file is new
        let needs_header = !self.path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    pub fn record(&self, summary: &LevelSummary) -> GameResult<()> {
        self.append(&HistoryRecord::from_summary(summary))
    }

    pub fn load(&self) -> GameResult<Vec<HistoryRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let records = reader
            .deserialize()
            .collect::<Result<Vec<HistoryRecord>, csv::Error>>()?;
        Ok(records)
    }

    pub fn best_points(&self) -> GameResult<Option<u64>> {
        Ok(self.load()?.iter().map(|r| r.points).max())
    }
}
