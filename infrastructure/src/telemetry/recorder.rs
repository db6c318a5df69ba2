//! JSONL telemetry recorder with retention pruning.
//!
//! Each [`TelemetryRecord`] is serialized as a single JSON line and
//! appended to the log file; every write is followed by a pruning pass
//! that drops lines whose `recorded_at` precedes the retention cutoff.
//! Malformed lines are kept rather than risking data loss.
//!
//! Recording is strictly best-effort: every failure is swallowed at
//! `warn` level and never reaches the caller or the exit code. The prune
//! rewrites the whole file, which is not safe against concurrent writers —
//! an accepted limitation for a single-user local tool.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use prism_application::ports::telemetry::{TelemetryPort, TelemetryRecord};
use tracing::warn;

/// Append-then-prune JSONL sink.
pub struct JsonlTelemetryRecorder {
    path: PathBuf,
    retention_days: u32,
}

impl JsonlTelemetryRecorder {
    /// Create a recorder writing to the given path.
    ///
    /// Parent directories are created eagerly; failure to do so is logged
    /// and the recorder still hands out a value — later appends will warn
    /// and drop records.
    pub fn new(path: impl AsRef<Path>, retention_days: u32) -> Self {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(
                    "could not create telemetry directory {}: {}",
                    parent.display(),
                    e
                );
            }
        }
        Self {
            path,
            retention_days,
        }
    }

    /// Default log location under the platform data directory.
    pub fn default_path(app_name: &str) -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(app_name)
            .join("telemetry.jsonl")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &TelemetryRecord) -> std::io::Result<()> {
        let line = serde_json::to_string(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        file.flush()
    }

    /// Drop lines older than the retention window; keep anything that does
    /// not parse.
    fn prune(&self) -> std::io::Result<()> {
        let cutoff = Utc::now() - Duration::days(i64::from(self.retention_days));

        let reader = BufReader::new(File::open(&self.path)?);
        let mut kept: Vec<String> = Vec::new();
        let mut dropped = 0usize;

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<TelemetryRecord>(&line) {
                Ok(record) => match DateTime::parse_from_rfc3339(&record.recorded_at) {
                    Ok(ts) if ts.with_timezone(&Utc) < cutoff => dropped += 1,
                    _ => kept.push(line),
                },
                // Malformed line: keep it rather than risk data loss.
                Err(_) => kept.push(line),
            }
        }

        if dropped == 0 {
            return Ok(());
        }

        let mut contents = kept.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        std::fs::write(&self.path, contents)
    }
}

impl TelemetryPort for JsonlTelemetryRecorder {
    fn record(&self, record: &TelemetryRecord) {
        if let Err(e) = self.append(record) {
            warn!("telemetry append failed: {}", e);
            return;
        }
        if let Err(e) = self.prune() {
            warn!("telemetry prune failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_lines(path: &Path) -> Vec<String> {
        let mut content = String::new();
        File::open(path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content.lines().map(str::to_string).collect()
    }

    fn record_at(recorded_at: &str, command: &str) -> TelemetryRecord {
        TelemetryRecord {
            schema_version: 1,
            recorded_at: recorded_at.to_string(),
            app: "prism".to_string(),
            command: format!("prism.{}", command),
            success: true,
            duration_ms: 5,
            exit_code: 0,
            error_code: None,
            error_category: None,
        }
    }

    #[test]
    fn test_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.jsonl");
        let recorder = JsonlTelemetryRecorder::new(&path, 30);

        recorder.record(&TelemetryRecord::now("prism", "prism.greet", true, 1, 0, None, None));
        recorder.record(&TelemetryRecord::now(
            "prism",
            "prism.boom",
            false,
            2,
            70,
            Some("E5000".into()),
            Some("internal".into()),
        ));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["command"], "prism.greet");
        assert_eq!(first["success"], true);
        assert!(first.get("args").is_none());
        assert!(first.get("result").is_none());
        assert!(first.get("error_code").is_none());

        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second["error_code"], "E5000");
        assert_eq!(second["error_category"], "internal");
    }

    #[test]
    fn test_prunes_expired_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.jsonl");
        let recorder = JsonlTelemetryRecorder::new(&path, 30);

        let old = record_at("2020-01-01T00:00:00Z", "ancient");
        std::fs::write(&path, format!("{}\n", serde_json::to_string(&old).unwrap())).unwrap();

        // A fresh write triggers the prune.
        recorder.record(&TelemetryRecord::now("prism", "prism.fresh", true, 1, 0, None, None));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("prism.fresh"));
    }

    #[test]
    fn test_prune_keeps_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.jsonl");
        let recorder = JsonlTelemetryRecorder::new(&path, 30);

        let old = record_at("2020-01-01T00:00:00Z", "ancient");
        std::fs::write(
            &path,
            format!(
                "{}\nnot json at all\n",
                serde_json::to_string(&old).unwrap()
            ),
        )
        .unwrap();

        recorder.record(&TelemetryRecord::now("prism", "prism.fresh", true, 1, 0, None, None));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().any(|l| l == "not json at all"));
        assert!(lines.iter().any(|l| l.contains("prism.fresh")));
    }

    #[test]
    fn test_recent_records_survive_prune() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.jsonl");
        let recorder = JsonlTelemetryRecorder::new(&path, 30);

        recorder.record(&TelemetryRecord::now("prism", "prism.a", true, 1, 0, None, None));
        recorder.record(&TelemetryRecord::now("prism", "prism.b", true, 1, 0, None, None));

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        // A directory path cannot be appended to; record() must not panic.
        let dir = tempfile::tempdir().unwrap();
        let recorder = JsonlTelemetryRecorder::new(dir.path(), 30);
        recorder.record(&TelemetryRecord::now("prism", "prism.x", true, 1, 0, None, None));
    }
}
