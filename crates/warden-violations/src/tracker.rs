// tracker.rs — Append-only, durable persistence for violation records.
//
// One file per task-day (`violations_<YYYYMMDD>.log`) under a configured
// directory, newline-delimited JSON, one record per line. Every append is
// flushed and fsync'd before `record` returns — unlike the audit log
// (which may batch per strictness level), violation durability is
// unconditional: a violation that silently disappears on crash defeats
// the entire point of the tracker.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::ViolationError;
use crate::record::ViolationRecord;

pub struct ViolationTracker {
    violation_dir: PathBuf,
}

impl ViolationTracker {
    pub fn new(violation_dir: impl Into<PathBuf>) -> Result<Self, ViolationError> {
        let violation_dir = violation_dir.into();
        std::fs::create_dir_all(&violation_dir).map_err(|source| ViolationError::OpenFailed {
            path: violation_dir.clone(),
            source,
        })?;
        Ok(Self { violation_dir })
    }

    /// Append `violation` to today's log file, flushing and syncing
    /// before returning.
    pub fn record(&self, violation: &ViolationRecord) -> Result<(), ViolationError> {
        tracing::warn!(
            code = %violation.code,
            plan_id = %violation.plan_id,
            "governance violation recorded"
        );
        let path = self.file_for_today();
        let mut file =
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| ViolationError::OpenFailed {
                    path: path.clone(),
                    source,
                })?;
        let mut line = serde_json::to_string(violation)?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        file.flush()?;
        file.sync_data()?;
        Ok(())
    }

    /// Every violation recorded for `plan_id`, across every log file in
    /// this tracker's directory, in insertion order. A corrupt trailing
    /// line (left by a crash mid-write) is skipped rather than failing
    /// the whole scan.
    pub fn list_for_task(&self, plan_id: &str) -> Result<Vec<ViolationRecord>, ViolationError> {
        let mut out = Vec::new();
        let mut files = self.log_files()?;
        files.sort();
        for path in files {
            out.extend(
                read_valid_records(&path)?
                    .into_iter()
                    .filter(|r| r.plan_id == plan_id),
            );
        }
        Ok(out)
    }

    fn file_for_today(&self) -> PathBuf {
        let name = format!("violations_{}.log", Utc::now().format("%Y%m%d"));
        self.violation_dir.join(name)
    }

    fn log_files(&self) -> Result<Vec<PathBuf>, ViolationError> {
        let mut files = Vec::new();
        let entries =
            std::fs::read_dir(&self.violation_dir).map_err(|source| ViolationError::OpenFailed {
                path: self.violation_dir.clone(),
                source,
            })?;
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("violations_") && name.ends_with(".log") {
                files.push(entry.path());
            }
        }
        Ok(files)
    }
}

fn read_valid_records(path: &Path) -> Result<Vec<ViolationRecord>, ViolationError> {
    let file = File::open(path).map_err(|source| ViolationError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ViolationRecord>(&line) {
            Ok(record) => out.push(record),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unparsable violation log line");
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::ViolationCode;
    use tempfile::tempdir;

    #[test]
    fn record_and_list_round_trip() {
        let dir = tempdir().unwrap();
        let tracker = ViolationTracker::new(dir.path()).unwrap();
        let record = ViolationRecord::new(ViolationCode::V004, "plan-1", "agent-1", "hash-1");
        tracker.record(&record).unwrap();

        let found = tracker.list_for_task("plan-1").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, ViolationCode::V004);
    }

    #[test]
    fn list_for_task_filters_by_plan_id() {
        let dir = tempdir().unwrap();
        let tracker = ViolationTracker::new(dir.path()).unwrap();
        tracker
            .record(&ViolationRecord::new(
                ViolationCode::V002,
                "plan-a",
                "agent-1",
                "hash-1",
            ))
            .unwrap();
        tracker
            .record(&ViolationRecord::new(
                ViolationCode::V002,
                "plan-b",
                "agent-1",
                "hash-1",
            ))
            .unwrap();

        assert_eq!(tracker.list_for_task("plan-a").unwrap().len(), 1);
        assert_eq!(tracker.list_for_task("plan-b").unwrap().len(), 1);
        assert_eq!(tracker.list_for_task("plan-c").unwrap().len(), 0);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let dir = tempdir().unwrap();
        let tracker = ViolationTracker::new(dir.path()).unwrap();
        for code in [ViolationCode::V001, ViolationCode::V002, ViolationCode::V003] {
            tracker
                .record(&ViolationRecord::new(code, "plan-x", "agent-1", "hash-1"))
                .unwrap();
        }
        let found = tracker.list_for_task("plan-x").unwrap();
        assert_eq!(
            found.iter().map(|r| r.code).collect::<Vec<_>>(),
            vec![ViolationCode::V001, ViolationCode::V002, ViolationCode::V003]
        );
    }

    #[test]
    fn corrupt_trailing_line_is_discarded_not_fatal() {
        let dir = tempdir().unwrap();
        let tracker = ViolationTracker::new(dir.path()).unwrap();
        tracker
            .record(&ViolationRecord::new(
                ViolationCode::V005,
                "plan-y",
                "agent-1",
                "hash-1",
            ))
            .unwrap();

        let name = format!("violations_{}.log", Utc::now().format("%Y%m%d"));
        let path = dir.path().join(name);
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"{\"not\": \"a valid record\"").unwrap();

        let found = tracker.list_for_task("plan-y").unwrap();
        assert_eq!(found.len(), 1);
    }
}
