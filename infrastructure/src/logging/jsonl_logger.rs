//! Append-only JSONL audit trail of session commands.
//!
//! One line per command outcome, stamped with the event type and a UTC
//! timestamp. Every CLI invocation sharing a session appends to the same
//! file, so the trail covers the whole round.

use serde_json::{Map, Value};
use shortlist_application::{AuditEvent, AuditLogger};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Audit trail stored as JSON lines
///
/// Each record is written with a single `write_all` on an `O_APPEND`
/// handle, so lines from concurrent processes never interleave.
pub struct JsonlAuditLogger {
    file: Mutex<File>,
    path: PathBuf,
}

impl JsonlAuditLogger {
    /// Open (or create) the trail at `path`, creating parent directories.
    ///
    /// Returns `None` when the file cannot be opened; commands then run
    /// unaudited.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Audit trail disabled, cannot create {}: {}", parent.display(), e);
            return None;
        }

        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(Self {
                file: Mutex::new(file),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!("Audit trail disabled, cannot open {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Flatten an event into one record
///
/// Object payloads carry their fields at the top level; anything else is
/// nested under `data`.
fn audit_record(event: AuditEvent, timestamp: String) -> Value {
    let mut record = match event.payload {
        Value::Object(fields) => fields,
        other => Map::from_iter([("data".to_string(), other)]),
    };
    record.insert("type".to_string(), Value::from(event.event_type));
    record.insert("timestamp".to_string(), Value::from(timestamp));
    Value::Object(record)
}

impl AuditLogger for JsonlAuditLogger {
    fn log(&self, event: AuditEvent) {
        let event_type = event.event_type;
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let Ok(mut line) = serde_json::to_string(&audit_record(event, timestamp)) else {
            return;
        };
        line.push('\n');

        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = file.write_all(line.as_bytes()) {
            warn!("Dropped {} audit record for {}: {}", event_type, self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_records_carry_type_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = JsonlAuditLogger::new(&path).unwrap();

        logger.log(AuditEvent::new(
            "command_applied",
            json!({
                "command": {"command": "draw_finalists"},
                "phase": "voting",
                "finalists": ["x", "y", "z"]
            }),
        ));
        logger.log(AuditEvent::new(
            "command_rejected",
            json!({"kind": "invalid_choice", "message": "'sushi' is not one of the finalists"}),
        ));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line["timestamp"].is_string()));
        assert_eq!(lines[0]["type"], "command_applied");
        assert_eq!(lines[0]["finalists"][2], "z");
        assert_eq!(lines[1]["type"], "command_rejected");
        assert_eq!(lines[1]["kind"], "invalid_choice");
    }

    #[test]
    fn test_trail_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("audit.jsonl");

        for _ in 0..2 {
            let logger = JsonlAuditLogger::new(&path).unwrap();
            logger.log(AuditEvent::new("session_reset", json!({})));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line["type"] == "session_reset"));
    }

    #[test]
    fn test_concurrent_writers_keep_lines_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let first = JsonlAuditLogger::new(&path).unwrap();
        let second = JsonlAuditLogger::new(&path).unwrap();

        std::thread::scope(|scope| {
            for (logger, who) in [(&first, "a"), (&second, "b")] {
                scope.spawn(move || {
                    for i in 0..50 {
                        logger.log(AuditEvent::new(
                            "command_applied",
                            json!({"participant": who, "seq": i}),
                        ));
                    }
                });
            }
        });

        assert_eq!(read_lines(&path).len(), 100);
    }

    #[test]
    fn test_scalar_payload_nested_under_data() {
        let record = audit_record(
            AuditEvent::new("command_failed", json!("disk full")),
            "2026-10-19T12:00:00.000Z".to_string(),
        );
        assert_eq!(record["type"], "command_failed");
        assert_eq!(record["data"], "disk full");
        assert_eq!(record["timestamp"], "2026-10-19T12:00:00.000Z");
    }

    #[test]
    fn test_unopenable_path_disables_trail() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlAuditLogger::new(dir.path()).is_none());
    }
}
