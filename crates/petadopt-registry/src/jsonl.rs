//! JSONL snapshot format: one line per stored record.
//!
//! Each line is `{"namespace": ..., "key": ..., "record": ...}`. Files are
//! replaced whole, never appended to, so a reader sees either the previous
//! snapshot or the next one.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::store::Namespace;

/// One persisted key-value entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub namespace: Namespace,
    pub key: String,
    pub record: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum JsonlError {
    #[error("{path}: I/O error: {message}")]
    Io { path: String, message: String },

    #[error("line {line}: parse error: {message}")]
    Parse { line: usize, message: String },

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("corrupted store file {path}: {reason}")]
    Corrupt { path: String, reason: &'static str },
}

impl JsonlError {
    fn io(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Parse records from `reader`. Blank lines and `#` comments are skipped.
pub fn read_records(reader: impl BufRead) -> Result<Vec<StoredRecord>, JsonlError> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| JsonlError::Parse {
            line: line_no,
            message: e.to_string(),
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        records.push(
            serde_json::from_str(line).map_err(|e| JsonlError::Parse {
                line: line_no,
                message: e.to_string(),
            })?,
        );
    }
    Ok(records)
}

pub fn write_records(writer: &mut impl Write, records: &[StoredRecord]) -> std::io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Load a snapshot file, refusing NUL bytes and invalid UTF-8 up front.
pub fn read_records_from_path(path: impl AsRef<Path>) -> Result<Vec<StoredRecord>, JsonlError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| JsonlError::io(path, e))?;
    check_substrate(path, &bytes)?;
    read_records(BufReader::new(bytes.as_slice()))
}

/// Replace the snapshot at `path` with `records`.
///
/// The records go to a synced sibling temp file which is then renamed over
/// `path`; the parent directory is synced last.
pub fn write_records_to_path(
    path: impl AsRef<Path>,
    records: &[StoredRecord],
) -> Result<(), JsonlError> {
    let path = path.as_ref();
    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = parent {
        fs::create_dir_all(dir).map_err(|e| JsonlError::io(dir, e))?;
    }

    let tmp_path = temp_sibling(path);
    if let Err(err) = write_synced(&tmp_path, records) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(JsonlError::io(path, err));
    }

    if let Some(dir) = parent {
        File::open(dir)
            .and_then(|handle| handle.sync_all())
            .map_err(|e| JsonlError::io(dir, e))?;
    }
    Ok(())
}

fn write_synced(path: &Path, records: &[StoredRecord]) -> Result<(), JsonlError> {
    let mut writer = BufWriter::new(File::create(path).map_err(|e| JsonlError::io(path, e))?);
    write_records(&mut writer, records).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            JsonlError::Serialize(e.to_string())
        } else {
            JsonlError::io(path, e)
        }
    })?;
    let file = writer
        .into_inner()
        .map_err(|e| JsonlError::io(path, e.error()))?;
    file.sync_all().map_err(|e| JsonlError::io(path, e))
}

fn temp_sibling(path: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{nanos}", std::process::id()));
    PathBuf::from(tmp)
}

fn check_substrate(path: &Path, bytes: &[u8]) -> Result<(), JsonlError> {
    let reason = if bytes.contains(&0) {
        "contains NUL byte(s)"
    } else if std::str::from_utf8(bytes).is_err() {
        "contains non-UTF-8 byte sequence(s)"
    } else {
        return Ok(());
    };
    Err(JsonlError::Corrupt {
        path: path.display().to_string(),
        reason,
    })
}
