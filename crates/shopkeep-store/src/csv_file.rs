//! # CSV Backing Files
//!
//! Shared read/rewrite plumbing for `inventory.csv` and `sales.csv`.
//!
//! ## Rewrite Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    write_rows("inventory.csv", ..)                      │
//! │                                                                         │
//! │  1. create parent directory if needed                                  │
//! │  2. write header + every row to "inventory.csv.tmp"                    │
//! │  3. flush                                                              │
//! │  4. rename "inventory.csv.tmp" → "inventory.csv"                       │
//! │                                                                         │
//! │  A crash before step 4 leaves the previous file untouched; an error    │
//! │  before step 4 also removes the temp file.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reading
//! Columns are matched by header name, not position. Header names are
//! trimmed; cell text is kept exactly as written, so a name with surrounding
//! spaces reloads unchanged. Each row is converted into its record type and validated; the
//! first failure aborts the whole read with the offending line number.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use shopkeep_core::validation::ValidationResult;

/// A row type with a fixed on-disk header.
pub(crate) trait CsvRow: Serialize + DeserializeOwned {
    /// The in-memory record a row converts to.
    type Record;

    /// Header line, in column order. Must match the field order of `Self`.
    const HEADER: &'static [&'static str];

    /// Converts a parsed row into a validated record.
    fn into_record(self) -> ValidationResult<Self::Record>;

    fn from_record(record: &Self::Record) -> Self;
}

/// Reads every row of `path`.
///
/// Returns `Ok(None)` when the file doesn't exist.
pub(crate) fn read_rows<R: CsvRow>(path: &Path) -> StoreResult<Option<Vec<R::Record>>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(StoreError::io(path, err)),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|err| read_error(path, err, Some(1)))?
        .clone();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|err| read_error(path, err, None))?;
        let line = row.position().map(|pos| pos.line());

        let parsed: R = row
            .deserialize(Some(&headers))
            .map_err(|err| read_error(path, err, line))?;

        let record = parsed
            .into_record()
            .map_err(|err| StoreError::malformed(path, line, err.to_string()))?;

        records.push(record);
    }

    debug!(path = %path.display(), rows = records.len(), "Read CSV file");

    Ok(Some(records))
}

/// Rewrites `path` with the header followed by one row per record.
pub(crate) fn write_rows<'a, R, I>(path: &Path, records: I) -> StoreResult<usize>
where
    R: CsvRow + 'a,
    I: IntoIterator<Item = &'a R::Record>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
    }

    let tmp = temp_path(path);
    let result = write_temp::<R, I>(path, &tmp, records).and_then(|count| {
        fs::rename(&tmp, path).map_err(|err| StoreError::io(path, err))?;
        Ok(count)
    });

    let count = match result {
        Ok(count) => count,
        Err(err) => {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!(path = %tmp.display(), error = %cleanup, "Temp file left behind");
                }
            }
            return Err(err);
        }
    };

    debug!(path = %path.display(), rows = count, "Rewrote CSV file");

    Ok(count)
}

/// Writes the header and rows to `tmp` and syncs it to disk.
fn write_temp<'a, R, I>(path: &Path, tmp: &Path, records: I) -> StoreResult<usize>
where
    R: CsvRow + 'a,
    I: IntoIterator<Item = &'a R::Record>,
{
    let csv_error = |source: csv::Error| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(tmp)
        .map_err(csv_error)?;

    writer.write_record(R::HEADER).map_err(csv_error)?;

    let mut count = 0;
    for record in records {
        writer.serialize(R::from_record(record)).map_err(csv_error)?;
        count += 1;
    }

    writer
        .into_inner()
        .map_err(|err| StoreError::io(tmp, err.into_error()))?
        .sync_all()
        .map_err(|err| StoreError::io(tmp, err))?;

    Ok(count)
}

/// Sibling path used while rewriting: `sales.csv` → `sales.csv.tmp`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("shopkeep"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Maps a reader error to `Io` or `Malformed`. `line` is used when the
/// error itself carries no position.
fn read_error(path: &Path, err: csv::Error, line: Option<u64>) -> StoreError {
    let line = err.position().map(|pos| pos.line()).or(line);
    let reason = match err.into_kind() {
        csv::ErrorKind::Io(source) => return StoreError::io(path, source),
        csv::ErrorKind::Utf8 { err, .. } => format!("invalid UTF-8: {}", err),
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {} fields, found {}", expected_len, len),
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(index) => format!("column {}: {}", index + 1, err.kind()),
            None => err.kind().to_string(),
        },
        other => format!("{:?}", other),
    };
    StoreError::malformed(path, line, reason)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use shopkeep_core::ValidationError;

    #[derive(Debug, Serialize, Deserialize)]
    struct PairRow {
        key: u64,
        label: String,
    }

    impl CsvRow for PairRow {
        type Record = (u64, String);
        const HEADER: &'static [&'static str] = &["key", "label"];

        fn into_record(self) -> ValidationResult<Self::Record> {
            if self.label.is_empty() {
                return Err(ValidationError::Required {
                    field: "label".to_string(),
                });
            }
            Ok((self.key, self.label))
        }

        fn from_record(record: &Self::Record) -> Self {
            PairRow {
                key: record.0,
                label: record.1.clone(),
            }
        }
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let rows = read_rows::<PairRow>(&dir.path().join("absent.csv")).unwrap();
        assert!(rows.is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pairs.csv");
        let records = vec![(1, "one".to_string()), (2, "two, with comma".to_string())];

        let written = write_rows::<PairRow, _>(&path, &records).unwrap();
        assert_eq!(written, 2);
        assert!(!temp_path(&path).exists());

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("key,label\n"));

        let read = read_rows::<PairRow>(&path).unwrap().unwrap();
        assert_eq!(read, records);
    }

    #[test]
    fn test_empty_write_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.csv");

        write_rows::<PairRow, _>(&path, &Vec::<(u64, String)>::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "key,label\n");
        assert!(read_rows::<PairRow>(&path).unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_columns_matched_by_trimmed_header_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.csv");
        fs::write(&path, "label , key\none,1\n").unwrap();

        let read = read_rows::<PairRow>(&path).unwrap().unwrap();
        assert_eq!(read, vec![(1, "one".to_string())]);
    }

    #[test]
    fn test_cell_whitespace_survives_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.csv");
        let records = vec![(1, "  padded ".to_string()), (2, " ".to_string())];

        write_rows::<PairRow, _>(&path, &records).unwrap();
        assert_eq!(read_rows::<PairRow>(&path).unwrap().unwrap(), records);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.csv");
        // A non-empty directory at the target makes the rename fail
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let result = write_rows::<PairRow, _>(&path, &vec![(1, "one".to_string())]);
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_bad_value_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.csv");
        fs::write(&path, "key,label\n1,one\nabc,two\n").unwrap();

        match read_rows::<PairRow>(&path) {
            Err(StoreError::Malformed { line, .. }) => assert_eq!(line, Some(3)),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_record_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.csv");
        fs::write(&path, "key,label\n1,\"\"\n").unwrap();

        match read_rows::<PairRow>(&path) {
            Err(StoreError::Malformed { line, reason, .. }) => {
                assert_eq!(line, Some(2));
                assert!(reason.contains("label"));
            }
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.csv");
        fs::write(&path, "key,label\n1\n").unwrap();

        assert!(matches!(
            read_rows::<PairRow>(&path),
            Err(StoreError::Malformed { .. })
        ));
    }
}
