//! JSONL tables and JSON documents.
//!
//! One serde row per line. Writes go to a temp file that is synced and then
//! renamed over the target, so a reader never sees a half-written table.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Read rows from a JSONL reader. Blank lines and `#` comments are skipped.
pub fn read_rows<T: DeserializeOwned>(reader: impl BufRead) -> Result<Vec<T>, StoreError> {
    let mut rows = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| StoreError::Io(format!("line {}: {e}", line_no + 1)))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row: T = serde_json::from_str(trimmed)
            .map_err(|e| StoreError::Parse(line_no + 1, e.to_string()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Write rows to a JSONL writer.
pub fn write_rows<T: Serialize>(writer: &mut impl Write, rows: &[T]) -> Result<(), StoreError> {
    for row in rows {
        let line = serde_json::to_string(row).map_err(|e| StoreError::Serialize(e.to_string()))?;
        writeln!(writer, "{line}").map_err(|e| StoreError::Io(e.to_string()))?;
    }
    Ok(())
}

pub fn read_rows_from_path<T: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<Vec<T>, StoreError> {
    let path = path.as_ref();
    let bytes = read_checked(path)?;
    read_rows(BufReader::new(bytes.as_slice()))
}

pub fn write_rows_to_path<T: Serialize>(
    path: impl AsRef<Path>,
    rows: &[T],
) -> Result<(), StoreError> {
    write_atomically(path.as_ref(), |writer| write_rows(writer, rows))
}

/// Pretty-printed JSON document.
pub fn write_json_to_path<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), StoreError> {
    write_atomically(path.as_ref(), |writer| {
        serde_json::to_writer_pretty(&mut *writer, value)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        writeln!(writer).map_err(|e| StoreError::Io(e.to_string()))
    })
}

pub fn read_json_from_path<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, StoreError> {
    let path = path.as_ref();
    let bytes = read_checked(path)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::Parse(e.line(), format!("{}: {e}", path.display())))
}

/// Write a text file with the same temp-and-rename discipline.
pub fn write_text_to_path(path: impl AsRef<Path>, text: &str) -> Result<(), StoreError> {
    write_atomically(path.as_ref(), |writer| {
        writer
            .write_all(text.as_bytes())
            .map_err(|e| StoreError::Io(e.to_string()))
    })
}

fn read_checked(path: &Path) -> Result<Vec<u8>, StoreError> {
    let bytes = fs::read(path).map_err(|e| StoreError::Io(format!("{}: {e}", path.display())))?;
    if bytes.contains(&0) {
        return Err(StoreError::Corrupt(format!(
            "{}: contains NUL byte(s)",
            path.display()
        )));
    }
    if std::str::from_utf8(&bytes).is_err() {
        return Err(StoreError::Corrupt(format!(
            "{}: contains non-UTF-8 byte sequence(s)",
            path.display()
        )));
    }
    Ok(bytes)
}

fn write_atomically<F>(path: &Path, body: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), StoreError>,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| StoreError::Io(format!("{}: {e}", parent.display())))?;
    }

    let tmp_path = tmp_write_path(path);
    let io_err = |e: std::io::Error| StoreError::Io(format!("{}: {e}", tmp_path.display()));
    let write_result = (|| -> Result<(), StoreError> {
        let file = File::create(&tmp_path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        body(&mut writer)?;
        writer.flush().map_err(io_err)?;
        let file = writer.into_inner().map_err(|e| io_err(e.into_error()))?;
        file.sync_all().map_err(io_err)?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        StoreError::Io(format!(
            "{} -> {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })?;

    // Persist the rename itself.
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        let dir_err = |e: std::io::Error| StoreError::Io(format!("{}: {e}", parent.display()));
        File::open(parent).map_err(dir_err)?.sync_all().map_err(dir_err)?;
    }

    Ok(())
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

/// Errors from run persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("line {0}: parse error: {1}")]
    Parse(usize, String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("corrupted file: {0}")]
    Corrupt(String),

    #[error("no analysis report found under {0}; run `run_analysis` first")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapscale_kernel::GapRecord;

    fn temp_path(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "gapscale-jsonl-{prefix}-{}-{unique}.jsonl",
            std::process::id()
        ))
    }

    #[test]
    fn rows_survive_a_file_round_trip() {
        let path = temp_path("rows");
        let rows = vec![GapRecord { p: 2, gap: 1 }, GapRecord { p: 3, gap: 2 }];
        write_rows_to_path(&path, &rows).expect("write should succeed");

        let text = fs::read_to_string(&path).expect("jsonl should exist");
        assert_eq!(text, "{\"p\":2,\"gap\":1}\n{\"p\":3,\"gap\":2}\n");
        let back: Vec<GapRecord> = read_rows_from_path(&path).expect("read should succeed");
        assert_eq!(back, rows);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        let input = "# header\n{\"p\":2,\"gap\":1}\nnot json\n";
        let result: Result<Vec<GapRecord>, _> = read_rows(input.as_bytes());
        match result {
            Err(StoreError::Parse(line, _)) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn read_rejects_nul_payload() {
        let path = temp_path("nul");
        fs::write(&path, b"{\"p\":2,\"gap\":1}\n\0garbage").expect("fixture should write");

        let result: Result<Vec<GapRecord>, _> = read_rows_from_path(&path);
        match result {
            Err(StoreError::Corrupt(message)) => assert!(message.contains("contains NUL")),
            other => panic!("expected corrupt file error, got {other:?}"),
        }

        let _ = fs::remove_file(path);
    }

    #[test]
    fn read_rejects_non_utf8_payload() {
        let path = temp_path("non-utf8");
        fs::write(&path, [0xff, 0xfe]).expect("fixture should write");

        let result: Result<Vec<GapRecord>, _> = read_rows_from_path(&path);
        match result {
            Err(StoreError::Corrupt(message)) => {
                assert!(message.contains("contains non-UTF-8 byte sequence(s)"))
            }
            other => panic!("expected corrupt file error, got {other:?}"),
        }

        let _ = fs::remove_file(path);
    }

    #[test]
    fn documents_and_text_land_after_directory_sync() {
        let dir = std::env::temp_dir().join(format!(
            "gapscale-jsonl-sync-{}-{}",
            std::process::id(),
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock should be after unix epoch")
                .as_nanos()
        ));
        let path = dir.join("doc.json");
        write_json_to_path(&path, &GapRecord { p: 7, gap: 4 }).expect("write should succeed");
        write_text_to_path(&dir.join("notes.md"), "# notes\n").expect("write should succeed");

        let back: GapRecord = read_json_from_path(&path).expect("read should succeed");
        assert_eq!(back, GapRecord { p: 7, gap: 4 });
        assert_eq!(
            fs::read_to_string(dir.join("notes.md")).expect("text should exist"),
            "# notes\n"
        );

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn write_replaces_file_and_leaves_no_temp_files() {
        let dir = std::env::temp_dir().join(format!(
            "gapscale-jsonl-atomic-{}-{}",
            std::process::id(),
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock should be after unix epoch")
                .as_nanos()
        ));
        let path = dir.join("nested/table.jsonl");
        write_rows_to_path(&path, &[GapRecord { p: 2, gap: 1 }]).expect("first write");
        write_rows_to_path(&path, &[GapRecord { p: 89, gap: 8 }]).expect("second write");

        let text = fs::read_to_string(&path).expect("jsonl should exist");
        assert!(!text.contains("\"p\":2,"));
        assert!(text.contains("\"p\":89"));
        let entries = fs::read_dir(path.parent().expect("parent"))
            .expect("dir should list")
            .count();
        assert_eq!(entries, 1);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn json_documents_round_trip() {
        let path = temp_path("doc").with_extension("json");
        let record = GapRecord { p: 113, gap: 14 };
        write_json_to_path(&path, &record).expect("write should succeed");
        let back: GapRecord = read_json_from_path(&path).expect("read should succeed");
        assert_eq!(back, record);
        let _ = fs::remove_file(path);
    }
}
