//! JSON → JSONL conversion of Q&A training datasets.
//!
//! The input is `{"questions": [ ... ]}`. Each element is written verbatim as
//! one line of the output file; the records are never inspected.

use crate::error::{AppError, Result};
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

pub const RECORDS_KEY: &str = "questions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionReport {
    pub records: usize,
    /// Set when the input had no records; the output is then an empty file.
    pub empty: bool,
}

/// Separators as `", "` and `": "`, matching what most JSONL fine-tune
/// datasets in the wild were produced with.
#[derive(Default)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// Serializes one record as a single line (no trailing newline).
pub fn record_line(record: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    record.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| AppError::Unexpected(e.to_string()))
}

/// Pulls the record list out of a parsed dataset document.
pub fn extract_records(doc: Value) -> Result<Vec<Value>> {
    let Value::Object(mut obj) = doc else {
        return Err(AppError::Parse("expected a JSON object at the top level".to_string()));
    };
    match obj.remove(RECORDS_KEY) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(AppError::Parse(format!("'{RECORDS_KEY}' must be an array"))),
    }
}

/// Converts `input` to JSONL at `output`.
///
/// Lines are written to a temporary file next to `output` which is renamed
/// over it only once every record is written, so a failed run never leaves
/// a truncated dataset behind.
pub fn convert_to_jsonl(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<ConversionReport> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let raw = fs::read_to_string(input).map_err(|e| AppError::from_io(input, e))?;
    let records = extract_records(serde_json::from_str(&raw)?)?;

    if records.is_empty() {
        warn!(input = %input.display(), "no '{RECORDS_KEY}' key found or it is empty");
    }

    let write_err = |e: io::Error| AppError::Unexpected(format!("write {}: {e}", output.display()));
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    {
        let mut out = BufWriter::new(tmp.as_file());
        for record in &records {
            writeln!(out, "{}", record_line(record)?).map_err(write_err)?;
        }
        out.flush().map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    let file: File = tmp.persist(output).map_err(|e| write_err(e.error))?;
    drop(file);

    info!(input = %input.display(), output = %output.display(), records = records.len(), "converted dataset to JSONL");
    Ok(ConversionReport { records: records.len(), empty: records.is_empty() })
}
