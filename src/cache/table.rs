//! Table codecs for metadata shards
//!
//! A shard is a flat table with exactly the columns [`MetadataEntry::COLUMNS`].
//! Decoding checks the column set before binding any row, so a shard with an
//! extra or missing column fails instead of being coerced.

use serde::{Deserialize, Serialize};

use crate::cache::entry::MetadataEntry;
use crate::core::error::{MetadataError, Result};

/// On-store table format of a shard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Header row plus one record per entry
    #[default]
    Csv,
    /// One JSON object per line
    Jsonl,
}

impl std::str::FromStr for TableFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(TableFormat::Csv),
            "jsonl" => Ok(TableFormat::Jsonl),
            _ => Err(format!("Unknown table format: {}", s)),
        }
    }
}

impl std::fmt::Display for TableFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl TableFormat {
    /// File extension of shards written in this format
    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Jsonl => "jsonl",
        }
    }

    /// Serialize entries into a table
    pub fn encode(&self, entries: &[MetadataEntry]) -> Result<Vec<u8>> {
        match self {
            TableFormat::Csv => encode_csv(entries),
            TableFormat::Jsonl => encode_jsonl(entries),
        }
    }

    /// Parse a table back into entries. `file` is only used in errors.
    pub fn decode(&self, file: &str, data: &[u8]) -> Result<Vec<MetadataEntry>> {
        match self {
            TableFormat::Csv => decode_csv(file, data),
            TableFormat::Jsonl => decode_jsonl(file, data),
        }
    }
}

fn expected_columns() -> Vec<String> {
    MetadataEntry::COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn encode_error(err: impl std::fmt::Display) -> MetadataError {
    MetadataError::Encode {
        message: err.to_string(),
    }
}

fn encode_csv(entries: &[MetadataEntry]) -> Result<Vec<u8>> {
    // Header is written by hand so an empty shard still carries its columns
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(MetadataEntry::COLUMNS)
        .map_err(encode_error)?;
    for entry in entries {
        writer.serialize(entry).map_err(encode_error)?;
    }
    writer.into_inner().map_err(encode_error)
}

fn decode_csv(file: &str, data: &[u8]) -> Result<Vec<MetadataEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data);

    let headers = reader.headers().map_err(|e| MetadataError::Decode {
        file: file.to_string(),
        line: 1,
        message: e.to_string(),
    })?;
    let found: Vec<String> = headers.iter().map(str::to_string).collect();
    if found != expected_columns() {
        return Err(MetadataError::Schema {
            file: file.to_string(),
            expected: expected_columns(),
            found,
        });
    }

    let mut entries = Vec::new();
    for (index, record) in reader.deserialize::<MetadataEntry>().enumerate() {
        let entry = record.map_err(|e| MetadataError::Decode {
            file: file.to_string(),
            line: e
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 2),
            message: e.to_string(),
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

fn encode_jsonl(entries: &[MetadataEntry]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for entry in entries {
        serde_json::to_writer(&mut out, entry).map_err(encode_error)?;
        out.push(b'\n');
    }
    Ok(out)
}

fn decode_jsonl(file: &str, data: &[u8]) -> Result<Vec<MetadataEntry>> {
    let text = std::str::from_utf8(data).map_err(|e| MetadataError::Decode {
        file: file.to_string(),
        line: 0,
        message: e.to_string(),
    })?;

    let mut entries = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index as u64 + 1;
        let decode_error = |e: serde_json::Error| MetadataError::Decode {
            file: file.to_string(),
            line: line_no,
            message: e.to_string(),
        };

        let row: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(line).map_err(decode_error)?;

        let mut found: Vec<String> = row.keys().cloned().collect();
        found.sort();
        let mut expected = expected_columns();
        expected.sort();
        if found != expected {
            return Err(MetadataError::Schema {
                file: file.to_string(),
                expected,
                found,
            });
        }

        let entry: MetadataEntry =
            serde_json::from_value(serde_json::Value::Object(row)).map_err(decode_error)?;
        entries.push(entry);
    }
    Ok(entries)
}
