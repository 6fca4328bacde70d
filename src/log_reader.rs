use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::constants::{is_log_file_name, EXPORT_HEADER, RECORD_FIELD_COUNT};
use crate::prepass::sort_records;
use crate::types::{Provenance, Record};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to list log directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{location}: expected {expected} fields, found {found}", expected = RECORD_FIELD_COUNT)]
    FieldCount { location: Provenance, found: usize },
    #[error("{location}: invalid {field} '{value}'")]
    InvalidNumber {
        location: Provenance,
        field: &'static str,
        value: String,
    },
    #[error("{location}: unterminated quoted field")]
    UnterminatedQuote { location: Provenance },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub source: String,
    pub records: usize,
}

#[derive(Clone, Debug)]
pub struct LoadedLogs {
    pub records: Vec<Record>,
    pub sources: Vec<SourceSummary>,
}

pub fn discover_log_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let entries = fs::read_dir(dir).map_err(|source| LoadError::Directory {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_log = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(is_log_file_name);
        if is_log && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn load_dir(dir: &Path, limit: Option<usize>) -> Result<LoadedLogs, LoadError> {
    let paths = discover_log_files(dir)?;
    load_files(&paths, limit)
}

pub fn load_files(paths: &[PathBuf], limit: Option<usize>) -> Result<LoadedLogs, LoadError> {
    let mut records = Vec::new();
    let mut sources = Vec::new();
    for path in paths {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let source = source_name(path);
        let parsed = parse_log_text(&source, &text)?;
        sources.push(SourceSummary {
            source,
            records: parsed.len(),
        });
        records.extend(parsed);
    }

    sort_records(&mut records);
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    Ok(LoadedLogs { records, sources })
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn parse_log_text(source: &str, text: &str) -> Result<Vec<Record>, LoadError> {
    let mut records = Vec::new();
    let mut seen_row = false;
    let mut lines = text.lines().enumerate();
    while let Some((index, line)) = lines.next() {
        if line.is_empty() {
            continue;
        }
        let location = Provenance {
            source: source.to_string(),
            line: index + 1,
        };
        // A quoted field may run over several lines.
        let mut row = line.to_string();
        let fields = loop {
            if let Some(fields) = split_fields(&row) {
                break fields;
            }
            let Some((_, next)) = lines.next() else {
                return Err(LoadError::UnterminatedQuote { location });
            };
            row.push('\n');
            row.push_str(next);
        };

        let first_row = !seen_row;
        seen_row = true;
        if first_row && fields.first().map(|f| f.trim()) == Some(EXPORT_HEADER[0]) {
            continue;
        }
        records.push(parse_fields(&fields, location)?);
    }
    Ok(records)
}

fn parse_fields(fields: &[String], location: Provenance) -> Result<Record, LoadError> {
    if fields.len() != RECORD_FIELD_COUNT && fields.len() != RECORD_FIELD_COUNT + 1 {
        return Err(LoadError::FieldCount {
            location,
            found: fields.len(),
        });
    }
    let timestamp = parse_number::<i64>(&fields[0], "timestamp", &location)?;
    let entity_id = parse_number::<i64>(&fields[2], "entity_id", &location)?;
    let boredom = parse_number::<i32>(&fields[5], "boredom", &location)?;
    let fear = parse_number::<i32>(&fields[6], "fear", &location)?;

    Ok(Record {
        timestamp,
        entity_type: fields[1].trim().to_string(),
        entity_id,
        room: fields[3].trim().to_string(),
        device: fields[4].trim().to_string(),
        boredom,
        fear,
        action: fields[7].trim().to_string(),
        extra: fields[8].trim().to_string(),
        provenance: location,
        issues: BTreeSet::new(),
    })
}

fn parse_number<T: std::str::FromStr>(
    raw: &str,
    field: &'static str,
    location: &Provenance,
) -> Result<T, LoadError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| LoadError::InvalidNumber {
            location: location.clone(),
            field,
            value: raw.to_string(),
        })
}

pub fn split_fields(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    if in_quotes {
        return None;
    }
    fields.push(current);
    Some(fields)
}
