//! Turns an uploaded file into rows the reconciliation engine can trust.
//!
//! The checks run in a fixed order and the first failure rejects the whole
//! upload: file name, UTF-8, comment stripping, CSV structure, presence of
//! data rows, required columns, empty cells, duplicate natural keys and
//! duplicate emails. Nothing here touches the database.

use common::model::batch::BatchKind;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Lines starting with this marker are dropped before parsing.
pub const COMMENT_MARKER: &str = "//";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsvRejection {
    #[error("File type is not supported. Please upload a CSV file.")]
    UnsupportedFileType,
    #[error("The CSV file is not valid UTF-8 text.")]
    NotUtf8,
    #[error("The CSV file is empty or has an invalid format.")]
    EmptyOrInvalid,
    #[error("Could not parse the CSV file. Make sure it's a valid CSV format without unexpected characters. ({0})")]
    Unparseable(String),
    #[error("The CSV file is empty. Please upload a valid CSV file with data.")]
    NoDataRows,
    #[error("CSV file is missing required columns: {}. Please ensure all required columns are present.", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("The CSV file contains null values. Please ensure all fields are filled.")]
    NullValues,
    #[error("The CSV file contains duplicate {0}. Please ensure all {0} are unique.")]
    DuplicateKeys(&'static str),
    #[error("The CSV file contains duplicate email IDs. Please ensure all email IDs are unique.")]
    DuplicateEmails,
}

/// Column requirements of one batch kind.
#[derive(Debug, Clone, Copy)]
pub struct CsvSchema {
    pub required: &'static [&'static str],
    pub key_column: &'static str,
    /// Plural used in the duplicate-key message.
    pub key_label: &'static str,
    pub email_column: &'static str,
}

const STUDENT_SCHEMA: CsvSchema = CsvSchema {
    required: &["roll_no", "email_id", "password", "mentor_id"],
    key_column: "roll_no",
    key_label: "roll numbers",
    email_column: "email_id",
};

const MENTOR_SCHEMA: CsvSchema = CsvSchema {
    required: &["mentor_id", "name", "email_id", "password"],
    key_column: "mentor_id",
    key_label: "mentor IDs",
    email_column: "email_id",
};

pub fn schema_for(kind: BatchKind) -> CsvSchema {
    match kind {
        BatchKind::Students => STUDENT_SCHEMA,
        BatchKind::Mentors => MENTOR_SCHEMA,
    }
}

/// One data row, keyed by lower-cased column name. Values are untrimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    fields: HashMap<String, String>,
}

impl CsvRow {
    /// Value of `column`, or `""` when absent. Required columns are always
    /// present after validation.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCsv {
    /// The decoded upload, comments included, as stored on the batch.
    pub content: String,
    /// Header names as written in the file.
    pub columns: Vec<String>,
    pub rows: Vec<CsvRow>,
}

pub fn strip_comments(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.starts_with(COMMENT_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn validate_upload(
    file_name: &str,
    bytes: &[u8],
    kind: BatchKind,
) -> Result<ValidatedCsv, CsvRejection> {
    if !file_name.to_ascii_lowercase().ends_with(".csv") {
        return Err(CsvRejection::UnsupportedFileType);
    }
    let content = std::str::from_utf8(bytes).map_err(|_| CsvRejection::NotUtf8)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    validate_content(content, schema_for(kind))
}

pub fn validate_content(content: &str, schema: CsvSchema) -> Result<ValidatedCsv, CsvRejection> {
    let filtered = strip_comments(content);
    if filtered.trim().is_empty() {
        return Err(CsvRejection::EmptyOrInvalid);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(filtered.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| CsvRejection::Unparseable(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let normalized: Vec<String> = columns.iter().map(|c| c.trim().to_lowercase()).collect();

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record.map_err(|e| CsvRejection::Unparseable(e.to_string()))?);
    }
    if records.is_empty() {
        return Err(CsvRejection::NoDataRows);
    }

    let missing: Vec<String> = schema
        .required
        .iter()
        .filter(|col| !normalized.iter().any(|c| c == *col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CsvRejection::MissingColumns(missing));
    }

    if records
        .iter()
        .any(|record| record.iter().any(|cell| cell.trim().is_empty()))
    {
        return Err(CsvRejection::NullValues);
    }

    let rows: Vec<CsvRow> = records
        .iter()
        .map(|record| {
            let mut fields = HashMap::with_capacity(normalized.len());
            // First occurrence wins when a header is repeated.
            for (name, value) in normalized.iter().zip(record.iter()) {
                fields
                    .entry(name.clone())
                    .or_insert_with(|| value.to_string());
            }
            CsvRow { fields }
        })
        .collect();

    if has_duplicates(&rows, schema.key_column) {
        return Err(CsvRejection::DuplicateKeys(schema.key_label));
    }
    if has_duplicates(&rows, schema.email_column) {
        return Err(CsvRejection::DuplicateEmails);
    }

    Ok(ValidatedCsv {
        content: content.to_string(),
        columns,
        rows,
    })
}

fn has_duplicates(rows: &[CsvRow], column: &str) -> bool {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.iter().any(|row| !seen.insert(row.get(column).trim()))
}
