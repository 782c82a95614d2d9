// ============================================================
// Layer 4: Table Loader
// ============================================================
// Reads one named column out of a delimited table using the
// csv crate and turns every non-null value into a Record.
//
// Steps:
//   1. Fail with InputNotFound if the path does not exist
//      (checked before the file is opened for parsing)
//   2. Read the header row and locate the column
//      (SchemaError lists every header when it is missing)
//   3. Walk the rows in order, dropping null values
//
// A value is null when the row is too short to contain the
// column, or the field is one of NULL_TOKENS. Everything else
// is kept verbatim as text, surrounding whitespace included.
//
// Reference: csv crate documentation (ReaderBuilder, StringRecord)

use std::path::PathBuf;

use crate::domain::error::{PipelineError, Result};
use crate::domain::record::Record;
use crate::domain::traits::RecordSource;

/// Field values treated as missing, matching the default NA set
/// of common dataframe CSV readers.
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan",
    "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a",
    "nan", "null",
];

/// Loads the sequence column from a delimited file.
/// Implements the RecordSource trait from Layer 3.
pub struct CsvLoader {
    path:      PathBuf,
    column:    String,
    delimiter: u8,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self {
            path:      path.into(),
            column:    column.into(),
            delimiter: b',',
        }
    }

    /// Use a field delimiter other than ','
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn parse_error(&self, err: csv::Error) -> PipelineError {
        PipelineError::InputParse {
            path:   self.path.clone(),
            reason: err.to_string(),
        }
    }
}

impl RecordSource for CsvLoader {
    fn load_all(&self) -> Result<Vec<Record>> {
        if !self.path.exists() {
            return Err(PipelineError::InputNotFound { path: self.path.clone() });
        }

        tracing::info!("Reading '{}'", self.path.display());

        // flexible(true): short rows are null for our column
        // rather than a parse failure
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| self.parse_error(e))?;

        let headers = reader.headers().map_err(|e| self.parse_error(e))?.clone();
        let column_idx = headers
            .iter()
            .position(|h| h == self.column)
            .ok_or_else(|| PipelineError::Schema {
                column:    self.column.clone(),
                available: headers.iter().map(str::to_string).collect(),
            })?;

        let mut records = Vec::new();
        let mut dropped = 0usize;

        for row in reader.records() {
            let row = row.map_err(|e| self.parse_error(e))?;
            match row.get(column_idx) {
                Some(value) if !is_null(value) => records.push(Record::new(value)),
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::debug!("Dropped {} rows with a missing '{}' value", dropped, self.column);
        }
        tracing::info!("Total samples: {}", records.len());
        Ok(records)
    }
}

fn is_null(value: &str) -> bool {
    NULL_TOKENS.contains(&value)
}
