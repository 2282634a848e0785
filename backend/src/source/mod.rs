//! Data source: vendor and invoice tables read from CSV exports.
//!
//! The tables arrive as spreadsheet exports from various vendors, so the
//! loader auto-detects encoding and delimiter instead of assuming UTF-8
//! commas. Rows become column-name to cell-value maps; typed extraction
//! happens later, per invoice, so one malformed row cannot poison a run.

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::error::{SourceError, SourceResult};
use crate::models::Row;

// =============================================================================
// Data Source Contract
// =============================================================================

/// A full read of both tables as of call time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub vendors: Vec<Row>,
    pub invoices: Vec<Row>,
}

/// Read-only supplier of the vendor and invoice tables.
///
/// Every `fetch` re-reads the underlying source; there is no caching
/// across batch runs.
pub trait DataSource: Send + Sync {
    fn fetch(&self) -> SourceResult<Snapshot>;
}

// =============================================================================
// CSV Implementation
// =============================================================================

/// Loads the two tables from CSV files under a configurable base directory.
pub struct CsvDataSource {
    base_dir: PathBuf,
    vendor_file: String,
    invoice_file: String,
}

impl CsvDataSource {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        vendor_file: impl Into<String>,
        invoice_file: impl Into<String>,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            vendor_file: vendor_file.into(),
            invoice_file: invoice_file.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.data_dir.clone(),
            config.vendor_file.clone(),
            config.invoice_file.clone(),
        )
    }

    fn read_table(&self, file_name: &str) -> SourceResult<Vec<Row>> {
        let path = self.base_dir.join(file_name);
        let bytes = std::fs::read(&path).map_err(|e| SourceError::Io {
            file: path.display().to_string(),
            source: e,
        })?;
        parse_table_bytes(&bytes, file_name)
    }
}

impl DataSource for CsvDataSource {
    fn fetch(&self) -> SourceResult<Snapshot> {
        Ok(Snapshot {
            vendors: self.read_table(&self.vendor_file)?,
            invoices: self.read_table(&self.invoice_file)?,
        })
    }
}

// =============================================================================
// CSV Parsing
// =============================================================================

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the detected encoding.
fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.to_string()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        // UTF-8 and anything unrecognized: lossy UTF-8
        _ => String::from_utf8_lossy(bytes).to_string(),
    }
}

/// Detect the delimiter by counting occurrences in the header line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse raw table bytes with encoding and delimiter auto-detection.
pub fn parse_table_bytes(bytes: &[u8], file_name: &str) -> SourceResult<Vec<Row>> {
    if bytes.is_empty() {
        return Err(SourceError::EmptyFile(file_name.to_string()));
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);

    parse_table(&content, delimiter, file_name)
}

/// Parse CSV text into rows keyed by column header.
///
/// Short rows fill the remaining columns with empty cells; extra cells
/// beyond the header width are dropped. Blank lines are skipped.
pub fn parse_table(content: &str, delimiter: char, file_name: &str) -> SourceResult<Vec<Row>> {
    let mut lines = content.lines();

    let header_line = lines
        .next()
        .ok_or_else(|| SourceError::EmptyFile(file_name.to_string()))?;

    let headers: Vec<String> = header_line
        .split(delimiter)
        .map(|s| s.trim().trim_matches('"').to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(SourceError::NoHeaders(file_name.to_string()));
    }

    let mut rows = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let values: Vec<&str> = line.split(delimiter).collect();
        let mut row = Row::new();

        for (i, header) in headers.iter().enumerate() {
            let cell = values
                .get(i)
                .map(|s| s.trim().trim_matches('"'))
                .unwrap_or("");
            row.insert(header.clone(), cell.to_string());
        }

        rows.push(row);
    }

    Ok(rows)
}
