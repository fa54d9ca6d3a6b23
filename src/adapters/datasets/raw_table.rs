//! Untyped tables read from delimited files and spreadsheets.

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use crate::domain::dataset::LoadError;

/// One cell as read from disk.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    fn from_spreadsheet(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::from_text(s),
            other => Cell::from_text(&other.to_string()),
        }
    }
}

/// Header row plus data rows; rows may be shorter than the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Position of a header, matched exactly after trimming.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Reads a file, choosing the reader by extension. Spreadsheet formats
    /// are `.xls`, `.xlsx`, `.xlsm`, `.xlsb` and `.ods`; anything else is
    /// read as comma separated text.
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xls" | "xlsx" | "xlsm" | "xlsb" | "ods") => Self::read_spreadsheet(path),
            _ => Self::read_delimited(path),
        }
    }

    fn read_delimited(path: &Path) -> Result<Self, LoadError> {
        let display = path.display().to_string();
        let delimited = |e: csv::Error| LoadError::Delimited {
            path: display.clone(),
            message: e.to_string(),
        };

        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: display.clone(),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(delimited)?
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .map(|record| {
                record
                    .map(|r| r.iter().map(Cell::from_text).collect())
                    .map_err(delimited)
            })
            .collect::<Result<Vec<Vec<Cell>>, LoadError>>()?;

        Ok(Self { headers, rows })
    }

    fn read_spreadsheet(path: &Path) -> Result<Self, LoadError> {
        let spreadsheet = |message: String| LoadError::Spreadsheet {
            path: path.display().to_string(),
            message,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| spreadsheet("workbook has no sheets".to_string()))?
            .map_err(|e| spreadsheet(e.to_string()))?;

        let mut rows = range.rows();
        let headers = rows
            .next()
            .map(|header| {
                header
                    .iter()
                    .map(|cell| match Cell::from_spreadsheet(cell) {
                        Cell::Text(text) => text,
                        Cell::Number(n) => n.to_string(),
                        Cell::Empty => String::new(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let rows = rows
            .map(|row| row.iter().map(Cell::from_spreadsheet).collect())
            .collect();

        Ok(Self { headers, rows })
    }
}
