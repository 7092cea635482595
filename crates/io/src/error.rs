use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("unsupported file format '{0}' (expected .xlsx, .xlsm, .xls, .xlsb, .ods, .csv, .tsv or .txt)")]
    UnsupportedFormat(String),

    #[error("cannot read {path}: {message}")]
    Read { path: String, message: String },

    #[error("{path}: sheet '{sheet}' not found (available: {available})")]
    SheetNotFound {
        path: String,
        sheet: String,
        available: String,
    },

    #[error("{path}: workbook contains no sheets")]
    NoSheets { path: String },

    #[error("cannot write {path}: {message}")]
    Write { path: String, message: String },

    /// A report file that doesn't have the expected shape.
    #[error("{path}, row {row}: {message}")]
    Report {
        path: String,
        row: usize,
        message: String,
    },
}

impl IoError {
    pub fn read(path: &std::path::Path, message: impl ToString) -> Self {
        Self::Read {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    pub fn write(path: &std::path::Path, message: impl ToString) -> Self {
        Self::Write {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}
