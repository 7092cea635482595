// File format detection by extension

use std::path::Path;

use crate::error::IoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// xlsx, xlsm, xls, xlsb, ods (read via calamine; only xlsx is writable)
    Workbook,
    /// Delimited text. `None` means sniff the delimiter on read (comma on write).
    Delimited(Option<u8>),
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Workbook),
            "csv" | "txt" => Ok(Self::Delimited(None)),
            "tsv" => Ok(Self::Delimited(Some(b'\t'))),
            _ => Err(IoError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Formats the report writer can produce.
    pub fn writable(path: &Path) -> Result<Self, IoError> {
        let format = Self::from_path(path)?;
        let is_xlsx = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("xlsx"))
            .unwrap_or(false);

        match format {
            Self::Workbook if !is_xlsx => Err(IoError::UnsupportedFormat(format!(
                "{} (only .xlsx workbooks can be written)",
                path.display()
            ))),
            other => Ok(other),
        }
    }
}
