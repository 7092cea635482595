// Source file readers and report writers

pub mod csv;
pub mod error;
pub mod format;
pub mod report;
pub mod source;
pub mod xlsx;

pub use error::IoError;
pub use format::FileFormat;
pub use report::{read_report, write_report, ReportRow, REPORT_HEADERS};
pub use source::{read_source, rows_from_grid};

/// A sheet as rows of display strings. Rows may differ in width.
pub type Grid = Vec<Vec<String>>;
