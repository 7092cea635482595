// Serial report writing and read-back

use std::path::Path;

use serialsync_recon::model::{ReconciledSerial, SyncStatus};

use crate::error::IoError;
use crate::format::FileFormat;
use crate::{csv, xlsx, Grid};

/// Fixed report column order.
pub const REPORT_HEADERS: [&str; 5] = ["Device", "Serial", "ERP Location", "WMS Location", "Status"];

/// One report line as written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub device: String,
    pub serial: String,
    pub erp_location: String,
    pub wms_location: String,
    pub status: SyncStatus,
}

impl From<&ReconciledSerial> for ReportRow {
    fn from(r: &ReconciledSerial) -> Self {
        Self {
            device: r.device.clone(),
            serial: r.serial.clone(),
            erp_location: r.erp_location.clone(),
            wms_location: r.wms_location.clone(),
            status: r.status,
        }
    }
}

impl ReportRow {
    fn to_cells(&self) -> Vec<String> {
        vec![
            self.device.clone(),
            self.serial.clone(),
            self.erp_location.clone(),
            self.wms_location.clone(),
            self.status.to_string(),
        ]
    }
}

/// Write the report. `.xlsx` gets a worksheet named `sheet`; `.csv`/`.tsv`
/// ignore the sheet name.
pub fn write_report(path: &Path, sheet: &str, records: &[ReconciledSerial]) -> Result<(), IoError> {
    let rows: Grid = records
        .iter()
        .map(|r| ReportRow::from(r).to_cells())
        .collect();

    match FileFormat::writable(path)? {
        FileFormat::Workbook => xlsx::write_sheet(path, sheet, &REPORT_HEADERS, &rows)?,
        FileFormat::Delimited(delimiter) => {
            csv::write_grid(path, &REPORT_HEADERS, &rows, delimiter.unwrap_or(b','))?
        }
    }

    tracing::info!(path = %path.display(), rows = rows.len(), "results saved");
    Ok(())
}

/// Read a report back. The header must match [`REPORT_HEADERS`].
pub fn read_report(path: &Path) -> Result<Vec<ReportRow>, IoError> {
    let grid = match FileFormat::from_path(path)? {
        FileFormat::Workbook => xlsx::read_grid(path, None)?,
        FileFormat::Delimited(delimiter) => csv::read_grid(path, delimiter)?,
    };

    let report_err = |row: usize, message: String| IoError::Report {
        path: path.display().to_string(),
        row,
        message,
    };

    let header = grid
        .first()
        .ok_or_else(|| report_err(1, "missing header row".into()))?;
    let header: Vec<&str> = header.iter().map(|h| h.trim()).collect();
    if header.get(..REPORT_HEADERS.len()) != Some(&REPORT_HEADERS[..]) {
        return Err(report_err(
            1,
            format!("expected header {:?}, found {:?}", REPORT_HEADERS, header),
        ));
    }

    let mut rows = Vec::with_capacity(grid.len().saturating_sub(1));
    for (i, row) in grid.iter().enumerate().skip(1) {
        let cell = |col: usize| row.get(col).cloned().unwrap_or_default();
        if row.iter().all(|c| c.is_empty()) {
            continue;
        }
        let status = cell(4)
            .parse::<SyncStatus>()
            .map_err(|e| report_err(i + 1, e.to_string()))?;
        rows.push(ReportRow {
            device: cell(0),
            serial: cell(1),
            erp_location: cell(2),
            wms_location: cell(3),
            status,
        });
    }

    Ok(rows)
}
