// Source export reading: grid -> SourceRow list

use std::path::Path;

use serialsync_recon::config::{ColumnMapping, SourceConfig};
use serialsync_recon::model::SourceRow;

use crate::error::IoError;
use crate::format::FileFormat;
use crate::{csv, xlsx, Grid};

/// Load one source export. The first row is a header and is skipped, as are
/// rows whose serial cell is blank. Missing trailing cells read as empty.
pub fn read_source(path: &Path, config: &SourceConfig) -> Result<Vec<SourceRow>, IoError> {
    let grid = match FileFormat::from_path(path)? {
        FileFormat::Workbook => xlsx::read_grid(path, config.sheet.as_deref())?,
        FileFormat::Delimited(delimiter) => csv::read_grid(path, delimiter)?,
    };

    let rows = rows_from_grid(&grid, &config.columns, config.limit);
    tracing::info!(path = %path.display(), rows = rows.len(), "processing rows");
    Ok(rows)
}

/// Convert a grid (header row included) into source rows.
///
/// `limit` truncates after blank-serial rows are dropped.
pub fn rows_from_grid(grid: &Grid, columns: &ColumnMapping, limit: Option<usize>) -> Vec<SourceRow> {
    let cell = |row: &[String], col: usize| -> String {
        row.get(col).map(|s| s.trim().to_string()).unwrap_or_default()
    };

    let mut skipped = 0usize;
    let mut rows: Vec<SourceRow> = grid
        .iter()
        .skip(1)
        .filter_map(|row| {
            let serial = cell(row, columns.serial);
            if serial.is_empty() {
                skipped += 1;
                return None;
            }
            Some(SourceRow {
                serial,
                location: cell(row, columns.location),
                device: cell(row, columns.device),
            })
        })
        .collect();

    if skipped > 0 {
        tracing::debug!(skipped, "rows without a serial skipped");
    }

    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    rows
}
