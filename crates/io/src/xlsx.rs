// Excel workbook reading (xlsx, xlsm, xls, xlsb, ods) and writing (xlsx only)
//
// Reading flattens one worksheet into display strings. Cell positions are kept
// absolute: calamine ranges start at the first non-empty cell, so leading empty
// rows and columns are padded back in and column indexes mean the same thing
// as they do in Excel.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};

use crate::error::IoError;
use crate::Grid;

/// Read one worksheet (the first when `sheet` is `None`) into a grid.
pub fn read_grid(path: &Path, sheet: Option<&str>) -> Result<Grid, IoError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| IoError::read(path, format!("failed to open workbook: {e}")))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|name| name.as_str() == wanted)
            .cloned()
            .ok_or_else(|| IoError::SheetNotFound {
                path: path.display().to_string(),
                sheet: wanted.to_string(),
                available: sheet_names.join(", "),
            })?,
        None => sheet_names.first().cloned().ok_or_else(|| IoError::NoSheets {
            path: path.display().to_string(),
        })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IoError::read(path, format!("failed to read sheet '{sheet_name}': {e}")))?;

    let (height, width) = range.get_size();
    tracing::debug!(path = %path.display(), sheet = %sheet_name, height, width, "reading worksheet");

    if height == 0 || width == 0 {
        return Ok(Grid::new());
    }

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut grid: Grid = vec![Vec::new(); start_row as usize];

    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_to_string));
        grid.push(cells);
    }

    Ok(grid)
}

/// Render a calamine cell the way it displays in a sheet.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals: serials stored as numbers read back as "12345"
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Write a single-sheet workbook: bold header row, frozen below the header,
/// every cell as a string, columns autofit.
pub fn write_sheet(path: &Path, sheet_name: &str, header: &[&str], rows: &Grid) -> Result<(), IoError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(|e| IoError::write(path, format!("invalid sheet name '{sheet_name}': {e}")))?;

    for (col, title) in header.iter().enumerate() {
        if title.is_empty() {
            continue;
        }
        worksheet
            .write_string_with_format(0, col as u16, *title, &bold)
            .map_err(|e| IoError::write(path, e))?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let excel_row = row_idx as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(excel_row, col as u16, value.as_str())
                .map_err(|e| IoError::write(path, format!("row {}: {e}", excel_row + 1)))?;
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| IoError::write(path, e))?;
    worksheet.autofit();

    workbook
        .save(path)
        .map_err(|e| IoError::write(path, format!("failed to save XLSX file: {e}")))?;
    Ok(())
}
