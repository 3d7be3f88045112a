//! Table cleaning: removal of fully-blank rows and columns.

use crate::grid::{CellValue, CleanTable, RawTable};

/// Remove fully-blank rows and columns from a table.
///
/// A row is dropped when every cell in it is blank; a column is dropped when
/// every cell across all rows is blank (see [`CellValue::is_blank`]).
/// Surviving rows and columns keep their relative order. The operation is
/// pure and idempotent; an entirely blank table cleans to an empty one.
pub fn clean(table: &RawTable) -> CleanTable {
    CleanTable {
        page_index: table.page_index,
        cells: clean_cells(&table.cells),
    }
}

fn clean_cells(cells: &[Vec<CellValue>]) -> Vec<Vec<CellValue>> {
    // Grids built by hand may be ragged; missing cells count as blank
    let width = cells.iter().map(Vec::len).max().unwrap_or(0);

    let keep_cols: Vec<usize> = (0..width)
        .filter(|&c| {
            cells
                .iter()
                .any(|row| row.get(c).is_some_and(|cell| !cell.is_blank()))
        })
        .collect();

    cells
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.is_blank()))
        .map(|row| {
            keep_cols
                .iter()
                .map(|&c| row.get(c).cloned().unwrap_or(CellValue::Empty))
                .collect()
        })
        .collect()
}
