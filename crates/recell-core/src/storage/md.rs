//! Markdown table output.

use crate::sheet::Sheet;
use recell_engine::engine::CellRef;
use std::io::Write;

/// Write the non-empty part of the grid as a markdown table.
///
/// The table spans from A1 to the last row and column holding any input, so
/// row numbers and column letters line up with cell keys.
pub fn write_markdown<W: Write>(w: &mut W, sheet: &Sheet) -> std::io::Result<()> {
    let Some((max_row, max_col)) = find_grid_bounds(sheet) else {
        writeln!(w, "*Empty sheet*")?;
        return Ok(());
    };

    // Header with column letters
    write!(w, "|   |")?;
    for col in 0..=max_col {
        write!(w, " {} |", CellRef::col_to_letters(col))?;
    }
    writeln!(w)?;

    write!(w, "|---|")?;
    for _ in 0..=max_col {
        write!(w, "---|")?;
    }
    writeln!(w)?;

    for row in 0..=max_row {
        write!(w, "| {} |", row + 1)?; // 1-based row numbers
        for col in 0..=max_col {
            let display = sheet.get_cell_display(&CellRef::new(col, row));
            write!(w, " {} |", escape_markdown(&display))?;
        }
        writeln!(w)?;
    }

    Ok(())
}

/// Last (row, col) holding any input, or None for an empty sheet.
fn find_grid_bounds(sheet: &Sheet) -> Option<(usize, usize)> {
    sheet
        .grid()
        .iter()
        .filter(|(_, cell)| !cell.is_empty())
        .fold(None, |bounds, (cell_ref, _)| {
            let (max_row, max_col) = bounds.unwrap_or((0, 0));
            Some((max_row.max(cell_ref.row), max_col.max(cell_ref.col)))
        })
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
