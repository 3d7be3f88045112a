use std::path::Path;

use pdfsheet::gather;
use pdfsheet::pdfsheet_core::{CleanTable, DetectOptions};

use crate::cli::TableFormat;
use crate::shared::{convert_options, csv_escape, require_extension};

/// Run the `tables` subcommand: detect and clean tables, print them without
/// writing a workbook.
pub fn run(
    input: &Path,
    pages: Option<&str>,
    format: &TableFormat,
    detect: &DetectOptions,
) -> Result<(), i32> {
    require_extension(input, "pdf")?;
    let options = convert_options(pages, detect)?;
    log::debug!("previewing tables in {} ({:?})", input.display(), options.pages);

    let gathered = gather(input, &options).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    for fault in &gathered.faults {
        eprintln!("Warning: skipped {fault}");
    }

    if gathered.tables.is_empty() {
        if matches!(format, TableFormat::Json) {
            println!("[]");
        } else {
            println!("No tables found in {}", input.display());
        }
        return Ok(());
    }

    match format {
        TableFormat::Grid => print!("{}", render_grid(&gathered.tables)),
        TableFormat::Csv => print!("{}", render_csv(&gathered.tables)),
        TableFormat::Json => match serde_json::to_string_pretty(&gathered.tables) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize tables: {e}");
                return Err(1);
            }
        },
    }

    Ok(())
}

/// Render each table as an aligned grid with `|` column separators.
fn render_grid(tables: &[CleanTable]) -> String {
    let mut out = String::new();
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "Table on page {} ({} x {}):\n",
            table.page_index + 1,
            table.row_count(),
            table.column_count()
        ));

        let rendered: Vec<Vec<String>> = table
            .cells
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        let mut widths = vec![0usize; table.column_count()];
        for row in &rendered {
            for (col, cell) in row.iter().enumerate() {
                widths[col] = widths[col].max(cell.chars().count());
            }
        }

        for row in &rendered {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(col, cell)| format!("{cell:<width$}", width = widths[col]))
                .collect();
            out.push_str(line.join(" | ").trim_end());
            out.push('\n');
        }
    }
    out
}

/// Render tables as CSV, one blank line between tables.
fn render_csv(tables: &[CleanTable]) -> String {
    let mut out = String::new();
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for row in &table.cells {
            let line: Vec<String> = row.iter().map(|c| csv_escape(&c.to_string())).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
    }
    out
}
