//! XLSX workbook writing.
//!
//! Assembles the OOXML parts as raw XML and packs them with the `zip`
//! crate. Text cells are written as inline strings, numeric cells as
//! number values, empty cells are omitted. The workbook is written to a
//! temporary file beside the destination and renamed into place, so a
//! failed write never leaves a half-written file at the destination.

use std::fmt::Write as _;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use pdfsheet_core::{CellValue, CleanTable, SheetNamer, page_sheet_name};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::{Error, Result};

/// Padding added to the widest cell when sizing a column, in characters.
const COLUMN_PADDING: usize = 2;

/// Row height per line of text, in points.
const LINE_HEIGHT: f64 = 15.0;

/// Write one workbook with one worksheet per table.
///
/// Sheet names derive from each table's page index (`Page_3` for the first
/// table on page 3, `Page_3_2` for the second) and are returned in sheet
/// order.
///
/// # Errors
///
/// [`Error::Write`] when the destination is not writable (missing
/// directory, permissions, disk full). The destination path is left
/// untouched on failure.
pub fn write_workbook(dest: &Path, tables: &[CleanTable]) -> Result<Vec<String>> {
    let mut namer = SheetNamer::new();
    let names: Vec<String> = tables
        .iter()
        .map(|t| namer.assign(&page_sheet_name(t.page_index)))
        .collect();

    let bytes = workbook_bytes(&names, tables).map_err(|e| Error::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let tmp = temp_path(dest);
    std::fs::write(&tmp, &bytes).map_err(|e| {
        // A disk-full write can fail after creating the temp file
        let _ = std::fs::remove_file(&tmp);
        Error::Write {
            path: dest.to_path_buf(),
            source: e,
        }
    })?;
    std::fs::rename(&tmp, dest).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        Error::Write {
            path: dest.to_path_buf(),
            source: e,
        }
    })?;

    log::debug!("wrote {} sheet(s) to {}", names.len(), dest.display());
    Ok(names)
}

/// `<dest>.tmp~`, in the destination's directory so the rename stays on
/// one filesystem.
fn temp_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".tmp~");
    PathBuf::from(name)
}

/// Assemble the complete XLSX container in memory.
fn workbook_bytes(names: &[String], tables: &[CleanTable]) -> std::io::Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut part = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, path: &str, xml: String| {
        zip.start_file(path, options)
            .map_err(std::io::Error::other)?;
        std::io::Write::write_all(zip, xml.as_bytes())
    };

    part(&mut zip, "[Content_Types].xml", content_types_xml(names.len()))?;
    part(&mut zip, "_rels/.rels", root_rels_xml())?;
    part(&mut zip, "xl/workbook.xml", workbook_xml(names))?;
    part(
        &mut zip,
        "xl/_rels/workbook.xml.rels",
        workbook_rels_xml(names.len()),
    )?;
    for (i, table) in tables.iter().enumerate() {
        part(
            &mut zip,
            &format!("xl/worksheets/sheet{}.xml", i + 1),
            sheet_xml(table),
        )?;
    }

    let cursor = zip.finish().map_err(std::io::Error::other)?;
    Ok(cursor.into_inner())
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn content_types_xml(sheet_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    );
    for i in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
        );
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels_xml() -> String {
    String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
    )
}

fn workbook_xml(names: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    for (i, name) in names.iter().enumerate() {
        let _ = write!(
            xml,
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(name),
            i + 1,
            i + 1,
        );
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#,
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn sheet_xml(table: &CleanTable) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );

    let widths = column_widths(table);
    if !widths.is_empty() {
        xml.push_str("<cols>");
        for (c, width) in widths.iter().enumerate() {
            let _ = write!(
                xml,
                r#"<col min="{0}" max="{0}" width="{1}" customWidth="1"/>"#,
                c + 1,
                width,
            );
        }
        xml.push_str("</cols>");
    }

    xml.push_str("<sheetData>");
    for (r, row) in table.cells.iter().enumerate() {
        let lines = row
            .iter()
            .map(|cell| cell.to_string().lines().count().max(1))
            .max()
            .unwrap_or(1);
        if lines > 1 {
            let _ = write!(
                xml,
                r#"<row r="{}" ht="{}" customHeight="1">"#,
                r + 1,
                lines as f64 * LINE_HEIGHT,
            );
        } else {
            let _ = write!(xml, r#"<row r="{}">"#, r + 1);
        }

        for (c, cell) in row.iter().enumerate() {
            let reference = cell_ref(r, c);
            match cell {
                CellValue::Text(text) => {
                    let _ = write!(
                        xml,
                        r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
                        escape_xml(text),
                    );
                }
                CellValue::Number(n) => {
                    let _ = write!(xml, r#"<c r="{reference}"><v>{n}</v></c>"#);
                }
                CellValue::Empty => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Width per column: longest cell text plus padding.
fn column_widths(table: &CleanTable) -> Vec<usize> {
    let mut widths = vec![0usize; table.column_count()];
    for row in &table.cells {
        for (c, cell) in row.iter().enumerate() {
            let len = cell
                .to_string()
                .lines()
                .map(|line| line.chars().count())
                .max()
                .unwrap_or(0);
            widths[c] = widths[c].max(len);
        }
    }
    widths.iter().map(|w| w + COLUMN_PADDING).collect()
}

/// Spreadsheet cell reference ("A1", "B3", "AA10") from 0-based indices.
fn cell_ref(row: usize, col: usize) -> String {
    let mut letters = String::new();
    let mut c = col;
    loop {
        letters.insert(0, (b'A' + (c % 26) as u8) as char);
        if c < 26 {
            break;
        }
        c = c / 26 - 1;
    }
    format!("{letters}{}", row + 1)
}
