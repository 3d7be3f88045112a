//! Table extraction: adapts the detection capability's output into typed
//! [`RawTable`]s, recovering per-page faults along the way.

use pdfsheet_core::{CellValue, DetectOptions, RawTable, detect_tables};

use crate::content::page_spans;
use crate::document::{Document, Page};
use crate::error::PageFault;

/// The outcome of extracting a document: tables in page order, recovered
/// page faults, and the number of pages visited.
///
/// `pages` always equals the number of page entries processed, faulted
/// pages included, so a P-page document yields exactly P entries.
#[derive(Debug)]
pub struct Extracted {
    /// Detected tables, pages in order, tables within a page top-to-bottom.
    pub tables: Vec<RawTable>,
    /// Pages that were skipped, with reasons.
    pub faults: Vec<PageFault>,
    /// Number of pages processed.
    pub pages: usize,
}

/// Extract the tables of a single page.
///
/// A page with no detectable tabular structure yields an empty Vec. A page
/// whose content cannot be fetched or decoded yields a [`PageFault`]; the
/// caller decides whether to continue (the document-level drivers always
/// do).
pub fn extract_page(
    doc: &Document,
    page: Page,
    options: &DetectOptions,
) -> Result<Vec<RawTable>, PageFault> {
    let spans = page_spans(doc, page).map_err(|e| {
        let fault = PageFault::new(page.index, e.to_string());
        log::warn!("skipping {fault}");
        fault
    })?;

    let tables = detect_tables(&spans, options)
        .into_iter()
        .map(|detected| {
            let cells = detected
                .rows
                .into_iter()
                .map(|row| row.iter().map(|text| CellValue::from_raw(text)).collect())
                .collect();
            RawTable::new(page.index, cells)
        })
        .collect::<Vec<_>>();

    log::debug!("page {}: {} table(s)", page.index + 1, tables.len());
    Ok(tables)
}

/// Extract tables from every page of a document.
///
/// One bad page never aborts the run: its fault is recorded and the
/// remaining pages are still processed.
pub fn extract_tables(doc: &Document, options: &DetectOptions) -> Extracted {
    extract_tables_on(doc, doc.pages(), options)
}

/// Extract tables from a chosen subset of pages, in the order given.
pub fn extract_tables_on(
    doc: &Document,
    pages: impl IntoIterator<Item = Page>,
    options: &DetectOptions,
) -> Extracted {
    let mut tables = Vec::new();
    let mut faults = Vec::new();
    let mut visited = 0;

    for page in pages {
        visited += 1;
        match extract_page(doc, page, options) {
            Ok(page_tables) => tables.extend(page_tables),
            Err(fault) => faults.push(fault),
        }
    }

    Extracted {
        tables,
        faults,
        pages: visited,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{
        pdf_with_broken_pages, pdf_with_content, pdf_with_pages, table_content, write_temp_pdf,
    };

    fn open(bytes: &[u8]) -> (tempfile::NamedTempFile, Document) {
        let file = write_temp_pdf(bytes);
        let doc = Document::open(file.path()).unwrap();
        (file, doc)
    }

    #[test]
    fn grid_page_yields_one_raw_table() {
        let content = table_content(&[
            &["Name", "Age", "City"],
            &["Alice", "30", "Oslo"],
            &["Bob", "25", "Paris"],
        ]);
        let (_file, doc) = open(&pdf_with_content(&content));
        let extracted = extract_tables(&doc, &DetectOptions::default());

        assert_eq!(extracted.pages, 1);
        assert!(extracted.faults.is_empty());
        assert_eq!(extracted.tables.len(), 1);

        let table = &extracted.tables[0];
        assert_eq!(table.page_index, 0);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.cells[0][0], CellValue::Text("Name".to_string()));
        // Numeric cells are typed at the boundary
        assert_eq!(table.cells[1][1], CellValue::Number(30.0));
    }

    #[test]
    fn page_without_tables_yields_empty_sequence() {
        let (_file, doc) = open(&pdf_with_content(b"BT /F1 12 Tf 72 720 Td (prose) Tj ET"));
        let extracted = extract_tables(&doc, &DetectOptions::default());
        assert_eq!(extracted.pages, 1);
        assert!(extracted.tables.is_empty());
        assert!(extracted.faults.is_empty());
    }

    #[test]
    fn every_page_is_counted_even_when_faulting() {
        let good = table_content(&[&["a", "1"], &["b", "2"]]);
        let contents: Vec<&[u8]> = vec![&good, &good, &good, &good, &good];
        let (_file, doc) = open(&pdf_with_broken_pages(&contents, &[2]));
        let extracted = extract_tables(&doc, &DetectOptions::default());

        // 5 pages visited, page 3 skipped, 4 tables survive
        assert_eq!(extracted.pages, 5);
        assert_eq!(extracted.faults.len(), 1);
        assert_eq!(extracted.faults[0].page_index, 2);
        assert_eq!(extracted.tables.len(), 4);
        let pages: Vec<usize> = extracted.tables.iter().map(|t| t.page_index).collect();
        assert_eq!(pages, vec![0, 1, 3, 4]);
    }

    #[test]
    fn fault_carries_page_index_and_reason() {
        let (_file, doc) = open(&pdf_with_broken_pages(&[b"BT ET"], &[0]));
        let page = doc.page(0).unwrap();
        let fault = extract_page(&doc, page, &DetectOptions::default()).unwrap_err();
        assert_eq!(fault.page_index, 0);
        assert!(!fault.reason.is_empty());
    }

    #[test]
    fn tables_preserve_page_order_across_pages() {
        let first = table_content(&[&["p1a", "x"], &["p1b", "y"]]);
        let second = table_content(&[&["p2a", "x"], &["p2b", "y"]]);
        let (_file, doc) = open(&pdf_with_pages(&[&first, &second]));
        let extracted = extract_tables(&doc, &DetectOptions::default());
        assert_eq!(extracted.tables.len(), 2);
        assert_eq!(extracted.tables[0].page_index, 0);
        assert_eq!(extracted.tables[1].page_index, 1);
    }

    #[test]
    fn subset_extraction_only_visits_selected_pages() {
        let grid = table_content(&[&["a", "1"], &["b", "2"]]);
        let contents: Vec<&[u8]> = vec![&grid, &grid, &grid];
        let (_file, doc) = open(&pdf_with_pages(&contents));

        let selected = [doc.page(0).unwrap(), doc.page(2).unwrap()];
        let extracted = extract_tables_on(&doc, selected, &DetectOptions::default());
        assert_eq!(extracted.pages, 2);
        let pages: Vec<usize> = extracted.tables.iter().map(|t| t.page_index).collect();
        assert_eq!(pages, vec![0, 2]);
    }

    #[test]
    fn blank_cells_normalize_to_empty() {
        let content = table_content(&[&["h1", "", "h2"], &["v1", "", "v2"]]);
        let (_file, doc) = open(&pdf_with_content(&content));
        let extracted = extract_tables(&doc, &DetectOptions::default());
        assert_eq!(extracted.tables.len(), 1);
        // The middle column never renders, so detection sees two columns
        assert_eq!(extracted.tables[0].column_count(), 2);
    }
}
