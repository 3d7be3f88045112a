//! The conversion pipeline: load, extract, clean, write.
//!
//! Two-phase by design: [`gather`] does all the loading, extraction and
//! cleaning and returns the cleaned tables, and [`crate::write_workbook`]
//! persists them. A write failure therefore wastes no extraction work; the
//! caller still holds the tables and can retry to a different path.
//! [`convert`] composes the two phases.

use std::path::{Path, PathBuf};

use pdfsheet_core::{CleanTable, DetectOptions, clean};

use crate::document::Document;
use crate::error::{PageFault, Result};
use crate::extract::extract_page;
use crate::xlsx::write_workbook;

/// Options for a whole conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// 0-based page indices to process; `None` means all pages.
    pub pages: Option<Vec<usize>>,
    /// Table detection tuning.
    pub detect: DetectOptions,
}

/// Pipeline stages, in order. Reported through [`Progress::Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Stage {
    Loading,
    Extracting,
    Cleaning,
    Writing,
    Done,
}

/// Progress events emitted while a conversion runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// The pipeline entered a new stage.
    Stage(Stage),
    /// One page finished extracting (faulted pages included).
    PageDone {
        /// 0-based index of the completed page.
        page_index: usize,
        /// Position in the run, 1-based.
        current: usize,
        /// Total pages in the run.
        total: usize,
    },
}

/// Everything the pipeline produced before writing: cleaned tables in page
/// order plus the faults recovered along the way.
#[derive(Debug)]
pub struct Gathered {
    /// Cleaned tables; entirely-blank tables have been dropped.
    pub tables: Vec<CleanTable>,
    /// Pages skipped during extraction.
    pub faults: Vec<PageFault>,
    /// Number of pages processed.
    pub pages: usize,
}

/// The outcome of a completed conversion.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Summary {
    /// Sheet names written, in workbook order.
    pub sheets: Vec<String>,
    /// Number of pages processed.
    pub pages: usize,
    /// Pages skipped, with reasons.
    pub faults: Vec<PageFault>,
    /// The written workbook, or `None` when no tables were found and no
    /// file was created.
    pub output: Option<PathBuf>,
}

/// Load a PDF and run extraction and cleaning, without writing anything.
pub fn gather(input: &Path, options: &ConvertOptions) -> Result<Gathered> {
    gather_with(input, options, |_| {})
}

fn gather_with(
    input: &Path,
    options: &ConvertOptions,
    mut progress: impl FnMut(Progress),
) -> Result<Gathered> {
    progress(Progress::Stage(Stage::Loading));
    let doc = Document::open(input)?;

    let selected: Vec<usize> = match &options.pages {
        Some(pages) => pages.clone(),
        None => (0..doc.page_count()).collect(),
    };

    progress(Progress::Stage(Stage::Extracting));
    let mut tables = Vec::new();
    let mut faults = Vec::new();
    let total = selected.len();
    for (i, index) in selected.iter().enumerate() {
        // Out-of-range selections are reported as faults, not panics
        match doc.page(*index) {
            Some(page) => match extract_page(&doc, page, &options.detect) {
                Ok(page_tables) => tables.extend(page_tables),
                Err(fault) => faults.push(fault),
            },
            None => faults.push(PageFault::new(
                *index,
                format!("page index out of range (document has {} pages)", doc.page_count()),
            )),
        }
        progress(Progress::PageDone {
            page_index: *index,
            current: i + 1,
            total,
        });
    }

    progress(Progress::Stage(Stage::Cleaning));
    let tables: Vec<CleanTable> = tables
        .iter()
        .map(clean)
        .filter(|t| !t.is_empty())
        .collect();

    Ok(Gathered {
        tables,
        faults,
        pages: total,
    })
}

/// Convert one PDF into one XLSX workbook.
///
/// See [`convert_with`] for the progress-reporting variant.
pub fn convert(input: &Path, output: &Path, options: &ConvertOptions) -> Result<Summary> {
    convert_with(input, output, options, |_| {})
}

/// Convert one PDF into one XLSX workbook, reporting progress.
///
/// When the document yields no tables, no output file is created and the
/// returned summary's `output` is `None`.
///
/// # Errors
///
/// Fatal errors only ([`Error::FileNotFound`], [`Error::CorruptDocument`],
/// [`Error::Io`], [`Error::Write`]); page-level faults are recovered and
/// reported in the summary.
pub fn convert_with(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
    mut progress: impl FnMut(Progress),
) -> Result<Summary> {
    let gathered = gather_with(input, options, &mut progress)?;

    if gathered.tables.is_empty() {
        log::info!("no tables found in {}", input.display());
        progress(Progress::Stage(Stage::Done));
        return Ok(Summary {
            sheets: Vec::new(),
            pages: gathered.pages,
            faults: gathered.faults,
            output: None,
        });
    }

    progress(Progress::Stage(Stage::Writing));
    let sheets = write_workbook(output, &gathered.tables)?;
    progress(Progress::Stage(Stage::Done));

    Ok(Summary {
        sheets,
        pages: gathered.pages,
        faults: gathered.faults,
        output: Some(output.to_path_buf()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testutil::{
        pdf_with_broken_pages, pdf_with_content, pdf_with_pages, table_content, write_temp_pdf,
    };

    fn grid() -> Vec<u8> {
        table_content(&[
            &["Name", "Age"],
            &["Alice", "30"],
            &["Bob", "25"],
        ])
    }

    #[test]
    fn convert_writes_workbook_and_reports_sheets() {
        let file = write_temp_pdf(&pdf_with_content(&grid()));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.xlsx");

        let summary = convert(file.path(), &dest, &ConvertOptions::default()).unwrap();
        assert_eq!(summary.sheets, vec!["Page_1"]);
        assert_eq!(summary.pages, 1);
        assert!(summary.faults.is_empty());
        assert_eq!(summary.output.as_deref(), Some(dest.as_path()));
        assert!(dest.exists());
    }

    #[test]
    fn missing_input_fails_before_any_output_exists() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.xlsx");

        let err = convert(
            Path::new("/nonexistent/input.pdf"),
            &dest,
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
        assert!(!dest.exists());
    }

    #[test]
    fn no_tables_creates_no_file() {
        let file = write_temp_pdf(&pdf_with_content(b"BT /F1 12 Tf 72 720 Td (prose) Tj ET"));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.xlsx");

        let summary = convert(file.path(), &dest, &ConvertOptions::default()).unwrap();
        assert!(summary.sheets.is_empty());
        assert_eq!(summary.output, None);
        assert!(!dest.exists());
    }

    #[test]
    fn faulted_page_is_reported_not_thrown() {
        let good = grid();
        let contents: Vec<&[u8]> = vec![&good, &good, &good, &good, &good];
        let file = write_temp_pdf(&pdf_with_broken_pages(&contents, &[2]));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.xlsx");

        let summary = convert(file.path(), &dest, &ConvertOptions::default()).unwrap();
        // Pages 1,2,4,5 produce sheets; page 3 is reported as a fault
        assert_eq!(summary.sheets, vec!["Page_1", "Page_2", "Page_4", "Page_5"]);
        assert_eq!(summary.faults.len(), 1);
        assert_eq!(summary.faults[0].page_index, 2);
    }

    #[test]
    fn unwritable_destination_fails_after_gathering() {
        let file = write_temp_pdf(&pdf_with_content(&grid()));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing").join("out.xlsx");

        let mut stages = Vec::new();
        let err = convert_with(
            file.path(),
            &dest,
            &ConvertOptions::default(),
            |p| {
                if let Progress::Stage(stage) = p {
                    stages.push(stage);
                }
            },
        )
        .unwrap_err();

        assert!(matches!(err, Error::Write { .. }));
        // Extraction and cleaning completed before the failure
        assert_eq!(
            stages,
            vec![Stage::Loading, Stage::Extracting, Stage::Cleaning, Stage::Writing]
        );
        assert!(!dest.exists());
    }

    #[test]
    fn gather_returns_tables_reusable_for_a_retry() {
        let file = write_temp_pdf(&pdf_with_content(&grid()));
        let gathered = gather(file.path(), &ConvertOptions::default()).unwrap();
        assert_eq!(gathered.tables.len(), 1);

        // The gathered tables can be written anywhere, repeatedly
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.xlsx");
        let second = dir.path().join("b.xlsx");
        crate::write_workbook(&first, &gathered.tables).unwrap();
        crate::write_workbook(&second, &gathered.tables).unwrap();
        assert!(first.exists() && second.exists());
    }

    #[test]
    fn page_selection_limits_the_run() {
        let grid_bytes = grid();
        let contents: Vec<&[u8]> = vec![&grid_bytes, &grid_bytes, &grid_bytes];
        let file = write_temp_pdf(&pdf_with_pages(&contents));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.xlsx");

        let options = ConvertOptions {
            pages: Some(vec![0, 2]),
            ..ConvertOptions::default()
        };
        let summary = convert(file.path(), &dest, &options).unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.sheets, vec!["Page_1", "Page_3"]);
    }

    #[test]
    fn out_of_range_selection_is_a_fault() {
        let file = write_temp_pdf(&pdf_with_content(&grid()));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.xlsx");

        let options = ConvertOptions {
            pages: Some(vec![0, 9]),
            ..ConvertOptions::default()
        };
        let summary = convert(file.path(), &dest, &options).unwrap();
        assert_eq!(summary.faults.len(), 1);
        assert_eq!(summary.faults[0].page_index, 9);
        assert_eq!(summary.sheets, vec!["Page_1"]);
    }

    #[test]
    fn progress_reports_each_page_and_every_stage() {
        let grid_bytes = grid();
        let contents: Vec<&[u8]> = vec![&grid_bytes, &grid_bytes];
        let file = write_temp_pdf(&pdf_with_pages(&contents));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.xlsx");

        let mut events = Vec::new();
        convert_with(file.path(), &dest, &ConvertOptions::default(), |p| {
            events.push(p)
        })
        .unwrap();

        let stages: Vec<Stage> = events
            .iter()
            .filter_map(|e| match e {
                Progress::Stage(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(
            stages,
            vec![
                Stage::Loading,
                Stage::Extracting,
                Stage::Cleaning,
                Stage::Writing,
                Stage::Done,
            ]
        );

        let pages: Vec<(usize, usize, usize)> = events
            .iter()
            .filter_map(|e| match e {
                Progress::PageDone {
                    page_index,
                    current,
                    total,
                } => Some((*page_index, *current, *total)),
                _ => None,
            })
            .collect();
        assert_eq!(pages, vec![(0, 1, 2), (1, 2, 2)]);
    }
}
