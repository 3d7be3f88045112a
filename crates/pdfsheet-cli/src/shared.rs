use std::io::{self, IsTerminal, Write};
use std::path::Path;

use pdfsheet::pdfsheet_core::DetectOptions;
use pdfsheet::{ConvertOptions, Progress, Stage};

use crate::page_range::parse_page_range;

/// Check that a path carries the expected extension (case-insensitive).
///
/// Returns `Err(2)` with a message printed to stderr otherwise; passing the
/// wrong kind of file is a usage error, not a runtime failure.
pub fn require_extension(path: &Path, expected: &str) -> Result<(), i32> {
    let ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(expected));
    if !ok {
        eprintln!(
            "Error: expected a .{expected} file, got: {}",
            path.display()
        );
        return Err(2);
    }
    Ok(())
}

/// Build pipeline options from an optional page-range string.
///
/// Returns `Err(2)` with a message printed to stderr when the range string
/// cannot be parsed.
pub fn convert_options(pages: Option<&str>, detect: &DetectOptions) -> Result<ConvertOptions, i32> {
    let pages = match pages {
        Some(range) => Some(parse_page_range(range).map_err(|e| {
            eprintln!("Error: {e}");
            2
        })?),
        None => None,
    };
    Ok(ConvertOptions {
        pages,
        detect: detect.clone(),
    })
}

/// Escape a field for CSV output: quote when it contains a comma, quote, or
/// newline, doubling any internal quotes.
pub fn csv_escape(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Prints per-page progress to stderr, but only when stderr is a terminal.
pub struct ProgressReporter {
    is_tty: bool,
    dirty: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            is_tty: io::stderr().is_terminal(),
            dirty: false,
        }
    }

    pub fn handle(&mut self, event: &Progress) {
        if !self.is_tty {
            return;
        }
        match event {
            Progress::PageDone { current, total, .. } => {
                eprint!("\rExtracting page {current}/{total}...");
                let _ = io::stderr().flush();
                self.dirty = true;
            }
            Progress::Stage(Stage::Cleaning | Stage::Done) if self.dirty => {
                eprint!("\r{}\r", " ".repeat(40));
                let _ = io::stderr().flush();
                self.dirty = false;
            }
            Progress::Stage(_) => {}
        }
    }
}
