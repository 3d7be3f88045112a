//! Error types for the extraction pipeline.
//!
//! Fatal failures use [`Error`]; per-page problems are recovered and carried
//! as [`PageFault`] values alongside the results, never thrown.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A fatal pipeline error.
#[derive(Debug, Error)]
pub enum Error {
    /// The input path does not exist. Surfaced before anything else runs.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The input bytes could not be parsed as a PDF document, or the
    /// document is encrypted. Surfaced before any extraction.
    #[error("corrupt document {}: {reason}", path.display())]
    CorruptDocument { path: PathBuf, reason: String },

    /// The output workbook could not be written. Surfaced only after all
    /// extraction and cleaning has completed; the destination is left
    /// without a partial file.
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// Other I/O failure while reading the input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A recovered per-page failure.
///
/// A page whose content cannot be fetched or decoded is skipped; the rest of
/// the document is still processed. Faults are reported next to the results
/// so callers can show which pages were dropped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageFault {
    /// 0-based index of the skipped page.
    pub page_index: usize,
    /// Human-readable reason the page was skipped.
    pub reason: String,
}

impl PageFault {
    pub fn new(page_index: usize, reason: impl Into<String>) -> Self {
        Self {
            page_index,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for PageFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Pages are numbered from 1 anywhere a person reads them
        write!(f, "page {}: {}", self.page_index + 1, self.reason)
    }
}
