//! pdfsheet: extract tables from PDF documents into XLSX workbooks.
//!
//! The pipeline is a linear sequence per invocation: load the document,
//! extract raw tables page by page, clean them, write the workbook. It
//! holds no global state, so independent conversions can run in parallel
//! processes without coordination.
//!
//! # Architecture
//!
//! - **pdfsheet-core**: backend-independent data model (spans, cell values,
//!   grids) and algorithms (table detection, cleaning, sheet naming)
//! - **pdfsheet** (this crate): lopdf-backed document loading, content
//!   stream interpretation, per-page fault recovery, XLSX writing, and the
//!   [`convert`] / [`gather`] + [`write_workbook`] entry points
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use pdfsheet::{ConvertOptions, convert};
//!
//! let summary = convert(
//!     Path::new("report.pdf"),
//!     Path::new("report.xlsx"),
//!     &ConvertOptions::default(),
//! )?;
//! for fault in &summary.faults {
//!     eprintln!("warning: skipped {fault}");
//! }
//! # Ok::<(), pdfsheet::Error>(())
//! ```

mod content;
mod document;
mod error;
mod extract;
mod pipeline;
mod xlsx;

#[cfg(test)]
pub(crate) mod testutil;

pub use pdfsheet_core;

pub use document::{Document, Page, Pages};
pub use error::{Error, PageFault, Result};
pub use extract::{Extracted, extract_page, extract_tables, extract_tables_on};
pub use pipeline::{ConvertOptions, Gathered, Progress, Stage, Summary, convert, convert_with, gather};
pub use xlsx::write_workbook;
