//! pdfsheet-core: PDF-independent data types and algorithms.
//!
//! This crate provides the data model (BBox, Span, CellValue, table grids)
//! and the pure algorithms (table detection, cleaning, sheet naming) used by
//! pdfsheet. It performs no I/O and knows nothing about PDF or XLSX file
//! formats; the pipeline crate feeds it positioned text and consumes its
//! grids.

pub mod clean;
pub mod detect;
pub mod geometry;
pub mod grid;
pub mod naming;
pub mod span;

pub use clean::clean;
pub use detect::{DetectOptions, DetectedTable, detect_tables};
pub use geometry::BBox;
pub use grid::{CellValue, CleanTable, RawTable};
pub use naming::{SheetNamer, page_sheet_name};
pub use span::{Span, split_words};
