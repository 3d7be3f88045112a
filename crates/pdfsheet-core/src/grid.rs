//! Typed cell values and table grids.
//!
//! [`CellValue::from_raw`] is the typing boundary: raw detection strings are
//! normalized and classified exactly once, before any cleaning runs.

use std::fmt;

use unicode_normalization::UnicodeNormalization;

/// The typed content of a single table cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Textual content.
    Text(String),
    /// Numeric content, parsed from the raw text.
    Number(f64),
    /// No content (includes whitespace-only raw text).
    Empty,
}

impl CellValue {
    /// Classify a raw detection string into a typed cell value.
    ///
    /// The text is NFKC-normalized (ligatures expanded, fullwidth forms
    /// folded) and trimmed. Whitespace-only input becomes [`CellValue::Empty`].
    /// Text parsing as a finite number becomes [`CellValue::Number`]; the
    /// `inf`/`NaN` spellings that `f64` accepts stay textual.
    pub fn from_raw(text: &str) -> CellValue {
        let normalized: String = text.nfkc().collect();
        let trimmed = normalized.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        if let Some(n) = trimmed.parse::<f64>().ok().filter(|n| n.is_finite()) {
            return CellValue::Number(n);
        }
        CellValue::Text(trimmed.to_string())
    }

    /// Whether this cell counts as blank for cleaning purposes.
    ///
    /// `Empty` is blank, as is `Text` whose content trims to nothing.
    /// Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{n:.0}")
                } else {
                    write!(f, "{n}")
                }
            }
            CellValue::Empty => Ok(()),
        }
    }
}

/// A rectangular grid of cells extracted from one detected table.
///
/// Invariant: every row has the same column count. The constructor enforces
/// this by padding short rows with [`CellValue::Empty`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTable {
    /// 0-based index of the page this table was detected on.
    pub page_index: usize,
    /// Cell grid, row-major, top-to-bottom and left-to-right.
    pub cells: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Build a rectangular table, padding short rows with `Empty`.
    pub fn new(page_index: usize, mut cells: Vec<Vec<CellValue>>) -> Self {
        let width = cells.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut cells {
            row.resize(width, CellValue::Empty);
        }
        Self { page_index, cells }
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn column_count(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }
}

/// A table with fully-blank rows and columns removed.
///
/// Produced by [`crate::clean::clean`]; may be empty when the source table
/// was entirely blank.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CleanTable {
    /// 0-based index of the page the source table was detected on.
    pub page_index: usize,
    /// Cell grid, row-major; no row or column is fully blank.
    pub cells: Vec<Vec<CellValue>>,
}

impl CleanTable {
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn column_count(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
