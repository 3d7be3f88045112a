//! Worksheet name derivation and de-duplication.

use std::collections::{HashMap, HashSet};

/// XLSX limits sheet names to 31 characters.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Base sheet name for a table detected on the given 0-based page index.
///
/// Display numbering is 1-based: the first page yields `Page_1`.
pub fn page_sheet_name(page_index: usize) -> String {
    format!("Page_{}", page_index + 1)
}

/// Assigns unique, XLSX-valid worksheet names.
///
/// The first table to request a base name gets it verbatim (after
/// sanitizing); later requests for the same base get a numeric suffix
/// (`Page_3`, `Page_3_2`, `Page_3_3`, ...). Names are truncated so that
/// base plus suffix stays within [`MAX_SHEET_NAME_LEN`].
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve and return a unique sheet name derived from `base`.
    pub fn assign(&mut self, base: &str) -> String {
        let base = sanitize(base);
        if self.used.insert(base.clone()) {
            return base;
        }

        let mut n = *self.next_suffix.get(&base).unwrap_or(&2);
        loop {
            let suffix = format!("_{n}");
            let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
            let candidate: String = base.chars().take(keep).collect::<String>() + &suffix;
            n += 1;
            if self.used.insert(candidate.clone()) {
                self.next_suffix.insert(base, n);
                return candidate;
            }
        }
    }
}

/// Make a name acceptable to XLSX: strip forbidden characters, enforce the
/// length limit, and never return an empty name.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            ':' | '\\' | '/' | '?' | '*' | '[' | ']' => '_',
            _ => c,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}
