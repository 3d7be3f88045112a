//! PDF document loading and page access.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A PDF document opened for table extraction.
///
/// The file's bytes are read up front, so no OS handle outlives
/// [`Document::open`]; the parsed document is released when the value is
/// dropped, on every exit path.
#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    pub(crate) inner: lopdf::Document,
    /// Page object ids in document order, cached at open time.
    pub(crate) page_ids: Vec<lopdf::ObjectId>,
}

/// A reference to one page of an open [`Document`].
///
/// Ephemeral: pages carry only their index and object id, and are resolved
/// against the document when content is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 0-based page index.
    pub index: usize,
    pub(crate) id: lopdf::ObjectId,
}

impl Document {
    /// Open a PDF document from a file path.
    ///
    /// # Errors
    ///
    /// - [`Error::FileNotFound`] when the path does not exist.
    /// - [`Error::Io`] when the file cannot be read.
    /// - [`Error::CorruptDocument`] when the bytes cannot be parsed as a
    ///   PDF, or the document is encrypted (password support is out of
    ///   scope; encrypted input is reported with an explicit reason).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;

        let inner = lopdf::Document::load_mem(&bytes).map_err(|e| Error::CorruptDocument {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if inner.is_encrypted() {
            return Err(Error::CorruptDocument {
                path: path.to_path_buf(),
                reason: "document is encrypted".to_string(),
            });
        }

        // get_pages returns BTreeMap<u32, ObjectId> keyed 1-based in order
        let page_ids: Vec<lopdf::ObjectId> = inner.get_pages().values().copied().collect();

        log::debug!(
            "opened {} ({} pages)",
            path.display(),
            page_ids.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            inner,
            page_ids,
        })
    }

    /// The path this document was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Access a page by 0-based index. Returns `None` when out of range.
    pub fn page(&self, index: usize) -> Option<Page> {
        self.page_ids.get(index).map(|&id| Page { index, id })
    }

    /// A lazy iterator over all pages, in order.
    ///
    /// The sequence is finite and restartable: call `pages()` again to
    /// start over from the first page.
    pub fn pages(&self) -> Pages<'_> {
        Pages {
            doc: self,
            current: 0,
        }
    }
}

/// Iterator over the pages of a [`Document`].
pub struct Pages<'a> {
    doc: &'a Document,
    current: usize,
}

impl Iterator for Pages<'_> {
    type Item = Page;

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.doc.page(self.current)?;
        self.current += 1;
        Some(page)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.doc.page_count() - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Pages<'_> {}

/// Look up a key on a page dictionary, walking up the page tree via
/// /Parent when the key is not on the page itself (MediaBox and Resources
/// are inheritable).
pub(crate) fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Option<&'a lopdf::Object> {
    let mut current_id = page_id;
    loop {
        let dict = doc.get_object(current_id).and_then(|o| o.as_dict()).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        current_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
    }
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &lopdf::Object) -> Option<f64> {
    match obj {
        lopdf::Object::Integer(i) => Some(*i as f64),
        lopdf::Object::Real(f) => Some(*f as f64),
        _ => None,
    }
}
