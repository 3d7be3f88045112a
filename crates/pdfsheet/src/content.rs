//! Content-stream interpretation: page bytes to positioned text spans.
//!
//! Walks the text operators (BT/ET, Tf, Td/TD, Tm, TL, T*, Tj/TJ, '/")
//! with a small text-matrix state machine and emits [`Span`]s in top-origin
//! coordinates. Errors here are page-internal: the extractor converts them
//! into page faults, they never abort the document.

use std::collections::BTreeMap;

use lopdf::Object;
use lopdf::content::Content;
use pdfsheet_core::{BBox, Span};
use thiserror::Error;

use crate::document::{Document, Page, object_to_f64, resolve_inherited};

/// Glyphs extend roughly this far above the baseline, as a fraction of the
/// font size; the remainder hangs below as descender.
const ASCENT: f64 = 0.8;
const DESCENT: f64 = 0.2;

/// Estimated advance per character, as a fraction of the font size.
const CHAR_WIDTH: f64 = 0.5;

/// TJ adjustments larger than this (in 1/1000 text-space units) are taken
/// as word breaks.
const TJ_SPACE_THRESHOLD: f64 = 200.0;

/// A failure confined to one page's content.
#[derive(Debug, Error)]
pub(crate) enum ContentError {
    #[error("no /MediaBox on page or ancestors")]
    MissingMediaBox,

    #[error("cannot read content stream: {0}")]
    Content(String),

    #[error("cannot decode content stream: {0}")]
    Decode(String),
}

/// Extract positioned text spans from one page.
///
/// A page without a /Contents entry is an empty page, not an error.
pub(crate) fn page_spans(doc: &Document, page: Page) -> Result<Vec<Span>, ContentError> {
    let height = page_height(doc, page)?;
    let Some(bytes) = content_bytes(doc, page)? else {
        return Ok(Vec::new());
    };

    let content =
        Content::decode(&bytes).map_err(|e| ContentError::Decode(e.to_string()))?;

    // Per-font text encodings; pages with no font resources still render
    // through the byte-level fallback.
    let fonts = doc.inner.get_page_fonts(page.id).unwrap_or_default();
    let mut encodings = BTreeMap::new();
    for (name, dict) in &fonts {
        if let Ok(encoding) = dict.get_font_encoding(&doc.inner) {
            encodings.insert(name.clone(), encoding);
        }
    }

    let mut spans = Vec::new();
    let mut matrix = TextMatrix::default();
    let mut font_name: Vec<u8> = Vec::new();
    let mut font_size = 12.0;
    let mut leading = 0.0;
    let mut in_text = false;

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                matrix = TextMatrix::default();
            }
            "ET" => in_text = false,
            "Tf" => {
                if let [Object::Name(name), size, ..] = op.operands.as_slice() {
                    font_name = name.clone();
                    font_size = object_to_f64(size).unwrap_or(12.0);
                }
            }
            "Td" => {
                if let [tx, ty, ..] = op.operands.as_slice() {
                    matrix.translate(
                        object_to_f64(tx).unwrap_or(0.0),
                        object_to_f64(ty).unwrap_or(0.0),
                    );
                }
            }
            "TD" => {
                // Like Td, but also sets the leading to -ty
                if let [tx, ty, ..] = op.operands.as_slice() {
                    let ty = object_to_f64(ty).unwrap_or(0.0);
                    leading = -ty;
                    matrix.translate(object_to_f64(tx).unwrap_or(0.0), ty);
                }
            }
            "Tm" => {
                let values: Vec<f64> = op.operands.iter().filter_map(object_to_f64).collect();
                if let [a, b, c, d, e, f] = values.as_slice() {
                    matrix.set(*a, *b, *c, *d, *e, *f);
                }
            }
            "TL" => {
                if let Some(tl) = op.operands.first().and_then(object_to_f64) {
                    leading = tl;
                }
            }
            "T*" => matrix.translate(0.0, -effective_leading(leading, font_size)),
            "Tj" => {
                if in_text {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        let text = decode_string(&encodings, &font_name, bytes);
                        push_span(&mut spans, &matrix, font_size, height, text);
                    }
                }
            }
            "TJ" => {
                if in_text {
                    if let Some(Object::Array(parts)) = op.operands.first() {
                        let text = decode_tj_array(&encodings, &font_name, parts);
                        push_span(&mut spans, &matrix, font_size, height, text);
                    }
                }
            }
            "'" | "\"" => {
                matrix.translate(0.0, -effective_leading(leading, font_size));
                if in_text {
                    // The " operator carries word/char spacing before the string
                    let index = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(index) {
                        let text = decode_string(&encodings, &font_name, bytes);
                        push_span(&mut spans, &matrix, font_size, height, text);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Height of the page from its (possibly inherited) /MediaBox.
fn page_height(doc: &Document, page: Page) -> Result<f64, ContentError> {
    let array = resolve_inherited(&doc.inner, page.id, b"MediaBox")
        .and_then(|obj| obj.as_array().ok())
        .ok_or(ContentError::MissingMediaBox)?;
    if array.len() != 4 {
        return Err(ContentError::MissingMediaBox);
    }
    let y0 = object_to_f64(&array[1]).ok_or(ContentError::MissingMediaBox)?;
    let y1 = object_to_f64(&array[3]).ok_or(ContentError::MissingMediaBox)?;
    Ok(y1 - y0)
}

/// Collect the page's content stream bytes, concatenating /Contents arrays.
///
/// Returns `Ok(None)` for a page with no /Contents entry. Streams that fail
/// to decompress fall back to their raw bytes.
fn content_bytes(doc: &Document, page: Page) -> Result<Option<Vec<u8>>, ContentError> {
    let dict = doc
        .inner
        .get_dictionary(page.id)
        .map_err(|e| ContentError::Content(e.to_string()))?;

    let Ok(contents) = dict.get(b"Contents") else {
        return Ok(None);
    };

    match contents {
        Object::Reference(id) => Ok(Some(stream_bytes(doc, *id)?)),
        Object::Array(refs) => {
            let mut bytes = Vec::new();
            for obj in refs {
                let id = obj
                    .as_reference()
                    .map_err(|e| ContentError::Content(e.to_string()))?;
                bytes.extend_from_slice(&stream_bytes(doc, id)?);
                // Operator boundary between concatenated streams
                bytes.push(b'\n');
            }
            Ok(Some(bytes))
        }
        Object::Stream(stream) => Ok(Some(decompressed(stream))),
        other => Err(ContentError::Content(format!(
            "unexpected /Contents object: {other:?}"
        ))),
    }
}

fn stream_bytes(doc: &Document, id: lopdf::ObjectId) -> Result<Vec<u8>, ContentError> {
    match doc.inner.get_object(id) {
        Ok(Object::Stream(stream)) => Ok(decompressed(stream)),
        Ok(other) => Err(ContentError::Content(format!(
            "content reference is not a stream: {other:?}"
        ))),
        Err(e) => Err(ContentError::Content(e.to_string())),
    }
}

fn decompressed(stream: &lopdf::Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

/// Default leading is one line at the current font size.
fn effective_leading(leading: f64, font_size: f64) -> f64 {
    if leading != 0.0 { leading } else { font_size }
}

fn push_span(spans: &mut Vec<Span>, matrix: &TextMatrix, font_size: f64, height: f64, text: String) {
    if text.trim().is_empty() {
        return;
    }
    let size = font_size * matrix.scale();
    let (x, y) = matrix.position();
    let width = text.chars().count() as f64 * size * CHAR_WIDTH;
    // Flip the baseline-origin y to a top-origin bounding box
    let bbox = BBox::new(
        x,
        height - y - size * ASCENT,
        x + width,
        height - y + size * DESCENT,
    );
    spans.push(Span { text, bbox, size });
}

/// Decode a PDF string through the current font's encoding, falling back to
/// byte-level guessing when the font declares none.
fn decode_string(
    encodings: &BTreeMap<Vec<u8>, lopdf::Encoding<'_>>,
    font_name: &[u8],
    bytes: &[u8],
) -> String {
    if let Some(encoding) = encodings.get(font_name) {
        if let Ok(text) = lopdf::Document::decode_text(encoding, bytes) {
            return text;
        }
    }
    decode_fallback(bytes)
}

/// UTF-16BE (BOM-marked), then UTF-8, then WINDOWS-1252, which maps every
/// byte and so always produces something readable for Latin text.
fn decode_fallback(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
    }
}

/// Join a TJ array into one string, turning large kerning adjustments into
/// spaces.
fn decode_tj_array(
    encodings: &BTreeMap<Vec<u8>, lopdf::Encoding<'_>>,
    font_name: &[u8],
    parts: &[Object],
) -> String {
    let mut combined = String::new();
    for part in parts {
        match part {
            Object::String(bytes, _) => {
                combined.push_str(&decode_string(encodings, font_name, bytes));
            }
            Object::Integer(_) | Object::Real(_) => {
                let adjustment = -object_to_f64(part).unwrap_or(0.0);
                if adjustment > TJ_SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !combined.ends_with(' ')
                {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}

/// Text matrix tracking the pen position through the content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        *self = Self { a, b, c, d, e, f };
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn position(&self) -> (f64, f64) {
        (self.e, self.f)
    }

    /// Vertical scale factor, applied to the nominal font size.
    fn scale(&self) -> f64 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}
