use crate::geometry::BBox;

/// A positioned run of text on a page, as produced by a content-stream
/// interpreter.
///
/// A span corresponds to one text-showing operation: its text may contain
/// internal spaces when the producer rendered several words in one operation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// The text content of this span.
    pub text: String,
    /// Bounding box of the rendered text.
    pub bbox: BBox,
    /// Font size in points.
    pub size: f64,
}

/// Split a span into whitespace-separated words with estimated positions.
///
/// Column detection works on word-level alignment, so spans that cover
/// several table cells in one text-showing operation must be subdivided.
/// The horizontal extent of each word is estimated by apportioning the
/// span's width uniformly across its characters.
///
/// Whitespace-only spans produce no words.
pub fn split_words(span: &Span) -> Vec<Span> {
    let chars: Vec<char> = span.text.chars().collect();
    let n = chars.len();
    if n == 0 {
        return Vec::new();
    }
    let char_width = span.bbox.width() / n as f64;

    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    for i in 0..=n {
        let at_break = i == n || chars[i].is_whitespace();
        match (start, at_break) {
            (None, false) => start = Some(i),
            (Some(s), true) => {
                let text: String = chars[s..i].iter().collect();
                let x0 = span.bbox.x0 + s as f64 * char_width;
                let x1 = span.bbox.x0 + i as f64 * char_width;
                words.push(Span {
                    text,
                    bbox: BBox::new(x0, span.bbox.top, x1, span.bbox.bottom),
                    size: span.size,
                });
                start = None;
            }
            _ => {}
        }
    }
    words
}
