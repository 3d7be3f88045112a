//! Table detection from text alignment.
//!
//! Detects tabular regions without relying on ruling lines: words are
//! clustered into rows by vertical position, rows are split into independent
//! regions at large vertical gaps, and column boundaries are voted from
//! left-edge alignment across rows.

use crate::geometry::BBox;
use crate::span::{Span, split_words};

/// Configuration for table detection.
///
/// Tolerance values default to 3.0.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectOptions {
    /// Maximum distance between word left edges to count as the same
    /// column alignment.
    pub x_tolerance: f64,
    /// Maximum vertical-center distance for two words to share a row.
    pub y_tolerance: f64,
    /// Minimum horizontal separation between distinct column boundaries;
    /// closer boundaries are merged.
    pub column_gap: f64,
    /// A vertical gap between consecutive rows exceeding this multiple of
    /// the median row pitch splits the page into independent regions.
    pub row_gap_factor: f64,
    /// Minimum number of rows for a region to qualify as a table.
    pub min_rows: usize,
    /// Minimum number of columns for a region to qualify as a table.
    pub min_columns: usize,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            column_gap: 12.0,
            row_gap_factor: 2.5,
            min_rows: 2,
            min_columns: 2,
        }
    }
}

/// A detected table: cell text organized into rows.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectedTable {
    /// Bounding box enclosing the entire table.
    pub bbox: BBox,
    /// Cell text, row-major, top-to-bottom and left-to-right. Rectangular:
    /// cells with no words are empty strings.
    pub rows: Vec<Vec<String>>,
}

/// A row of words sharing a vertical position.
struct Row {
    center: f64,
    words: Vec<Span>,
}

/// Detect tables in a page's text spans.
///
/// Spans are split into words, clustered into rows by vertical center
/// (within `y_tolerance`), and rows are split into regions wherever the gap
/// to the next row exceeds `row_gap_factor ×` the median row pitch. Within
/// a region, column boundaries are the left-edge alignments supported by at
/// least two words, merged when closer than `column_gap`; each word lands in
/// the cell of the rightmost boundary at or left of its left edge, and words
/// sharing a cell are joined with a single space in x order.
///
/// Regions with fewer than `min_rows` rows or `min_columns` columns are not
/// tables. Returned tables are in top-to-bottom page order.
pub fn detect_tables(spans: &[Span], options: &DetectOptions) -> Vec<DetectedTable> {
    let words: Vec<Span> = spans.iter().flat_map(split_words).collect();
    if words.is_empty() {
        return Vec::new();
    }

    let rows = cluster_rows(&words, options.y_tolerance);
    let regions = split_regions(rows, options.row_gap_factor);

    let mut tables = Vec::new();
    for region in &regions {
        if region.len() < options.min_rows {
            continue;
        }
        let edges = column_edges(region, options);
        if edges.len() < options.min_columns {
            continue;
        }
        tables.push(build_table(region, &edges, options));
    }
    tables
}

/// Cluster words into rows by vertical center, top-to-bottom.
///
/// Words within each row are sorted left-to-right.
fn cluster_rows(words: &[Span], y_tolerance: f64) -> Vec<Row> {
    let mut indices: Vec<usize> = (0..words.len()).collect();
    indices.sort_by(|&a, &b| {
        words[a]
            .bbox
            .v_center()
            .partial_cmp(&words[b].bbox.v_center())
            .unwrap()
    });

    let mut rows = Vec::new();
    let mut cluster_start = 0;

    for i in 1..=indices.len() {
        let end_of_cluster = i == indices.len()
            || (words[indices[i]].bbox.v_center() - words[indices[cluster_start]].bbox.v_center())
                .abs()
                > y_tolerance;

        if end_of_cluster {
            let mut row_words: Vec<Span> =
                (cluster_start..i).map(|j| words[indices[j]].clone()).collect();
            row_words.sort_by(|a, b| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap());
            let center = row_words.iter().map(|w| w.bbox.v_center()).sum::<f64>()
                / row_words.len() as f64;
            rows.push(Row {
                center,
                words: row_words,
            });
            cluster_start = i;
        }
    }

    rows
}

/// Split rows into regions at unusually large vertical gaps.
///
/// The split threshold is `row_gap_factor ×` the median gap between
/// consecutive row centers, so evenly-pitched rows stay together and a
/// paragraph break or a second table starts a new region.
fn split_regions(rows: Vec<Row>, row_gap_factor: f64) -> Vec<Vec<Row>> {
    if rows.is_empty() {
        return Vec::new();
    }
    let gaps: Vec<f64> = rows.windows(2).map(|w| w[1].center - w[0].center).collect();
    if gaps.is_empty() {
        return vec![rows];
    }
    let pitch = median(gaps.clone());
    if pitch <= 0.0 {
        return vec![rows];
    }
    let threshold = row_gap_factor * pitch;

    let mut regions = Vec::new();
    let mut current: Vec<Row> = Vec::new();
    for (i, row) in rows.into_iter().enumerate() {
        if i > 0 && gaps[i - 1] > threshold && !current.is_empty() {
            regions.push(std::mem::take(&mut current));
        }
        current.push(row);
    }
    if !current.is_empty() {
        regions.push(current);
    }
    regions
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Vote column boundaries from word left-edge alignment across a region.
///
/// Left edges are clustered within `x_tolerance`; a cluster needs at least
/// two supporting words to become a candidate boundary. Candidates closer
/// together than `column_gap` are merged, keeping the better-supported one.
fn column_edges(region: &[Row], options: &DetectOptions) -> Vec<f64> {
    let words: Vec<&Span> = region.iter().flat_map(|r| r.words.iter()).collect();
    let mut indices: Vec<usize> = (0..words.len()).collect();
    indices.sort_by(|&a, &b| words[a].bbox.x0.partial_cmp(&words[b].bbox.x0).unwrap());

    let mut candidates: Vec<(f64, usize)> = Vec::new();
    let mut cluster_start = 0;

    for i in 1..=indices.len() {
        let end_of_cluster = i == indices.len()
            || (words[indices[i]].bbox.x0 - words[indices[cluster_start]].bbox.x0).abs()
                > options.x_tolerance;

        if end_of_cluster {
            let cluster_size = i - cluster_start;
            if cluster_size >= 2 {
                let sum: f64 = (cluster_start..i).map(|j| words[indices[j]].bbox.x0).sum();
                candidates.push((sum / cluster_size as f64, cluster_size));
            }
            cluster_start = i;
        }
    }

    let mut edges: Vec<(f64, usize)> = Vec::new();
    for (pos, support) in candidates {
        match edges.last_mut() {
            Some(last) if pos - last.0 < options.column_gap => {
                if support > last.1 {
                    *last = (pos, support);
                }
            }
            _ => edges.push((pos, support)),
        }
    }
    edges.into_iter().map(|(pos, _)| pos).collect()
}

fn build_table(region: &[Row], edges: &[f64], options: &DetectOptions) -> DetectedTable {
    let bbox = region
        .iter()
        .flat_map(|r| r.words.iter())
        .map(|w| w.bbox)
        .reduce(|a, b| a.union(&b))
        .expect("table region has at least one word");

    let mut rows = Vec::with_capacity(region.len());
    for row in region {
        let mut cells: Vec<Vec<&str>> = vec![Vec::new(); edges.len()];
        for word in &row.words {
            let col = edges
                .iter()
                .rposition(|&e| e <= word.bbox.x0 + options.x_tolerance)
                .unwrap_or(0);
            cells[col].push(word.text.as_str());
        }
        rows.push(cells.into_iter().map(|parts| parts.join(" ")).collect());
    }

    DetectedTable { bbox, rows }
}
