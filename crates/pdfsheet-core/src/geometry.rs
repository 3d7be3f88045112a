/// Axis-aligned rectangle in page coordinates, top-left origin.
///
/// `top` and `bottom` grow downward (distance from the top of the page), so
/// `top <= bottom` for any well-formed box. Detection only ever measures
/// widths and vertical centers; boxes are built by the content interpreter
/// and merged upward into word, row, and table extents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Vertical center, used for grouping boxes into rows.
    pub fn v_center(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    /// Smallest box enclosing both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }
}
