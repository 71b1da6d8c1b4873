use crate::foundation::core::{Point, Rect};

/// Screen-space rectangle predicates used by the occlusion engine.
///
/// `kurbo::Rect` already provides `union`, `intersect`, `contains_rect` and the edge-inclusive
/// `overlaps`; this adds the strict test subtraction needs.
pub trait RectExt {
    /// Return `true` when the rectangles share a region of positive area.
    fn overlaps_area(&self, other: &Rect) -> bool;
}

impl RectExt for Rect {
    fn overlaps_area(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && self.x1 > other.x0 && self.y0 < other.y1 && self.y1 > other.y0
    }
}

/// Axis-aligned bounds of `points`, grown by `margin` on every side.
///
/// Returns `None` for an empty slice.
pub fn padded_bounds(points: &[Point], margin: f64) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    let mut r = Rect::from_points(*first, *first);
    for p in rest {
        r = r.union_pt(*p);
    }
    Some(r.inflate(margin, margin))
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/rect.rs"]
mod tests;
