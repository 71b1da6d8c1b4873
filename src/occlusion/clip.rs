use smallvec::SmallVec;

use crate::foundation::core::Rect;
use crate::geometry::rect::RectExt;

/// Pieces of `area` left after removing `hole`: up to a full-width top and bottom strip, and left
/// and right strips spanning the overlap band. Only strips with positive extent are returned.
///
/// The caller guarantees that `area` and `hole` overlap with positive area.
fn subtract(area: &Rect, hole: &Rect) -> SmallVec<[Rect; 4]> {
    let mut out = SmallVec::new();

    if area.y0 < hole.y0 {
        out.push(Rect::new(area.x0, area.y0, area.x1, hole.y0));
    }
    if area.y1 > hole.y1 {
        out.push(Rect::new(area.x0, hole.y1, area.x1, area.y1));
    }

    let top = area.y0.max(hole.y0);
    let bottom = area.y1.min(hole.y1);
    if bottom > top {
        if area.x0 < hole.x0 {
            out.push(Rect::new(area.x0, top, hole.x0, bottom));
        }
        if area.x1 > hole.x1 {
            out.push(Rect::new(hole.x1, top, area.x1, bottom));
        }
    }
    out
}

/// Split `bbox` into the rectangles not covered by any of `opaque`.
///
/// Each opaque rectangle touching the box is subtracted from every current region before the next
/// one is applied. The result is pairwise non-overlapping and empty when the box is fully covered.
pub fn compute_drawable_regions(bbox: Rect, opaque: &[Rect]) -> Vec<Rect> {
    let mut regions = vec![bbox];

    for hole in opaque.iter().filter(|r| bbox.overlaps(**r)) {
        let mut next = Vec::with_capacity(regions.len() + 3);
        for area in &regions {
            if area.overlaps_area(hole) {
                next.extend(subtract(area, hole));
            } else {
                next.push(*area);
            }
        }
        regions = next;
        if regions.is_empty() {
            break;
        }
    }
    regions
}

#[cfg(test)]
#[path = "../../tests/unit/occlusion/clip.rs"]
mod tests;
