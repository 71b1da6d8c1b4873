use std::cmp::Ordering;

use crate::foundation::core::Rect;

/// Larger rectangles first, then top-to-bottom, then left-to-right.
fn merge_order(a: &Rect, b: &Rect) -> Ordering {
    b.area()
        .total_cmp(&a.area())
        .then(a.y0.total_cmp(&b.y0))
        .then(a.x0.total_cmp(&b.x0))
}

/// Merge two rectangles if one contains the other or they are adjacent within `threshold`.
///
/// Stacked rectangles must agree on their left and right edges within `threshold`; side-by-side
/// rectangles must agree on top and bottom within twice the threshold. The gap between them may be
/// up to `threshold` in either case. Merged pairs become their bounding union.
pub fn try_merge(a: &Rect, b: &Rect, threshold: f64) -> Option<Rect> {
    if a.contains_rect(*b) {
        return Some(*a);
    }
    if b.contains_rect(*a) {
        return Some(*b);
    }

    let stacked = (a.x0 - b.x0).abs() <= threshold
        && (a.x1 - b.x1).abs() <= threshold
        && a.y0 - threshold <= b.y1
        && b.y0 - threshold <= a.y1;
    if stacked {
        return Some(a.union(*b));
    }

    let band = threshold * 2.0;
    let side_by_side = (a.y0 - b.y0).abs() <= band
        && (a.y1 - b.y1).abs() <= band
        && a.x0 - threshold <= b.x1
        && b.x0 - threshold <= a.x1;
    if side_by_side {
        return Some(a.union(*b));
    }

    None
}

/// Reduce `rects` to a covering set by merging until no pair merges any more.
///
/// Each pass that does not reach the fixed point removes at least one rectangle, so the loop runs
/// at most `rects.len()` passes.
pub fn merge_rect_list(mut rects: Vec<Rect>, threshold: f64) -> Vec<Rect> {
    let max_passes = rects.len().max(1);
    for pass in 0..max_passes {
        rects.sort_by(merge_order);
        let before = rects.len();

        let mut out: Vec<Rect> = Vec::with_capacity(before);
        for r in rects {
            let hit = out
                .iter()
                .enumerate()
                .find_map(|(i, slot)| try_merge(slot, &r, threshold).map(|m| (i, m)));
            match hit {
                Some((i, m)) => out[i] = m,
                None => out.push(r),
            }
        }
        rects = out;

        if rects.len() == before {
            tracing::trace!(pass, rects = rects.len(), "rect merge reached fixed point");
            break;
        }
    }
    rects
}

#[cfg(test)]
#[path = "../../tests/unit/occlusion/merge.rs"]
mod tests;
