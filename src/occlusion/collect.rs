use crate::foundation::core::Rect;
use crate::host::UiElement;

/// UI units that never hide lines.
pub const IGNORED_UNITS: &[&str] = &["NamePlate"];

/// Alliance member lists; only opaque while the local player is in an alliance.
pub const ALLIANCE_LIST_UNITS: &[&str] = &["_AllianceList1", "_AllianceList2"];

/// Gather the screen rectangles of UI elements that should hide lines.
///
/// An element counts when it is visible, either interactive or filled, and at least `min_size`
/// pixels on both axes. Rectangles are normalized so `x0 <= x1` and `y0 <= y1`.
pub fn collect_opaque_rects(elements: &[UiElement], min_size: f64, in_alliance: bool) -> Vec<Rect> {
    elements
        .iter()
        .filter(|e| !IGNORED_UNITS.contains(&e.name.as_str()))
        .filter(|e| in_alliance || !ALLIANCE_LIST_UNITS.contains(&e.name.as_str()))
        .filter(|e| e.visible && (e.interactive || e.filled))
        .map(|e| e.rect.abs())
        .filter(|r| r.width() >= min_size && r.height() >= min_size)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/occlusion/collect.rs"]
mod tests;
