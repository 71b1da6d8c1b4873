//! Screen-space occlusion of lines by opaque UI.
//!
//! Once per frame the engine collects UI rectangles and merges them into a small covering set;
//! every line then asks for the parts of its bounding box that remain drawable.

/// Rectangle subtraction.
pub mod clip;
/// Opaque rectangle collection from UI elements.
pub mod collect;
/// Fixed-point rectangle merging.
pub mod merge;

use crate::config::LinesConfig;
use crate::foundation::core::Rect;
use crate::host::SceneHost;

pub use clip::compute_drawable_regions;
pub use collect::collect_opaque_rects;
pub use merge::merge_rect_list;

/// Rectangle lists retained for diagnostics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OcclusionDebug {
    /// Rectangles as collected, before merging.
    pub collected: Vec<Rect>,
    /// Rectangles after merging.
    pub merged: Vec<Rect>,
    /// Regions computed by the most recent clip query.
    pub last_regions: Vec<Rect>,
}

/// Per-frame occlusion state.
#[derive(Debug, Default)]
pub struct OcclusionEngine {
    opaque: Vec<Rect>,
    frame: Option<u64>,
    debug: Option<OcclusionDebug>,
}

impl OcclusionEngine {
    /// Engine without debug capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn retention of intermediate rectangle lists on or off.
    pub fn set_debug_capture(&mut self, enabled: bool) {
        self.debug = enabled.then(OcclusionDebug::default);
    }

    /// Captured rectangle lists, when debug capture is on.
    pub fn debug(&self) -> Option<&OcclusionDebug> {
        self.debug.as_ref()
    }

    /// Opaque rectangles for the current frame.
    pub fn opaque_rects(&self) -> &[Rect] {
        &self.opaque
    }

    /// Collect and merge the frame's opaque rectangles.
    ///
    /// Runs at most once per `frame`; a repeated call for the same frame keeps the existing set.
    #[tracing::instrument(skip(self, host, config))]
    pub fn begin_frame(&mut self, frame: u64, host: &dyn SceneHost, config: &LinesConfig) {
        if self.frame == Some(frame) {
            tracing::warn!(frame, "occlusion pass already ran for this frame");
            return;
        }
        self.frame = Some(frame);

        if !config.ui_occlusion {
            self.opaque.clear();
            return;
        }

        let dpi = host.dpi_scale();
        let collected = collect_opaque_rects(
            host.ui_elements(),
            config.ui_min_rect_size * dpi,
            host.conditions().in_alliance,
        );
        let before = collected.len();
        if let Some(debug) = self.debug.as_mut() {
            debug.collected = collected.clone();
        }

        self.opaque = merge_rect_list(collected, config.ui_merge_threshold * dpi);
        tracing::debug!(before, after = self.opaque.len(), "opaque rects merged");

        if let Some(debug) = self.debug.as_mut() {
            debug.merged = self.opaque.clone();
        }
    }

    /// Parts of `bbox` not covered by this frame's opaque rectangles.
    pub fn drawable_regions(&mut self, bbox: Rect) -> Vec<Rect> {
        let regions = compute_drawable_regions(bbox, &self.opaque);
        if let Some(debug) = self.debug.as_mut() {
            debug.last_regions = regions.clone();
        }
        regions
    }
}

#[cfg(test)]
#[path = "../../tests/unit/occlusion/engine.rs"]
mod tests;
