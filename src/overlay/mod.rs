//! Frame driver.
//!
//! [`Overlay`] owns one [`TargetLine`] per tracked entity plus the local player's focus line, and
//! runs the whole per-frame pass: gating, initialization, updates, the single occlusion pass and
//! draw emission.

use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::Arc,
};

use crate::{
    config::{ConfigSnapshot, LinesConfig, PartyMode},
    foundation::core::EntityId,
    host::{EntityView, FrameConditions, SceneHost},
    line::{DrawCommand, FrameContext, TargetLine},
    occlusion::OcclusionEngine,
    rules::flags::AttributeFlags,
};

/// Aggregate counters for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct FrameStats {
    /// Lines that emitted draw output.
    pub rendered_lines: usize,
    /// Lines that were awake and updated.
    pub processed_lines: usize,
}

/// Everything one frame produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameOutput {
    /// Draw commands in submission order.
    pub commands: Vec<DrawCommand>,
    /// Counters.
    pub stats: FrameStats,
}

/// Per-frame driver for all target lines.
#[derive(Debug)]
pub struct Overlay {
    snapshot: Arc<ConfigSnapshot>,
    lines: BTreeMap<EntityId, TargetLine>,
    focus_line: Option<TargetLine>,
    occlusion: OcclusionEngine,
    frame_index: u64,
    runtime: f64,
    last_stats: FrameStats,
    player_seen: bool,
}

impl Overlay {
    /// Driver with no controllers; they are built once sources acquire targets.
    pub fn new(snapshot: Arc<ConfigSnapshot>) -> Self {
        Self {
            snapshot,
            lines: BTreeMap::new(),
            focus_line: None,
            occlusion: OcclusionEngine::new(),
            frame_index: 0,
            runtime: 0.0,
            last_stats: FrameStats::default(),
            player_seen: false,
        }
    }

    /// Active configuration.
    pub fn snapshot(&self) -> &Arc<ConfigSnapshot> {
        &self.snapshot
    }

    /// Counters of the most recent frame.
    pub fn stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Seconds of drawn frames so far.
    pub fn runtime(&self) -> f64 {
        self.runtime
    }

    /// Controller for `source`, if tracked.
    pub fn line(&self, source: EntityId) -> Option<&TargetLine> {
        self.lines.get(&source)
    }

    /// The local player's focus-target line.
    pub fn focus_line(&self) -> Option<&TargetLine> {
        self.focus_line.as_ref()
    }

    /// All tracked controllers in entity order, focus line excluded.
    pub fn lines(&self) -> impl Iterator<Item = &TargetLine> {
        self.lines.values()
    }

    /// Occlusion state of the last frame.
    pub fn occlusion(&self) -> &OcclusionEngine {
        &self.occlusion
    }

    /// Turn occlusion debug capture on or off.
    pub fn set_occlusion_debug(&mut self, enabled: bool) {
        self.occlusion.set_debug_capture(enabled);
    }

    /// Install a new configuration and drop every controller.
    pub fn apply_config(&mut self, snapshot: Arc<ConfigSnapshot>, host: &dyn SceneHost) {
        self.snapshot = snapshot;
        self.reinitialize(host);
    }

    /// Discard all controllers and start a sleeping focus line for the local player.
    ///
    /// Entity controllers are created again on the first frame their source has a target.
    #[tracing::instrument(skip(self, host))]
    pub fn reinitialize(&mut self, host: &dyn SceneHost) {
        let dropped = self.lines.len();
        self.lines.clear();
        self.focus_line = host.local_player().map(|id| TargetLine::new(id, true));
        tracing::debug!(dropped, "line controllers reset");
    }

    /// Run one frame and return its draw output.
    ///
    /// Nothing is drawn without a local player, while gated by the frame conditions, or when the
    /// camera cannot be queried; the latter is logged and the next frame proceeds normally.
    #[tracing::instrument(skip(self, host))]
    pub fn frame(&mut self, host: &dyn SceneHost, dt: f64) -> FrameOutput {
        let mut output = FrameOutput::default();

        let Some(local) = host.local_player() else {
            self.player_seen = false;
            self.last_stats = FrameStats::default();
            return output;
        };
        let focus_moved = self.focus_line.as_ref().is_some_and(|l| l.source() != local);
        if !self.player_seen || focus_moved {
            self.reinitialize(host);
            self.player_seen = true;
        }

        let snapshot = Arc::clone(&self.snapshot);
        let cfg = snapshot.config();
        let conditions = host.conditions();
        if !frame_allowed(cfg, &conditions) {
            tracing::trace!("frame gated");
            self.last_stats = FrameStats::default();
            return output;
        }

        let camera = match host.camera() {
            Ok(camera) => camera,
            Err(e) => {
                tracing::warn!(error = %e, "camera query failed; frame skipped");
                self.last_stats = FrameStats::default();
                return output;
            }
        };

        self.frame_index += 1;
        self.runtime += dt;
        let ctx = FrameContext {
            host,
            camera: &camera,
            snapshot: &snapshot,
            local_player: Some(local),
            dt,
            runtime: self.runtime,
            rendered_last_frame: self.last_stats.rendered_lines,
        };

        for entity in host.entities() {
            match self.lines.entry(entity.id) {
                Entry::Occupied(mut slot) => {
                    let line = slot.get_mut();
                    if should_initialize(&ctx, &conditions, line, entity) {
                        line.initialize(&ctx, entity);
                    }
                }
                Entry::Vacant(slot) => {
                    let mut line = TargetLine::new(entity.id, false);
                    if should_initialize(&ctx, &conditions, &line, entity) {
                        line.initialize(&ctx, entity);
                        slot.insert(line);
                    }
                }
            }
        }
        if let Some(line) = self.focus_line.as_mut()
            && let Some(source) = host.entity(line.source())
            && should_initialize(&ctx, &conditions, line, source)
        {
            line.initialize(&ctx, source);
        }

        let mut stats = FrameStats::default();
        for line in self.lines.values_mut().chain(self.focus_line.iter_mut()) {
            if line.is_sleeping() {
                continue;
            }
            if let Err(e) = line.update(&ctx) {
                tracing::warn!(source = line.source().0, error = %e, "line update failed");
            }
            stats.processed_lines += 1;
        }

        self.occlusion.begin_frame(self.frame_index, host, cfg);

        for line in self.lines.values_mut().chain(self.focus_line.iter_mut()) {
            if !line.wants_draw() {
                continue;
            }
            let Some(bbox) = line.prepare_draw(&ctx) else {
                continue;
            };
            if cfg.ui_occlusion {
                let regions = self.occlusion.drawable_regions(bbox);
                if regions.is_empty() {
                    continue;
                }
                for region in regions {
                    line.emit(&ctx, Some(region), &mut output.commands);
                }
            } else {
                line.emit(&ctx, None, &mut output.commands);
            }
            stats.rendered_lines += 1;
        }

        let before = self.lines.len();
        self.lines
            .retain(|id, line| !line.is_sleeping() || host.entity(*id).is_some());
        if self.lines.len() != before {
            tracing::debug!(pruned = before - self.lines.len(), "controllers pruned");
        }

        tracing::trace!(
            processed = stats.processed_lines,
            rendered = stats.rendered_lines,
            commands = output.commands.len(),
            "frame done"
        );
        self.last_stats = stats;
        output.stats = stats;
        output
    }
}

/// Return `true` when the frame conditions allow drawing at all.
pub fn frame_allowed(config: &LinesConfig, conditions: &FrameConditions) -> bool {
    !config.toggled_off
        && !conditions.in_cutscene
        && (!config.only_unsheathed || conditions.weapon_drawn)
        && config.only_in_combat.allows(conditions.in_combat)
}

/// Return `true` when the party mode admits a line between `source` and `target`.
pub fn party_mode_allows(
    mode: PartyMode,
    source: &EntityView,
    target: &EntityView,
    in_alliance: bool,
) -> bool {
    let either = |flag: AttributeFlags| {
        source.descriptor.flags.contains(flag) || target.descriptor.flags.contains(flag)
    };
    match mode {
        PartyMode::None => true,
        PartyMode::PartyOnly => either(AttributeFlags::PARTY),
        PartyMode::PartyOnlyInAlliance => !in_alliance || either(AttributeFlags::PARTY),
        PartyMode::AllianceOnly => either(AttributeFlags::ALLIANCE),
    }
}

fn should_initialize(
    ctx: &FrameContext<'_>,
    conditions: &FrameConditions,
    line: &TargetLine,
    source: &EntityView,
) -> bool {
    if !line.is_sleeping()
        || !source.valid
        || !source.alive
        || !source.targetable
        || !source.renderable
    {
        return false;
    }
    let Some(target) = line.resolve_target(ctx.host, ctx.local_player) else {
        return false;
    };
    target.targetable
        && party_mode_allows(
            ctx.snapshot.config().party_mode,
            source,
            target,
            conditions.in_alliance,
        )
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/mod.rs"]
mod tests;
