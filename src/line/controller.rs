use crate::{
    animation::curve::CurveKind,
    config::{ConfigSnapshot, LinesConfig},
    foundation::{
        core::{EntityId, Rect, Rgba8, Vec3, WorldVec},
        error::{LinesError, LinesResult},
        math::lerp,
    },
    geometry::rect::padded_bounds,
    host::{CameraView, EntityView, SceneHost, ScreenProjection, entity_visible},
    line::{
        draw::{DrawCommand, LineGeometry, emit_solid, emit_textured},
        samples::{LinePoint, SampleBuffer, SampleCountInputs, target_sample_count},
        state::{FirstPersonBlend, LineState},
    },
    rules::rule_set::LineColor,
};

/// Read-only inputs shared by every line during one frame.
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    /// Scene queries.
    pub host: &'a dyn SceneHost,
    /// Camera for this frame.
    pub camera: &'a CameraView,
    /// Configuration and rules.
    pub snapshot: &'a ConfigSnapshot,
    /// Local player, if loaded.
    pub local_player: Option<EntityId>,
    /// Seconds since the previous frame.
    pub dt: f64,
    /// Seconds the overlay has been drawing.
    pub runtime: f64,
    /// Lines rendered in the previous frame.
    pub rendered_last_frame: usize,
}

impl FrameContext<'_> {
    fn config(&self) -> &LinesConfig {
        self.snapshot.config()
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct ScreenEnds {
    start: ScreenProjection,
    mid: ScreenProjection,
    end: ScreenProjection,
}

/// Lifecycle controller for the line from one entity to its target.
///
/// A controller is created asleep, woken by [`TargetLine::initialize`] when its entity acquires a
/// target, and goes back to sleep once a retraction finishes. It is reused across target changes.
#[derive(Clone, Debug)]
pub struct TargetLine {
    source: EntityId,
    focus: bool,

    state: LineState,
    state_time: f64,
    sleeping: bool,
    failed: bool,
    suppressed: bool,

    has_target: bool,
    had_target: bool,
    last_target_id: Option<EntityId>,

    position: Vec3,
    mid_position: Vec3,
    target_position: Vec3,
    last_target_position: Vec3,
    last_target_position2: Vec3,

    mid_height: f64,
    last_mid_height: f64,
    last_target_height: f64,

    appearance: LineColor,
    line_color: Rgba8,
    outline_color: Rgba8,
    last_line_color: Rgba8,
    last_outline_color: Rgba8,

    blend: FirstPersonBlend,
    samples: SampleBuffer,
    screen: ScreenEnds,
}

impl TargetLine {
    /// Sleeping controller for `source`. Focus controllers follow the focus target instead.
    pub fn new(source: EntityId, focus: bool) -> Self {
        Self {
            source,
            focus,
            state: LineState::NewTarget,
            state_time: 0.0,
            sleeping: true,
            failed: false,
            suppressed: false,
            has_target: false,
            had_target: false,
            last_target_id: None,
            position: Vec3::ZERO,
            mid_position: Vec3::ZERO,
            target_position: Vec3::ZERO,
            last_target_position: Vec3::ZERO,
            last_target_position2: Vec3::ZERO,
            mid_height: 0.0,
            last_mid_height: 0.0,
            last_target_height: 0.0,
            appearance: LineColor::default(),
            line_color: Rgba8::TRANSPARENT,
            outline_color: Rgba8::TRANSPARENT,
            last_line_color: Rgba8::TRANSPARENT,
            last_outline_color: Rgba8::TRANSPARENT,
            blend: FirstPersonBlend::default(),
            samples: SampleBuffer::default(),
            screen: ScreenEnds::default(),
        }
    }

    /// Entity this line starts from.
    pub fn source(&self) -> EntityId {
        self.source
    }

    /// Return `true` for focus-target lines.
    pub fn is_focus(&self) -> bool {
        self.focus
    }

    /// Current animation state.
    pub fn state(&self) -> LineState {
        self.state
    }

    /// Seconds spent in the current state.
    pub fn state_time(&self) -> f64 {
        self.state_time
    }

    /// Return `true` while the controller is idle and not updated.
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Return `true` once the controller hit degenerate geometry. Failed controllers never draw.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Return `true` when no visible rule or fallback applies to the current pair.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Return `true` when the line is a draw candidate this frame.
    pub fn wants_draw(&self) -> bool {
        !self.sleeping && !self.failed && !self.suppressed && self.appearance.visible
    }

    /// Appearance resolved on the last update.
    pub fn appearance(&self) -> &LineColor {
        &self.appearance
    }

    /// Line and outline colors after alpha effects.
    pub fn colors(&self) -> (Rgba8, Rgba8) {
        (self.line_color, self.outline_color)
    }

    /// Line and outline colors of the previous update.
    pub fn previous_colors(&self) -> (Rgba8, Rgba8) {
        (self.last_line_color, self.last_outline_color)
    }

    /// Target identity locked in by the state machine.
    pub fn last_target(&self) -> Option<EntityId> {
        self.last_target_id
    }

    /// Source endpoint in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Apex in world space.
    pub fn mid_position(&self) -> Vec3 {
        self.mid_position
    }

    /// Destination endpoint in world space.
    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    /// Current curve sample count.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Projected curve samples from the last draw preparation.
    pub fn samples(&self) -> &[LinePoint] {
        self.samples.points()
    }

    fn curve_kind(&self) -> CurveKind {
        CurveKind::from_use_quad(self.appearance.use_quad)
    }

    fn enter(&mut self, next: LineState) {
        tracing::debug!(source = self.source.0, from = ?self.state, to = ?next, "line state");
        self.state = next;
        self.state_time = 0.0;
    }

    /// The entity this line currently points at.
    pub fn resolve_target<'h>(
        &self,
        host: &'h dyn SceneHost,
        local_player: Option<EntityId>,
    ) -> Option<&'h EntityView> {
        let id = if self.focus {
            if local_player != Some(self.source) {
                return None;
            }
            host.focus_target().filter(|id| Some(*id) != local_player)?
        } else {
            host.entity(self.source)?.target?
        };
        host.entity(id).filter(|e| e.valid)
    }

    /// Wake the controller for `source`'s current target.
    ///
    /// A sleeping controller restarts from [`LineState::NewTarget`], unless it is a focus line and
    /// the local player is dead.
    pub fn initialize(&mut self, ctx: &FrameContext<'_>, source: &EntityView) {
        let local_dead = ctx
            .local_player
            .and_then(|id| ctx.host.entity(id))
            .is_some_and(|p| !p.alive);
        match self.resolve_target(ctx.host, ctx.local_player) {
            Some(target) => {
                self.last_target_id = Some(target.id);
                self.last_target_position = target.position;
            }
            None => self.last_target_position = source.position,
        }
        self.last_target_position2 = self.last_target_position;

        if self.sleeping && !(self.focus && local_dead) {
            self.state = LineState::NewTarget;
            self.state_time = 0.0;
            self.had_target = false;
        }
        self.sleeping = false;
        tracing::debug!(source = self.source.0, focus = self.focus, "line initialized");
    }

    /// Advance the line by one frame: state machine, endpoints, colors and sample count.
    ///
    /// Returns a geometry error, and marks the controller failed, when the sample count resolves
    /// below two.
    pub fn update(&mut self, ctx: &FrameContext<'_>) -> LinesResult<()> {
        if self.sleeping || self.failed {
            return Ok(());
        }
        let Some(source) = ctx.host.entity(self.source).filter(|e| e.valid) else {
            self.sleeping = true;
            return Ok(());
        };
        self.blend.advance(ctx.dt);
        let target = self.resolve_target(ctx.host, ctx.local_player);

        let gone = !source.renderable || !source.alive;
        if gone && self.state != LineState::Dying2 {
            if matches!(self.state, LineState::Switching | LineState::NewTarget) {
                self.last_target_position = self.last_target_position2;
            }
            self.enter(LineState::Dying2);
        } else if !gone && self.state == LineState::Dying2 {
            self.had_target = target.is_some();
            match target {
                Some(t) => {
                    self.last_target_position = self.last_target_position2;
                    self.last_target_id = Some(t.id);
                    self.enter(LineState::NewTarget);
                }
                None => self.state = LineState::Dying,
            }
        }

        self.has_target = target.is_some();
        self.update_state(ctx, source, target);
        self.update_colors(ctx, source, target);
        self.update_sample_count(ctx)
    }

    fn update_state(
        &mut self,
        ctx: &FrameContext<'_>,
        source: &EntityView,
        target: Option<&EntityView>,
    ) {
        if self.state != LineState::Dying2 {
            if self.has_target != self.had_target {
                if self.has_target {
                    if self.state == LineState::Dying {
                        self.last_target_position = self.last_target_position2;
                    }
                    self.last_target_id = target.map(|t| t.id);
                    self.enter(LineState::NewTarget);
                } else {
                    if matches!(self.state, LineState::Switching | LineState::NewTarget) {
                        self.last_target_position = self.last_target_position2;
                    }
                    self.enter(LineState::Dying);
                }
            }

            if self.has_target
                && self.had_target
                && matches!(self.state, LineState::Idle | LineState::Switching)
                && let Some(t) = target
                && self.last_target_id != Some(t.id)
            {
                self.last_target_id = Some(t.id);
                if self.state == LineState::Switching {
                    self.last_target_position = self.last_target_position2;
                }
                self.last_mid_height = self.mid_height;
                self.enter(LineState::Switching);
            }
        }

        match (self.state, target) {
            (LineState::NewTarget, Some(t)) => self.step_new_target(ctx, source, t),
            (LineState::Switching, Some(t)) => self.step_switching(ctx, source, t),
            (LineState::Idle, Some(t)) => self.step_idle(ctx, source, t),
            (state, _) if state.is_dying() => self.step_dying(ctx, source),
            (state, None) if state.needs_target() => {
                self.last_target_position = self.last_target_position2;
                self.enter(LineState::Dying);
                self.step_dying(ctx, source);
            }
            _ => {}
        }

        self.update_mid_position(ctx, source);
        self.state_time += ctx.dt;
        self.had_target = self.has_target;
    }

    /// Endpoint for `entity`, blended towards the camera when it is the local player and the
    /// camera is in or moving through first person.
    fn endpoint(&mut self, ctx: &FrameContext<'_>, entity: &EntityView) -> (Vec3, bool) {
        if ctx.local_player != Some(entity.id) {
            return (entity.position, false);
        }
        let cam = ctx.camera;
        let fpp = cam.first_person;
        if fpp || cam.transition != 0.0 || self.blend.is_running() {
            let camera_pos = (cam.position + cam.forward * -2.0).raised(-entity.head_height());
            let p = self
                .blend
                .blend(entity.position, camera_pos, cam.transition, fpp);
            (p, fpp)
        } else {
            (entity.position, fpp)
        }
    }

    fn settle(&mut self, target: EntityId) {
        self.last_target_id = Some(target);
        self.enter(LineState::Idle);
    }

    fn step_new_target(&mut self, ctx: &FrameContext<'_>, source: &EntityView, target: &EntityView) {
        let (src, fpp0) = self.endpoint(ctx, source);
        let (tgt, fpp1) = self.endpoint(ctx, target);
        let cfg = ctx.config();
        let hs = cfg.height_scale;
        let (sh, eh) = (source.cursor_height, target.cursor_height);
        let alpha = (self.state_time / cfg.new_target_ease_time).clamp(0.0, 1.0);

        self.last_target_height = eh;
        self.mid_height = (sh + eh) * 0.5;

        let start = src.raised(if fpp0 { 0.0 } else { sh } * hs);
        let end = tgt.raised(if fpp1 { 0.0 } else { eh } * hs);

        if alpha >= 1.0 {
            self.settle(target.id);
        }

        self.position = start;
        self.target_position = start.lerp(end, alpha);
        self.last_target_position2 = src.lerp(tgt, alpha);
    }

    fn step_dying(&mut self, ctx: &FrameContext<'_>, source: &EntityView) {
        let (src, fpp) = self.endpoint(ctx, source);
        let cfg = ctx.config();
        let hs = cfg.height_scale;
        let (sh, eh) = (source.cursor_height, self.last_target_height);
        let progress = self.state_time / cfg.no_target_fade_time;
        let alpha = progress.clamp(0.0, 1.0);

        let anim_t = (progress * cfg.death_animation_time_scale).min(1.0);
        self.mid_height = cfg.death_animation.apply((sh + eh) * 0.5, 0.0, anim_t);

        let start = src.raised(if fpp { 0.0 } else { sh } * hs);
        let end = self.last_target_position.raised(eh * hs);

        if alpha >= 1.0 {
            tracing::debug!(source = self.source.0, "line asleep");
            self.sleeping = true;
        }

        self.position = start;
        self.target_position = end.lerp(start, alpha);
        self.last_target_position2 = src.lerp(self.last_target_position, alpha);
    }

    fn step_switching(&mut self, ctx: &FrameContext<'_>, source: &EntityView, target: &EntityView) {
        let (src, fpp0) = self.endpoint(ctx, source);
        let (tgt, fpp1) = self.endpoint(ctx, target);
        let cfg = ctx.config();
        let hs = cfg.height_scale;
        let (sh, eh) = (source.cursor_height, target.cursor_height);
        let alpha = (self.state_time / cfg.new_target_ease_time).clamp(0.0, 1.0);

        let start = self.last_target_position.raised(self.last_target_height * hs);
        let end = tgt.raised(if fpp1 { 0.0 } else { eh } * hs);

        if alpha >= 1.0 {
            self.settle(target.id);
        }

        self.position = src.raised(if fpp0 { 0.0 } else { sh } * hs);
        self.target_position = start.lerp(end, alpha);
        self.last_target_position2 = self.last_target_position.lerp(tgt, alpha);
        self.mid_height = lerp(self.last_mid_height, (sh + eh) * 0.5, alpha);
    }

    fn step_idle(&mut self, ctx: &FrameContext<'_>, source: &EntityView, target: &EntityView) {
        let (src, fpp0) = self.endpoint(ctx, source);
        let (tgt, fpp1) = self.endpoint(ctx, target);
        let hs = ctx.config().height_scale;
        let (sh, eh) = (source.cursor_height, target.cursor_height);

        self.last_target_height = eh;
        self.mid_height = (sh + eh) * 0.5;

        self.position = src.raised(if fpp0 { 0.0 } else { sh } * hs);
        self.target_position = tgt.raised(if fpp1 { 0.0 } else { eh } * hs);
        self.last_target_position = tgt;
        self.last_target_position2 = tgt;
    }

    fn update_mid_position(&mut self, ctx: &FrameContext<'_>, source: &EntityView) {
        let cfg = ctx.config();
        let mut mid = (self.position + self.target_position) * 0.5;

        if source.is_player() {
            mid.y += cfg.player_height_bump;
        } else if source.is_battle_npc() {
            mid.y += cfg.enemy_height_bump;
        }

        let mut height_fix = match self.curve_kind() {
            CurveKind::Quadratic => 1.0,
            CurveKind::Cubic => 0.75,
        };
        if self.state.is_dying() {
            height_fix *= 1.0 - (self.state_time / cfg.no_target_fade_time).clamp(0.0, 1.0);
        } else if self.state == LineState::NewTarget {
            height_fix *= (self.state_time / cfg.new_target_ease_time).clamp(0.0, 1.0);
        }

        mid.y += self.mid_height * cfg.arc_height_scalar * height_fix;
        self.mid_position = mid;
    }

    fn update_colors(
        &mut self,
        ctx: &FrameContext<'_>,
        source: &EntityView,
        target: Option<&EntityView>,
    ) {
        self.last_line_color = self.line_color;
        self.last_outline_color = self.outline_color;

        let Some(target) = target else {
            return;
        };
        let cfg = ctx.config();
        let rule = ctx
            .snapshot
            .rules()
            .select_best(self.focus, &source.descriptor, &target.descriptor);

        let appearance = match rule {
            Some(r) if r.line.visible => r.line,
            _ if cfg.fallback.visible => cfg.fallback,
            _ => {
                self.suppressed = true;
                self.line_color = self.line_color.with_alpha(0);
                self.outline_color = self.outline_color.with_alpha(0);
                return;
            }
        };

        self.suppressed = false;
        self.appearance = appearance;
        self.line_color = appearance.color;
        self.outline_color = appearance.outline;

        if cfg.breathing_effect {
            let w = cfg.wave_amplitude_offset;
            let alpha = (1.0 - w) + (ctx.runtime * cfg.wave_frequency_scalar).cos() * w;
            self.line_color = self.line_color.scale_alpha(alpha);
            self.outline_color = self.outline_color.scale_alpha(alpha);
        }
    }

    fn update_sample_count(&mut self, ctx: &FrameContext<'_>) -> LinesResult<()> {
        let cfg = ctx.config();
        if cfg.solid_color {
            return Ok(());
        }

        let inputs = SampleCountInputs {
            start: self.position,
            end: self.target_position,
            screen_start: self.screen.start,
            screen_mid: self.screen.mid,
            screen_end: self.screen.end,
            camera_forward: ctx.camera.forward,
            first_person: ctx.camera.first_person,
            viewport: ctx.host.viewport_size(),
            rendered_lines: ctx.rendered_last_frame,
        };
        let count = target_sample_count(cfg, &inputs);
        if count < 2 {
            self.failed = true;
            return Err(LinesError::geometry(format!(
                "line from entity {} resolved {count} curve samples; at least 2 are required",
                self.source.0
            )));
        }

        if self.samples.resize(count as usize) {
            tracing::trace!(source = self.source.0, count, "sample buffer resized");
        }
        Ok(())
    }

    /// Project the line and decide whether it is drawn this frame.
    ///
    /// Returns the screen bounding box padded by half the line thickness, or `None` when nothing
    /// should be drawn. Battle NPC sources always use scene occlusion for the visibility test.
    pub fn prepare_draw(&mut self, ctx: &FrameContext<'_>) -> Option<Rect> {
        if !self.wants_draw() {
            return None;
        }
        let host = ctx.host;
        let cfg = ctx.config();
        let source = host.entity(self.source)?;
        let target = self.resolve_target(host, ctx.local_player);

        let occlusion = cfg.occlusion_culling || source.is_battle_npc();
        let mut vis_start = entity_visible(host, source, occlusion);
        let mut vis_end = match (self.has_target, target) {
            (true, Some(t)) => entity_visible(host, t, occlusion),
            _ => host.is_point_visible(self.target_position, occlusion),
        };
        let vis_mid = host.is_point_visible(self.mid_position, occlusion);

        let screen = ScreenEnds {
            start: host.world_to_screen(self.position),
            mid: host.world_to_screen(self.mid_position),
            end: host.world_to_screen(self.target_position),
        };
        self.screen = screen;

        if !cfg.solid_color {
            let curve = self.curve_kind();
            let (p0, p1, p2) = (self.position, self.mid_position, self.target_position);
            for i in 0..self.samples.len() {
                let p = curve.sample(p0, p1, p2, self.samples.parameter(i));
                let proj = host.world_to_screen(p);
                let dot = ctx.camera.angle_dot(p);
                self.samples.points_mut()[i] = LinePoint {
                    pos: proj.pos,
                    visible: proj.on_screen,
                    dot,
                    in_view: ctx.camera.in_view(dot),
                };
            }
        }

        if !(screen.start.on_screen || screen.end.on_screen || screen.mid.on_screen) {
            return None;
        }

        if occlusion {
            vis_start &= screen.start.on_screen;
            vis_end &= screen.end.on_screen;
            if !(vis_start || vis_end || vis_mid) {
                return None;
            }
        }

        padded_bounds(
            &[screen.start.pos, screen.mid.pos, screen.end.pos],
            0.5 * cfg.line_thickness,
        )
    }

    /// Emit this frame's primitives into `out`, clipped to `clip`.
    pub fn emit(&self, ctx: &FrameContext<'_>, clip: Option<Rect>, out: &mut Vec<DrawCommand>) {
        let cfg = ctx.config();
        let geo = LineGeometry {
            start: self.screen.start,
            mid: self.screen.mid,
            end: self.screen.end,
            points: self.samples.points(),
            curve: self.curve_kind(),
            color: self.line_color,
            outline: self.outline_color,
        };
        if cfg.solid_color {
            emit_solid(&geo, cfg, clip, out);
        } else {
            emit_textured(&geo, cfg, ctx.runtime, clip, out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/line/controller.rs"]
mod tests;
