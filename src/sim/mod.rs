//! Scripted in-memory scene.
//!
//! [`SimScene`] implements [`SceneHost`] with a pinhole camera and a list of frame-stamped events.
//! It backs the `simulate` command and the crate's tests.

use std::collections::HashSet;

use crate::{
    foundation::{
        core::{EntityId, Point, Size, Vec3},
        error::{LinesError, LinesResult},
    },
    host::{CameraView, EntityKind, EntityView, FrameConditions, SceneHost, ScreenProjection, UiElement},
    rules::flags::{ClassJob, Membership, TargetDescriptor},
};

const NEAR_PLANE: f64 = 0.01;

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

fn default_cursor_height() -> f64 {
    2.0
}

fn default_fov() -> f64 {
    60.0
}

fn default_viewport() -> Size {
    Size::new(1920.0, 1080.0)
}

fn default_dt() -> f64 {
    1.0 / 60.0
}

/// One scripted entity.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimEntity {
    /// Identity.
    pub id: EntityId,
    /// Classification.
    #[serde(default)]
    pub kind: EntityKind,
    /// Ground position.
    pub position: Vec3,
    /// Cursor height above the ground position.
    #[serde(default = "default_cursor_height")]
    pub cursor_height: f64,
    /// Model scale.
    #[serde(default = "default_one")]
    pub scale: f64,
    /// Current target.
    #[serde(default)]
    pub target: Option<EntityId>,
    /// Player job.
    #[serde(default)]
    pub job: Option<ClassJob>,
    /// Member of the local player's party.
    #[serde(default)]
    pub party: bool,
    /// Member of the local player's alliance.
    #[serde(default)]
    pub alliance: bool,
    /// Alive.
    #[serde(default = "default_true")]
    pub alive: bool,
    /// Targetable.
    #[serde(default = "default_true")]
    pub targetable: bool,
    /// Drawn by the engine.
    #[serde(default = "default_true")]
    pub renderable: bool,
}

impl SimEntity {
    fn with_kind(id: u64, kind: EntityKind, position: Vec3) -> Self {
        Self {
            id: EntityId(id),
            kind,
            position,
            cursor_height: default_cursor_height(),
            scale: 1.0,
            target: None,
            job: None,
            party: false,
            alliance: false,
            alive: true,
            targetable: true,
            renderable: true,
        }
    }

    /// Player character at `position`.
    pub fn player(id: u64, position: Vec3) -> Self {
        Self::with_kind(id, EntityKind::Player, position)
    }

    /// Battle NPC at `position`.
    pub fn enemy(id: u64, position: Vec3) -> Self {
        Self::with_kind(id, EntityKind::BattleNpc, position)
    }

    /// Non-combat NPC at `position`.
    pub fn npc(id: u64, position: Vec3) -> Self {
        Self::with_kind(id, EntityKind::Other, position)
    }

    /// Copy targeting `target`.
    pub fn targeting(self, target: u64) -> Self {
        Self {
            target: Some(EntityId(target)),
            ..self
        }
    }

    /// Copy with a job.
    pub fn with_job(self, job: ClassJob) -> Self {
        Self {
            job: Some(job),
            ..self
        }
    }

    /// Copy flagged as a party member (and therefore alliance member).
    pub fn in_party(self) -> Self {
        Self {
            party: true,
            alliance: true,
            ..self
        }
    }

    fn view(&self, local_player: Option<EntityId>) -> EntityView {
        let descriptor = match self.kind {
            EntityKind::Player => TargetDescriptor::for_player(
                self.job,
                Membership {
                    is_self: local_player == Some(self.id),
                    party: self.party,
                    alliance: self.alliance,
                },
            ),
            EntityKind::BattleNpc => TargetDescriptor::for_enemy(),
            EntityKind::Other => TargetDescriptor::for_npc(),
        };
        EntityView {
            id: self.id,
            kind: self.kind,
            position: self.position,
            cursor_height: self.cursor_height,
            scale: self.scale,
            target: self.target,
            valid: true,
            alive: self.alive,
            targetable: self.targetable,
            renderable: self.renderable,
            descriptor,
        }
    }
}

/// Scripted pinhole camera.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimCamera {
    /// Eye position.
    pub position: Vec3,
    /// Viewing direction; normalized on use.
    pub forward: Vec3,
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov_y_degrees: f64,
    /// First person.
    #[serde(default)]
    pub first_person: bool,
    /// First-person transition scalar.
    #[serde(default)]
    pub transition: f64,
    /// View cone threshold.
    #[serde(default)]
    pub min_forward_dot: f64,
}

impl SimCamera {
    /// Third-person camera at `position` looking along `forward`.
    pub fn looking(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward,
            fov_y_degrees: default_fov(),
            first_person: false,
            transition: 0.0,
            min_forward_dot: 0.0,
        }
    }

    fn view(&self) -> CameraView {
        CameraView {
            position: self.position,
            forward: self.forward.normalize_or_zero(),
            first_person: self.first_person,
            transition: self.transition,
            min_forward_dot: self.min_forward_dot,
        }
    }
}

/// Scene mutation applied at a scripted frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SimAction {
    /// Change an entity's target.
    SetTarget {
        /// Entity.
        entity: EntityId,
        /// New target.
        target: Option<EntityId>,
    },
    /// Change the local player's focus target.
    SetFocus {
        /// New focus target.
        target: Option<EntityId>,
    },
    /// Mark an entity dead.
    Kill {
        /// Entity.
        entity: EntityId,
    },
    /// Mark an entity alive.
    Revive {
        /// Entity.
        entity: EntityId,
    },
    /// Stop drawing an entity.
    Hide {
        /// Entity.
        entity: EntityId,
    },
    /// Resume drawing an entity.
    Show {
        /// Entity.
        entity: EntityId,
    },
    /// Move an entity.
    Move {
        /// Entity.
        entity: EntityId,
        /// New ground position.
        position: Vec3,
    },
    /// Remove an entity from the scene.
    Despawn {
        /// Entity.
        entity: EntityId,
    },
    /// Replace the frame conditions.
    Conditions {
        /// New conditions.
        conditions: FrameConditions,
    },
    /// Change the camera's first-person state.
    FirstPerson {
        /// In first person.
        enabled: bool,
        /// Transition scalar.
        #[serde(default)]
        transition: f64,
    },
    /// Make camera queries fail.
    CameraLost,
    /// Make camera queries succeed again.
    CameraRestored,
}

impl SimAction {
    fn entity(&self) -> Option<EntityId> {
        match self {
            Self::SetTarget { entity, .. }
            | Self::Kill { entity }
            | Self::Revive { entity }
            | Self::Hide { entity }
            | Self::Show { entity }
            | Self::Move { entity, .. }
            | Self::Despawn { entity } => Some(*entity),
            _ => None,
        }
    }
}

/// An action stamped with the frame it applies on.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimEvent {
    /// Zero-based frame index.
    pub frame: u64,
    /// Mutation.
    #[serde(flatten)]
    pub action: SimAction,
}

#[derive(serde::Deserialize)]
struct SceneFile {
    #[serde(default = "default_viewport")]
    viewport: Size,
    #[serde(default = "default_one")]
    dpi_scale: f64,
    #[serde(default = "default_dt")]
    dt: f64,
    #[serde(default)]
    local_player: Option<EntityId>,
    #[serde(default)]
    focus_target: Option<EntityId>,
    camera: SimCamera,
    #[serde(default)]
    entities: Vec<SimEntity>,
    #[serde(default)]
    ui: Vec<UiElement>,
    #[serde(default)]
    conditions: FrameConditions,
    #[serde(default)]
    events: Vec<SimEvent>,
}

/// In-memory [`SceneHost`].
#[derive(Clone, Debug)]
pub struct SimScene {
    viewport: Size,
    dpi_scale: f64,
    dt: f64,
    local_player: Option<EntityId>,
    focus_target: Option<EntityId>,
    camera: SimCamera,
    camera_available: bool,
    entities: Vec<SimEntity>,
    views: Vec<EntityView>,
    ui: Vec<UiElement>,
    conditions: FrameConditions,
    events: Vec<SimEvent>,
}

impl SimScene {
    /// Empty scene.
    pub fn new(camera: SimCamera, viewport: Size) -> Self {
        Self {
            viewport,
            dpi_scale: 1.0,
            dt: default_dt(),
            local_player: None,
            focus_target: None,
            camera,
            camera_available: true,
            entities: Vec::new(),
            views: Vec::new(),
            ui: Vec::new(),
            conditions: FrameConditions::default(),
            events: Vec::new(),
        }
    }

    /// Parse a scene document.
    ///
    /// Rejects duplicate entity ids, a non-positive time step and events naming unknown entities.
    pub fn from_json_str(s: &str) -> LinesResult<Self> {
        let file: SceneFile = serde_json::from_str(s)?;
        if !(file.dt > 0.0) || !file.dt.is_finite() {
            return Err(LinesError::validation("scene dt must be > 0"));
        }

        let mut ids = HashSet::new();
        for e in &file.entities {
            if !ids.insert(e.id) {
                return Err(LinesError::validation(format!(
                    "duplicate scene entity {}",
                    e.id.0
                )));
            }
        }
        for ev in &file.events {
            if let Some(id) = ev.action.entity()
                && !ids.contains(&id)
            {
                return Err(LinesError::validation(format!(
                    "event at frame {} names unknown entity {}",
                    ev.frame, id.0
                )));
            }
        }

        let mut scene = Self::new(file.camera, file.viewport);
        scene.dpi_scale = file.dpi_scale;
        scene.dt = file.dt;
        scene.local_player = file.local_player;
        scene.focus_target = file.focus_target;
        scene.entities = file.entities;
        scene.ui = file.ui;
        scene.conditions = file.conditions;
        scene.events = file.events;
        scene.events.sort_by_key(|e| e.frame);
        scene.refresh();
        Ok(scene)
    }

    fn refresh(&mut self) {
        let local = self.local_player;
        self.views = self.entities.iter().map(|e| e.view(local)).collect();
    }

    /// Add or replace an entity.
    pub fn insert(&mut self, entity: SimEntity) -> &mut Self {
        match self.entities.iter_mut().find(|e| e.id == entity.id) {
            Some(slot) => *slot = entity,
            None => self.entities.push(entity),
        }
        self.refresh();
        self
    }

    /// Mutate one entity. Returns `false` when it does not exist.
    pub fn modify(&mut self, id: EntityId, f: impl FnOnce(&mut SimEntity)) -> bool {
        let Some(e) = self.entities.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        f(e);
        self.refresh();
        true
    }

    /// Set the local player.
    pub fn set_local_player(&mut self, id: Option<EntityId>) -> &mut Self {
        self.local_player = id;
        self.refresh();
        self
    }

    /// Set the focus target.
    pub fn set_focus_target(&mut self, id: Option<EntityId>) -> &mut Self {
        self.focus_target = id;
        self
    }

    /// Replace the UI elements.
    pub fn set_ui(&mut self, ui: Vec<UiElement>) -> &mut Self {
        self.ui = ui;
        self
    }

    /// Replace the frame conditions.
    pub fn set_conditions(&mut self, conditions: FrameConditions) -> &mut Self {
        self.conditions = conditions;
        self
    }

    /// Set the UI scale factor.
    pub fn set_dpi_scale(&mut self, dpi_scale: f64) -> &mut Self {
        self.dpi_scale = dpi_scale;
        self
    }

    /// Mutable camera.
    pub fn camera_mut(&mut self) -> &mut SimCamera {
        &mut self.camera
    }

    /// Seconds per scripted frame.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Frame index of the last scripted event.
    pub fn last_event_frame(&self) -> Option<u64> {
        self.events.last().map(|e| e.frame)
    }

    /// Apply every event stamped with `frame`.
    pub fn apply_events(&mut self, frame: u64) {
        let due: Vec<SimAction> = self
            .events
            .iter()
            .filter(|e| e.frame == frame)
            .map(|e| e.action.clone())
            .collect();
        for action in &due {
            self.apply(action);
        }
    }

    /// Apply one action. Actions naming a despawned entity are ignored.
    pub fn apply(&mut self, action: &SimAction) {
        tracing::trace!(?action, "scene event");
        match action {
            SimAction::SetFocus { target } => self.focus_target = *target,
            SimAction::Conditions { conditions } => self.conditions = *conditions,
            SimAction::FirstPerson {
                enabled,
                transition,
            } => {
                self.camera.first_person = *enabled;
                self.camera.transition = *transition;
            }
            SimAction::CameraLost => self.camera_available = false,
            SimAction::CameraRestored => self.camera_available = true,
            SimAction::Despawn { entity } => {
                self.entities.retain(|e| e.id != *entity);
                self.refresh();
            }
            SimAction::SetTarget { entity, target } => {
                self.modify_or_warn(*entity, |e| e.target = *target);
            }
            SimAction::Kill { entity } => self.modify_or_warn(*entity, |e| e.alive = false),
            SimAction::Revive { entity } => self.modify_or_warn(*entity, |e| e.alive = true),
            SimAction::Hide { entity } => self.modify_or_warn(*entity, |e| e.renderable = false),
            SimAction::Show { entity } => self.modify_or_warn(*entity, |e| e.renderable = true),
            SimAction::Move { entity, position } => {
                self.modify_or_warn(*entity, |e| e.position = *position);
            }
        }
    }

    fn modify_or_warn(&mut self, id: EntityId, f: impl FnOnce(&mut SimEntity)) {
        if !self.modify(id, f) {
            tracing::warn!(entity = id.0, "scene event for missing entity ignored");
        }
    }
}

impl SceneHost for SimScene {
    fn entities(&self) -> &[EntityView] {
        &self.views
    }

    fn local_player(&self) -> Option<EntityId> {
        self.local_player
    }

    fn focus_target(&self) -> Option<EntityId> {
        self.focus_target
    }

    fn camera(&self) -> LinesResult<CameraView> {
        if !self.camera_available {
            return Err(LinesError::host("camera unavailable"));
        }
        Ok(self.camera.view())
    }

    fn world_to_screen(&self, p: Vec3) -> ScreenProjection {
        let forward = self.camera.forward.normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);

        let rel = p - self.camera.position;
        let depth = rel.dot(forward);
        let z = depth.max(NEAR_PLANE);
        let focal = self.viewport.height * 0.5 / (self.camera.fov_y_degrees.to_radians() * 0.5).tan();

        let pos = Point::new(
            self.viewport.width * 0.5 + rel.dot(right) * focal / z,
            self.viewport.height * 0.5 - rel.dot(up) * focal / z,
        );
        let on_screen = depth > NEAR_PLANE
            && (0.0..=self.viewport.width).contains(&pos.x)
            && (0.0..=self.viewport.height).contains(&pos.y);
        ScreenProjection { pos, on_screen }
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn dpi_scale(&self) -> f64 {
        self.dpi_scale
    }

    fn ui_elements(&self) -> &[UiElement] {
        &self.ui
    }

    fn conditions(&self) -> FrameConditions {
        self.conditions
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/mod.rs"]
mod tests;
