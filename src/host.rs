//! Contract between the overlay core and the engine hosting it.
//!
//! Everything the core knows about the scene comes through [`SceneHost`]: entity state, camera,
//! projection, UI geometry and frame conditions. Descriptor derivation (roles, party membership)
//! is the host's job; [`crate::rules::flags::TargetDescriptor::for_player`] is offered as a helper.

use crate::foundation::{
    core::{EntityId, Point, Rect, Size, Vec3, WorldVec},
    error::LinesResult,
};
use crate::rules::flags::TargetDescriptor;

/// Distance between the cursor anchor and the visual head position.
pub const HEAD_OFFSET: f64 = 0.2;

/// Coarse entity classification used for height bumps and forced occlusion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Player character.
    Player,
    /// Combat NPC.
    BattleNpc,
    /// Anything else.
    #[default]
    Other,
}

/// Snapshot of one entity for the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityView {
    /// Stable identity.
    pub id: EntityId,
    /// Classification.
    pub kind: EntityKind,
    /// Ground position.
    pub position: Vec3,
    /// Height of the targeting cursor above `position`.
    pub cursor_height: f64,
    /// Model scale; zero means the model is not drawn.
    pub scale: f64,
    /// Current target, if any.
    pub target: Option<EntityId>,
    /// Host object is still valid.
    pub valid: bool,
    /// Entity is alive.
    pub alive: bool,
    /// Entity can be targeted.
    pub targetable: bool,
    /// Entity is being drawn by the engine.
    pub renderable: bool,
    /// Attribute and job descriptor used for rule matching.
    pub descriptor: TargetDescriptor,
}

impl EntityView {
    /// Height of the head above the ground position.
    pub fn head_height(&self) -> f64 {
        self.cursor_height - HEAD_OFFSET
    }

    /// World position of the head.
    pub fn head_position(&self) -> Vec3 {
        self.position.raised(self.head_height())
    }

    /// Return `true` for player characters.
    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }

    /// Return `true` for combat NPCs.
    pub fn is_battle_npc(&self) -> bool {
        self.kind == EntityKind::BattleNpc
    }
}

/// Active camera state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    /// Camera position.
    pub position: Vec3,
    /// Unit forward vector.
    pub forward: Vec3,
    /// Camera is in first person.
    pub first_person: bool,
    /// First-person transition scalar; its sign gives the direction, zero when settled.
    pub transition: f64,
    /// Smallest forward dot product still considered inside the view cone.
    pub min_forward_dot: f64,
}

impl CameraView {
    /// Dot product between the camera forward axis and the direction to `p`.
    pub fn angle_dot(&self, p: Vec3) -> f64 {
        (p - self.position).normalize_or_zero().dot(self.forward)
    }

    /// Return `true` when a point with forward dot `dot` lies inside the view cone.
    pub fn in_view(&self, dot: f64) -> bool {
        dot >= self.min_forward_dot
    }
}

/// Result of projecting a world point to the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenProjection {
    /// Screen position in pixels. Meaningful even when off screen.
    pub pos: Point,
    /// The point projected inside the viewport and in front of the camera.
    pub on_screen: bool,
}

/// One UI element with its visibility chain already resolved by the host.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UiElement {
    /// Owning UI unit name, used for the ignore list.
    pub name: String,
    /// Screen rectangle after parent transforms.
    pub rect: Rect,
    /// Visible, enabled and non-transparent along the parent chain.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Responds to mouse input.
    #[serde(default)]
    pub interactive: bool,
    /// Draws a filled background.
    #[serde(default)]
    pub filled: bool,
}

fn default_true() -> bool {
    true
}

/// Per-frame global conditions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FrameConditions {
    /// Local player is in combat.
    pub in_combat: bool,
    /// Local player has a weapon drawn.
    pub weapon_drawn: bool,
    /// A cutscene is playing.
    pub in_cutscene: bool,
    /// Local player's group is an alliance.
    pub in_alliance: bool,
}

/// Scene queries consumed by the overlay once per frame.
///
/// Calls are synchronous and must not block. Entities are expected to be stable for the duration
/// of one frame.
pub trait SceneHost {
    /// All trackable entities this frame.
    fn entities(&self) -> &[EntityView];

    /// Look up one entity.
    fn entity(&self, id: EntityId) -> Option<&EntityView> {
        self.entities().iter().find(|e| e.id == id)
    }

    /// Identity of the local player, if one is loaded.
    fn local_player(&self) -> Option<EntityId>;

    /// The local player's focus target, if any.
    fn focus_target(&self) -> Option<EntityId> {
        None
    }

    /// Active camera. May fail transiently.
    fn camera(&self) -> LinesResult<CameraView>;

    /// Project a world point to the screen.
    fn world_to_screen(&self, p: Vec3) -> ScreenProjection;

    /// Return `true` when `p` is visible. With `occlusion`, scene geometry may hide it.
    fn is_point_visible(&self, p: Vec3, _occlusion: bool) -> bool {
        self.world_to_screen(p).on_screen
    }

    /// Viewport size in pixels.
    fn viewport_size(&self) -> Size;

    /// UI scale factor applied to pixel thresholds.
    fn dpi_scale(&self) -> f64 {
        1.0
    }

    /// UI elements that may hide lines.
    fn ui_elements(&self) -> &[UiElement];

    /// Global conditions for this frame.
    fn conditions(&self) -> FrameConditions;
}

/// Return `true` when `entity` is drawn and its head is visible.
pub fn entity_visible(host: &dyn SceneHost, entity: &EntityView, occlusion: bool) -> bool {
    entity.scale != 0.0 && host.is_point_visible(entity.head_position(), occlusion)
}
