//! Target lines is the core of a 3D scene overlay that draws curved lines from entities to their
//! targets.
//!
//! Each frame the host hands the [`Overlay`] a [`SceneHost`] view of the world:
//!
//! - every awake [`TargetLine`] advances its lifecycle state machine and resolves its appearance
//!   from the [`RuleSet`]
//! - the occlusion engine merges opaque UI rectangles once and clips every visible line
//! - the frame returns renderer-agnostic [`DrawCommand`]s plus aggregate counters
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Bézier evaluation and death-animation easing.
pub mod animation;
/// Global tunables and the per-frame configuration snapshot.
pub mod config;
/// Core value types, error taxonomy and scalar math.
pub mod foundation;
/// Rectangle predicates and bounds helpers.
pub mod geometry;
pub mod host;
pub mod line;
pub mod occlusion;
pub mod overlay;
pub mod rules;
pub mod sim;

pub use crate::config::{CombatGate, ConfigSnapshot, LinesConfig, PartyMode};
pub use crate::foundation::core::{EntityId, Point, Rect, Rgba8, Size, Vec2, Vec3, WorldVec};
pub use crate::foundation::error::{LinesError, LinesResult};
pub use crate::host::{
    CameraView, EntityKind, EntityView, FrameConditions, SceneHost, ScreenProjection, UiElement,
};
pub use crate::line::{DrawCommand, LineState, LineTexture, TargetLine};
pub use crate::overlay::{FrameOutput, FrameStats, Overlay};
pub use crate::rules::flags::{AttributeFlags, ClassJob, JobMask, Membership, TargetDescriptor};
pub use crate::rules::rule_set::{ColorRule, LineColor, RuleId, RuleSet};
pub use crate::sim::{SimAction, SimCamera, SimEntity, SimEvent, SimScene};
