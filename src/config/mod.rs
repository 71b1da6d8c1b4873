//! Global tunables and the immutable per-frame configuration snapshot.

use std::sync::Arc;

use crate::{
    animation::ease::DeathAnimation,
    foundation::{
        core::Rgba8,
        error::{LinesError, LinesResult},
    },
    rules::rule_set::{LineColor, RuleSet},
};

/// Combat condition under which lines are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatGate {
    /// Draw regardless of combat.
    #[default]
    Always,
    /// Draw only while the local player is in combat.
    InCombat,
    /// Draw only while the local player is out of combat.
    OutOfCombat,
}

impl CombatGate {
    /// Return `true` when drawing is allowed under `in_combat`.
    pub fn allows(self, in_combat: bool) -> bool {
        match self {
            Self::Always => true,
            Self::InCombat => in_combat,
            Self::OutOfCombat => !in_combat,
        }
    }
}

/// Group-membership filter applied when a line is initialized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyMode {
    /// No filter.
    #[default]
    None,
    /// Only lines whose source or target is a party member.
    PartyOnly,
    /// Like [`PartyMode::PartyOnly`], but only while the local player is in an alliance.
    PartyOnlyInAlliance,
    /// Only lines whose source or target is an alliance member.
    AllianceOnly,
}

/// Global tunables. Every field has a default so partial JSON documents load.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LinesConfig {
    /// Multiplier on the arc apex height.
    pub arc_height_scalar: f64,
    /// Extra apex height for lines from players.
    pub player_height_bump: f64,
    /// Extra apex height for lines from battle NPCs.
    pub enemy_height_bump: f64,
    /// Line width in pixels.
    pub line_thickness: f64,
    /// Outline width in pixels.
    pub outline_thickness: f64,
    /// Seconds for a new or switched line to settle.
    pub new_target_ease_time: f64,
    /// Seconds for a lost line to fade out.
    pub no_target_fade_time: f64,
    /// Amplitude of the breathing and pulsing alpha waves.
    pub wave_amplitude_offset: f64,
    /// Frequency of the breathing and pulsing alpha waves.
    pub wave_frequency_scalar: f64,
    /// Outline alpha kept at the destination end when fading.
    pub fade_to_end_scalar: f64,
    /// Scale applied to entity head heights.
    pub height_scale: f64,
    /// Sample count used when `dynamic_sample_count` is off.
    pub sample_count: u32,
    /// Lower bound for the adaptive sample count.
    pub sample_count_min: u32,
    /// Upper bound for the adaptive sample count.
    pub sample_count_max: u32,
    /// Combat condition gating the whole overlay.
    pub only_in_combat: CombatGate,
    /// Draw only while the local player has a weapon drawn.
    pub only_unsheathed: bool,
    /// Draw a single solid Bézier instead of textured segments.
    pub solid_color: bool,
    /// Fade the outline towards the destination.
    pub fade_to_end: bool,
    /// Suppress all lines.
    pub toggled_off: bool,
    /// Hide line ends that are occluded in the scene.
    pub occlusion_culling: bool,
    /// Animate a travelling alpha pulse along the line.
    pub pulsing_effect: bool,
    /// Modulate the whole line alpha over time.
    pub breathing_effect: bool,
    /// Clip lines against opaque UI rectangles.
    pub ui_occlusion: bool,
    /// Derive the sample count from the line length.
    pub dynamic_sample_count: bool,
    /// Measure line length in screen space instead of world space.
    pub screen_space_lod: bool,
    /// Add samples when the line runs across the view direction.
    pub view_angle_sampling: bool,
    /// Membership filter for new lines.
    pub party_mode: PartyMode,
    /// Appearance used when no rule matches.
    pub fallback: LineColor,
    /// Curve used to collapse the apex while dying.
    pub death_animation: DeathAnimation,
    /// Speed multiplier for the apex collapse.
    pub death_animation_time_scale: f64,
    /// Merge threshold for UI rectangles in logical pixels (scaled by DPI).
    pub ui_merge_threshold: f64,
    /// Minimum UI rectangle edge in logical pixels (scaled by DPI).
    pub ui_min_rect_size: f64,
}

impl Default for LinesConfig {
    fn default() -> Self {
        Self {
            arc_height_scalar: 1.0,
            player_height_bump: 0.0,
            enemy_height_bump: 0.0,
            line_thickness: 16.0,
            outline_thickness: 20.0,
            new_target_ease_time: 0.25,
            no_target_fade_time: 0.25,
            wave_amplitude_offset: 0.175,
            wave_frequency_scalar: 3.0,
            fade_to_end_scalar: 0.2,
            height_scale: 1.0,
            sample_count: 23,
            sample_count_min: 5,
            sample_count_max: 23,
            only_in_combat: CombatGate::Always,
            only_unsheathed: false,
            solid_color: false,
            fade_to_end: true,
            toggled_off: false,
            occlusion_culling: false,
            pulsing_effect: true,
            breathing_effect: true,
            ui_occlusion: true,
            dynamic_sample_count: true,
            screen_space_lod: true,
            view_angle_sampling: true,
            party_mode: PartyMode::None,
            fallback: LineColor::new(Rgba8::new(0x80, 0x80, 0x80, 0xC0), true, false),
            death_animation: DeathAnimation::Linear,
            death_animation_time_scale: 1.0,
            ui_merge_threshold: 14.0,
            ui_min_rect_size: 32.0,
        }
    }
}

impl LinesConfig {
    /// Reject values the frame pass cannot work with.
    ///
    /// A minimum sample count below two is accepted here; such lines fail individually with a
    /// geometry error instead of rejecting the whole configuration.
    pub fn validate(&self) -> LinesResult<()> {
        if !(self.new_target_ease_time > 0.0) || !self.new_target_ease_time.is_finite() {
            return Err(LinesError::validation("new_target_ease_time must be > 0"));
        }
        if !(self.no_target_fade_time > 0.0) || !self.no_target_fade_time.is_finite() {
            return Err(LinesError::validation("no_target_fade_time must be > 0"));
        }
        if self.sample_count_min == 0 {
            return Err(LinesError::validation("sample_count_min must be > 0"));
        }
        if self.sample_count_min > self.sample_count_max {
            return Err(LinesError::validation(format!(
                "sample_count_min ({}) exceeds sample_count_max ({})",
                self.sample_count_min, self.sample_count_max
            )));
        }
        if self.line_thickness < 0.0 || self.outline_thickness < 0.0 {
            return Err(LinesError::validation("line thickness must be >= 0"));
        }
        if !(self.death_animation_time_scale > 0.0) {
            return Err(LinesError::validation(
                "death_animation_time_scale must be > 0",
            ));
        }
        if self.ui_merge_threshold < 0.0 || self.ui_min_rect_size < 0.0 {
            return Err(LinesError::validation("ui thresholds must be >= 0"));
        }
        for (name, v) in [
            ("arc_height_scalar", self.arc_height_scalar),
            ("player_height_bump", self.player_height_bump),
            ("enemy_height_bump", self.enemy_height_bump),
            ("wave_amplitude_offset", self.wave_amplitude_offset),
            ("wave_frequency_scalar", self.wave_frequency_scalar),
            ("fade_to_end_scalar", self.fade_to_end_scalar),
            ("height_scale", self.height_scale),
        ] {
            if !v.is_finite() {
                return Err(LinesError::validation(format!("{name} must be finite")));
            }
        }
        Ok(())
    }

    /// Sample density multiplier for thick lines; never below one.
    pub fn thickness_scalar(&self) -> f64 {
        (self.line_thickness / 32.0).max(1.0)
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct ConfigFile {
    #[serde(default)]
    settings: LinesConfig,
    #[serde(default = "RuleSet::defaults")]
    rules: RuleSet,
}

/// Validated configuration plus rules, shared read-only with every frame.
///
/// Replaced wholesale between frames; never mutated while a frame runs.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigSnapshot {
    config: LinesConfig,
    rules: RuleSet,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            config: LinesConfig::default(),
            rules: RuleSet::defaults(),
        }
    }
}

impl ConfigSnapshot {
    /// Validate and freeze a configuration.
    pub fn new(config: LinesConfig, rules: RuleSet) -> LinesResult<Arc<Self>> {
        config.validate()?;
        Ok(Arc::new(Self { config, rules }))
    }

    /// Parse `{ "settings": {...}, "rules": [...] }`. A missing `rules` key installs the defaults.
    pub fn from_json_str(s: &str) -> LinesResult<Arc<Self>> {
        let file: ConfigFile = serde_json::from_str(s)?;
        Self::new(file.settings, file.rules)
    }

    /// Serialize to the same document shape [`ConfigSnapshot::from_json_str`] reads.
    pub fn to_json_string(&self) -> LinesResult<String> {
        let file = ConfigFile {
            settings: self.config.clone(),
            rules: self.rules.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Global tunables.
    pub fn config(&self) -> &LinesConfig {
        &self.config
    }

    /// Rules in selection order.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/mod.rs"]
mod tests;
