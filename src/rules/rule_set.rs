use crate::foundation::core::Rgba8;
use crate::foundation::error::{LinesError, LinesResult};
use crate::rules::flags::{AttributeFlags, TargetDescriptor};
use crate::rules::matcher::evaluate;

/// Appearance shared by configured rules and the global fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LineColor {
    /// Line body color.
    pub color: Rgba8,
    /// Outline color.
    pub outline: Rgba8,
    /// Whether lines using this appearance are drawn at all.
    pub visible: bool,
    /// Draw a quadratic curve instead of the default cubic.
    pub use_quad: bool,
}

impl Default for LineColor {
    fn default() -> Self {
        Self {
            color: Rgba8::new(0xFF, 0xBF, 0x00, 0x80),
            outline: Rgba8::new(0x00, 0x00, 0x00, 0x80),
            visible: true,
            use_quad: false,
        }
    }
}

impl LineColor {
    /// Appearance with the default outline.
    pub fn new(color: Rgba8, visible: bool, use_quad: bool) -> Self {
        Self {
            color,
            visible,
            use_quad,
            ..Self::default()
        }
    }
}

/// Stable identity of a rule inside a [`RuleSet`]. Also the insertion order used for ties.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct RuleId(pub u64);

/// Priority value meaning "derive from the descriptors".
pub const AUTO_PRIORITY: i32 = -1;

/// One configured (source, destination) -> appearance mapping.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorRule {
    /// Identity; `0` means "unassigned" and is replaced on insertion.
    #[serde(default)]
    pub id: RuleId,
    /// Goal for the line's source entity.
    #[serde(default)]
    pub from: TargetDescriptor,
    /// Goal for the line's destination entity.
    #[serde(default)]
    pub to: TargetDescriptor,
    /// Appearance applied on match.
    #[serde(default)]
    pub line: LineColor,
    /// Explicit priority, or [`AUTO_PRIORITY`].
    #[serde(default = "auto_priority")]
    pub priority: i32,
    /// Rule applies to focus-target lines instead of primary-target lines.
    #[serde(default)]
    pub focus_target: bool,
}

fn auto_priority() -> i32 {
    AUTO_PRIORITY
}

impl ColorRule {
    /// New rule with automatic priority for primary-target lines.
    pub fn new(from: TargetDescriptor, to: TargetDescriptor, line: LineColor) -> Self {
        Self {
            id: RuleId::default(),
            from,
            to,
            line,
            priority: AUTO_PRIORITY,
            focus_target: false,
        }
    }

    /// Copy with an explicit priority.
    pub fn with_priority(self, priority: i32) -> Self {
        Self { priority, ..self }
    }

    /// Copy that applies to focus-target lines.
    pub fn for_focus_target(self) -> Self {
        Self {
            focus_target: true,
            ..self
        }
    }

    /// Priority used for ordering: the explicit value, or the sum of set attribute bit indices on
    /// both sides plus one per non-empty job mask. Never [`AUTO_PRIORITY`].
    pub fn effective_priority(&self) -> i32 {
        if self.priority != AUTO_PRIORITY {
            return self.priority;
        }
        let jobs = i32::from(!self.from.jobs.is_empty()) + i32::from(!self.to.jobs.is_empty());
        self.from.flags.index_sum() + self.to.flags.index_sum() + jobs
    }

    /// Priority under the caller's focus mode, or `None` when the rule belongs to the other mode.
    pub fn priority_for(&self, focus: bool) -> Option<i32> {
        (self.focus_target == focus).then(|| self.effective_priority())
    }

    /// Return `true` when both sides match.
    pub fn matches(&self, source: &TargetDescriptor, dest: &TargetDescriptor) -> bool {
        evaluate(&self.from, source) && evaluate(&self.to, dest)
    }
}

/// Ordered rule container, kept sorted by descending effective priority.
///
/// Ties keep insertion order ([`RuleId`] ascending). Every mutation re-sorts, so selection is a
/// single forward scan.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<ColorRule>", into = "Vec<ColorRule>")]
pub struct RuleSet {
    rules: Vec<ColorRule>,
    next_id: u64,
}

impl RuleSet {
    /// Empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rules in insertion order. Missing or duplicate ids are reassigned.
    ///
    /// When the stored ids leave no room to assign new ones, every rule is renumbered from one in
    /// input order.
    pub fn from_rules(rules: impl IntoIterator<Item = ColorRule>) -> Self {
        let mut out = Self::new();
        let mut incoming: Vec<ColorRule> = rules.into_iter().collect();
        let max_id = incoming.iter().map(|r| r.id.0).max().unwrap_or(0);
        let headroom = u64::try_from(incoming.len())
            .ok()
            .and_then(|n| max_id.checked_add(n))
            .and_then(|n| n.checked_add(1));

        match headroom {
            Some(_) => {
                out.next_id = max_id + 1;
                let mut seen = std::collections::HashSet::new();
                for rule in &mut incoming {
                    if rule.id.0 == 0 || !seen.insert(rule.id) {
                        rule.id = RuleId(out.next_id);
                        out.next_id += 1;
                        seen.insert(rule.id);
                    }
                }
            }
            None => {
                tracing::warn!(max_id, "rule ids exhausted; renumbering");
                out.next_id = 1;
                for rule in &mut incoming {
                    rule.id = RuleId(out.next_id);
                    out.next_id += 1;
                }
            }
        }
        out.rules = incoming;
        out.resort();
        out
    }

    /// Rule set installed on first run.
    pub fn defaults() -> Self {
        type F = AttributeFlags;
        let d = TargetDescriptor::new;
        Self::from_rules([
            ColorRule::new(
                d(F::PLAYER),
                d(F::PLAYER),
                LineColor::new(Rgba8::new(0x4C, 0xAF, 0x50, 0xC0), true, false),
            ),
            ColorRule::new(
                d(F::PLAYER),
                d(F::PARTY),
                LineColor::new(Rgba8::new(0x9C, 0x27, 0xB0, 0xC0), true, true),
            )
            .for_focus_target(),
            ColorRule::new(
                d(F::PLAYER),
                d(F::ENEMY),
                LineColor::new(Rgba8::new(0xF4, 0x43, 0x36, 0x80), true, false),
            ),
            ColorRule::new(
                d(F::ENEMY),
                d(F::PLAYER),
                LineColor::new(Rgba8::new(0xFF, 0x00, 0x00, 0xC0), true, true),
            ),
            ColorRule::new(
                d(F::ENEMY),
                d(F::ENEMY),
                LineColor::new(Rgba8::new(0x9C, 0x27, 0xB0, 0xC0), true, true),
            ),
            ColorRule::new(
                d(F::ANY),
                d(F::ANY),
                LineColor::new(Rgba8::new(0x80, 0x80, 0x80, 0xC0), false, false),
            )
            .with_priority(0),
        ])
    }

    fn allocate_id(&mut self) -> LinesResult<RuleId> {
        let id = self.next_id.max(1);
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| LinesError::validation("rule ids exhausted"))?;
        Ok(RuleId(id))
    }

    fn resort(&mut self) {
        self.rules.sort_by(|a, b| {
            b.effective_priority()
                .cmp(&a.effective_priority())
                .then(a.id.cmp(&b.id))
        });
        tracing::trace!(rules = self.rules.len(), "rule set re-sorted");
    }

    /// Insert a rule and return its assigned id.
    pub fn insert(&mut self, mut rule: ColorRule) -> LinesResult<RuleId> {
        rule.id = self.allocate_id()?;
        let id = rule.id;
        self.rules.push(rule);
        self.resort();
        Ok(id)
    }

    /// Remove a rule by id.
    pub fn remove(&mut self, id: RuleId) -> Option<ColorRule> {
        let idx = self.rules.iter().position(|r| r.id == id)?;
        Some(self.rules.remove(idx))
    }

    /// Mutate a rule in place and re-sort. Returns `false` when `id` is unknown.
    ///
    /// The closure cannot change the rule's id.
    pub fn update(&mut self, id: RuleId, f: impl FnOnce(&mut ColorRule)) -> bool {
        let Some(rule) = self.rules.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        f(rule);
        rule.id = id;
        self.resort();
        true
    }

    /// Look up a rule by id.
    pub fn get(&self, id: RuleId) -> Option<&ColorRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Rules in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &ColorRule> {
        self.rules.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Return `true` when there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Highest-priority rule of the caller's focus mode matching both sides, if any.
    pub fn select_best(
        &self,
        focus: bool,
        source: &TargetDescriptor,
        dest: &TargetDescriptor,
    ) -> Option<&ColorRule> {
        self.rules
            .iter()
            .filter(|r| r.priority_for(focus).is_some())
            .find(|r| r.matches(source, dest))
    }
}

impl From<Vec<ColorRule>> for RuleSet {
    fn from(rules: Vec<ColorRule>) -> Self {
        Self::from_rules(rules)
    }
}

impl From<RuleSet> for Vec<ColorRule> {
    fn from(set: RuleSet) -> Self {
        set.rules
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rules/rule_set.rs"]
mod tests;
