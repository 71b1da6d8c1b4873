//! Entity classification and rule-driven line appearance.

/// Attribute flags, job masks and descriptors.
pub mod flags;
/// Descriptor matching.
pub mod matcher;
/// Prioritized color rules.
pub mod rule_set;
