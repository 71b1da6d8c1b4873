use crate::foundation::math::{cubic_lerp, lerp, quadratic_lerp};

/// Curve used to collapse the arc apex while a line is dying.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathAnimation {
    /// Apex height falls linearly.
    #[default]
    Linear,
    /// Apex height eases out quadratically.
    Square,
    /// Apex height drops on a cubic blend.
    Cube,
}

impl DeathAnimation {
    /// Blend `from` towards `to` at progress `t`, clamped to `[0, 1]`.
    pub fn apply(self, from: f64, to: f64, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => lerp(from, to, t),
            Self::Square => quadratic_lerp(from, to, t),
            Self::Cube => cubic_lerp(from, to, t),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
