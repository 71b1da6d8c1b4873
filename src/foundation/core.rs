pub use kurbo::{Point, Rect, Size, Vec2};

/// Stable host identity of a scene entity.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct EntityId(pub u64);

/// World-space 3D vector in double precision (Y is up).
pub type Vec3 = glam::DVec3;

/// World-space helpers on [`Vec3`].
pub trait WorldVec {
    /// Copy with `dy` added to the vertical component.
    fn raised(self, dy: f64) -> Self;
}

impl WorldVec for Vec3 {
    fn raised(self, dy: f64) -> Self {
        Self::new(self.x, self.y + dy, self.z)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a color from straight-alpha channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Copy with a replaced alpha channel.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Copy with alpha multiplied by `factor` (truncating, clamped to `[0, 255]`).
    pub fn scale_alpha(self, factor: f64) -> Self {
        self.with_alpha(alpha_from_f64(f64::from(self.a) * factor))
    }

    /// Return `true` when the color contributes nothing.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }
}

/// Truncating float-to-alpha conversion shared by the alpha effects.
pub(crate) fn alpha_from_f64(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
