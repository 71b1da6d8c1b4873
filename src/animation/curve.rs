//! Bézier evaluation over world-space points.
//!
//! Both evaluators return the control endpoints bit-for-bit at `t == 0` and `t == 1`, so curve
//! samples always land exactly on the line's source and destination.

use crate::foundation::core::Vec3;

/// Evaluate a cubic Bézier at `t` (clamped to `[0, 1]`).
pub fn evaluate_cubic(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f64) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 {
        return p0;
    }
    if t == 1.0 {
        return p3;
    }

    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;

    mt3 * p0 + (3.0 * mt2 * t) * p1 + (3.0 * mt * t2) * p2 + t3 * p3
}

/// Evaluate a quadratic Bézier at `t` (clamped to `[0, 1]`).
pub fn evaluate_quadratic(p0: Vec3, p1: Vec3, p2: Vec3, t: f64) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 {
        return p0;
    }
    if t == 1.0 {
        return p2;
    }

    let mt = 1.0 - t;
    (mt * mt) * p0 + (2.0 * mt * t) * p1 + (t * t) * p2
}

/// Shape of a target line's curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveKind {
    /// Quadratic through the apex control point.
    Quadratic,
    /// Cubic with both inner control points on the apex.
    Cubic,
}

impl CurveKind {
    /// Pick the curve kind from a rule's quadratic toggle.
    pub fn from_use_quad(use_quad: bool) -> Self {
        if use_quad {
            Self::Quadratic
        } else {
            Self::Cubic
        }
    }

    /// Sample the line curve from `start` over `apex` to `end`.
    pub fn sample(self, start: Vec3, apex: Vec3, end: Vec3, t: f64) -> Vec3 {
        match self {
            Self::Quadratic => evaluate_quadratic(start, apex, end, t),
            Self::Cubic => evaluate_cubic(start, apex, apex, end, t),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
