use crate::foundation::core::Point;

/// Linear interpolation `(1 - t) * a + t * b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

/// Quadratic ease-in from `a` to `b`.
pub fn quadratic_lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t * t
}

/// Cubic blend `a * (1 - t)^3 + b * t^3`.
///
/// Unlike [`lerp`] this is not affine in between the endpoints; it collapses towards zero in the
/// middle, which is what gives the "cube" death animation its quick initial drop.
pub fn cubic_lerp(a: f64, b: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    a * mt * mt * mt + b * t * t * t
}

/// Perpendicular distance from `point` to the infinite line through `a` and `b`.
///
/// Falls back to the point-to-point distance when `a == b`.
pub fn point_to_line_distance(point: Point, a: Point, b: Point) -> f64 {
    if a == b {
        return point.distance(a);
    }
    let dir = (b - a).normalize();
    let perp = kurbo::Vec2::new(-dir.y, dir.x);
    (point - a).dot(perp).abs()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
