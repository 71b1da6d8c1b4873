/// Quadratic and cubic curves over world points.
pub mod curve;
/// Apex collapse curves.
pub mod ease;
