/// Entity ids, vectors and colors.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Scalar interpolation and distance helpers.
pub mod math;
