// Re-export glam for convenience
pub use glam::*;

// Cornell math types
mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{max_component, reflect, safe_normalize, NORMALIZE_EPSILON};

/// Color type alias (linear RGB, not clamped to 0-1)
pub type Color = Vec3;
