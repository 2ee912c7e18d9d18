//! Math type re-exports.
//!
//! Vector-valued parameters use `glam` types directly.

pub use glam::{
    // Single precision vectors
    Vec2, Vec3, Vec4,
    // Double precision vectors
    DVec2, DVec3, DVec4,
    // Integer vectors
    IVec2, IVec3, IVec4,
};

/// Time value in the host's time-code units.
pub type TimeCode = f64;

/// Tolerance used when comparing sample times.
pub const TIME_EPSILON: TimeCode = 1e-6;

/// Compare two time codes within [`TIME_EPSILON`].
#[inline]
pub fn time_eq(a: TimeCode, b: TimeCode) -> bool {
    (a - b).abs() <= TIME_EPSILON
}
