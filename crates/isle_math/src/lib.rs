//! # isle_math
//!
//! Math types for the isle runtime. Re-exports [`glam`] for linear algebra
//! and defines [`LocalToWorld`], the transform every actor carries.

pub mod transform;

// Re-export glam types for convenience.
pub use glam::{Mat3, Mat4, Quat, Vec3};

pub use transform::{LocalToWorld, ORTHONORMAL_EPSILON};
