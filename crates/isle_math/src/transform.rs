//! Local-to-world transform.
//!
//! [`LocalToWorld`] holds a world-space position and an orientation basis
//! (right, up, direction). Every constructor and update path goes through
//! Gram-Schmidt orthonormalisation, so a committed transform never carries
//! scale or shear.

use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Tolerance used by [`LocalToWorld::is_orthonormal`].
pub const ORTHONORMAL_EPSILON: f32 = 1.0e-4;

/// Position plus orthonormal orientation of an actor in world space.
///
/// The orientation columns are `right` (x), `up` (y) and `direction` (z).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LocalToWorld {
    /// World-space position.
    position: Vec3,
    /// Orientation basis, columns are right, up, direction.
    orientation: Mat3,
}

impl LocalToWorld {
    /// Origin, facing +Z with +Y up.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Mat3::IDENTITY,
    };

    /// Identity orientation at the given position.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Build a transform looking along `direction` with `up` as the up hint.
    ///
    /// Returns `None` if `direction` is zero or parallel to `up`.
    #[must_use]
    pub fn from_position_direction_up(position: Vec3, direction: Vec3, up: Vec3) -> Option<Self> {
        let orientation = basis(direction, up)?;
        Some(Self {
            position,
            orientation,
        })
    }

    /// Build a transform from a position and a rotation quaternion.
    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            orientation: Mat3::from_quat(rotation.normalize()),
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.orientation.x_axis
    }

    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.orientation.y_axis
    }

    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.orientation.z_axis
    }

    /// Orientation as a unit quaternion.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_mat3(&self.orientation).normalize()
    }

    /// Compute the 4×4 model matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_cols(
            self.orientation.x_axis.extend(0.0),
            self.orientation.y_axis.extend(0.0),
            self.orientation.z_axis.extend(0.0),
            self.position.extend(1.0),
        )
    }

    /// Translate the transform by the given offset.
    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.position += offset;
        self
    }

    /// Rotate the orientation by the given quaternion.
    #[must_use]
    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.orientation = Mat3::from_quat(rotation.normalize()) * self.orientation;
        self.orthonormalized()
    }

    /// Re-derive an orthonormal basis, keeping the direction axis.
    ///
    /// A degenerate basis collapses to the identity orientation.
    #[must_use]
    pub fn orthonormalized(mut self) -> Self {
        self.orientation = basis(self.orientation.z_axis, self.orientation.y_axis)
            .or_else(|| basis(self.orientation.z_axis, Vec3::Y))
            .or_else(|| basis(self.orientation.z_axis, Vec3::X))
            .unwrap_or(Mat3::IDENTITY);
        self
    }

    /// Returns `true` if the orientation axes are unit length and mutually
    /// perpendicular.
    #[must_use]
    pub fn is_orthonormal(&self) -> bool {
        let Mat3 {
            x_axis,
            y_axis,
            z_axis,
        } = self.orientation;
        let unit = |v: Vec3| (v.length_squared() - 1.0).abs() < ORTHONORMAL_EPSILON;
        let perpendicular = |a: Vec3, b: Vec3| a.dot(b).abs() < ORTHONORMAL_EPSILON;
        unit(x_axis)
            && unit(y_axis)
            && unit(z_axis)
            && perpendicular(x_axis, y_axis)
            && perpendicular(y_axis, z_axis)
            && perpendicular(z_axis, x_axis)
    }

    /// Blend towards `other`: position is lerped, orientation slerped.
    #[must_use]
    pub fn interpolate(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let rotation = self.rotation().slerp(other.rotation(), t);
        Self::from_position_rotation(self.position.lerp(other.position, t), rotation)
    }
}

impl Default for LocalToWorld {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn basis(direction: Vec3, up: Vec3) -> Option<Mat3> {
    let z = direction.try_normalize()?;
    let x = up.cross(z).try_normalize()?;
    let y = z.cross(x);
    Some(Mat3::from_cols(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        let t = LocalToWorld::IDENTITY;
        assert_eq!(t.position(), Vec3::ZERO);
        assert_eq!(t.direction(), Vec3::Z);
        assert_eq!(t.up(), Vec3::Y);
        assert_eq!(t.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_direction_up_is_orthonormal() {
        let t = LocalToWorld::from_position_direction_up(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(3.0, 0.5, -1.0),
            Vec3::new(0.2, 1.0, 0.0),
        )
        .unwrap();
        assert!(t.is_orthonormal());
        assert!((t.direction() - Vec3::new(3.0, 0.5, -1.0).normalize()).length() < 1e-5);
    }

    #[test]
    fn test_degenerate_basis_rejected() {
        assert!(LocalToWorld::from_position_direction_up(Vec3::ZERO, Vec3::Y, Vec3::Y).is_none());
        assert!(LocalToWorld::from_position_direction_up(Vec3::ZERO, Vec3::ZERO, Vec3::Y).is_none());
    }

    #[test]
    fn test_sheared_basis_is_repaired() {
        let mut t = LocalToWorld::IDENTITY;
        t.orientation = Mat3::from_cols(
            Vec3::new(2.0, 0.3, 0.0),
            Vec3::new(0.4, 1.5, 0.1),
            Vec3::new(0.0, 0.2, 3.0),
        );
        assert!(!t.is_orthonormal());
        let fixed = t.orthonormalized();
        assert!(fixed.is_orthonormal());
    }

    #[test]
    fn test_interpolate_endpoints() {
        let a = LocalToWorld::from_position(Vec3::ZERO);
        let b = LocalToWorld::from_position_rotation(
            Vec3::new(0.0, 10.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        let mid = a.interpolate(&b, 0.5);
        assert!((mid.position() - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-5);
        assert!(mid.is_orthonormal());
        let end = a.interpolate(&b, 2.0);
        assert!((end.position() - b.position()).length() < 1e-5);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let t = LocalToWorld::from_position(Vec3::new(1.0, 2.0, 3.0));
        let bytes = rmp_serde::to_vec(&t).unwrap();
        let restored: LocalToWorld = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(t, restored);
    }
}
