//! Rotation-representation conversions.
//!
//! Pose estimators report rotations as axis-angle (Rodrigues) vectors while
//! the transform graph works in unit quaternions. The conversion goes
//! through an explicit rotation-matrix intermediate, matching the solver
//! convention the estimates come from.

use nalgebra::{Rotation3, UnitQuaternion, Vector3};

/// Axis-angle (Rodrigues) vector to rotation matrix.
///
/// The vector's direction is the rotation axis and its norm the angle in
/// radians; the zero vector maps to the identity.
#[inline]
pub fn axis_angle_to_matrix(rvec: &Vector3<f64>) -> Rotation3<f64> {
    Rotation3::from_scaled_axis(*rvec)
}

/// Rotation matrix to unit quaternion.
#[inline]
pub fn matrix_to_quaternion(rotation: &Rotation3<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::from_rotation_matrix(rotation)
}

/// Axis-angle vector to unit quaternion, via the matrix form.
pub fn axis_angle_to_quaternion(rvec: &Vector3<f64>) -> UnitQuaternion<f64> {
    matrix_to_quaternion(&axis_angle_to_matrix(rvec))
}

/// Unit quaternion back to an axis-angle vector.
#[inline]
pub fn quaternion_to_axis_angle(rotation: &UnitQuaternion<f64>) -> Vector3<f64> {
    rotation.scaled_axis()
}
