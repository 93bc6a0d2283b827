//! Rigid transforms between named coordinate frames.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::Stamp;

/// A rigid-body transform mapping coordinates from `child_frame` into
/// `parent_frame`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    pub parent_frame: String,
    pub child_frame: String,
    pub translation: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
}

impl RigidTransform {
    /// Identity transform between two frames.
    pub fn identity(parent_frame: impl Into<String>, child_frame: impl Into<String>) -> Self {
        Self {
            parent_frame: parent_frame.into(),
            child_frame: child_frame.into(),
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Wrap an isometry with frame names.
    pub fn from_isometry(
        parent_frame: impl Into<String>,
        child_frame: impl Into<String>,
        isometry: &Isometry3<f64>,
    ) -> Self {
        Self {
            parent_frame: parent_frame.into(),
            child_frame: child_frame.into(),
            translation: isometry.translation.vector,
            rotation: isometry.rotation,
        }
    }

    /// The transform as a plain isometry, frames dropped.
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.translation), self.rotation)
    }

    /// Compose `self` (parent→mid) with `next` (mid→leaf) into parent→leaf.
    ///
    /// Rotations compose by quaternion product and translations as
    /// `R_self · t_next + t_self`. The caller is responsible for chaining
    /// matching frames; this is checked in debug builds only.
    pub fn compose(&self, next: &RigidTransform) -> RigidTransform {
        debug_assert_eq!(
            self.child_frame, next.parent_frame,
            "composed transforms must chain through a shared frame"
        );
        RigidTransform {
            parent_frame: self.parent_frame.clone(),
            child_frame: next.child_frame.clone(),
            translation: self.rotation * next.translation + self.translation,
            rotation: self.rotation * next.rotation,
        }
    }

    /// Map a point from the child frame into the parent frame.
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * point.coords + self.translation)
    }
}

/// A transform paired with the time it was observed or composed at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StampedTransform {
    pub transform: RigidTransform,
    pub stamp: Stamp,
}
