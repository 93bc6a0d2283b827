//! External detection and pose-estimation capability contracts.
//!
//! The 2D marker search and the pose-from-correspondences solver are
//! consumed as opaque capabilities. Implementations typically bind a
//! vision library; the test suites script them directly.

use nalgebra::{Point2, Vector3};
use serde::{Deserialize, Serialize};

use aruco_pose_core::{CameraCalibration, ImageFrame};
use aruco_pose_dict::DictionaryKind;

/// A marker candidate reported by the detector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerCandidate {
    /// Detector-assigned id, unique within one frame's result set.
    pub id: u32,
    /// Pixel corners in the detector's orientation convention; the first
    /// corner is the canonical top-left.
    pub corners: [Point2<f32>; 4],
}

/// Finds marker candidates in an image.
///
/// Must be deterministic for a fixed input and free of side effects.
pub trait MarkerDetector {
    fn detect(&self, image: &ImageFrame, dictionary: DictionaryKind) -> Vec<MarkerCandidate>;
}

/// One entry of a batched pose-estimation result: a camera-frame pose as an
/// axis-angle rotation plus a translation in marker-size units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseSample {
    pub rvec: Vector3<f64>,
    pub tvec: Vector3<f64>,
}

impl PoseSample {
    /// True when the solver produced a numerically unusable result.
    pub fn is_degenerate(&self) -> bool {
        !(self.rvec.iter().all(|v| v.is_finite()) && self.tvec.iter().all(|v| v.is_finite()))
    }
}

/// Estimates camera-relative marker poses for a whole frame at once.
///
/// The result is index-aligned with `candidates`. Entries may be `None` or
/// non-finite for ill-conditioned geometry; callers must not trust the
/// alignment blindly and should treat a short result as missing entries.
pub trait PoseEstimator {
    fn estimate(
        &self,
        candidates: &[MarkerCandidate],
        marker_size: f64,
        calibration: &CameraCalibration,
    ) -> Vec<Option<PoseSample>>;
}
