//! Pinhole camera calibration with OpenCV-ordered distortion coefficients.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Intrinsic calibration snapshot for one camera.
///
/// `distortion` follows the usual `k1 k2 p1 p2 k3 ...` ordering; an empty
/// vector means an undistorted camera. Width and height are the image
/// dimensions the calibration stream reported alongside the matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraCalibration {
    /// 3×3 intrinsic matrix `K`.
    pub intrinsics: Matrix3<f64>,
    /// Distortion coefficients; may be empty.
    pub distortion: Vec<f64>,
    /// Calibrated image width in pixels.
    pub width: u32,
    /// Calibrated image height in pixels.
    pub height: u32,
}

impl CameraCalibration {
    /// Build a calibration from a row-major `K` as carried by the
    /// calibration stream.
    pub fn from_row_major(k: [f64; 9], distortion: Vec<f64>, width: u32, height: u32) -> Self {
        Self {
            intrinsics: Matrix3::from_row_slice(&k),
            distortion,
            width,
            height,
        }
    }

    /// Focal length in x (pixels).
    #[inline]
    pub fn fx(&self) -> f64 {
        self.intrinsics[(0, 0)]
    }

    /// Focal length in y (pixels).
    #[inline]
    pub fn fy(&self) -> f64 {
        self.intrinsics[(1, 1)]
    }

    /// Principal point x (pixels).
    #[inline]
    pub fn cx(&self) -> f64 {
        self.intrinsics[(0, 2)]
    }

    /// Principal point y (pixels).
    #[inline]
    pub fn cy(&self) -> f64 {
        self.intrinsics[(1, 2)]
    }

    /// Distortion coefficient by index, zero when absent.
    #[inline]
    pub fn distortion_or_zero(&self, index: usize) -> f64 {
        self.distortion.get(index).copied().unwrap_or(0.0)
    }

    /// Returns `true` when every matrix entry is finite and the focal
    /// lengths are usable.
    pub fn is_valid(&self) -> bool {
        self.intrinsics.iter().all(|v| v.is_finite())
            && self.distortion.iter().all(|v| v.is_finite())
            && self.fx().abs() > 1e-12
            && self.fy().abs() > 1e-12
    }
}
