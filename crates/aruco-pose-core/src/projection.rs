//! Distortion-aware pinhole projection.
//!
//! Used by the debug overlay to place marker-frame geometry back into the
//! image. Points behind the camera project to `None` rather than wrapping
//! around the principal plane.

use nalgebra::{Point2, Point3, Vector3};

use crate::rotation::axis_angle_to_matrix;
use crate::CameraCalibration;

const MIN_DEPTH: f64 = 1e-9;

/// Apply radial-tangential distortion to normalized pinhole coordinates.
///
/// Coefficients are read in `k1 k2 p1 p2 k3` order; missing entries count
/// as zero, so an empty vector degrades to the ideal pinhole model.
fn distort_normalized(calibration: &CameraCalibration, x: f64, y: f64) -> (f64, f64) {
    let k1 = calibration.distortion_or_zero(0);
    let k2 = calibration.distortion_or_zero(1);
    let p1 = calibration.distortion_or_zero(2);
    let p2 = calibration.distortion_or_zero(3);
    let k3 = calibration.distortion_or_zero(4);

    let r2 = x * x + y * y;
    let r4 = r2 * r2;
    let r6 = r4 * r2;
    let radial = 1.0 + k1 * r2 + k2 * r4 + k3 * r6;
    let x_tan = 2.0 * p1 * x * y + p2 * (r2 + 2.0 * x * x);
    let y_tan = p1 * (r2 + 2.0 * y * y) + 2.0 * p2 * x * y;
    (x * radial + x_tan, y * radial + y_tan)
}

/// Project a camera-frame point to pixel coordinates.
pub fn project_camera_point(
    calibration: &CameraCalibration,
    point: &Point3<f64>,
) -> Option<Point2<f64>> {
    if !calibration.is_valid() || point.z <= MIN_DEPTH {
        return None;
    }
    let (xd, yd) = distort_normalized(calibration, point.x / point.z, point.y / point.z);
    let u = calibration.fx() * xd + calibration.cx();
    let v = calibration.fy() * yd + calibration.cy();
    if u.is_finite() && v.is_finite() {
        Some(Point2::new(u, v))
    } else {
        None
    }
}

/// Project object-frame points through an axis-angle/translation pose into
/// pixel coordinates, one entry per input point.
pub fn project_object_points(
    calibration: &CameraCalibration,
    rvec: &Vector3<f64>,
    tvec: &Vector3<f64>,
    points: &[Point3<f64>],
) -> Vec<Option<Point2<f64>>> {
    let rotation = axis_angle_to_matrix(rvec);
    points
        .iter()
        .map(|p| project_camera_point(calibration, &Point3::from(rotation * p.coords + tvec)))
        .collect()
}
