//! Axis overlay for the debug image.
//!
//! Draws the estimated marker frame into the image: origin to +x in red,
//! +y in green, +z in blue. Purely cosmetic; a failed projection leaves
//! the image untouched and never affects record processing.

use nalgebra::{Point2, Point3};

use aruco_pose_core::{project_object_points, CameraCalibration, ImageFrame};

use crate::detect::PoseSample;

const X_COLOR: [u8; 3] = [255, 0, 0];
const Y_COLOR: [u8; 3] = [0, 255, 0];
const Z_COLOR: [u8; 3] = [0, 0, 255];

/// Draw the marker's 3D axes at the estimated pose.
///
/// `length` is the drawn axis length in marker-size units. Returns `false`
/// when any endpoint failed to project (for example behind the camera).
pub fn draw_axis(
    image: &mut ImageFrame,
    calibration: &CameraCalibration,
    pose: &PoseSample,
    length: f64,
) -> bool {
    let object_points = [
        Point3::origin(),
        Point3::new(length, 0.0, 0.0),
        Point3::new(0.0, length, 0.0),
        Point3::new(0.0, 0.0, length),
    ];
    let projected = project_object_points(calibration, &pose.rvec, &pose.tvec, &object_points);

    let [origin, x_tip, y_tip, z_tip] = match projected.as_slice() {
        [Some(o), Some(x), Some(y), Some(z)] => [*o, *x, *y, *z],
        _ => return false,
    };

    draw_segment(image, origin, x_tip, X_COLOR);
    draw_segment(image, origin, y_tip, Y_COLOR);
    draw_segment(image, origin, z_tip, Z_COLOR);
    true
}

/// Rasterize a segment with simple DDA stepping; out-of-image pixels are
/// dropped by the frame's clipping writes.
fn draw_segment(image: &mut ImageFrame, from: Point2<f64>, to: Point2<f64>, rgb: [u8; 3]) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let steps = dx.abs().max(dy.abs()).ceil() as usize;
    if steps == 0 {
        image.put_pixel(from.x.round() as i64, from.y.round() as i64, rgb);
        return;
    }
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = from.x + dx * t;
        let y = from.y + dy * t;
        image.put_pixel(x.round() as i64, y.round() as i64, rgb);
    }
}
