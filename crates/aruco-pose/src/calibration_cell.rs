//! Last-write-wins calibration snapshot.

use aruco_pose_core::CameraCalibration;

/// Owned cell holding the most recent complete calibration.
///
/// The calibration callback writes, the image callback reads, and the
/// event loop serializes the two, so a plain owned value is enough.
/// Updates replace the snapshot wholesale; a frame that races an update
/// simply sees the previous complete calibration, which is an accepted
/// staleness, not an error.
#[derive(Debug, Default)]
pub struct CalibrationCell {
    current: Option<CameraCalibration>,
}

impl CalibrationCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot unconditionally.
    pub fn update(&mut self, calibration: CameraCalibration) {
        if self.current.is_none() {
            log::info!(
                "received camera calibration: {}x{}, fx={:.3} fy={:.3} cx={:.3} cy={:.3}, {} distortion coefficients",
                calibration.width,
                calibration.height,
                calibration.fx(),
                calibration.fy(),
                calibration.cx(),
                calibration.cy(),
                calibration.distortion.len()
            );
        }
        self.current = Some(calibration);
    }

    /// The most recent complete calibration, if any has arrived.
    #[inline]
    pub fn snapshot(&self) -> Option<&CameraCalibration> {
        self.current.as_ref()
    }

    /// True once at least one update has been applied.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.current.is_some()
    }
}
