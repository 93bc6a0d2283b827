//! End-to-end pipeline wiring with stub capabilities.
//!
//! A scripted detector reports one marker straight ahead of the camera, the
//! directory answers every lookup with the identity, and the record sink
//! logs what would be published. Run with:
//!
//! ```sh
//! cargo run -p aruco-pose --example synthetic_frame
//! ```

use log::{info, LevelFilter};
use nalgebra::{Point2, Vector3};

use aruco_pose::core::{
    init_with_level, CameraCalibration, ImageFrame, RigidTransform, Stamp, StampedTransform,
    SystemClock, TimeQuery,
};
use aruco_pose::{
    DetectionPipeline, DictionaryKind, ImagePublisher, LookupError, MarkerCandidate,
    MarkerDetector, MarkerRecordSet, PipelineParams, PoseEstimator, PoseSample, RecordPublisher,
    TransformDirectory,
};

struct OneMarkerDetector;

impl MarkerDetector for OneMarkerDetector {
    fn detect(&self, _image: &ImageFrame, _dictionary: DictionaryKind) -> Vec<MarkerCandidate> {
        vec![MarkerCandidate {
            id: 7,
            corners: [
                Point2::new(300.0, 220.0),
                Point2::new(340.0, 220.0),
                Point2::new(340.0, 260.0),
                Point2::new(300.0, 260.0),
            ],
        }]
    }
}

struct StraightOnEstimator;

impl PoseEstimator for StraightOnEstimator {
    fn estimate(
        &self,
        candidates: &[MarkerCandidate],
        _marker_size: f64,
        _calibration: &CameraCalibration,
    ) -> Vec<Option<PoseSample>> {
        candidates
            .iter()
            .map(|_| {
                Some(PoseSample {
                    rvec: Vector3::zeros(),
                    tvec: Vector3::new(0.0, 0.0, 1.0),
                })
            })
            .collect()
    }
}

struct IdentityDirectory;

impl TransformDirectory for IdentityDirectory {
    fn broadcast(&mut self, transform: StampedTransform) {
        info!(
            "broadcast {} -> {} at {:.3}s",
            transform.transform.parent_frame,
            transform.transform.child_frame,
            transform.stamp.as_secs_f64()
        );
    }

    fn lookup(
        &self,
        parent_frame: &str,
        child_frame: &str,
        _time: TimeQuery,
    ) -> Result<RigidTransform, LookupError> {
        Ok(RigidTransform::identity(parent_frame, child_frame))
    }
}

struct LogRecords;

impl RecordPublisher for LogRecords {
    fn publish(&mut self, records: &MarkerRecordSet) {
        info!(
            "record set in `{}` with {} markers",
            records.frame_id,
            records.markers.len()
        );
        for marker in &records.markers {
            info!(
                "  marker {} at ({:.3}, {:.3}, {:.3})",
                marker.id, marker.pose.position.x, marker.pose.position.y, marker.pose.position.z
            );
        }
    }
}

struct DropImages;

impl ImagePublisher for DropImages {
    fn publish(&mut self, _image: &ImageFrame) {}
}

fn main() {
    init_with_level(LevelFilter::Info).expect("logger install");

    let config = PipelineParams::default().validate().expect("valid params");
    let mut pipeline = DetectionPipeline::new(
        config,
        OneMarkerDetector,
        StraightOnEstimator,
        IdentityDirectory,
        SystemClock,
        LogRecords,
        DropImages,
    );

    pipeline.on_calibration(CameraCalibration::from_row_major(
        [600.0, 0.0, 320.0, 0.0, 600.0, 240.0, 0.0, 0.0, 1.0],
        vec![],
        640,
        480,
    ));

    let frame = ImageFrame::filled(
        640,
        480,
        [16, 16, 16],
        "camera_rgb_optical_frame",
        Stamp::from_secs_f64(1.0),
    )
    .expect("frame geometry");

    let outcome = pipeline.on_image(frame);
    info!("frame outcome: {outcome:?}");
}
