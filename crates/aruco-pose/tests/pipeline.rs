use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use nalgebra::{Point2, Point3, UnitQuaternion, Vector3};

use aruco_pose::core::{
    CameraCalibration, ImageFrame, ManualClock, RigidTransform, Stamp, StampedTransform, TimeQuery,
};
use aruco_pose::{
    DetectionPipeline, DictionaryKind, FrameOutcome, ImagePublisher, LookupError, MarkerCandidate,
    MarkerDetector, MarkerRecordSet, PipelineParams, PoseEstimator, PoseSample, RecordPublisher,
    TransformDirectory, ROOT_FRAME,
};

const CAMERA_FRAME: &str = "camera_rgb_optical_frame";

struct ScriptedDetector {
    candidates: Vec<MarkerCandidate>,
}

impl MarkerDetector for ScriptedDetector {
    fn detect(&self, _image: &ImageFrame, _dictionary: DictionaryKind) -> Vec<MarkerCandidate> {
        self.candidates.clone()
    }
}

struct ScriptedEstimator {
    poses: Vec<Option<PoseSample>>,
}

impl PoseEstimator for ScriptedEstimator {
    fn estimate(
        &self,
        _candidates: &[MarkerCandidate],
        _marker_size: f64,
        _calibration: &CameraCalibration,
    ) -> Vec<Option<PoseSample>> {
        self.poses.clone()
    }
}

#[derive(Clone, Default)]
struct SharedDirectory {
    broadcasts: Rc<RefCell<Vec<StampedTransform>>>,
    root_to_camera: Option<RigidTransform>,
}

impl TransformDirectory for SharedDirectory {
    fn broadcast(&mut self, transform: StampedTransform) {
        self.broadcasts.borrow_mut().push(transform);
    }

    fn lookup(
        &self,
        parent_frame: &str,
        child_frame: &str,
        _time: TimeQuery,
    ) -> Result<RigidTransform, LookupError> {
        match &self.root_to_camera {
            Some(t) if t.parent_frame == parent_frame && t.child_frame == child_frame => {
                Ok(t.clone())
            }
            _ => Err(LookupError::NoPath {
                parent: parent_frame.to_owned(),
                child: child_frame.to_owned(),
            }),
        }
    }
}

#[derive(Clone, Default)]
struct SharedRecords {
    sets: Rc<RefCell<Vec<MarkerRecordSet>>>,
}

impl RecordPublisher for SharedRecords {
    fn publish(&mut self, records: &MarkerRecordSet) {
        self.sets.borrow_mut().push(records.clone());
    }
}

#[derive(Clone, Default)]
struct SharedImages {
    frames: Rc<RefCell<Vec<ImageFrame>>>,
}

impl ImagePublisher for SharedImages {
    fn publish(&mut self, image: &ImageFrame) {
        self.frames.borrow_mut().push(image.clone());
    }
}

type TestPipeline = DetectionPipeline<
    ScriptedDetector,
    ScriptedEstimator,
    SharedDirectory,
    Rc<ManualClock>,
    SharedRecords,
    SharedImages,
>;

struct Harness {
    pipeline: TestPipeline,
    broadcasts: Rc<RefCell<Vec<StampedTransform>>>,
    sets: Rc<RefCell<Vec<MarkerRecordSet>>>,
    frames: Rc<RefCell<Vec<ImageFrame>>>,
    clock: Rc<ManualClock>,
}

fn harness(
    candidates: Vec<MarkerCandidate>,
    poses: Vec<Option<PoseSample>>,
    root_to_camera: Option<RigidTransform>,
) -> Harness {
    let config = PipelineParams::default().validate().expect("valid params");
    let directory = SharedDirectory {
        root_to_camera,
        ..SharedDirectory::default()
    };
    let records = SharedRecords::default();
    let images = SharedImages::default();
    let clock = Rc::new(ManualClock::new(Stamp::from_nanos(5_000)));

    let broadcasts = Rc::clone(&directory.broadcasts);
    let sets = Rc::clone(&records.sets);
    let frames = Rc::clone(&images.frames);

    let pipeline = DetectionPipeline::new(
        config,
        ScriptedDetector { candidates },
        ScriptedEstimator { poses },
        directory,
        Rc::clone(&clock),
        records,
        images,
    );

    Harness {
        pipeline,
        broadcasts,
        sets,
        frames,
        clock,
    }
}

fn calibration() -> CameraCalibration {
    CameraCalibration::from_row_major(
        [50.0, 0.0, 32.0, 0.0, 50.0, 24.0, 0.0, 0.0, 1.0],
        vec![],
        64,
        48,
    )
}

fn frame(stamp: Stamp) -> ImageFrame {
    ImageFrame::filled(64, 48, [10, 10, 10], CAMERA_FRAME, stamp).expect("frame geometry")
}

fn candidate(id: u32, x: f32, y: f32) -> MarkerCandidate {
    MarkerCandidate {
        id,
        corners: [
            Point2::new(x, y),
            Point2::new(x + 4.0, y),
            Point2::new(x + 4.0, y + 4.0),
            Point2::new(x, y + 4.0),
        ],
    }
}

fn pose(tvec: Vector3<f64>) -> Option<PoseSample> {
    Some(PoseSample {
        rvec: Vector3::zeros(),
        tvec,
    })
}

/// map→camera: a quarter turn about +z plus an offset.
fn map_to_camera() -> RigidTransform {
    RigidTransform {
        parent_frame: ROOT_FRAME.to_owned(),
        child_frame: CAMERA_FRAME.to_owned(),
        translation: Vector3::new(1.0, 2.0, 3.0),
        rotation: UnitQuaternion::from_axis_angle(
            &Vector3::z_axis(),
            std::f64::consts::FRAC_PI_2,
        ),
    }
}

#[test]
fn frames_before_calibration_produce_no_output() {
    let mut h = harness(
        vec![candidate(7, 10.0, 10.0)],
        vec![pose(Vector3::new(0.0, 0.0, 1.0))],
        Some(map_to_camera()),
    );

    for i in 0..10 {
        let outcome = h.pipeline.on_image(frame(Stamp::from_nanos(i)));
        assert_eq!(outcome, FrameOutcome::AwaitingCalibration);
    }

    assert!(h.sets.borrow().is_empty());
    assert!(h.frames.borrow().is_empty());
    assert!(h.broadcasts.borrow().is_empty());
}

#[test]
fn empty_detection_publishes_an_empty_set() {
    let mut h = harness(Vec::new(), Vec::new(), Some(map_to_camera()));
    h.pipeline.on_calibration(calibration());

    let stamp = Stamp::from_nanos(42);
    let input = frame(stamp);
    let outcome = h.pipeline.on_image(input.clone());
    assert_eq!(
        outcome,
        FrameOutcome::Processed {
            detected: 0,
            published: 0,
            skipped: 0
        }
    );

    let sets = h.sets.borrow();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].stamp, stamp);
    assert_eq!(sets[0].frame_id, ROOT_FRAME);
    assert!(sets[0].markers.is_empty());

    // The image goes back out untouched.
    let frames = h.frames.borrow();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0], input);

    assert!(h.broadcasts.borrow().is_empty());
}

#[test]
fn two_markers_publish_records_and_broadcasts() {
    let mut h = harness(
        vec![candidate(7, 10.0, 10.0), candidate(12, 30.0, 20.0)],
        vec![
            pose(Vector3::new(0.0, 0.0, 1.0)),
            pose(Vector3::new(0.5, 0.0, 2.0)),
        ],
        Some(map_to_camera()),
    );
    h.pipeline.on_calibration(calibration());

    let capture = Stamp::from_nanos(1_000);
    h.clock.set(Stamp::from_nanos(9_999));
    let outcome = h.pipeline.on_image(frame(capture));
    assert_eq!(
        outcome,
        FrameOutcome::Processed {
            detected: 2,
            published: 2,
            skipped: 0
        }
    );

    let sets = h.sets.borrow();
    assert_eq!(sets.len(), 1);
    let set = &sets[0];
    assert_eq!(set.frame_id, ROOT_FRAME);
    assert_eq!(set.stamp, capture);
    assert_eq!(
        set.markers.iter().map(|m| m.id).collect::<Vec<_>>(),
        vec![7, 12]
    );

    // Records keep the capture stamp and the first corner's pixel.
    for record in &set.markers {
        assert_eq!(record.stamp, capture);
    }
    assert_eq!(set.markers[0].pixel, Point2::new(10.0_f32, 10.0));
    assert_eq!(set.markers[1].pixel, Point2::new(30.0_f32, 20.0));

    // World poses: rotate the camera-frame translation a quarter turn
    // about +z, then offset by the map→camera translation.
    assert_relative_eq!(
        set.markers[0].pose.position,
        Point3::new(1.0, 2.0, 4.0),
        epsilon = 1e-9
    );
    assert_relative_eq!(
        set.markers[1].pose.position,
        Point3::new(1.0, 2.5, 5.0),
        epsilon = 1e-9
    );
    // Identity marker rotation: world orientation equals the map→camera
    // rotation.
    assert!(set.markers[0]
        .pose
        .orientation
        .angle_to(&map_to_camera().rotation)
        < 1e-9);

    // Broadcasts: one per marker, camera→marker, stamped with the
    // processing-time clock rather than the capture stamp.
    let broadcasts = h.broadcasts.borrow();
    assert_eq!(broadcasts.len(), 2);
    assert_eq!(broadcasts[0].transform.parent_frame, CAMERA_FRAME);
    assert_eq!(broadcasts[0].transform.child_frame, "aruco_marker_7");
    assert_eq!(broadcasts[1].transform.child_frame, "aruco_marker_12");
    for broadcast in broadcasts.iter() {
        assert_eq!(broadcast.stamp, Stamp::from_nanos(9_999));
        assert_ne!(broadcast.stamp, capture);
    }
    assert_relative_eq!(
        broadcasts[0].transform.translation,
        Vector3::new(0.0, 0.0, 1.0),
        epsilon = 1e-12
    );

    // The axis overlay touched the republished image.
    let frames = h.frames.borrow();
    assert_eq!(frames.len(), 1);
    assert_ne!(frames[0], frame(capture));
}

#[test]
fn failed_lookup_drops_records_but_broadcasts_first() {
    let mut h = harness(
        vec![candidate(7, 10.0, 10.0), candidate(12, 30.0, 20.0)],
        vec![
            pose(Vector3::new(0.0, 0.0, 1.0)),
            pose(Vector3::new(0.5, 0.0, 2.0)),
        ],
        None,
    );
    h.pipeline.on_calibration(calibration());

    let outcome = h.pipeline.on_image(frame(Stamp::from_nanos(64)));
    assert_eq!(
        outcome,
        FrameOutcome::Processed {
            detected: 2,
            published: 0,
            skipped: 2
        }
    );

    // No records, but the camera→marker broadcasts happen before the
    // failing lookup, and the image still goes out.
    let sets = h.sets.borrow();
    assert_eq!(sets.len(), 1);
    assert!(sets[0].markers.is_empty());
    assert_eq!(h.broadcasts.borrow().len(), 2);
    assert_eq!(h.frames.borrow().len(), 1);
}

#[test]
fn degenerate_pose_skips_only_that_marker() {
    let mut h = harness(
        vec![
            candidate(3, 5.0, 5.0),
            candidate(4, 20.0, 5.0),
            candidate(5, 40.0, 5.0),
        ],
        vec![
            pose(Vector3::new(0.0, 0.0, 1.0)),
            Some(PoseSample {
                rvec: Vector3::new(f64::NAN, 0.0, 0.0),
                tvec: Vector3::new(0.0, 0.0, 1.0),
            }),
            pose(Vector3::new(0.2, 0.1, 1.5)),
        ],
        Some(map_to_camera()),
    );
    h.pipeline.on_calibration(calibration());

    let outcome = h.pipeline.on_image(frame(Stamp::from_nanos(7)));
    assert_eq!(
        outcome,
        FrameOutcome::Processed {
            detected: 3,
            published: 2,
            skipped: 1
        }
    );

    let sets = h.sets.borrow();
    assert_eq!(
        sets[0].markers.iter().map(|m| m.id).collect::<Vec<_>>(),
        vec![3, 5]
    );

    // The degenerate marker never reaches the broadcast step.
    let broadcasts = h.broadcasts.borrow();
    assert_eq!(
        broadcasts
            .iter()
            .map(|b| b.transform.child_frame.as_str())
            .collect::<Vec<_>>(),
        vec!["aruco_marker_3", "aruco_marker_5"]
    );
}

#[test]
fn short_estimator_output_counts_as_missing_poses() {
    let mut h = harness(
        vec![candidate(1, 5.0, 5.0), candidate(2, 20.0, 5.0)],
        vec![pose(Vector3::new(0.0, 0.0, 1.0))],
        Some(map_to_camera()),
    );
    h.pipeline.on_calibration(calibration());

    let outcome = h.pipeline.on_image(frame(Stamp::from_nanos(11)));
    assert_eq!(
        outcome,
        FrameOutcome::Processed {
            detected: 2,
            published: 1,
            skipped: 1
        }
    );
    assert_eq!(h.sets.borrow()[0].markers[0].id, 1);
    assert_eq!(h.broadcasts.borrow().len(), 1);
}

#[test]
fn malformed_buffers_drop_the_frame() {
    let mut h = harness(Vec::new(), Vec::new(), Some(map_to_camera()));

    // Before calibration the readiness check wins.
    let outcome = h
        .pipeline
        .on_image_raw(4, 4, vec![0u8; 5], CAMERA_FRAME, Stamp::from_nanos(1));
    assert_eq!(outcome, FrameOutcome::AwaitingCalibration);

    h.pipeline.on_calibration(calibration());
    let outcome = h
        .pipeline
        .on_image_raw(4, 4, vec![0u8; 5], CAMERA_FRAME, Stamp::from_nanos(2));
    assert!(matches!(outcome, FrameOutcome::BadImage(_)));

    assert!(h.sets.borrow().is_empty());
    assert!(h.frames.borrow().is_empty());
    assert!(h.broadcasts.borrow().is_empty());

    // A well-formed buffer on the same pipeline still processes.
    let outcome = h.pipeline.on_image_raw(
        4,
        4,
        vec![0u8; 48],
        CAMERA_FRAME,
        Stamp::from_nanos(3),
    );
    assert_eq!(
        outcome,
        FrameOutcome::Processed {
            detected: 0,
            published: 0,
            skipped: 0
        }
    );
    assert_eq!(h.sets.borrow().len(), 1);
}
