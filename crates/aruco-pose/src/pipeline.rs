//! Per-frame detection pipeline.
//!
//! One pipeline value owns the calibration snapshot, the external
//! capability handles and the publisher sinks. The embedding event loop
//! drives it through two callbacks, [`DetectionPipeline::on_calibration`]
//! and [`DetectionPipeline::on_image`], and guarantees they never run
//! concurrently; both take `&mut self`, so the borrow checker holds the
//! embedder to that contract.

#[cfg(feature = "tracing")]
use tracing::instrument;

use aruco_pose_core::{
    axis_angle_to_quaternion, CameraCalibration, Clock, ImageError, ImageFrame, RigidTransform,
    Stamp, StampedTransform, TimeQuery,
};

use crate::calibration_cell::CalibrationCell;
use crate::config::{marker_frame, PipelineConfig, ROOT_FRAME};
use crate::detect::{MarkerDetector, PoseEstimator, PoseSample};
use crate::directory::TransformDirectory;
use crate::output::{ImagePublisher, MarkerRecord, MarkerRecordSet, Pose, RecordPublisher};
use crate::overlay;

/// What became of one incoming frame.
///
/// Failures surface here as values rather than being thrown across the
/// callback boundary; the embedder needs nothing beyond logs, but tests
/// and supervisors can branch on the outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Calibration has not arrived yet; the frame was dropped silently.
    AwaitingCalibration,
    /// The frame buffer did not match its declared geometry; dropped.
    BadImage(ImageError),
    /// The frame went through the full pipeline.
    Processed {
        /// Candidates the detector reported.
        detected: usize,
        /// Records that made it into the published set.
        published: usize,
        /// Candidates dropped by degenerate poses or failed lookups.
        skipped: usize,
    },
}

/// The per-frame orchestrator.
///
/// Generic over the marker detector `D`, pose estimator `E`, transform
/// directory `T`, clock `C` and the two publisher sinks; every frame is
/// processed independently with no state carried over beyond the
/// calibration snapshot.
pub struct DetectionPipeline<D, E, T, C, R, I> {
    config: PipelineConfig,
    detector: D,
    estimator: E,
    directory: T,
    clock: C,
    records_out: R,
    image_out: I,
    calibration: CalibrationCell,
    waiting_logged: bool,
}

impl<D, E, T, C, R, I> DetectionPipeline<D, E, T, C, R, I>
where
    D: MarkerDetector,
    E: PoseEstimator,
    T: TransformDirectory,
    C: Clock,
    R: RecordPublisher,
    I: ImagePublisher,
{
    /// Assemble a pipeline from a validated configuration and its
    /// collaborators.
    pub fn new(
        config: PipelineConfig,
        detector: D,
        estimator: E,
        directory: T,
        clock: C,
        records_out: R,
        image_out: I,
    ) -> Self {
        Self {
            config,
            detector,
            estimator,
            directory,
            clock,
            records_out,
            image_out,
            calibration: CalibrationCell::new(),
            waiting_logged: false,
        }
    }

    /// The validated configuration the pipeline runs with.
    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read access to the calibration state, mainly for supervision.
    #[inline]
    pub fn calibration(&self) -> &CalibrationCell {
        &self.calibration
    }

    /// Calibration-stream callback: adopt a new snapshot.
    pub fn on_calibration(&mut self, calibration: CameraCalibration) {
        self.calibration.update(calibration);
        self.waiting_logged = false;
    }

    /// Image-stream callback for raw buffers.
    ///
    /// Adopting the buffer is the in-memory analog of wire decoding; a
    /// malformed buffer drops the frame with a warning, like any other
    /// per-frame failure.
    pub fn on_image_raw(
        &mut self,
        width: usize,
        height: usize,
        data: Vec<u8>,
        frame_id: &str,
        stamp: Stamp,
    ) -> FrameOutcome {
        if !self.calibration.is_ready() {
            return self.note_waiting();
        }
        match ImageFrame::new(width, height, data, frame_id, stamp) {
            Ok(frame) => self.on_image(frame),
            Err(err) => {
                log::warn!("dropping malformed image frame: {err}");
                FrameOutcome::BadImage(err)
            }
        }
    }

    /// Image-stream callback: run the full per-frame pipeline.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame), fields(stamp = frame.stamp().as_nanos()))
    )]
    pub fn on_image(&mut self, mut frame: ImageFrame) -> FrameOutcome {
        // Working from the last-known calibration is an accepted
        // approximation; updates interleave between frames, never within
        // one.
        let Some(calibration) = self.calibration.snapshot().cloned() else {
            return self.note_waiting();
        };
        self.waiting_logged = false;

        let candidates = self.detector.detect(&frame, self.config.dictionary);
        if candidates.is_empty() {
            // Absence of markers is a normal outcome: empty set, image
            // republished untouched.
            self.image_out.publish(&frame);
            self.records_out.publish(&MarkerRecordSet::empty(frame.stamp()));
            return FrameOutcome::Processed {
                detected: 0,
                published: 0,
                skipped: 0,
            };
        }

        let poses = self
            .estimator
            .estimate(&candidates, self.config.marker_size, &calibration);
        if poses.len() != candidates.len() {
            log::warn!(
                "pose estimator returned {} entries for {} candidates",
                poses.len(),
                candidates.len()
            );
        }

        let mut set = MarkerRecordSet::empty(frame.stamp());
        let mut skipped = 0usize;

        // Markers are isolated from each other: a degenerate pose or a
        // failed lookup drops that marker and the loop moves on.
        for (index, candidate) in candidates.iter().enumerate() {
            let pose = match poses.get(index).copied().flatten() {
                Some(pose) if !pose.is_degenerate() => pose,
                _ => {
                    log::warn!("pose estimation failed for marker {}", candidate.id);
                    skipped += 1;
                    continue;
                }
            };

            let camera_to_marker = self.camera_to_marker(candidate.id, &pose);
            // The broadcast is stamped at processing time while the record
            // below keeps the capture stamp; downstream consumers rely on
            // the distinction.
            self.directory.broadcast(StampedTransform {
                transform: camera_to_marker.clone(),
                stamp: self.clock.now(),
            });
            log::info!("detected marker {}", candidate.id);

            let root_to_camera = match self.directory.lookup(
                ROOT_FRAME,
                &self.config.camera_frame,
                TimeQuery::Latest,
            ) {
                Ok(transform) => transform,
                Err(err) => {
                    log::warn!("transform lookup failed for marker {}: {err}", candidate.id);
                    skipped += 1;
                    continue;
                }
            };

            let root_to_marker = root_to_camera.compose(&camera_to_marker);
            set.markers.push(MarkerRecord {
                id: candidate.id,
                pose: Pose {
                    position: root_to_marker.translation.into(),
                    orientation: root_to_marker.rotation,
                },
                pixel: candidate.corners[0],
                stamp: frame.stamp(),
            });

            // Cosmetic only; a skipped overlay never affects the records.
            if !overlay::draw_axis(
                &mut frame,
                &calibration,
                &pose,
                self.config.marker_size * 0.5,
            ) {
                log::debug!("axis overlay skipped for marker {}", candidate.id);
            }
        }

        let published = set.markers.len();
        self.image_out.publish(&frame);
        self.records_out.publish(&set);

        FrameOutcome::Processed {
            detected: candidates.len(),
            published,
            skipped,
        }
    }

    fn camera_to_marker(&self, id: u32, pose: &PoseSample) -> RigidTransform {
        RigidTransform {
            parent_frame: self.config.camera_frame.clone(),
            child_frame: marker_frame(id),
            translation: pose.tvec,
            rotation: axis_angle_to_quaternion(&pose.rvec),
        }
    }

    fn note_waiting(&mut self) -> FrameOutcome {
        if !self.waiting_logged {
            log::info!("waiting for calibration before processing frames");
            self.waiting_logged = true;
        }
        FrameOutcome::AwaitingCalibration
    }
}
