//! Fiducial-marker detection-to-world-pose pipeline.
//!
//! This crate wires per-frame marker detection, batched pose estimation,
//! rotation conversion and rigid-transform composition into one
//! callback-driven pipeline. The detector, the pose estimator and the
//! shared transform graph are external capabilities behind traits; the
//! pipeline owns the calibration snapshot, the failure-isolation policy and
//! the assembly of the published record set, transform broadcasts and debug
//! overlay image.

mod calibration_cell;
mod config;
mod detect;
mod directory;
mod output;
mod overlay;
mod pipeline;

pub use calibration_cell::CalibrationCell;
pub use config::{marker_frame, ConfigError, PipelineConfig, PipelineParams, ROOT_FRAME};
pub use detect::{MarkerCandidate, MarkerDetector, PoseEstimator, PoseSample};
pub use directory::{LookupError, TransformDirectory};
pub use output::{ImagePublisher, MarkerRecord, MarkerRecordSet, Pose, RecordPublisher};
pub use pipeline::{DetectionPipeline, FrameOutcome};

pub use aruco_pose_core as core;
pub use aruco_pose_dict::{DictionaryKind, UnknownDictionary};
