//! Core primitives for the marker-pose pipeline.
//!
//! This crate is intentionally small and purely geometric. It holds the
//! timestamp and clock abstractions, the in-memory image frame, the camera
//! calibration model, rigid transforms between named frames, and the
//! rotation-representation conversions the pipeline needs. It does *not*
//! know about marker detection, pose estimation, or the transform graph.

mod calibration;
mod image;
mod logger;
mod projection;
mod rotation;
mod time;
mod transform;

pub use calibration::CameraCalibration;
pub use image::{ImageError, ImageFrame, RGB_CHANNELS};
pub use projection::{project_camera_point, project_object_points};
pub use rotation::{
    axis_angle_to_matrix, axis_angle_to_quaternion, matrix_to_quaternion, quaternion_to_axis_angle,
};
pub use time::{Clock, ManualClock, Stamp, SystemClock, TimeQuery};
pub use transform::{RigidTransform, StampedTransform};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
