//! Published record types and sink contracts.

use nalgebra::{Point2, Point3, UnitQuaternion};
use serde::{Deserialize, Serialize};

use aruco_pose_core::{ImageFrame, Stamp};

use crate::config::ROOT_FRAME;

/// Position and orientation in some agreed-upon frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

/// One detected marker, localized in the root frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    /// Detector-assigned marker id.
    pub id: u32,
    /// Marker pose in the record set's root frame.
    pub pose: Pose,
    /// Pixel location of the marker's first corner.
    pub pixel: Point2<f32>,
    /// Capture time of the frame the marker was seen in.
    pub stamp: Stamp,
}

/// Frame-scoped, ordered marker records, published atomically per frame.
///
/// Every record shares the set's stamp and root frame. An empty set is a
/// normal outcome for a frame without markers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecordSet {
    pub stamp: Stamp,
    pub frame_id: String,
    pub markers: Vec<MarkerRecord>,
}

impl MarkerRecordSet {
    /// An empty set rooted at the configured world frame.
    pub fn empty(stamp: Stamp) -> Self {
        Self {
            stamp,
            frame_id: ROOT_FRAME.to_owned(),
            markers: Vec::new(),
        }
    }
}

/// Sink for the per-frame record set. No logic, no return value.
pub trait RecordPublisher {
    fn publish(&mut self, records: &MarkerRecordSet);
}

/// Sink for the annotated debug image.
pub trait ImagePublisher {
    fn publish(&mut self, image: &ImageFrame);
}
