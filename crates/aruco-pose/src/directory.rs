//! Shared frame-graph contract.
//!
//! The transform directory is an external, continuously-updated store of
//! rigid transforms between named frames. The pipeline writes each
//! marker's camera-relative transform into it and reads the root→camera
//! edge back out; it never walks the graph itself.

use aruco_pose_core::{RigidTransform, StampedTransform, TimeQuery};

/// Failure modes of a transform lookup.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("no transform path from `{parent}` to `{child}`")]
    NoPath { parent: String, child: String },
    #[error("transform from `{parent}` to `{child}` is too stale")]
    Stale { parent: String, child: String },
    #[error("transform backend error: {0}")]
    Backend(String),
}

/// The two operations the pipeline needs from the frame graph.
///
/// `broadcast` is fire-and-forget; `lookup` resolves the shortest known
/// path at or near the queried time and must fail in bounded time rather
/// than block.
pub trait TransformDirectory {
    fn broadcast(&mut self, transform: StampedTransform);

    fn lookup(
        &self,
        parent_frame: &str,
        child_frame: &str,
        time: TimeQuery,
    ) -> Result<RigidTransform, LookupError>;
}
