//! Pipeline parameters and their startup validation.

use serde::{Deserialize, Serialize};

use aruco_pose_dict::{DictionaryKind, UnknownDictionary};

/// Root frame of the published world poses.
pub const ROOT_FRAME: &str = "map";

/// Child frame name broadcast for a detected marker.
pub fn marker_frame(id: u32) -> String {
    format!("aruco_marker_{id}")
}

/// Raw pipeline parameters as handed over by the embedding process.
///
/// How these are loaded (parameter server, file, flags) is the embedder's
/// concern; the pipeline only requires that [`PipelineParams::validate`]
/// has succeeded before it is constructed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Physical marker edge length; translation output shares its unit.
    pub marker_size: f64,
    /// Name of the camera's optical frame in the transform graph.
    pub camera_frame: String,
    /// Address of the image stream.
    pub image_topic: String,
    /// Address of the calibration stream.
    pub calibration_topic: String,
    /// Dictionary selection by canonical name.
    pub dictionary: String,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            marker_size: 0.1,
            camera_frame: "camera_rgb_optical_frame".to_owned(),
            image_topic: "/camera/color/image_raw".to_owned(),
            calibration_topic: "/camera/color/camera_info".to_owned(),
            dictionary: "DICT_4X4_1000".to_owned(),
        }
    }
}

impl PipelineParams {
    /// Resolve and validate the raw parameters.
    ///
    /// This is the fail-fast startup step: an unknown dictionary name or an
    /// unusable marker size refuses construction before any subscription
    /// can exist.
    pub fn validate(&self) -> Result<PipelineConfig, ConfigError> {
        if !self.marker_size.is_finite() || self.marker_size <= 0.0 {
            return Err(ConfigError::InvalidMarkerSize {
                size: self.marker_size,
            });
        }
        if self.camera_frame.is_empty() {
            return Err(ConfigError::EmptyCameraFrame);
        }
        let dictionary = DictionaryKind::from_name(&self.dictionary)?;
        Ok(PipelineConfig {
            marker_size: self.marker_size,
            camera_frame: self.camera_frame.clone(),
            image_topic: self.image_topic.clone(),
            calibration_topic: self.calibration_topic.clone(),
            dictionary,
        })
    }
}

/// Validated pipeline configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    pub marker_size: f64,
    pub camera_frame: String,
    pub image_topic: String,
    pub calibration_topic: String,
    pub dictionary: DictionaryKind,
}

/// Fatal configuration errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    UnknownDictionary(#[from] UnknownDictionary),
    #[error("marker size must be finite and positive (got {size})")]
    InvalidMarkerSize { size: f64 },
    #[error("camera frame name is empty")]
    EmptyCameraFrame,
}
