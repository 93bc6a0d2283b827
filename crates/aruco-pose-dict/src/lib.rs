//! Closed enumeration of the supported marker dictionaries.
//!
//! The pipeline resolves its configured dictionary name exactly once, at
//! construction time, against this closed set; detection back-ends receive
//! the enum value and never see the raw string. An unrecognized name is a
//! fatal configuration error, so there is no runtime-populated lookup table
//! to drift out of sync.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error for a dictionary name outside the supported set.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown marker dictionary `{name}`")]
pub struct UnknownDictionary {
    pub name: String,
}

/// One of the fixed marker dictionaries a detector can be asked to decode.
///
/// Sixteen generated ArUco variants (grid size × capacity), the original
/// ArUco dictionary, and four AprilTag families. Serialized under the
/// canonical OpenCV-style names (`DICT_4X4_50`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DictionaryKind {
    #[serde(rename = "DICT_4X4_50")]
    Aruco4x4_50,
    #[serde(rename = "DICT_4X4_100")]
    Aruco4x4_100,
    #[serde(rename = "DICT_4X4_250")]
    Aruco4x4_250,
    #[serde(rename = "DICT_4X4_1000")]
    Aruco4x4_1000,
    #[serde(rename = "DICT_5X5_50")]
    Aruco5x5_50,
    #[serde(rename = "DICT_5X5_100")]
    Aruco5x5_100,
    #[serde(rename = "DICT_5X5_250")]
    Aruco5x5_250,
    #[serde(rename = "DICT_5X5_1000")]
    Aruco5x5_1000,
    #[serde(rename = "DICT_6X6_50")]
    Aruco6x6_50,
    #[serde(rename = "DICT_6X6_100")]
    Aruco6x6_100,
    #[serde(rename = "DICT_6X6_250")]
    Aruco6x6_250,
    #[serde(rename = "DICT_6X6_1000")]
    Aruco6x6_1000,
    #[serde(rename = "DICT_7X7_50")]
    Aruco7x7_50,
    #[serde(rename = "DICT_7X7_100")]
    Aruco7x7_100,
    #[serde(rename = "DICT_7X7_250")]
    Aruco7x7_250,
    #[serde(rename = "DICT_7X7_1000")]
    Aruco7x7_1000,
    #[serde(rename = "DICT_ARUCO_ORIGINAL")]
    ArucoOriginal,
    #[serde(rename = "DICT_APRILTAG_16h5")]
    AprilTag16h5,
    #[serde(rename = "DICT_APRILTAG_25h9")]
    AprilTag25h9,
    #[serde(rename = "DICT_APRILTAG_36h10")]
    AprilTag36h10,
    #[serde(rename = "DICT_APRILTAG_36h11")]
    AprilTag36h11,
}

impl DictionaryKind {
    /// Every supported dictionary, in declaration order.
    pub const ALL: [DictionaryKind; 21] = [
        Self::Aruco4x4_50,
        Self::Aruco4x4_100,
        Self::Aruco4x4_250,
        Self::Aruco4x4_1000,
        Self::Aruco5x5_50,
        Self::Aruco5x5_100,
        Self::Aruco5x5_250,
        Self::Aruco5x5_1000,
        Self::Aruco6x6_50,
        Self::Aruco6x6_100,
        Self::Aruco6x6_250,
        Self::Aruco6x6_1000,
        Self::Aruco7x7_50,
        Self::Aruco7x7_100,
        Self::Aruco7x7_250,
        Self::Aruco7x7_1000,
        Self::ArucoOriginal,
        Self::AprilTag16h5,
        Self::AprilTag25h9,
        Self::AprilTag36h10,
        Self::AprilTag36h11,
    ];

    /// Canonical dictionary name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aruco4x4_50 => "DICT_4X4_50",
            Self::Aruco4x4_100 => "DICT_4X4_100",
            Self::Aruco4x4_250 => "DICT_4X4_250",
            Self::Aruco4x4_1000 => "DICT_4X4_1000",
            Self::Aruco5x5_50 => "DICT_5X5_50",
            Self::Aruco5x5_100 => "DICT_5X5_100",
            Self::Aruco5x5_250 => "DICT_5X5_250",
            Self::Aruco5x5_1000 => "DICT_5X5_1000",
            Self::Aruco6x6_50 => "DICT_6X6_50",
            Self::Aruco6x6_100 => "DICT_6X6_100",
            Self::Aruco6x6_250 => "DICT_6X6_250",
            Self::Aruco6x6_1000 => "DICT_6X6_1000",
            Self::Aruco7x7_50 => "DICT_7X7_50",
            Self::Aruco7x7_100 => "DICT_7X7_100",
            Self::Aruco7x7_250 => "DICT_7X7_250",
            Self::Aruco7x7_1000 => "DICT_7X7_1000",
            Self::ArucoOriginal => "DICT_ARUCO_ORIGINAL",
            Self::AprilTag16h5 => "DICT_APRILTAG_16h5",
            Self::AprilTag25h9 => "DICT_APRILTAG_25h9",
            Self::AprilTag36h10 => "DICT_APRILTAG_36h10",
            Self::AprilTag36h11 => "DICT_APRILTAG_36h11",
        }
    }

    /// Inner bits per marker side.
    pub const fn marker_bits(self) -> usize {
        match self {
            Self::Aruco4x4_50
            | Self::Aruco4x4_100
            | Self::Aruco4x4_250
            | Self::Aruco4x4_1000
            | Self::AprilTag16h5 => 4,
            Self::Aruco5x5_50
            | Self::Aruco5x5_100
            | Self::Aruco5x5_250
            | Self::Aruco5x5_1000
            | Self::ArucoOriginal
            | Self::AprilTag25h9 => 5,
            Self::Aruco6x6_50
            | Self::Aruco6x6_100
            | Self::Aruco6x6_250
            | Self::Aruco6x6_1000
            | Self::AprilTag36h10
            | Self::AprilTag36h11 => 6,
            Self::Aruco7x7_50 | Self::Aruco7x7_100 | Self::Aruco7x7_250 | Self::Aruco7x7_1000 => 7,
        }
    }

    /// Number of distinct marker ids the dictionary encodes.
    pub const fn capacity(self) -> usize {
        match self {
            Self::Aruco4x4_50 | Self::Aruco5x5_50 | Self::Aruco6x6_50 | Self::Aruco7x7_50 => 50,
            Self::Aruco4x4_100 | Self::Aruco5x5_100 | Self::Aruco6x6_100 | Self::Aruco7x7_100 => {
                100
            }
            Self::Aruco4x4_250 | Self::Aruco5x5_250 | Self::Aruco6x6_250 | Self::Aruco7x7_250 => {
                250
            }
            Self::Aruco4x4_1000
            | Self::Aruco5x5_1000
            | Self::Aruco6x6_1000
            | Self::Aruco7x7_1000 => 1000,
            Self::ArucoOriginal => 1024,
            Self::AprilTag16h5 => 30,
            Self::AprilTag25h9 => 35,
            Self::AprilTag36h10 => 2320,
            Self::AprilTag36h11 => 587,
        }
    }

    /// Resolve a canonical name, failing fast on anything unknown.
    pub fn from_name(name: &str) -> Result<Self, UnknownDictionary> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| UnknownDictionary {
                name: name.to_owned(),
            })
    }
}

impl fmt::Display for DictionaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DictionaryKind {
    type Err = UnknownDictionary;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_round_trips() {
        for kind in DictionaryKind::ALL {
            assert_eq!(DictionaryKind::from_name(kind.name()), Ok(kind));
            assert_eq!(kind.name().parse::<DictionaryKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn the_set_is_closed() {
        assert_eq!(DictionaryKind::ALL.len(), 21);

        let err = DictionaryKind::from_name("NOT_A_REAL_DICT").unwrap_err();
        assert_eq!(err.name, "NOT_A_REAL_DICT");

        // Case and spelling must match exactly.
        assert!(DictionaryKind::from_name("dict_4x4_50").is_err());
        assert!(DictionaryKind::from_name("DICT_APRILTAG_16H5").is_err());
    }

    #[test]
    fn metadata_is_consistent() {
        assert_eq!(DictionaryKind::Aruco4x4_50.marker_bits(), 4);
        assert_eq!(DictionaryKind::Aruco7x7_1000.marker_bits(), 7);
        assert_eq!(DictionaryKind::Aruco7x7_1000.capacity(), 1000);
        assert_eq!(DictionaryKind::ArucoOriginal.marker_bits(), 5);
        assert_eq!(DictionaryKind::ArucoOriginal.capacity(), 1024);
        assert_eq!(DictionaryKind::AprilTag36h11.marker_bits(), 6);
        assert_eq!(DictionaryKind::AprilTag36h11.capacity(), 587);
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&DictionaryKind::Aruco4x4_1000).unwrap();
        assert_eq!(json, "\"DICT_4X4_1000\"");

        let kind: DictionaryKind = serde_json::from_str("\"DICT_APRILTAG_36h11\"").unwrap();
        assert_eq!(kind, DictionaryKind::AprilTag36h11);

        assert!(serde_json::from_str::<DictionaryKind>("\"DICT_8X8_50\"").is_err());
    }
}
