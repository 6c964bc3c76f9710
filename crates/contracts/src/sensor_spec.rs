//! SensorSpec - sensor descriptor
//!
//! Type, placement and output parameters of one sensor, plus the
//! render-sharing predicate used to skip redundant render passes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use validator::Validate;

use crate::{SensorId, Vec2u, Vec3f};

/// What a sensor observes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    #[default]
    None,
    Color,
    Depth,
    Normal,
    Semantic,
    Path,
    Goal,
    Force,
    Tensor,
    Text,
}

impl SensorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Color => "color",
            Self::Depth => "depth",
            Self::Normal => "normal",
            Self::Semantic => "semantic",
            Self::Path => "path",
            Self::Goal => "goal",
            Self::Force => "force",
            Self::Tensor => "tensor",
            Self::Text => "text",
        }
    }

    /// Parse the snake_case name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "color" => Self::Color,
            "depth" => Self::Depth,
            "normal" => Self::Normal,
            "semantic" => Self::Semantic,
            "path" => Self::Path,
            "goal" => Self::Goal,
            "force" => Self::Force,
            "tensor" => Self::Tensor,
            "text" => Self::Text,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projection model of a visual sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorSubtype {
    #[default]
    None,
    Pinhole,
    Orthographic,
    Fisheye,
    Equirectangular,
}

impl SensorSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pinhole => "pinhole",
            Self::Orthographic => "orthographic",
            Self::Fisheye => "fisheye",
            Self::Equirectangular => "equirectangular",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "pinhole" => Self::Pinhole,
            "orthographic" => Self::Orthographic,
            "fisheye" => Self::Fisheye,
            "equirectangular" => Self::Equirectangular,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for SensorSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sensor descriptor
///
/// Value object: `==` compares every field. Once a sensor is bound to it the
/// spec is shared as `Arc<SensorSpec>` and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SensorSpec {
    /// Unique identifier, key inside a sensor suite
    pub uuid: SensorId,

    pub sensor_type: SensorType,

    pub sensor_subtype: SensorSubtype,

    /// Named sensor parameters (e.g. `hfov`)
    pub parameters: HashMap<String, String>,

    /// Node-local translation
    pub position: Vec3f,

    /// Radians about local X, then local Y, then local Z
    pub orientation: Vec3f,

    /// Image extent as (rows, cols)
    pub resolution: Vec2u,

    #[validate(range(min = 1))]
    pub channels: u32,

    #[validate(length(min = 1))]
    pub encoding: String,

    pub observation_space: String,

    /// Noise post-process identifier
    pub noise_model: String,

    pub gpu2gpu_transfer: bool,
}

impl Default for SensorSpec {
    fn default() -> Self {
        Self {
            uuid: SensorId::default(),
            sensor_type: SensorType::None,
            sensor_subtype: SensorSubtype::None,
            parameters: HashMap::new(),
            position: Vec3f::new(0.0, 1.5, 0.0),
            orientation: Vec3f::zeros(),
            resolution: Vec2u::new(84, 84),
            channels: 4,
            encoding: "rgba_uint8".to_string(),
            observation_space: String::new(),
            noise_model: "None".to_string(),
            gpu2gpu_transfer: false,
        }
    }
}

impl SensorSpec {
    /// Spec with the given identity and default placement/output parameters
    pub fn new(uuid: impl Into<SensorId>, sensor_type: SensorType) -> Self {
        Self {
            uuid: uuid.into(),
            sensor_type,
            ..Default::default()
        }
    }

    /// Whether `other`'s rendered image can be reused for this sensor.
    ///
    /// Both types must be borrowable and the rendered geometry (subtype,
    /// parameters, position, orientation, resolution) must match exactly.
    /// A semantic sensor only ever pairs with another semantic sensor.
    /// Channels, encoding, observation space, noise model and transfer mode
    /// only affect post-processing and are not compared.
    pub fn can_borrow_rendering_from(
        &self,
        other: &SensorSpec,
        allow_semantic_borrow: bool,
    ) -> bool {
        is_borrowable_type(self.sensor_type, allow_semantic_borrow)
            && is_borrowable_type(other.sensor_type, allow_semantic_borrow)
            && self.is_semantic() == other.is_semantic()
            && self.sensor_subtype == other.sensor_subtype
            && self.parameters == other.parameters
            && self.position == other.position
            && self.orientation == other.orientation
            && self.resolution == other.resolution
    }

    fn is_semantic(&self) -> bool {
        self.sensor_type == SensorType::Semantic
    }
}

/// COLOR and DEPTH always; SEMANTIC only when allowed; nothing else.
pub fn is_borrowable_type(sensor_type: SensorType, allow_semantic_borrow: bool) -> bool {
    match sensor_type {
        SensorType::Color | SensorType::Depth => true,
        SensorType::Semantic => allow_semantic_borrow,
        _ => false,
    }
}
