//! SensorRigBlueprint - Config Loader output
//!
//! Agents, the sensors mounted on each agent, and render-sharing policy.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{SensorSpec, SensorType, Vec3f};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete sensor rig description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SensorRigBlueprint {
    #[serde(default)]
    pub version: ConfigVersion,

    /// Render-sharing policy
    #[serde(default)]
    pub render: RenderConfig,

    /// Agents and their sensors
    #[serde(default)]
    #[validate(nested)]
    pub agents: Vec<AgentConfig>,
}

/// Render-sharing policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Let semantic sensors share a render pass with each other
    #[serde(default)]
    pub allow_semantic_borrow: bool,
}

/// One agent: a node in the scene carrying sensors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AgentConfig {
    /// Unique identifier
    pub id: String,

    /// Agent node translation relative to the scene root
    #[serde(default)]
    pub position: Vec3f,

    /// Mounted sensors
    #[serde(default)]
    #[validate(nested)]
    pub sensors: Vec<SensorSpec>,
}

impl SensorRigBlueprint {
    /// Blueprint without agents
    pub fn empty() -> Self {
        Self {
            version: ConfigVersion::V1,
            render: RenderConfig::default(),
            agents: Vec::new(),
        }
    }

    /// Every sensor spec of every agent, in declaration order
    pub fn all_sensors(&self) -> impl Iterator<Item = &SensorSpec> {
        self.agents.iter().flat_map(|agent| agent.sensors.iter())
    }

    pub fn sensor_count(&self) -> usize {
        self.agents.iter().map(|agent| agent.sensors.len()).sum()
    }

    /// Spec with the given uuid
    pub fn find_sensor(&self, uuid: &str) -> Option<&SensorSpec> {
        self.all_sensors().find(|spec| spec.uuid == uuid)
    }

    pub fn sensors_of_type(&self, kind: SensorType) -> impl Iterator<Item = &SensorSpec> {
        self.all_sensors().filter(move |spec| spec.sensor_type == kind)
    }
}
